use serde::Deserialize;

use super::{FieldErrors, Form};
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct SizeForm {
    pub name: Option<String>,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SizeInput {
    pub name: String,
    pub value: String,
}

impl Form for SizeForm {
    type Input = SizeInput;

    fn validate(self) -> Result<SizeInput, ApiError> {
        let mut errors = FieldErrors::new();
        let name = errors.text("name", "Name", self.name);
        let value = errors.text("value", "Value", self.value);
        errors.finish(SizeInput { name, value })
    }
}
