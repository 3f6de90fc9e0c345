use serde::Deserialize;

use super::{FieldErrors, Form};
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct StoreForm {
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoreInput {
    pub name: String,
}

impl Form for StoreForm {
    type Input = StoreInput;

    fn validate(self) -> Result<StoreInput, ApiError> {
        let mut errors = FieldErrors::new();
        let name = errors.text("name", "Name", self.name);
        errors.finish(StoreInput { name })
    }
}
