use serde::Deserialize;

use super::{FieldErrors, Form};
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ColorForm {
    pub name: Option<String>,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColorInput {
    pub name: String,
    pub value: String,
}

impl Form for ColorForm {
    type Input = ColorInput;

    fn validate(self) -> Result<ColorInput, ApiError> {
        let mut errors = FieldErrors::new();
        let name = errors.text("name", "Name", self.name);
        let value = errors.text("value", "Value", self.value);
        if !value.is_empty() && !is_hex_code(&value) {
            errors.add("value", "Value must be a valid hex code");
        }
        errors.finish(ColorInput { name, value })
    }
}

fn is_hex_code(value: &str) -> bool {
    value.len() >= 4 && value.starts_with('#')
}
