//! Request body validation.
//!
//! Each mutating route accepts one form type. A form is deserialized from the
//! raw body and validated into a typed input before any storage call runs, so
//! handlers never see a partially valid payload.

pub mod billboard;
pub mod category;
pub mod color;
pub mod product;
pub mod size;
pub mod store;

use serde::de::DeserializeOwned;
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::ApiError;

pub use billboard::{BillboardForm, BillboardInput};
pub use category::{CategoryForm, CategoryInput};
pub use color::{ColorForm, ColorInput};
pub use product::{ProductForm, ProductInput};
pub use size::{SizeForm, SizeInput};
pub use store::{StoreForm, StoreInput};

/// A deserializable request body that validates into a typed input
pub trait Form: DeserializeOwned {
    type Input;

    fn validate(self) -> Result<Self::Input, ApiError>;
}

/// Parse a raw JSON body into `F` and validate it
pub fn parse<F: Form>(body: &[u8]) -> Result<F::Input, ApiError> {
    if body.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(ApiError::invalid_json("Request body is required"));
    }

    let form: F = serde_json::from_slice(body)
        .map_err(|e| ApiError::invalid_json(format!("Invalid request body: {}", e)))?;

    form.validate()
}

/// Collects per-field failures; the first one becomes the response message
#[derive(Debug, Default)]
pub struct FieldErrors {
    first: Option<String>,
    fields: HashMap<String, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        let message = message.into();
        if self.first.is_none() {
            self.first = Some(message.clone());
        }
        self.fields.entry(field.to_string()).or_insert(message);
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Trimmed non-empty text, or records "<label> is required"
    pub fn text(&mut self, field: &str, label: &str, value: Option<String>) -> String {
        match value.map(|v| v.trim().to_string()) {
            Some(v) if !v.is_empty() => v,
            _ => {
                self.add(field, format!("{} is required", label));
                String::new()
            }
        }
    }

    /// Required reference to another record, given as a UUID string
    pub fn id(&mut self, field: &str, label: &str, value: Option<String>) -> Uuid {
        let raw = self.text(field, label, value);
        if raw.is_empty() {
            return Uuid::nil();
        }
        match Uuid::parse_str(&raw) {
            Ok(id) => id,
            Err(_) => {
                self.add(field, format!("{} must be a valid id", label));
                Uuid::nil()
            }
        }
    }

    pub fn finish<T>(self, value: T) -> Result<T, ApiError> {
        match self.first {
            None => Ok(value),
            Some(message) => Err(ApiError::validation_error(message, Some(self.fields))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_is_invalid_json() {
        let err = parse::<StoreForm>(b"  ").unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "INVALID_JSON");
    }

    #[test]
    fn malformed_body_is_invalid_json() {
        let err = parse::<StoreForm>(b"{\"name\": ").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_JSON");
    }

    #[test]
    fn first_failure_becomes_message() {
        let mut errors = FieldErrors::new();
        errors.text("label", "Label", None);
        errors.text("imageUrl", "Image URL", Some("   ".to_string()));
        assert!(!errors.is_empty());

        let err = errors.finish(()).unwrap_err();
        assert_eq!(err.message(), "Label is required");
        match err {
            ApiError::ValidationError { field_errors: Some(fields), .. } => {
                assert_eq!(fields.len(), 2);
                assert_eq!(fields["imageUrl"], "Image URL is required");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn id_rejects_non_uuid() {
        let mut errors = FieldErrors::new();
        errors.id("categoryId", "Category id", Some("not-a-uuid".to_string()));
        let err = errors.finish(()).unwrap_err();
        assert_eq!(err.message(), "Category id must be a valid id");
    }
}
