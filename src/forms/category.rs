use serde::Deserialize;
use uuid::Uuid;

use super::{FieldErrors, Form};
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryForm {
    pub name: Option<String>,
    pub billboard_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryInput {
    pub name: String,
    pub billboard_id: Uuid,
}

impl Form for CategoryForm {
    type Input = CategoryInput;

    fn validate(self) -> Result<CategoryInput, ApiError> {
        let mut errors = FieldErrors::new();
        let name = errors.text("name", "Name", self.name);
        let billboard_id = errors.id("billboardId", "Billboard id", self.billboard_id);
        errors.finish(CategoryInput { name, billboard_id })
    }
}
