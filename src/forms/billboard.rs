use serde::Deserialize;

use super::{FieldErrors, Form};
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillboardForm {
    pub label: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BillboardInput {
    pub label: String,
    pub image_url: String,
}

impl Form for BillboardForm {
    type Input = BillboardInput;

    fn validate(self) -> Result<BillboardInput, ApiError> {
        let mut errors = FieldErrors::new();
        let label = errors.text("label", "Label", self.label);
        let image_url = errors.text("imageUrl", "Image URL", self.image_url);
        errors.finish(BillboardInput { label, image_url })
    }
}
