use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;
use uuid::Uuid;

use super::{FieldErrors, Form};
use crate::error::ApiError;

pub const MAX_STAR_RATING: i16 = 5;

/// Prices are stored as NUMERIC(12, 2)
pub const PRICE_SCALE: u32 = 2;
const MAX_PRICE_UNITS: i64 = 10_000_000_000;

#[derive(Debug, Deserialize)]
pub struct ImageForm {
    pub url: Option<String>,
}

/// Price and rating arrive either as JSON numbers or numeric strings
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductForm {
    pub name: Option<String>,
    pub images: Option<Vec<ImageForm>>,
    pub price: Option<Value>,
    pub description: Option<String>,
    pub star_rating: Option<Value>,
    pub category_id: Option<String>,
    pub size_id: Option<String>,
    pub color_id: Option<String>,
    pub is_featured: Option<bool>,
    pub is_archived: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductInput {
    pub name: String,
    pub price: Decimal,
    pub description: String,
    pub star_rating: i16,
    pub category_id: Uuid,
    pub size_id: Uuid,
    pub color_id: Uuid,
    pub is_featured: bool,
    pub is_archived: bool,
    pub images: Vec<String>,
}

impl Form for ProductForm {
    type Input = ProductInput;

    fn validate(self) -> Result<ProductInput, ApiError> {
        let mut errors = FieldErrors::new();

        let name = errors.text("name", "Name", self.name);
        let description = errors.text("description", "Description", self.description);

        let star_rating = match self.star_rating.as_ref().and_then(numeric_text) {
            None => {
                errors.add("starRating", "Rating is required");
                0
            }
            Some(raw) => match raw.parse::<i16>() {
                Ok(r) if (1..=MAX_STAR_RATING).contains(&r) => r,
                _ => {
                    errors.add(
                        "starRating",
                        format!("Rating must be a whole number between 1 and {}", MAX_STAR_RATING),
                    );
                    0
                }
            },
        };

        let images: Vec<String> = self
            .images
            .unwrap_or_default()
            .into_iter()
            .filter_map(|image| image.url)
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .collect();
        if images.is_empty() {
            errors.add("images", "Image is required");
        }

        let price = match self.price.as_ref().and_then(numeric_text) {
            None => {
                errors.add("price", "Price is required");
                Decimal::ZERO
            }
            Some(raw) => match parse_decimal(&raw) {
                Some(p) if p <= Decimal::ZERO => {
                    errors.add("price", "Price must be a positive number");
                    Decimal::ZERO
                }
                Some(p) if p.normalize().scale() > PRICE_SCALE => {
                    errors.add("price", format!("Price must have at most {} decimal places", PRICE_SCALE));
                    Decimal::ZERO
                }
                Some(p) if p >= Decimal::new(MAX_PRICE_UNITS, 0) => {
                    errors.add("price", format!("Price must be less than {}", MAX_PRICE_UNITS));
                    Decimal::ZERO
                }
                Some(p) => p,
                None => {
                    errors.add("price", "Price must be a positive number");
                    Decimal::ZERO
                }
            },
        };

        let category_id = errors.id("categoryId", "Category id", self.category_id);
        let size_id = errors.id("sizeId", "Size id", self.size_id);
        let color_id = errors.id("colorId", "Color id", self.color_id);

        errors.finish(ProductInput {
            name,
            price,
            description,
            star_rating,
            category_id,
            size_id,
            color_id,
            is_featured: self.is_featured.unwrap_or(false),
            is_archived: self.is_archived.unwrap_or(false),
            images,
        })
    }
}

/// Textual form of a number-or-string field; `None` for null or blank
fn numeric_text(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::super::parse;
    use super::*;
    use serde_json::json;

    fn valid_body() -> Value {
        json!({
            "name": "Runner",
            "images": [{"url": "https://cdn.example.com/1.png"}, {"url": "https://cdn.example.com/2.png"}],
            "price": 49.5,
            "description": "Lightweight running shoe",
            "starRating": "4",
            "categoryId": Uuid::new_v4().to_string(),
            "sizeId": Uuid::new_v4().to_string(),
            "colorId": Uuid::new_v4().to_string(),
        })
    }

    fn parse_value(body: Value) -> Result<ProductInput, ApiError> {
        parse::<ProductForm>(body.to_string().as_bytes())
    }

    #[test]
    fn coerces_numbers_and_strings() {
        let input = parse_value(valid_body()).unwrap();
        assert_eq!(input.price, Decimal::from_str("49.5").unwrap());
        assert_eq!(input.star_rating, 4);
        assert_eq!(input.images.len(), 2);
        assert!(!input.is_featured);
        assert!(!input.is_archived);

        let mut body = valid_body();
        body["price"] = json!("12.00");
        body["starRating"] = json!(5);
        body["isFeatured"] = json!(true);
        let input = parse_value(body).unwrap();
        assert_eq!(input.price, Decimal::from_str("12.00").unwrap());
        assert_eq!(input.star_rating, 5);
        assert!(input.is_featured);
    }

    #[test]
    fn requires_at_least_one_image() {
        let mut body = valid_body();
        body["images"] = json!([]);
        assert_eq!(parse_value(body).unwrap_err().message(), "Image is required");
    }

    #[test]
    fn rejects_non_positive_price() {
        let mut body = valid_body();
        body["price"] = json!(0);
        assert_eq!(parse_value(body).unwrap_err().message(), "Price must be a positive number");
    }

    #[test]
    fn rejects_prices_the_money_column_cannot_hold() {
        for price in [json!("0.001"), json!(4.999)] {
            let mut body = valid_body();
            body["price"] = price;
            assert_eq!(
                parse_value(body).unwrap_err().message(),
                "Price must have at most 2 decimal places"
            );
        }

        for price in [json!("123456789012345.67"), json!(10_000_000_000u64)] {
            let mut body = valid_body();
            body["price"] = price;
            assert_eq!(parse_value(body).unwrap_err().message(), "Price must be less than 10000000000");
        }
    }

    #[test]
    fn accepts_prices_at_the_column_limits() {
        let mut body = valid_body();
        body["price"] = json!("9999999999.99");
        assert_eq!(parse_value(body).unwrap().price, Decimal::from_str("9999999999.99").unwrap());

        let mut body = valid_body();
        body["price"] = json!("0.01");
        assert_eq!(parse_value(body).unwrap().price, Decimal::from_str("0.01").unwrap());

        let mut body = valid_body();
        body["price"] = json!("7.500");
        assert_eq!(parse_value(body).unwrap().price, Decimal::from_str("7.5").unwrap());
    }

    #[test]
    fn rejects_out_of_range_rating() {
        let mut body = valid_body();
        body["starRating"] = json!(9);
        assert_eq!(
            parse_value(body).unwrap_err().message(),
            "Rating must be a whole number between 1 and 5"
        );
    }

    #[test]
    fn reports_name_before_references() {
        let mut body = valid_body();
        body["name"] = json!("");
        body["colorId"] = Value::Null;
        let err = parse_value(body).unwrap_err();
        assert_eq!(err.message(), "Name is required");
        match err {
            ApiError::ValidationError { field_errors: Some(fields), .. } => {
                assert_eq!(fields["colorId"], "Color id is required");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
