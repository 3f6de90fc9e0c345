use axum::{
    body::Bytes,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use uuid::Uuid;

use super::{authorize, entity_id, logged, store_id};
use crate::app::AppState;
use crate::auth::RequestContext;
use crate::database::models::{Product, ProductDetail};
use crate::database::ProductFilter;
use crate::error::ApiError;
use crate::forms::{self, ProductForm};
use crate::middleware::{ApiResponse, ApiResult};
use crate::types::{EntityKind, Operation};

/// Query string of the product list
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    pub category_id: Option<String>,
    pub color_id: Option<String>,
    pub size_id: Option<String>,
    pub is_featured: Option<String>,
}

impl ProductQuery {
    /// Archived products are never listed
    pub fn into_filter(self) -> Result<ProductFilter, ApiError> {
        Ok(ProductFilter {
            category_id: query_id("categoryId", self.category_id)?,
            color_id: query_id("colorId", self.color_id)?,
            size_id: query_id("sizeId", self.size_id)?,
            // false selects non-featured products; absent or blank applies no restriction
            is_featured: match self.is_featured.as_deref().map(str::trim) {
                None | Some("") => None,
                Some("true") | Some("1") => Some(true),
                Some("false") | Some("0") => Some(false),
                Some(_) => return Err(ApiError::bad_request("isFeatured must be true or false")),
            },
            include_archived: false,
        })
    }
}

fn query_id(name: &str, raw: Option<String>) -> Result<Option<Uuid>, ApiError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => Uuid::parse_str(raw)
            .map(Some)
            .map_err(|_| ApiError::bad_request(format!("{} must be a valid id", name))),
    }
}

pub async fn products_get(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(raw_store_id): Path<String>,
    Query(query): Query<ProductQuery>,
) -> ApiResult<Vec<ProductDetail>> {
    let result: ApiResult<Vec<ProductDetail>> = async {
        let store_id = store_id(&raw_store_id)?;
        let filter = query.into_filter()?;
        Ok(ApiResponse::success(state.catalog.list_products(store_id, &filter).await?))
    }
    .await;
    logged("PRODUCTS_GET", &ctx, result)
}

pub async fn products_post(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(raw_store_id): Path<String>,
    body: Bytes,
) -> ApiResult<ProductDetail> {
    let result: ApiResult<ProductDetail> = async {
        let store = authorize(&state, &ctx, &raw_store_id, Operation::Create, EntityKind::Product).await?;
        let input = forms::parse::<ProductForm>(&body)?;
        Ok(ApiResponse::created(state.catalog.create_product(store.id, input).await?))
    }
    .await;
    logged("PRODUCTS_POST", &ctx, result)
}

pub async fn product_get(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path((raw_store_id, raw_id)): Path<(String, String)>,
) -> ApiResult<ProductDetail> {
    let result: ApiResult<ProductDetail> = async {
        let store_id = store_id(&raw_store_id)?;
        let id = entity_id(&raw_id, "Product")?;
        let product = state
            .catalog
            .get_product(store_id, id)
            .await?
            .ok_or_else(|| ApiError::not_found("Product not found"))?;
        Ok(ApiResponse::success(product))
    }
    .await;
    logged("PRODUCT_GET", &ctx, result)
}

pub async fn product_patch(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path((raw_store_id, raw_id)): Path<(String, String)>,
    body: Bytes,
) -> ApiResult<ProductDetail> {
    let result: ApiResult<ProductDetail> = async {
        let store = authorize(&state, &ctx, &raw_store_id, Operation::Update, EntityKind::Product).await?;
        let id = entity_id(&raw_id, "Product")?;
        let input = forms::parse::<ProductForm>(&body)?;
        Ok(ApiResponse::success(state.catalog.update_product(store.id, id, input).await?))
    }
    .await;
    logged("PRODUCT_PATCH", &ctx, result)
}

pub async fn product_delete(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path((raw_store_id, raw_id)): Path<(String, String)>,
) -> ApiResult<Product> {
    let result: ApiResult<Product> = async {
        let store = authorize(&state, &ctx, &raw_store_id, Operation::Delete, EntityKind::Product).await?;
        let id = entity_id(&raw_id, "Product")?;
        Ok(ApiResponse::success(state.catalog.delete_product(store.id, id).await?))
    }
    .await;
    logged("PRODUCT_DELETE", &ctx, result)
}
