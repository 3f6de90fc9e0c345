use axum::{
    body::Bytes,
    extract::{Path, State},
};

use super::{authorize, entity_id, logged, store_id};
use crate::app::AppState;
use crate::auth::RequestContext;
use crate::database::models::CategoryDetail;
use crate::error::ApiError;
use crate::forms::{self, CategoryForm};
use crate::middleware::{ApiResponse, ApiResult};
use crate::types::{EntityKind, Operation};

pub async fn categories_get(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(raw_store_id): Path<String>,
) -> ApiResult<Vec<CategoryDetail>> {
    let result: ApiResult<Vec<CategoryDetail>> = async {
        let store_id = store_id(&raw_store_id)?;
        Ok(ApiResponse::success(state.catalog.list_categories(store_id).await?))
    }
    .await;
    logged("CATEGORIES_GET", &ctx, result)
}

pub async fn categories_post(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(raw_store_id): Path<String>,
    body: Bytes,
) -> ApiResult<CategoryDetail> {
    let result: ApiResult<CategoryDetail> = async {
        let store = authorize(&state, &ctx, &raw_store_id, Operation::Create, EntityKind::Category).await?;
        let input = forms::parse::<CategoryForm>(&body)?;
        Ok(ApiResponse::created(state.catalog.create_category(store.id, input).await?))
    }
    .await;
    logged("CATEGORIES_POST", &ctx, result)
}

pub async fn category_get(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path((raw_store_id, raw_id)): Path<(String, String)>,
) -> ApiResult<CategoryDetail> {
    let result: ApiResult<CategoryDetail> = async {
        let store_id = store_id(&raw_store_id)?;
        let id = entity_id(&raw_id, "Category")?;
        let category = state
            .catalog
            .get_category(store_id, id)
            .await?
            .ok_or_else(|| ApiError::not_found("Category not found"))?;
        Ok(ApiResponse::success(category))
    }
    .await;
    logged("CATEGORY_GET", &ctx, result)
}

pub async fn category_patch(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path((raw_store_id, raw_id)): Path<(String, String)>,
    body: Bytes,
) -> ApiResult<CategoryDetail> {
    let result: ApiResult<CategoryDetail> = async {
        let store = authorize(&state, &ctx, &raw_store_id, Operation::Update, EntityKind::Category).await?;
        let id = entity_id(&raw_id, "Category")?;
        let input = forms::parse::<CategoryForm>(&body)?;
        Ok(ApiResponse::success(state.catalog.update_category(store.id, id, input).await?))
    }
    .await;
    logged("CATEGORY_PATCH", &ctx, result)
}

pub async fn category_delete(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path((raw_store_id, raw_id)): Path<(String, String)>,
) -> ApiResult<CategoryDetail> {
    let result: ApiResult<CategoryDetail> = async {
        let store = authorize(&state, &ctx, &raw_store_id, Operation::Delete, EntityKind::Category).await?;
        let id = entity_id(&raw_id, "Category")?;
        Ok(ApiResponse::success(state.catalog.delete_category(store.id, id).await?))
    }
    .await;
    logged("CATEGORY_DELETE", &ctx, result)
}
