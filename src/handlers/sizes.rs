use axum::{
    body::Bytes,
    extract::{Path, State},
};

use super::{authorize, entity_id, logged, store_id};
use crate::app::AppState;
use crate::auth::RequestContext;
use crate::database::models::Size;
use crate::error::ApiError;
use crate::forms::{self, SizeForm};
use crate::middleware::{ApiResponse, ApiResult};
use crate::types::{EntityKind, Operation};

pub async fn sizes_get(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(raw_store_id): Path<String>,
) -> ApiResult<Vec<Size>> {
    let result: ApiResult<Vec<Size>> = async {
        let store_id = store_id(&raw_store_id)?;
        Ok(ApiResponse::success(state.catalog.list_sizes(store_id).await?))
    }
    .await;
    logged("SIZES_GET", &ctx, result)
}

pub async fn sizes_post(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(raw_store_id): Path<String>,
    body: Bytes,
) -> ApiResult<Size> {
    let result: ApiResult<Size> = async {
        let store = authorize(&state, &ctx, &raw_store_id, Operation::Create, EntityKind::Size).await?;
        let input = forms::parse::<SizeForm>(&body)?;
        Ok(ApiResponse::created(state.catalog.create_size(store.id, input).await?))
    }
    .await;
    logged("SIZES_POST", &ctx, result)
}

pub async fn size_get(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path((raw_store_id, raw_id)): Path<(String, String)>,
) -> ApiResult<Size> {
    let result: ApiResult<Size> = async {
        let store_id = store_id(&raw_store_id)?;
        let id = entity_id(&raw_id, "Size")?;
        let size = state
            .catalog
            .get_size(store_id, id)
            .await?
            .ok_or_else(|| ApiError::not_found("Size not found"))?;
        Ok(ApiResponse::success(size))
    }
    .await;
    logged("SIZE_GET", &ctx, result)
}

pub async fn size_patch(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path((raw_store_id, raw_id)): Path<(String, String)>,
    body: Bytes,
) -> ApiResult<Size> {
    let result: ApiResult<Size> = async {
        let store = authorize(&state, &ctx, &raw_store_id, Operation::Update, EntityKind::Size).await?;
        let id = entity_id(&raw_id, "Size")?;
        let input = forms::parse::<SizeForm>(&body)?;
        Ok(ApiResponse::success(state.catalog.update_size(store.id, id, input).await?))
    }
    .await;
    logged("SIZE_PATCH", &ctx, result)
}

pub async fn size_delete(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path((raw_store_id, raw_id)): Path<(String, String)>,
) -> ApiResult<Size> {
    let result: ApiResult<Size> = async {
        let store = authorize(&state, &ctx, &raw_store_id, Operation::Delete, EntityKind::Size).await?;
        let id = entity_id(&raw_id, "Size")?;
        Ok(ApiResponse::success(state.catalog.delete_size(store.id, id).await?))
    }
    .await;
    logged("SIZE_DELETE", &ctx, result)
}
