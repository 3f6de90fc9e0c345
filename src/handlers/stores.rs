use axum::{
    body::Bytes,
    extract::{Path, State},
};

use super::{authorize, logged, require_identity, store_id};
use crate::app::AppState;
use crate::auth::RequestContext;
use crate::database::models::Store;
use crate::error::ApiError;
use crate::forms::{self, StoreForm};
use crate::middleware::{ApiResponse, ApiResult};
use crate::types::{EntityKind, Operation};

/// Stores owned by the caller
pub async fn stores_get(State(state): State<AppState>, ctx: RequestContext) -> ApiResult<Vec<Store>> {
    let result: ApiResult<Vec<Store>> = async {
        let owner = require_identity(&state, &ctx).await?;
        Ok(ApiResponse::success(state.catalog.list_stores(&owner).await?))
    }
    .await;
    logged("STORES_GET", &ctx, result)
}

pub async fn stores_post(State(state): State<AppState>, ctx: RequestContext, body: Bytes) -> ApiResult<Store> {
    let result: ApiResult<Store> = async {
        let owner = require_identity(&state, &ctx).await?;
        let input = forms::parse::<StoreForm>(&body)?;
        let store = state.catalog.create_store(&owner, input).await?;
        tracing::info!(store_id = %store.id, identity = %owner, "Store created");
        Ok(ApiResponse::created(store))
    }
    .await;
    logged("STORES_POST", &ctx, result)
}

pub async fn store_get(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(raw_store_id): Path<String>,
) -> ApiResult<Store> {
    let result: ApiResult<Store> = async {
        let id = store_id(&raw_store_id)?;
        let store = state
            .catalog
            .get_store(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Store not found"))?;
        Ok(ApiResponse::success(store))
    }
    .await;
    logged("STORE_GET", &ctx, result)
}

pub async fn store_patch(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(raw_store_id): Path<String>,
    body: Bytes,
) -> ApiResult<Store> {
    let result: ApiResult<Store> = async {
        let store = authorize(&state, &ctx, &raw_store_id, Operation::Update, EntityKind::Store).await?;
        let input = forms::parse::<StoreForm>(&body)?;
        Ok(ApiResponse::success(state.catalog.update_store(store.id, input).await?))
    }
    .await;
    logged("STORE_PATCH", &ctx, result)
}

pub async fn store_delete(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(raw_store_id): Path<String>,
) -> ApiResult<Store> {
    let result: ApiResult<Store> = async {
        let store = authorize(&state, &ctx, &raw_store_id, Operation::Delete, EntityKind::Store).await?;
        Ok(ApiResponse::success(state.catalog.delete_store(store.id).await?))
    }
    .await;
    logged("STORE_DELETE", &ctx, result)
}
