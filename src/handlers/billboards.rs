use axum::{
    body::Bytes,
    extract::{Path, State},
};

use super::{authorize, entity_id, logged, store_id};
use crate::app::AppState;
use crate::auth::RequestContext;
use crate::database::models::Billboard;
use crate::error::ApiError;
use crate::forms::{self, BillboardForm};
use crate::middleware::{ApiResponse, ApiResult};
use crate::types::{EntityKind, Operation};

pub async fn billboards_get(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(raw_store_id): Path<String>,
) -> ApiResult<Vec<Billboard>> {
    let result: ApiResult<Vec<Billboard>> = async {
        let store_id = store_id(&raw_store_id)?;
        Ok(ApiResponse::success(state.catalog.list_billboards(store_id).await?))
    }
    .await;
    logged("BILLBOARDS_GET", &ctx, result)
}

pub async fn billboards_post(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(raw_store_id): Path<String>,
    body: Bytes,
) -> ApiResult<Billboard> {
    let result: ApiResult<Billboard> = async {
        let store = authorize(&state, &ctx, &raw_store_id, Operation::Create, EntityKind::Billboard).await?;
        let input = forms::parse::<BillboardForm>(&body)?;
        Ok(ApiResponse::created(state.catalog.create_billboard(store.id, input).await?))
    }
    .await;
    logged("BILLBOARDS_POST", &ctx, result)
}

pub async fn billboard_get(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path((raw_store_id, raw_id)): Path<(String, String)>,
) -> ApiResult<Billboard> {
    let result: ApiResult<Billboard> = async {
        let store_id = store_id(&raw_store_id)?;
        let id = entity_id(&raw_id, "Billboard")?;
        let billboard = state
            .catalog
            .get_billboard(store_id, id)
            .await?
            .ok_or_else(|| ApiError::not_found("Billboard not found"))?;
        Ok(ApiResponse::success(billboard))
    }
    .await;
    logged("BILLBOARD_GET", &ctx, result)
}

pub async fn billboard_patch(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path((raw_store_id, raw_id)): Path<(String, String)>,
    body: Bytes,
) -> ApiResult<Billboard> {
    let result: ApiResult<Billboard> = async {
        let store = authorize(&state, &ctx, &raw_store_id, Operation::Update, EntityKind::Billboard).await?;
        let id = entity_id(&raw_id, "Billboard")?;
        let input = forms::parse::<BillboardForm>(&body)?;
        Ok(ApiResponse::success(state.catalog.update_billboard(store.id, id, input).await?))
    }
    .await;
    logged("BILLBOARD_PATCH", &ctx, result)
}

pub async fn billboard_delete(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path((raw_store_id, raw_id)): Path<(String, String)>,
) -> ApiResult<Billboard> {
    let result: ApiResult<Billboard> = async {
        let store = authorize(&state, &ctx, &raw_store_id, Operation::Delete, EntityKind::Billboard).await?;
        let id = entity_id(&raw_id, "Billboard")?;
        Ok(ApiResponse::success(state.catalog.delete_billboard(store.id, id).await?))
    }
    .await;
    logged("BILLBOARD_DELETE", &ctx, result)
}
