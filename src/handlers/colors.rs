use axum::{
    body::Bytes,
    extract::{Path, State},
};

use super::{authorize, entity_id, logged, store_id};
use crate::app::AppState;
use crate::auth::RequestContext;
use crate::database::models::Color;
use crate::error::ApiError;
use crate::forms::{self, ColorForm};
use crate::middleware::{ApiResponse, ApiResult};
use crate::types::{EntityKind, Operation};

pub async fn colors_get(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(raw_store_id): Path<String>,
) -> ApiResult<Vec<Color>> {
    let result: ApiResult<Vec<Color>> = async {
        let store_id = store_id(&raw_store_id)?;
        Ok(ApiResponse::success(state.catalog.list_colors(store_id).await?))
    }
    .await;
    logged("COLORS_GET", &ctx, result)
}

pub async fn colors_post(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(raw_store_id): Path<String>,
    body: Bytes,
) -> ApiResult<Color> {
    let result: ApiResult<Color> = async {
        let store = authorize(&state, &ctx, &raw_store_id, Operation::Create, EntityKind::Color).await?;
        let input = forms::parse::<ColorForm>(&body)?;
        Ok(ApiResponse::created(state.catalog.create_color(store.id, input).await?))
    }
    .await;
    logged("COLORS_POST", &ctx, result)
}

pub async fn color_get(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path((raw_store_id, raw_id)): Path<(String, String)>,
) -> ApiResult<Color> {
    let result: ApiResult<Color> = async {
        let store_id = store_id(&raw_store_id)?;
        let id = entity_id(&raw_id, "Color")?;
        let color = state
            .catalog
            .get_color(store_id, id)
            .await?
            .ok_or_else(|| ApiError::not_found("Color not found"))?;
        Ok(ApiResponse::success(color))
    }
    .await;
    logged("COLOR_GET", &ctx, result)
}

pub async fn color_patch(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path((raw_store_id, raw_id)): Path<(String, String)>,
    body: Bytes,
) -> ApiResult<Color> {
    let result: ApiResult<Color> = async {
        let store = authorize(&state, &ctx, &raw_store_id, Operation::Update, EntityKind::Color).await?;
        let id = entity_id(&raw_id, "Color")?;
        let input = forms::parse::<ColorForm>(&body)?;
        Ok(ApiResponse::success(state.catalog.update_color(store.id, id, input).await?))
    }
    .await;
    logged("COLOR_PATCH", &ctx, result)
}

pub async fn color_delete(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path((raw_store_id, raw_id)): Path<(String, String)>,
) -> ApiResult<Color> {
    let result: ApiResult<Color> = async {
        let store = authorize(&state, &ctx, &raw_store_id, Operation::Delete, EntityKind::Color).await?;
        let id = entity_id(&raw_id, "Color")?;
        Ok(ApiResponse::success(state.catalog.delete_color(store.id, id).await?))
    }
    .await;
    logged("COLOR_DELETE", &ctx, result)
}
