use axum::extract::{Path, State};

use super::{authorize, logged};
use crate::app::AppState;
use crate::auth::RequestContext;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{self, OrderColumn, Overview};
use crate::types::{EntityKind, Operation};

/// Orders carry customer data, so only the owner may list them
pub async fn orders_get(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(raw_store_id): Path<String>,
) -> ApiResult<Vec<OrderColumn>> {
    let result: ApiResult<Vec<OrderColumn>> = async {
        let store = authorize(&state, &ctx, &raw_store_id, Operation::View, EntityKind::Order).await?;
        let columns = services::order_columns(state.catalog.as_ref(), store.id).await?;
        Ok(ApiResponse::success(columns))
    }
    .await;
    logged("ORDERS_GET", &ctx, result)
}

pub async fn overview_get(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(raw_store_id): Path<String>,
) -> ApiResult<Overview> {
    let result: ApiResult<Overview> = async {
        let store = authorize(&state, &ctx, &raw_store_id, Operation::View, EntityKind::Order).await?;
        Ok(ApiResponse::success(services::overview(state.catalog.as_ref(), store.id).await?))
    }
    .await;
    logged("OVERVIEW_GET", &ctx, result)
}
