pub mod billboards;
pub mod categories;
pub mod colors;
pub mod health;
pub mod orders;
pub mod products;
pub mod sizes;
pub mod stores;

use uuid::Uuid;

use crate::app::AppState;
use crate::auth::{Identity, RequestContext};
use crate::database::models::Store;
use crate::error::ApiError;
use crate::guard::MutationRequest;
use crate::middleware::ApiResult;
use crate::types::{EntityKind, Operation};

/// Run the ownership guard for one request on store `store_id`
pub(crate) async fn authorize(
    state: &AppState,
    ctx: &RequestContext,
    store_id: &str,
    operation: Operation,
    entity: EntityKind,
) -> Result<Store, ApiError> {
    let caller = state.identity.current_identity(ctx).await;
    let request = MutationRequest::new(caller, store_id, operation, entity);
    state.guard.check(&request).await.into_result()
}

/// The caller's identity, or 401
pub(crate) async fn require_identity(state: &AppState, ctx: &RequestContext) -> Result<Identity, ApiError> {
    state
        .identity
        .current_identity(ctx)
        .await
        .ok_or_else(|| ApiError::unauthorized("Unauthenticated"))
}

/// Store id on public reads; anything that is not a UUID names no store
pub(crate) fn store_id(raw: &str) -> Result<Uuid, ApiError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ApiError::bad_request("Store id is required"));
    }
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found("Store not found"))
}

/// Child entity id from the path; a malformed id cannot exist
pub(crate) fn entity_id(raw: &str, entity: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::not_found(format!("{} not found", entity)))
}

/// Log a failed request under its route tag and pass the result through
pub(crate) fn logged<T: serde::Serialize>(tag: &'static str, ctx: &RequestContext, result: ApiResult<T>) -> ApiResult<T> {
    if let Err(err) = &result {
        let status = err.status_code();
        if status >= 500 {
            tracing::error!(request_id = %ctx.request_id, status, "[{}] {}", tag, err);
        } else {
            tracing::info!(request_id = %ctx.request_id, status, "[{}] {}", tag, err);
        }
    }
    result
}
