use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::app::AppState;

pub async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "Store Admin API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Multi-store e-commerce admin backend",
            "endpoints": {
                "stores": "/api/stores[/:store_id]",
                "catalog": "/api/:store_id/{billboards,categories,sizes,colors,products}[/:id]",
                "orders": "/api/:store_id/orders (owner only)",
                "overview": "/api/:store_id/overview (owner only)",
            }
        }
    }))
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.catalog.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": { "status": "ok", "timestamp": now, "database": "ok" }
            })),
        ),
        Err(e) => {
            tracing::error!("[HEALTH] database check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "Database unavailable",
                    "code": "SERVICE_UNAVAILABLE",
                    "data": { "status": "degraded", "timestamp": now, "database": "error" }
                })),
            )
        }
    }
}
