use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::auth::{IdentityProvider, JwtIdentityProvider};
use crate::config::{AppConfig, Environment};
use crate::database::Catalog;
use crate::guard::{OwnershipGuard, ScopeStore};
use crate::handlers;
use crate::middleware::{envelope_rejections, log_requests};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub catalog: Arc<dyn Catalog>,
    pub identity: Arc<dyn IdentityProvider>,
    pub guard: OwnershipGuard,
}

impl AppState {
    /// State over one catalog, which also answers the guard's ownership lookups
    pub fn new<C: Catalog + 'static>(config: AppConfig, catalog: Arc<C>) -> Self {
        let identity = JwtIdentityProvider::new(&config.security.jwt_secret, config.security.jwt_issuer.as_deref());
        let scopes: Arc<dyn ScopeStore> = catalog.clone();
        let guard = OwnershipGuard::new(scopes, config.guard.lookup_timeout());

        Self {
            config: Arc::new(config),
            catalog,
            identity: Arc::new(identity),
            guard,
        }
    }

    /// Route ownership lookups to a different store
    pub fn with_scopes(mut self, scopes: Arc<dyn ScopeStore>) -> Self {
        self.guard = OwnershipGuard::new(scopes, self.config.guard.lookup_timeout());
        self
    }
}

pub fn router(state: AppState) -> Router {
    let config = state.config.clone();

    let mut app = Router::new()
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::health))
        .merge(store_routes())
        .merge(catalog_routes())
        .merge(order_routes())
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .layer(middleware::map_response(envelope_rejections));

    if config.api.enable_request_logging {
        app = app.layer(middleware::from_fn(log_requests));
    }
    if config.security.enable_cors {
        app = app.layer(cors_layer(&config));
    }

    app.layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

fn store_routes() -> Router<AppState> {
    use handlers::stores;

    Router::new()
        .route("/api/stores", get(stores::stores_get).post(stores::stores_post))
        .route(
            "/api/stores/:store_id",
            get(stores::store_get)
                .patch(stores::store_patch)
                .delete(stores::store_delete),
        )
}

fn catalog_routes() -> Router<AppState> {
    use handlers::{billboards, categories, colors, products, sizes};

    Router::new()
        .route(
            "/api/:store_id/billboards",
            get(billboards::billboards_get).post(billboards::billboards_post),
        )
        .route(
            "/api/:store_id/billboards/:billboard_id",
            get(billboards::billboard_get)
                .patch(billboards::billboard_patch)
                .delete(billboards::billboard_delete),
        )
        .route(
            "/api/:store_id/categories",
            get(categories::categories_get).post(categories::categories_post),
        )
        .route(
            "/api/:store_id/categories/:category_id",
            get(categories::category_get)
                .patch(categories::category_patch)
                .delete(categories::category_delete),
        )
        .route("/api/:store_id/sizes", get(sizes::sizes_get).post(sizes::sizes_post))
        .route(
            "/api/:store_id/sizes/:size_id",
            get(sizes::size_get)
                .patch(sizes::size_patch)
                .delete(sizes::size_delete),
        )
        .route("/api/:store_id/colors", get(colors::colors_get).post(colors::colors_post))
        .route(
            "/api/:store_id/colors/:color_id",
            get(colors::color_get)
                .patch(colors::color_patch)
                .delete(colors::color_delete),
        )
        .route(
            "/api/:store_id/products",
            get(products::products_get).post(products::products_post),
        )
        .route(
            "/api/:store_id/products/:product_id",
            get(products::product_get)
                .patch(products::product_patch)
                .delete(products::product_delete),
        )
}

fn order_routes() -> Router<AppState> {
    use handlers::orders;

    Router::new()
        .route("/api/:store_id/orders", get(orders::orders_get))
        .route("/api/:store_id/overview", get(orders::overview_get))
}

/// Permissive in development, otherwise limited to the configured origins
fn cors_layer(config: &AppConfig) -> CorsLayer {
    if config.environment == Environment::Development {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600))
        .expose_headers(Any)
}
