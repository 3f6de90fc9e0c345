#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::{Method, StatusCode};
use serde_json::Value;

use store_admin_api::auth::{issue_token, Claims};
use store_admin_api::config::{AppConfig, StorageBackend};
use store_admin_api::database::MemoryCatalog;
use store_admin_api::{router, AppState};

pub const SECRET: &str = "integration-test-secret";

/// One in-process server per test, backed by its own memory catalog
pub struct TestServer {
    pub base_url: String,
    pub catalog: Arc<MemoryCatalog>,
    client: reqwest::Client,
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.database.backend = StorageBackend::Memory;
    config.api.enable_request_logging = false;
    config.security.jwt_secret = SECRET.to_string();
    config.guard.lookup_timeout_ms = 500;
    config
}

pub async fn spawn() -> Result<TestServer> {
    spawn_with(|state| state).await
}

/// Spawn with a hook to swap parts of the state (e.g. the guard's scope store)
pub async fn spawn_with(configure: impl FnOnce(AppState) -> AppState) -> Result<TestServer> {
    let catalog = Arc::new(MemoryCatalog::new());
    let state = configure(AppState::new(test_config(), catalog.clone()));

    // Pick an unused port for isolation
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .with_context(|| format!("failed to bind port {}", port))?;

    let app = router(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(TestServer {
        base_url: format!("http://127.0.0.1:{}", port),
        catalog,
        client: reqwest::Client::new(),
    })
}

pub fn token(user: &str) -> String {
    issue_token(&Claims::new(user, None, 1), SECRET).expect("token")
}

impl TestServer {
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        user: Option<&str>,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let mut req = self.client.request(method, format!("{}{}", self.base_url, path));
        if let Some(user) = user {
            req = req.bearer_auth(token(user));
        }
        if let Some(body) = body {
            req = req.json(&body);
        }

        let res = req.send().await?;
        let status = res.status();
        let json = res.json::<Value>().await.unwrap_or(Value::Null);
        Ok((status, json))
    }

    pub async fn get(&self, path: &str, user: Option<&str>) -> Result<(StatusCode, Value)> {
        self.send(Method::GET, path, user, None).await
    }

    pub async fn post(&self, path: &str, user: Option<&str>, body: Value) -> Result<(StatusCode, Value)> {
        self.send(Method::POST, path, user, Some(body)).await
    }

    pub async fn patch(&self, path: &str, user: Option<&str>, body: Value) -> Result<(StatusCode, Value)> {
        self.send(Method::PATCH, path, user, Some(body)).await
    }

    pub async fn delete(&self, path: &str, user: Option<&str>) -> Result<(StatusCode, Value)> {
        self.send(Method::DELETE, path, user, None).await
    }

    /// Create a store through the API and return its id
    pub async fn create_store(&self, user: &str, name: &str) -> Result<String> {
        let (status, body) = self.post("/api/stores", Some(user), serde_json::json!({ "name": name })).await?;
        anyhow::ensure!(status == StatusCode::CREATED, "store create failed: {} {}", status, body);
        id_of(&body)
    }

    /// Create a billboard, category, size and color; returns their ids in that order
    pub async fn seed_catalog(&self, user: &str, store_id: &str) -> Result<[String; 4]> {
        let (_, billboard) = self
            .post(
                &format!("/api/{}/billboards", store_id),
                Some(user),
                serde_json::json!({ "label": "Summer", "imageUrl": "https://cdn.example.com/summer.png" }),
            )
            .await?;
        let billboard_id = id_of(&billboard)?;

        let (_, category) = self
            .post(
                &format!("/api/{}/categories", store_id),
                Some(user),
                serde_json::json!({ "name": "Shirts", "billboardId": billboard_id }),
            )
            .await?;
        let (_, size) = self
            .post(
                &format!("/api/{}/sizes", store_id),
                Some(user),
                serde_json::json!({ "name": "Large", "value": "L" }),
            )
            .await?;
        let (_, color) = self
            .post(
                &format!("/api/{}/colors", store_id),
                Some(user),
                serde_json::json!({ "name": "Red", "value": "#ff0000" }),
            )
            .await?;

        Ok([billboard_id, id_of(&category)?, id_of(&size)?, id_of(&color)?])
    }
}

pub fn id_of(body: &Value) -> Result<String> {
    body["data"]["id"]
        .as_str()
        .map(str::to_string)
        .with_context(|| format!("response has no data.id: {}", body))
}

/// Decimal fields serialize as strings
pub fn decimal(value: &Value) -> f64 {
    match value {
        Value::String(s) => s.parse().unwrap_or(f64::NAN),
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}
