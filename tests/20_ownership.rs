mod common;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::json;
use uuid::Uuid;

use store_admin_api::auth::Identity;
use store_admin_api::database::models::Store;
use store_admin_api::database::{Catalog, DatabaseError};
use store_admin_api::forms::StoreInput;
use store_admin_api::guard::ScopeStore;

fn billboard() -> serde_json::Value {
    json!({ "label": "Summer", "imageUrl": "https://cdn.example.com/summer.png" })
}

struct BrokenScopes;

#[async_trait]
impl ScopeStore for BrokenScopes {
    async fn find_owned_scope(&self, _: &str, _: &Identity) -> Result<Option<Store>, DatabaseError> {
        Err(DatabaseError::Sqlx(sqlx::Error::PoolTimedOut))
    }
}

#[tokio::test]
async fn owner_may_create() -> Result<()> {
    let server = common::spawn().await?;
    let store_id = server.create_store("user_1", "Shoes").await?;

    let (status, body) = server
        .post(&format!("/api/{}/billboards", store_id), Some("user_1"), billboard())
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["label"], "Summer");
    assert_eq!(body["data"]["storeId"], store_id.as_str());
    Ok(())
}

#[tokio::test]
async fn missing_identity_is_401() -> Result<()> {
    let server = common::spawn().await?;
    let store_id = server.create_store("user_1", "Shoes").await?;

    let (status, body) = server
        .post(&format!("/api/{}/billboards", store_id), None, billboard())
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthenticated");

    let (_, list) = server.get(&format!("/api/{}/billboards", store_id), None).await?;
    assert_eq!(list["data"].as_array().unwrap().len(), 0);
    Ok(())
}

#[tokio::test]
async fn bad_token_is_401() -> Result<()> {
    let server = common::spawn().await?;
    let store_id = server.create_store("user_1", "Shoes").await?;

    let res = reqwest::Client::new()
        .post(format!("{}/api/{}/billboards", server.base_url, store_id))
        .bearer_auth("not.a.token")
        .json(&billboard())
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn blank_store_id_is_400() -> Result<()> {
    let server = common::spawn().await?;

    let (status, body) = server.post("/api/%20/billboards", Some("user_1"), billboard()).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Store id is required");
    Ok(())
}

#[tokio::test]
async fn identity_is_checked_before_store_id() -> Result<()> {
    let server = common::spawn().await?;

    let (status, _) = server.post("/api/%20/billboards", None, billboard()).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn non_owner_is_403_and_nothing_is_written() -> Result<()> {
    let server = common::spawn().await?;
    let store_id = server.create_store("user_1", "Shoes").await?;

    let (status, body) = server
        .post(&format!("/api/{}/billboards", store_id), Some("user_2"), billboard())
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Unauthorized");

    let (_, list) = server.get(&format!("/api/{}/billboards", store_id), None).await?;
    assert_eq!(list["data"].as_array().unwrap().len(), 0);
    Ok(())
}

#[tokio::test]
async fn unknown_store_looks_like_someone_elses() -> Result<()> {
    let server = common::spawn().await?;

    let (status, body) = server
        .post(&format!("/api/{}/billboards", Uuid::new_v4()), Some("user_1"), billboard())
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Unauthorized");

    let (status, _) = server.post("/api/not-a-uuid/billboards", Some("user_1"), billboard()).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn non_owner_never_sees_validation_errors() -> Result<()> {
    let server = common::spawn().await?;
    let store_id = server.create_store("user_1", "Shoes").await?;

    let (status, _) = server
        .post(&format!("/api/{}/billboards", store_id), Some("user_2"), json!({}))
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = server
        .post(&format!("/api/{}/billboards", store_id), Some("user_1"), json!({}))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Label is required");
    Ok(())
}

#[tokio::test]
async fn store_lookup_failure_is_500_without_writing() -> Result<()> {
    let server = common::spawn_with(|state| state.with_scopes(Arc::new(BrokenScopes))).await?;
    let store = server
        .catalog
        .create_store(&Identity::new("user_1"), StoreInput { name: "Shoes".into() })
        .await?;

    let (status, body) = server
        .post(&format!("/api/{}/billboards", store.id), Some("user_1"), billboard())
        .await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal Error");

    assert!(server.catalog.list_billboards(store.id).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn store_rename_and_delete_are_guarded() -> Result<()> {
    let server = common::spawn().await?;
    let store_id = server.create_store("user_1", "Shoes").await?;
    let path = format!("/api/stores/{}", store_id);

    let (status, _) = server.patch(&path, Some("user_2"), json!({ "name": "Mine now" })).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = server.delete(&path, Some("user_2")).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = server.patch(&path, Some("user_1"), json!({ "name": "Boots" })).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Boots");

    let (status, _) = server.delete(&path, Some("user_1")).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = server.get(&path, None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn every_child_mutation_is_guarded() -> Result<()> {
    let server = common::spawn().await?;
    let store_id = server.create_store("user_1", "Shoes").await?;
    let [billboard_id, category_id, size_id, color_id] = server.seed_catalog("user_1", &store_id).await?;

    let product_body = json!({
        "name": "Tee",
        "description": "Cotton tee",
        "price": "19.99",
        "starRating": 4,
        "images": [{ "url": "https://cdn.example.com/tee.png" }],
        "categoryId": category_id,
        "sizeId": size_id,
        "colorId": color_id,
    });
    let (status, product) = server
        .post(&format!("/api/{}/products", store_id), Some("user_1"), product_body.clone())
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    let product_id = common::id_of(&product)?;

    let routes = [
        ("billboards", billboard_id.clone(), billboard()),
        ("categories", category_id.clone(), json!({ "name": "Hats", "billboardId": billboard_id })),
        ("sizes", size_id, json!({ "name": "Small", "value": "S" })),
        ("colors", color_id, json!({ "name": "Blue", "value": "#0000ff" })),
        ("products", product_id, product_body),
    ];

    for (entity, id, body) in routes {
        let collection = format!("/api/{}/{}", store_id, entity);
        let item = format!("{}/{}", collection, id);
        let (_, before) = server.get(&item, None).await?;
        let (_, listed) = server.get(&collection, None).await?;
        let count = listed["data"].as_array().map(Vec::len);

        for (user, expected) in [(None, StatusCode::UNAUTHORIZED), (Some("user_2"), StatusCode::FORBIDDEN)] {
            let (status, _) = server.post(&collection, user, body.clone()).await?;
            assert_eq!(status, expected, "POST {} as {:?}", collection, user);
            let (status, _) = server.patch(&item, user, body.clone()).await?;
            assert_eq!(status, expected, "PATCH {} as {:?}", item, user);
            let (status, _) = server.delete(&item, user).await?;
            assert_eq!(status, expected, "DELETE {} as {:?}", item, user);
        }

        let (status, after) = server.get(&item, None).await?;
        assert_eq!(status, StatusCode::OK, "{} was removed", item);
        assert_eq!(after["data"], before["data"], "{} was modified", item);
        let (_, listed) = server.get(&collection, None).await?;
        assert_eq!(listed["data"].as_array().map(Vec::len), count, "{} gained rows", collection);
    }
    Ok(())
}

#[tokio::test]
async fn catalog_reads_are_public() -> Result<()> {
    let server = common::spawn().await?;
    let store_id = server.create_store("user_1", "Shoes").await?;
    server
        .post(&format!("/api/{}/billboards", store_id), Some("user_1"), billboard())
        .await?;

    let (status, body) = server.get(&format!("/api/{}/billboards", store_id), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = server.get(&format!("/api/stores/{}", store_id), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Shoes");
    Ok(())
}
