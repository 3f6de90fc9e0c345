mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

fn product(name: &str, ids: &[String; 4]) -> Value {
    json!({
        "name": name,
        "description": "Cotton tee",
        "price": "19.99",
        "starRating": 4,
        "images": [{ "url": "https://cdn.example.com/tee.png" }],
        "categoryId": ids[1],
        "sizeId": ids[2],
        "colorId": ids[3],
    })
}

#[tokio::test]
async fn product_embeds_relations() -> Result<()> {
    let server = common::spawn().await?;
    let store_id = server.create_store("user_1", "Shirts").await?;
    let ids = server.seed_catalog("user_1", &store_id).await?;

    let (status, body) = server
        .post(&format!("/api/{}/products", store_id), Some("user_1"), product("Tee", &ids))
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    let data = &body["data"];
    assert_eq!(data["name"], "Tee");
    assert_eq!(common::decimal(&data["price"]), 19.99);
    assert_eq!(data["starRating"], 4);
    assert_eq!(data["isFeatured"], false);
    assert_eq!(data["category"]["name"], "Shirts");
    assert_eq!(data["size"]["value"], "L");
    assert_eq!(data["color"]["value"], "#ff0000");
    assert_eq!(data["images"][0]["url"], "https://cdn.example.com/tee.png");
    Ok(())
}

#[tokio::test]
async fn list_filters_and_hides_archived() -> Result<()> {
    let server = common::spawn().await?;
    let store_id = server.create_store("user_1", "Shirts").await?;
    let ids = server.seed_catalog("user_1", &store_id).await?;
    let base = format!("/api/{}/products", store_id);

    server.post(&base, Some("user_1"), product("Plain", &ids)).await?;
    let mut featured = product("Featured", &ids);
    featured["isFeatured"] = json!(true);
    server.post(&base, Some("user_1"), featured).await?;
    let mut archived = product("Archived", &ids);
    archived["isArchived"] = json!(true);
    server.post(&base, Some("user_1"), archived).await?;

    let (_, body) = server.get(&base, None).await?;
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Featured", "Plain"]);

    let (_, body) = server.get(&format!("{}?isFeatured=true", base), None).await?;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["name"], "Featured");

    let (_, body) = server.get(&format!("{}?colorId={}", base, ids[3]), None).await?;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (_, body) = server
        .get(&format!("{}?sizeId={}", base, uuid::Uuid::new_v4()), None)
        .await?;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);

    let (status, _) = server.get(&format!("{}?categoryId=shirts", base), None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn update_replaces_images() -> Result<()> {
    let server = common::spawn().await?;
    let store_id = server.create_store("user_1", "Shirts").await?;
    let ids = server.seed_catalog("user_1", &store_id).await?;

    let (_, created) = server
        .post(&format!("/api/{}/products", store_id), Some("user_1"), product("Tee", &ids))
        .await?;
    let item = format!("/api/{}/products/{}", store_id, common::id_of(&created)?);

    let mut update = product("Tee v2", &ids);
    update["images"] = json!([{ "url": "https://cdn.example.com/front.png" }, { "url": "https://cdn.example.com/back.png" }]);
    let (status, body) = server.patch(&item, Some("user_1"), update).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Tee v2");

    let (_, body) = server.get(&item, None).await?;
    let urls: Vec<&str> = body["data"]["images"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["url"].as_str().unwrap())
        .collect();
    assert_eq!(urls, vec!["https://cdn.example.com/front.png", "https://cdn.example.com/back.png"]);
    Ok(())
}

#[tokio::test]
async fn references_must_belong_to_the_store() -> Result<()> {
    let server = common::spawn().await?;
    let mine = server.create_store("user_1", "Shirts").await?;
    let theirs = server.create_store("user_2", "Hats").await?;
    let mut ids = server.seed_catalog("user_1", &mine).await?;
    let foreign = server.seed_catalog("user_2", &theirs).await?;
    ids[2] = foreign[2].clone();

    let (status, body) = server
        .post(&format!("/api/{}/products", mine), Some("user_1"), product("Tee", &ids))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Size does not belong to this store");
    Ok(())
}

#[tokio::test]
async fn product_validation_messages() -> Result<()> {
    let server = common::spawn().await?;
    let store_id = server.create_store("user_1", "Shirts").await?;
    let ids = server.seed_catalog("user_1", &store_id).await?;
    let base = format!("/api/{}/products", store_id);

    let mut body = product("Tee", &ids);
    body["images"] = json!([]);
    let (status, res) = server.post(&base, Some("user_1"), body).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(res["error"], "Image is required");

    let mut body = product("Tee", &ids);
    body["price"] = json!(-3);
    let (_, res) = server.post(&base, Some("user_1"), body).await?;
    assert_eq!(res["error"], "Price must be a positive number");
    Ok(())
}

#[tokio::test]
async fn used_size_cannot_be_deleted() -> Result<()> {
    let server = common::spawn().await?;
    let store_id = server.create_store("user_1", "Shirts").await?;
    let ids = server.seed_catalog("user_1", &store_id).await?;
    server
        .post(&format!("/api/{}/products", store_id), Some("user_1"), product("Tee", &ids))
        .await?;

    let (status, body) = server
        .delete(&format!("/api/{}/sizes/{}", store_id, ids[2]), Some("user_1"))
        .await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Make sure you remove all products using this size first");
    Ok(())
}
