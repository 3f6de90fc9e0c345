mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;
use uuid::Uuid;

use store_admin_api::database::{Catalog, NewOrder};

async fn seeded_order_store(server: &common::TestServer) -> Result<String> {
    let store_id = server.create_store("user_1", "Shirts").await?;
    let ids = server.seed_catalog("user_1", &store_id).await?;

    let mut product_ids = Vec::new();
    for (name, price) in [("Tee", "20.00"), ("Polo", "35.50")] {
        let (_, body) = server
            .post(
                &format!("/api/{}/products", store_id),
                Some("user_1"),
                json!({
                    "name": name,
                    "description": "Cotton",
                    "price": price,
                    "starRating": 5,
                    "images": [{ "url": "https://cdn.example.com/p.png" }],
                    "categoryId": ids[1],
                    "sizeId": ids[2],
                    "colorId": ids[3],
                }),
            )
            .await?;
        product_ids.push(Uuid::parse_str(&common::id_of(&body)?)?);
    }

    let store_uuid = Uuid::parse_str(&store_id)?;
    server
        .catalog
        .create_order(
            store_uuid,
            NewOrder {
                customer_name: "Ann".into(),
                phone: "555-0100".into(),
                address: "1 Main St".into(),
                is_paid: true,
                product_ids: product_ids.clone(),
            },
        )
        .await?;
    server
        .catalog
        .create_order(
            store_uuid,
            NewOrder {
                customer_name: "Bob".into(),
                phone: "555-0199".into(),
                address: "2 Side St".into(),
                is_paid: false,
                product_ids: vec![product_ids[0]],
            },
        )
        .await?;

    Ok(store_id)
}

#[tokio::test]
async fn orders_are_owner_only() -> Result<()> {
    let server = common::spawn().await?;
    let store_id = seeded_order_store(&server).await?;

    let (status, _) = server.get(&format!("/api/{}/orders", store_id), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = server.get(&format!("/api/{}/orders", store_id), Some("user_2")).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = server.get(&format!("/api/{}/overview", store_id), Some("user_2")).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn orders_list_dashboard_columns() -> Result<()> {
    let server = common::spawn().await?;
    let store_id = seeded_order_store(&server).await?;

    let (status, body) = server.get(&format!("/api/{}/orders", store_id), Some("user_1")).await?;
    assert_eq!(status, StatusCode::OK);
    let orders = body["data"].as_array().unwrap();
    assert_eq!(orders.len(), 2);

    assert_eq!(orders[0]["customerName"], "Bob");
    assert_eq!(orders[0]["isPaid"], false);
    assert_eq!(orders[1]["products"], "Tee, Polo");
    assert_eq!(orders[1]["totalPrice"], "$55.50");
    assert!(orders[1]["createdAt"].as_str().unwrap().contains(", 20"));
    Ok(())
}

#[tokio::test]
async fn overview_counts_paid_orders() -> Result<()> {
    let server = common::spawn().await?;
    let store_id = seeded_order_store(&server).await?;

    let (status, body) = server.get(&format!("/api/{}/overview", store_id), Some("user_1")).await?;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(common::decimal(&data["totalRevenue"]), 55.5);
    assert_eq!(data["salesCount"], 1);
    assert_eq!(data["stockCount"], 2);

    let graph = data["graphRevenue"].as_array().unwrap();
    assert_eq!(graph.len(), 12);
    assert_eq!(graph[0]["name"], "Jan");
    let graph_total: f64 = graph.iter().map(|p| common::decimal(&p["total"])).sum();
    assert_eq!(graph_total, 55.5);
    Ok(())
}

#[tokio::test]
async fn ordered_products_cannot_be_deleted() -> Result<()> {
    let server = common::spawn().await?;
    let store_id = seeded_order_store(&server).await?;

    let (_, body) = server.get(&format!("/api/{}/products", store_id), None).await?;
    let product_id = body["data"][0]["id"].as_str().unwrap().to_string();

    let (status, _) = server
        .delete(&format!("/api/{}/products/{}", store_id, product_id), Some("user_1"))
        .await?;
    assert_eq!(status, StatusCode::CONFLICT);
    Ok(())
}
