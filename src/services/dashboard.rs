use chrono::Datelike;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::api::{format_date, format_price};
use crate::database::models::OrderDetail;
use crate::database::{Catalog, DatabaseError, ProductFilter};

const MONTHS: [&str; 12] = ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"];

/// One row of the orders table
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderColumn {
    pub id: Uuid,
    pub customer_name: String,
    pub phone: String,
    pub address: String,
    pub is_paid: bool,
    pub products: String,
    pub total_price: String,
    pub created_at: String,
}

impl From<&OrderDetail> for OrderColumn {
    fn from(detail: &OrderDetail) -> Self {
        let order = &detail.order;
        Self {
            id: order.id,
            customer_name: order.customer_name.clone(),
            phone: order.phone.clone(),
            address: order.address.clone(),
            is_paid: order.is_paid,
            products: detail
                .items
                .iter()
                .map(|item| item.product_name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            total_price: format_price(detail.total_price()),
            created_at: format_date(&order.created_at),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphPoint {
    pub name: &'static str,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub total_revenue: Decimal,
    pub sales_count: usize,
    pub stock_count: usize,
    pub graph_revenue: Vec<GraphPoint>,
}

/// Orders of a store as dashboard rows, newest first
pub async fn order_columns(catalog: &dyn Catalog, store_id: Uuid) -> Result<Vec<OrderColumn>, DatabaseError> {
    let orders = catalog.list_orders(store_id).await?;
    Ok(orders.iter().map(OrderColumn::from).collect())
}

pub async fn overview(catalog: &dyn Catalog, store_id: Uuid) -> Result<Overview, DatabaseError> {
    let orders = catalog.list_orders(store_id).await?;
    let stock = catalog.list_products(store_id, &ProductFilter::default()).await?;
    Ok(summarize(&orders, stock.len()))
}

/// Revenue figures over paid orders only
pub fn summarize(orders: &[OrderDetail], stock_count: usize) -> Overview {
    let paid: Vec<&OrderDetail> = orders.iter().filter(|o| o.order.is_paid).collect();

    let mut monthly = [Decimal::ZERO; 12];
    for order in &paid {
        monthly[order.order.created_at.month0() as usize] += order.total_price();
    }

    Overview {
        total_revenue: paid.iter().map(|o| o.total_price()).sum(),
        sales_count: paid.len(),
        stock_count,
        graph_revenue: MONTHS
            .into_iter()
            .zip(monthly)
            .map(|(name, total)| GraphPoint { name, total })
            .collect(),
    }
}
