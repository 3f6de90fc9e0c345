use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::Identity;
use crate::database::manager::DatabaseError;
use crate::database::models::{
    Billboard, CategoryDetail, Color, OrderDetail, Product, ProductDetail, Size, Store,
};
use crate::forms::{BillboardInput, CategoryInput, ColorInput, ProductInput, SizeInput, StoreInput};
use crate::guard::ScopeStore;

/// Query-string filters for the product list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub category_id: Option<Uuid>,
    pub color_id: Option<Uuid>,
    pub size_id: Option<Uuid>,
    /// `Some(true)` restricts to featured products; `None` means no restriction
    pub is_featured: Option<bool>,
    pub include_archived: bool,
}

/// An order as handed over by the storefront checkout
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub customer_name: String,
    pub phone: String,
    pub address: String,
    pub is_paid: bool,
    pub product_ids: Vec<Uuid>,
}

/// Conflict messages shared by every backend
pub mod conflicts {
    pub const STORE_IN_USE: &str = "Make sure you remove all products and categories first";
    pub const BILLBOARD_IN_USE: &str = "Make sure you remove all categories using this billboard first";
    pub const CATEGORY_IN_USE: &str = "Make sure you remove all products using this category first";
    pub const SIZE_IN_USE: &str = "Make sure you remove all products using this size first";
    pub const COLOR_IN_USE: &str = "Make sure you remove all products using this color first";
    pub const PRODUCT_IN_USE: &str = "Make sure you remove all orders containing this product first";
}

/// Storage operations behind the HTTP handlers.
///
/// Every child-entity method takes the owning `store_id` and only ever touches
/// rows of that store: a row id from another store behaves as if absent.
/// Lists are ordered newest first.
#[async_trait]
pub trait Catalog: ScopeStore {
    async fn health_check(&self) -> Result<(), DatabaseError>;

    // Stores
    async fn create_store(&self, owner: &Identity, input: StoreInput) -> Result<Store, DatabaseError>;
    async fn list_stores(&self, owner: &Identity) -> Result<Vec<Store>, DatabaseError>;
    async fn get_store(&self, store_id: Uuid) -> Result<Option<Store>, DatabaseError>;
    async fn update_store(&self, store_id: Uuid, input: StoreInput) -> Result<Store, DatabaseError>;
    async fn delete_store(&self, store_id: Uuid) -> Result<Store, DatabaseError>;

    // Billboards
    async fn list_billboards(&self, store_id: Uuid) -> Result<Vec<Billboard>, DatabaseError>;
    async fn get_billboard(&self, store_id: Uuid, id: Uuid) -> Result<Option<Billboard>, DatabaseError>;
    async fn create_billboard(&self, store_id: Uuid, input: BillboardInput) -> Result<Billboard, DatabaseError>;
    async fn update_billboard(&self, store_id: Uuid, id: Uuid, input: BillboardInput) -> Result<Billboard, DatabaseError>;
    async fn delete_billboard(&self, store_id: Uuid, id: Uuid) -> Result<Billboard, DatabaseError>;

    // Categories
    async fn list_categories(&self, store_id: Uuid) -> Result<Vec<CategoryDetail>, DatabaseError>;
    async fn get_category(&self, store_id: Uuid, id: Uuid) -> Result<Option<CategoryDetail>, DatabaseError>;
    async fn create_category(&self, store_id: Uuid, input: CategoryInput) -> Result<CategoryDetail, DatabaseError>;
    async fn update_category(&self, store_id: Uuid, id: Uuid, input: CategoryInput) -> Result<CategoryDetail, DatabaseError>;
    async fn delete_category(&self, store_id: Uuid, id: Uuid) -> Result<CategoryDetail, DatabaseError>;

    // Sizes
    async fn list_sizes(&self, store_id: Uuid) -> Result<Vec<Size>, DatabaseError>;
    async fn get_size(&self, store_id: Uuid, id: Uuid) -> Result<Option<Size>, DatabaseError>;
    async fn create_size(&self, store_id: Uuid, input: SizeInput) -> Result<Size, DatabaseError>;
    async fn update_size(&self, store_id: Uuid, id: Uuid, input: SizeInput) -> Result<Size, DatabaseError>;
    async fn delete_size(&self, store_id: Uuid, id: Uuid) -> Result<Size, DatabaseError>;

    // Colors
    async fn list_colors(&self, store_id: Uuid) -> Result<Vec<Color>, DatabaseError>;
    async fn get_color(&self, store_id: Uuid, id: Uuid) -> Result<Option<Color>, DatabaseError>;
    async fn create_color(&self, store_id: Uuid, input: ColorInput) -> Result<Color, DatabaseError>;
    async fn update_color(&self, store_id: Uuid, id: Uuid, input: ColorInput) -> Result<Color, DatabaseError>;
    async fn delete_color(&self, store_id: Uuid, id: Uuid) -> Result<Color, DatabaseError>;

    // Products
    async fn list_products(&self, store_id: Uuid, filter: &ProductFilter) -> Result<Vec<ProductDetail>, DatabaseError>;
    async fn get_product(&self, store_id: Uuid, id: Uuid) -> Result<Option<ProductDetail>, DatabaseError>;
    async fn create_product(&self, store_id: Uuid, input: ProductInput) -> Result<ProductDetail, DatabaseError>;
    /// Replaces every image of the product with `input.images`
    async fn update_product(&self, store_id: Uuid, id: Uuid, input: ProductInput) -> Result<ProductDetail, DatabaseError>;
    async fn delete_product(&self, store_id: Uuid, id: Uuid) -> Result<Product, DatabaseError>;

    // Orders
    async fn list_orders(&self, store_id: Uuid) -> Result<Vec<OrderDetail>, DatabaseError>;
    async fn create_order(&self, store_id: Uuid, order: NewOrder) -> Result<OrderDetail, DatabaseError>;
}

pub(crate) fn not_found(entity: &str) -> DatabaseError {
    DatabaseError::NotFound(format!("{} not found", entity))
}

pub(crate) fn invalid_reference(field: &str) -> DatabaseError {
    DatabaseError::InvalidReference(format!("{} does not belong to this store", field))
}
