use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::Identity;
use crate::database::manager::DatabaseError;
use crate::database::models::{
    Billboard, Category, CategoryDetail, Color, Order, OrderDetail, OrderItemDetail, Product,
    ProductDetail, ProductImage, Size, Store,
};
use crate::database::repository::{conflicts, invalid_reference, not_found, Catalog, NewOrder, ProductFilter};
use crate::forms::{BillboardInput, CategoryInput, ColorInput, ProductInput, SizeInput, StoreInput};
use crate::guard::ScopeStore;

#[derive(Debug, Clone)]
struct OrderItem {
    id: Uuid,
    order_id: Uuid,
    product_id: Uuid,
}

/// Rows are kept in insertion order, so iterating in reverse is newest first
#[derive(Debug, Default)]
struct Tables {
    stores: Vec<Store>,
    billboards: Vec<Billboard>,
    categories: Vec<Category>,
    sizes: Vec<Size>,
    colors: Vec<Color>,
    products: Vec<Product>,
    images: Vec<ProductImage>,
    orders: Vec<Order>,
    order_items: Vec<OrderItem>,
}

impl Tables {
    fn billboard(&self, store_id: Uuid, id: Uuid) -> Option<&Billboard> {
        self.billboards.iter().find(|b| b.id == id && b.store_id == store_id)
    }

    fn category(&self, store_id: Uuid, id: Uuid) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id && c.store_id == store_id)
    }

    fn size(&self, store_id: Uuid, id: Uuid) -> Option<&Size> {
        self.sizes.iter().find(|s| s.id == id && s.store_id == store_id)
    }

    fn color(&self, store_id: Uuid, id: Uuid) -> Option<&Color> {
        self.colors.iter().find(|c| c.id == id && c.store_id == store_id)
    }

    fn product(&self, store_id: Uuid, id: Uuid) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id && p.store_id == store_id)
    }

    fn category_detail(&self, category: &Category) -> Result<CategoryDetail, DatabaseError> {
        let billboard = self
            .billboard(category.store_id, category.billboard_id)
            .cloned()
            .ok_or_else(|| not_found("Billboard"))?;
        Ok(CategoryDetail {
            category: category.clone(),
            billboard,
        })
    }

    fn product_detail(&self, product: &Product) -> Result<ProductDetail, DatabaseError> {
        let store_id = product.store_id;
        Ok(ProductDetail {
            product: product.clone(),
            images: self
                .images
                .iter()
                .filter(|i| i.product_id == product.id)
                .cloned()
                .collect(),
            category: self.category(store_id, product.category_id).cloned().ok_or_else(|| not_found("Category"))?,
            size: self.size(store_id, product.size_id).cloned().ok_or_else(|| not_found("Size"))?,
            color: self.color(store_id, product.color_id).cloned().ok_or_else(|| not_found("Color"))?,
        })
    }

    fn order_detail(&self, order: &Order) -> Result<OrderDetail, DatabaseError> {
        let items = self
            .order_items
            .iter()
            .filter(|item| item.order_id == order.id)
            .map(|item| {
                let product = self
                    .product(order.store_id, item.product_id)
                    .ok_or_else(|| not_found("Product"))?;
                Ok(OrderItemDetail {
                    id: item.id,
                    order_id: item.order_id,
                    product_id: product.id,
                    product_name: product.name.clone(),
                    product_price: product.price,
                })
            })
            .collect::<Result<Vec<_>, DatabaseError>>()?;

        Ok(OrderDetail {
            order: order.clone(),
            items,
        })
    }

    fn check_product_references(&self, store_id: Uuid, input: &ProductInput) -> Result<(), DatabaseError> {
        if self.category(store_id, input.category_id).is_none() {
            return Err(invalid_reference("Category"));
        }
        if self.size(store_id, input.size_id).is_none() {
            return Err(invalid_reference("Size"));
        }
        if self.color(store_id, input.color_id).is_none() {
            return Err(invalid_reference("Color"));
        }
        Ok(())
    }

    fn replace_images(&mut self, product_id: Uuid, urls: &[String]) {
        self.images.retain(|i| i.product_id != product_id);
        let now = Utc::now();
        self.images.extend(urls.iter().map(|url| ProductImage {
            id: Uuid::new_v4(),
            product_id,
            url: url.clone(),
            created_at: now,
        }));
    }
}

/// Process-local catalog used by tests and `STORAGE_BACKEND=memory`.
///
/// Enforces the same store scoping and reference rules as the Postgres schema.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    tables: RwLock<Tables>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ScopeStore for MemoryCatalog {
    async fn find_owned_scope(&self, scope_id: &str, owner: &Identity) -> Result<Option<Store>, DatabaseError> {
        let Ok(id) = Uuid::parse_str(scope_id) else {
            return Ok(None);
        };
        let tables = self.tables.read().await;
        Ok(tables
            .stores
            .iter()
            .find(|s| s.id == id && s.user_id == owner.as_str())
            .cloned())
    }
}

#[async_trait]
impl Catalog for MemoryCatalog {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn create_store(&self, owner: &Identity, input: StoreInput) -> Result<Store, DatabaseError> {
        let now = Utc::now();
        let store = Store {
            id: Uuid::new_v4(),
            name: input.name,
            user_id: owner.as_str().to_string(),
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.stores.push(store.clone());
        Ok(store)
    }

    async fn list_stores(&self, owner: &Identity) -> Result<Vec<Store>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .stores
            .iter()
            .rev()
            .filter(|s| s.user_id == owner.as_str())
            .cloned()
            .collect())
    }

    async fn get_store(&self, store_id: Uuid) -> Result<Option<Store>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.stores.iter().find(|s| s.id == store_id).cloned())
    }

    async fn update_store(&self, store_id: Uuid, input: StoreInput) -> Result<Store, DatabaseError> {
        let mut tables = self.tables.write().await;
        let store = tables
            .stores
            .iter_mut()
            .find(|s| s.id == store_id)
            .ok_or_else(|| not_found("Store"))?;
        store.name = input.name;
        store.updated_at = Utc::now();
        Ok(store.clone())
    }

    async fn delete_store(&self, store_id: Uuid) -> Result<Store, DatabaseError> {
        let mut tables = self.tables.write().await;
        let index = tables
            .stores
            .iter()
            .position(|s| s.id == store_id)
            .ok_or_else(|| not_found("Store"))?;

        let in_use = tables.billboards.iter().any(|r| r.store_id == store_id)
            || tables.categories.iter().any(|r| r.store_id == store_id)
            || tables.sizes.iter().any(|r| r.store_id == store_id)
            || tables.colors.iter().any(|r| r.store_id == store_id)
            || tables.products.iter().any(|r| r.store_id == store_id)
            || tables.orders.iter().any(|r| r.store_id == store_id);
        if in_use {
            return Err(DatabaseError::Conflict(conflicts::STORE_IN_USE.to_string()));
        }

        Ok(tables.stores.remove(index))
    }

    async fn list_billboards(&self, store_id: Uuid) -> Result<Vec<Billboard>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .billboards
            .iter()
            .rev()
            .filter(|b| b.store_id == store_id)
            .cloned()
            .collect())
    }

    async fn get_billboard(&self, store_id: Uuid, id: Uuid) -> Result<Option<Billboard>, DatabaseError> {
        Ok(self.tables.read().await.billboard(store_id, id).cloned())
    }

    async fn create_billboard(&self, store_id: Uuid, input: BillboardInput) -> Result<Billboard, DatabaseError> {
        let now = Utc::now();
        let billboard = Billboard {
            id: Uuid::new_v4(),
            store_id,
            label: input.label,
            image_url: input.image_url,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.billboards.push(billboard.clone());
        Ok(billboard)
    }

    async fn update_billboard(&self, store_id: Uuid, id: Uuid, input: BillboardInput) -> Result<Billboard, DatabaseError> {
        let mut tables = self.tables.write().await;
        let billboard = tables
            .billboards
            .iter_mut()
            .find(|b| b.id == id && b.store_id == store_id)
            .ok_or_else(|| not_found("Billboard"))?;
        billboard.label = input.label;
        billboard.image_url = input.image_url;
        billboard.updated_at = Utc::now();
        Ok(billboard.clone())
    }

    async fn delete_billboard(&self, store_id: Uuid, id: Uuid) -> Result<Billboard, DatabaseError> {
        let mut tables = self.tables.write().await;
        let index = tables
            .billboards
            .iter()
            .position(|b| b.id == id && b.store_id == store_id)
            .ok_or_else(|| not_found("Billboard"))?;
        if tables.categories.iter().any(|c| c.billboard_id == id) {
            return Err(DatabaseError::Conflict(conflicts::BILLBOARD_IN_USE.to_string()));
        }
        Ok(tables.billboards.remove(index))
    }

    async fn list_categories(&self, store_id: Uuid) -> Result<Vec<CategoryDetail>, DatabaseError> {
        let tables = self.tables.read().await;
        tables
            .categories
            .iter()
            .rev()
            .filter(|c| c.store_id == store_id)
            .map(|c| tables.category_detail(c))
            .collect()
    }

    async fn get_category(&self, store_id: Uuid, id: Uuid) -> Result<Option<CategoryDetail>, DatabaseError> {
        let tables = self.tables.read().await;
        tables
            .category(store_id, id)
            .map(|c| tables.category_detail(c))
            .transpose()
    }

    async fn create_category(&self, store_id: Uuid, input: CategoryInput) -> Result<CategoryDetail, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.billboard(store_id, input.billboard_id).is_none() {
            return Err(invalid_reference("Billboard"));
        }
        let now = Utc::now();
        let category = Category {
            id: Uuid::new_v4(),
            store_id,
            billboard_id: input.billboard_id,
            name: input.name,
            created_at: now,
            updated_at: now,
        };
        tables.categories.push(category.clone());
        tables.category_detail(&category)
    }

    async fn update_category(&self, store_id: Uuid, id: Uuid, input: CategoryInput) -> Result<CategoryDetail, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.category(store_id, id).is_none() {
            return Err(not_found("Category"));
        }
        if tables.billboard(store_id, input.billboard_id).is_none() {
            return Err(invalid_reference("Billboard"));
        }
        let category = tables
            .categories
            .iter_mut()
            .find(|c| c.id == id && c.store_id == store_id)
            .ok_or_else(|| not_found("Category"))?;
        category.name = input.name;
        category.billboard_id = input.billboard_id;
        category.updated_at = Utc::now();
        let category = category.clone();
        tables.category_detail(&category)
    }

    async fn delete_category(&self, store_id: Uuid, id: Uuid) -> Result<CategoryDetail, DatabaseError> {
        let mut tables = self.tables.write().await;
        let index = tables
            .categories
            .iter()
            .position(|c| c.id == id && c.store_id == store_id)
            .ok_or_else(|| not_found("Category"))?;
        if tables.products.iter().any(|p| p.category_id == id) {
            return Err(DatabaseError::Conflict(conflicts::CATEGORY_IN_USE.to_string()));
        }
        let detail = tables.category_detail(&tables.categories[index])?;
        tables.categories.remove(index);
        Ok(detail)
    }

    async fn list_sizes(&self, store_id: Uuid) -> Result<Vec<Size>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .sizes
            .iter()
            .rev()
            .filter(|s| s.store_id == store_id)
            .cloned()
            .collect())
    }

    async fn get_size(&self, store_id: Uuid, id: Uuid) -> Result<Option<Size>, DatabaseError> {
        Ok(self.tables.read().await.size(store_id, id).cloned())
    }

    async fn create_size(&self, store_id: Uuid, input: SizeInput) -> Result<Size, DatabaseError> {
        let now = Utc::now();
        let size = Size {
            id: Uuid::new_v4(),
            store_id,
            name: input.name,
            value: input.value,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.sizes.push(size.clone());
        Ok(size)
    }

    async fn update_size(&self, store_id: Uuid, id: Uuid, input: SizeInput) -> Result<Size, DatabaseError> {
        let mut tables = self.tables.write().await;
        let size = tables
            .sizes
            .iter_mut()
            .find(|s| s.id == id && s.store_id == store_id)
            .ok_or_else(|| not_found("Size"))?;
        size.name = input.name;
        size.value = input.value;
        size.updated_at = Utc::now();
        Ok(size.clone())
    }

    async fn delete_size(&self, store_id: Uuid, id: Uuid) -> Result<Size, DatabaseError> {
        let mut tables = self.tables.write().await;
        let index = tables
            .sizes
            .iter()
            .position(|s| s.id == id && s.store_id == store_id)
            .ok_or_else(|| not_found("Size"))?;
        if tables.products.iter().any(|p| p.size_id == id) {
            return Err(DatabaseError::Conflict(conflicts::SIZE_IN_USE.to_string()));
        }
        Ok(tables.sizes.remove(index))
    }

    async fn list_colors(&self, store_id: Uuid) -> Result<Vec<Color>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .colors
            .iter()
            .rev()
            .filter(|c| c.store_id == store_id)
            .cloned()
            .collect())
    }

    async fn get_color(&self, store_id: Uuid, id: Uuid) -> Result<Option<Color>, DatabaseError> {
        Ok(self.tables.read().await.color(store_id, id).cloned())
    }

    async fn create_color(&self, store_id: Uuid, input: ColorInput) -> Result<Color, DatabaseError> {
        let now = Utc::now();
        let color = Color {
            id: Uuid::new_v4(),
            store_id,
            name: input.name,
            value: input.value,
            created_at: now,
            updated_at: now,
        };
        self.tables.write().await.colors.push(color.clone());
        Ok(color)
    }

    async fn update_color(&self, store_id: Uuid, id: Uuid, input: ColorInput) -> Result<Color, DatabaseError> {
        let mut tables = self.tables.write().await;
        let color = tables
            .colors
            .iter_mut()
            .find(|c| c.id == id && c.store_id == store_id)
            .ok_or_else(|| not_found("Color"))?;
        color.name = input.name;
        color.value = input.value;
        color.updated_at = Utc::now();
        Ok(color.clone())
    }

    async fn delete_color(&self, store_id: Uuid, id: Uuid) -> Result<Color, DatabaseError> {
        let mut tables = self.tables.write().await;
        let index = tables
            .colors
            .iter()
            .position(|c| c.id == id && c.store_id == store_id)
            .ok_or_else(|| not_found("Color"))?;
        if tables.products.iter().any(|p| p.color_id == id) {
            return Err(DatabaseError::Conflict(conflicts::COLOR_IN_USE.to_string()));
        }
        Ok(tables.colors.remove(index))
    }

    async fn list_products(&self, store_id: Uuid, filter: &ProductFilter) -> Result<Vec<ProductDetail>, DatabaseError> {
        let tables = self.tables.read().await;
        tables
            .products
            .iter()
            .rev()
            .filter(|p| p.store_id == store_id)
            .filter(|p| filter.category_id.map_or(true, |id| p.category_id == id))
            .filter(|p| filter.color_id.map_or(true, |id| p.color_id == id))
            .filter(|p| filter.size_id.map_or(true, |id| p.size_id == id))
            .filter(|p| filter.is_featured.map_or(true, |featured| p.is_featured == featured))
            .filter(|p| filter.include_archived || !p.is_archived)
            .map(|p| tables.product_detail(p))
            .collect()
    }

    async fn get_product(&self, store_id: Uuid, id: Uuid) -> Result<Option<ProductDetail>, DatabaseError> {
        let tables = self.tables.read().await;
        tables
            .product(store_id, id)
            .map(|p| tables.product_detail(p))
            .transpose()
    }

    async fn create_product(&self, store_id: Uuid, input: ProductInput) -> Result<ProductDetail, DatabaseError> {
        let mut tables = self.tables.write().await;
        tables.check_product_references(store_id, &input)?;

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4(),
            store_id,
            category_id: input.category_id,
            size_id: input.size_id,
            color_id: input.color_id,
            name: input.name,
            description: input.description,
            price: input.price,
            star_rating: input.star_rating,
            is_featured: input.is_featured,
            is_archived: input.is_archived,
            created_at: now,
            updated_at: now,
        };
        tables.products.push(product.clone());
        tables.replace_images(product.id, &input.images);
        tables.product_detail(&product)
    }

    async fn update_product(&self, store_id: Uuid, id: Uuid, input: ProductInput) -> Result<ProductDetail, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.product(store_id, id).is_none() {
            return Err(not_found("Product"));
        }
        tables.check_product_references(store_id, &input)?;

        let product = tables
            .products
            .iter_mut()
            .find(|p| p.id == id && p.store_id == store_id)
            .ok_or_else(|| not_found("Product"))?;
        product.name = input.name;
        product.description = input.description;
        product.price = input.price;
        product.star_rating = input.star_rating;
        product.category_id = input.category_id;
        product.size_id = input.size_id;
        product.color_id = input.color_id;
        product.is_featured = input.is_featured;
        product.is_archived = input.is_archived;
        product.updated_at = Utc::now();
        let product = product.clone();

        tables.replace_images(id, &input.images);
        tables.product_detail(&product)
    }

    async fn delete_product(&self, store_id: Uuid, id: Uuid) -> Result<Product, DatabaseError> {
        let mut tables = self.tables.write().await;
        let index = tables
            .products
            .iter()
            .position(|p| p.id == id && p.store_id == store_id)
            .ok_or_else(|| not_found("Product"))?;
        if tables.order_items.iter().any(|item| item.product_id == id) {
            return Err(DatabaseError::Conflict(conflicts::PRODUCT_IN_USE.to_string()));
        }
        tables.images.retain(|i| i.product_id != id);
        Ok(tables.products.remove(index))
    }

    async fn list_orders(&self, store_id: Uuid) -> Result<Vec<OrderDetail>, DatabaseError> {
        let tables = self.tables.read().await;
        tables
            .orders
            .iter()
            .rev()
            .filter(|o| o.store_id == store_id)
            .map(|o| tables.order_detail(o))
            .collect()
    }

    async fn create_order(&self, store_id: Uuid, order: NewOrder) -> Result<OrderDetail, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.stores.iter().any(|s| s.id == store_id) {
            return Err(not_found("Store"));
        }
        if order.product_ids.iter().any(|id| tables.product(store_id, *id).is_none()) {
            return Err(invalid_reference("Product"));
        }

        let now = Utc::now();
        let record = Order {
            id: Uuid::new_v4(),
            store_id,
            customer_name: order.customer_name,
            phone: order.phone,
            address: order.address,
            is_paid: order.is_paid,
            created_at: now,
            updated_at: now,
        };
        tables.orders.push(record.clone());
        tables.order_items.extend(order.product_ids.iter().map(|product_id| OrderItem {
            id: Uuid::new_v4(),
            order_id: record.id,
            product_id: *product_id,
        }));
        tables.order_detail(&record)
    }
}
