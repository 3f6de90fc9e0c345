use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

use crate::auth::Identity;
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{
    Billboard, Category, CategoryDetail, Color, Order, OrderDetail, OrderItemDetail, Product,
    ProductDetail, ProductImage, Size, Store,
};
use crate::database::repository::{conflicts, invalid_reference, not_found, Catalog, NewOrder, ProductFilter};
use crate::forms::{BillboardInput, CategoryInput, ColorInput, ProductInput, SizeInput, StoreInput};
use crate::guard::ScopeStore;

const STORE_COLUMNS: &str = "id, name, user_id, created_at, updated_at";
const BILLBOARD_COLUMNS: &str = "id, store_id, label, image_url, created_at, updated_at";
const CATEGORY_COLUMNS: &str = "id, store_id, billboard_id, name, created_at, updated_at";
const SIZE_COLUMNS: &str = "id, store_id, name, value, created_at, updated_at";
const PRODUCT_COLUMNS: &str = "id, store_id, category_id, size_id, color_id, name, description, price, \
     star_rating, is_featured, is_archived, created_at, updated_at";
const ORDER_COLUMNS: &str = "id, store_id, customer_name, phone, address, is_paid, created_at, updated_at";

/// Items keep the order the products were listed in when the order was placed
const ORDER_ITEM_DETAILS: &str = "SELECT oi.id, oi.order_id, oi.product_id, p.name AS product_name, p.price AS product_price \
     FROM order_items oi JOIN products p ON p.id = oi.product_id \
     WHERE oi.order_id = ANY($1) ORDER BY oi.order_id, oi.position";

/// Catalog backed by the tables in `schema.sql`
#[derive(Debug, Clone)]
pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// `table` is one of the fixed table names below, never caller input
    async fn exists_in_store(
        tx: &mut Transaction<'_, Postgres>,
        table: &str,
        store_id: Uuid,
        id: Uuid,
    ) -> Result<bool, DatabaseError> {
        let sql = format!("SELECT EXISTS (SELECT 1 FROM {} WHERE id = $1 AND store_id = $2)", table);
        let exists: bool = sqlx::query_scalar(&sql)
            .bind(id)
            .bind(store_id)
            .fetch_one(&mut **tx)
            .await?;
        Ok(exists)
    }

    async fn check_product_references(
        tx: &mut Transaction<'_, Postgres>,
        store_id: Uuid,
        input: &ProductInput,
    ) -> Result<(), DatabaseError> {
        if !Self::exists_in_store(tx, "categories", store_id, input.category_id).await? {
            return Err(invalid_reference("Category"));
        }
        if !Self::exists_in_store(tx, "sizes", store_id, input.size_id).await? {
            return Err(invalid_reference("Size"));
        }
        if !Self::exists_in_store(tx, "colors", store_id, input.color_id).await? {
            return Err(invalid_reference("Color"));
        }
        Ok(())
    }

    async fn insert_images(
        tx: &mut Transaction<'_, Postgres>,
        product_id: Uuid,
        urls: &[String],
    ) -> Result<(), DatabaseError> {
        for url in urls {
            sqlx::query("INSERT INTO product_images (id, product_id, url) VALUES ($1, $2, $3)")
                .bind(Uuid::new_v4())
                .bind(product_id)
                .bind(url)
                .execute(&mut **tx)
                .await?;
        }
        Ok(())
    }

    async fn category_details(&self, store_id: Uuid, categories: Vec<Category>) -> Result<Vec<CategoryDetail>, DatabaseError> {
        let billboards: HashMap<Uuid, Billboard> = self
            .list_billboards(store_id)
            .await?
            .into_iter()
            .map(|b| (b.id, b))
            .collect();

        categories
            .into_iter()
            .map(|category| {
                let billboard = billboards
                    .get(&category.billboard_id)
                    .cloned()
                    .ok_or_else(|| not_found("Billboard"))?;
                Ok(CategoryDetail { category, billboard })
            })
            .collect()
    }

    /// Attach images, category, size and color to each product of one store
    async fn product_details(&self, store_id: Uuid, products: Vec<Product>) -> Result<Vec<ProductDetail>, DatabaseError> {
        if products.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = products.iter().map(|p| p.id).collect();
        let images: Vec<ProductImage> = sqlx::query_as(
            "SELECT id, product_id, url, created_at FROM product_images \
             WHERE product_id = ANY($1) ORDER BY created_at, id",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let categories: HashMap<Uuid, Category> = sqlx::query_as::<_, Category>(&format!(
            "SELECT {} FROM categories WHERE store_id = $1",
            CATEGORY_COLUMNS
        ))
        .bind(store_id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();
        let sizes: HashMap<Uuid, Size> = self.list_sizes(store_id).await?.into_iter().map(|s| (s.id, s)).collect();
        let colors: HashMap<Uuid, Color> = self.list_colors(store_id).await?.into_iter().map(|c| (c.id, c)).collect();

        products
            .into_iter()
            .map(|product| {
                Ok(ProductDetail {
                    images: images.iter().filter(|i| i.product_id == product.id).cloned().collect(),
                    category: categories.get(&product.category_id).cloned().ok_or_else(|| not_found("Category"))?,
                    size: sizes.get(&product.size_id).cloned().ok_or_else(|| not_found("Size"))?,
                    color: colors.get(&product.color_id).cloned().ok_or_else(|| not_found("Color"))?,
                    product,
                })
            })
            .collect()
    }

    async fn order_details(&self, orders: Vec<Order>) -> Result<Vec<OrderDetail>, DatabaseError> {
        if orders.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
        let items: Vec<OrderItemDetail> = sqlx::query_as(ORDER_ITEM_DETAILS)
            .bind(&ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(orders
            .into_iter()
            .map(|order| OrderDetail {
                items: items.iter().filter(|i| i.order_id == order.id).cloned().collect(),
                order,
            })
            .collect())
    }
}

#[async_trait]
impl ScopeStore for PgCatalog {
    async fn find_owned_scope(&self, scope_id: &str, owner: &Identity) -> Result<Option<Store>, DatabaseError> {
        // A malformed id cannot match any row
        let Ok(id) = Uuid::parse_str(scope_id) else {
            return Ok(None);
        };

        let store = sqlx::query_as::<_, Store>(&format!(
            "SELECT {} FROM stores WHERE id = $1 AND user_id = $2",
            STORE_COLUMNS
        ))
        .bind(id)
        .bind(owner.as_str())
        .fetch_optional(&self.pool)
        .await?;
        Ok(store)
    }
}

#[async_trait]
impl Catalog for PgCatalog {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }

    async fn create_store(&self, owner: &Identity, input: StoreInput) -> Result<Store, DatabaseError> {
        let store = sqlx::query_as::<_, Store>(&format!(
            "INSERT INTO stores (id, name, user_id) VALUES ($1, $2, $3) RETURNING {}",
            STORE_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&input.name)
        .bind(owner.as_str())
        .fetch_one(&self.pool)
        .await?;
        debug!("Created store {} for {}", store.id, owner);
        Ok(store)
    }

    async fn list_stores(&self, owner: &Identity) -> Result<Vec<Store>, DatabaseError> {
        let stores = sqlx::query_as::<_, Store>(&format!(
            "SELECT {} FROM stores WHERE user_id = $1 ORDER BY created_at DESC",
            STORE_COLUMNS
        ))
        .bind(owner.as_str())
        .fetch_all(&self.pool)
        .await?;
        Ok(stores)
    }

    async fn get_store(&self, store_id: Uuid) -> Result<Option<Store>, DatabaseError> {
        let store = sqlx::query_as::<_, Store>(&format!("SELECT {} FROM stores WHERE id = $1", STORE_COLUMNS))
            .bind(store_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(store)
    }

    async fn update_store(&self, store_id: Uuid, input: StoreInput) -> Result<Store, DatabaseError> {
        sqlx::query_as::<_, Store>(&format!(
            "UPDATE stores SET name = $2, updated_at = now() WHERE id = $1 RETURNING {}",
            STORE_COLUMNS
        ))
        .bind(store_id)
        .bind(&input.name)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found("Store"))
    }

    async fn delete_store(&self, store_id: Uuid) -> Result<Store, DatabaseError> {
        sqlx::query_as::<_, Store>(&format!("DELETE FROM stores WHERE id = $1 RETURNING {}", STORE_COLUMNS))
            .bind(store_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DatabaseManager::map_delete_error(e, conflicts::STORE_IN_USE))?
            .ok_or_else(|| not_found("Store"))
    }

    async fn list_billboards(&self, store_id: Uuid) -> Result<Vec<Billboard>, DatabaseError> {
        let rows = sqlx::query_as::<_, Billboard>(&format!(
            "SELECT {} FROM billboards WHERE store_id = $1 ORDER BY created_at DESC",
            BILLBOARD_COLUMNS
        ))
        .bind(store_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_billboard(&self, store_id: Uuid, id: Uuid) -> Result<Option<Billboard>, DatabaseError> {
        let row = sqlx::query_as::<_, Billboard>(&format!(
            "SELECT {} FROM billboards WHERE id = $1 AND store_id = $2",
            BILLBOARD_COLUMNS
        ))
        .bind(id)
        .bind(store_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn create_billboard(&self, store_id: Uuid, input: BillboardInput) -> Result<Billboard, DatabaseError> {
        let row = sqlx::query_as::<_, Billboard>(&format!(
            "INSERT INTO billboards (id, store_id, label, image_url) VALUES ($1, $2, $3, $4) RETURNING {}",
            BILLBOARD_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(store_id)
        .bind(&input.label)
        .bind(&input.image_url)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_billboard(&self, store_id: Uuid, id: Uuid, input: BillboardInput) -> Result<Billboard, DatabaseError> {
        sqlx::query_as::<_, Billboard>(&format!(
            "UPDATE billboards SET label = $3, image_url = $4, updated_at = now() \
             WHERE id = $1 AND store_id = $2 RETURNING {}",
            BILLBOARD_COLUMNS
        ))
        .bind(id)
        .bind(store_id)
        .bind(&input.label)
        .bind(&input.image_url)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found("Billboard"))
    }

    async fn delete_billboard(&self, store_id: Uuid, id: Uuid) -> Result<Billboard, DatabaseError> {
        sqlx::query_as::<_, Billboard>(&format!(
            "DELETE FROM billboards WHERE id = $1 AND store_id = $2 RETURNING {}",
            BILLBOARD_COLUMNS
        ))
        .bind(id)
        .bind(store_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DatabaseManager::map_delete_error(e, conflicts::BILLBOARD_IN_USE))?
        .ok_or_else(|| not_found("Billboard"))
    }

    async fn list_categories(&self, store_id: Uuid) -> Result<Vec<CategoryDetail>, DatabaseError> {
        let rows = sqlx::query_as::<_, Category>(&format!(
            "SELECT {} FROM categories WHERE store_id = $1 ORDER BY created_at DESC",
            CATEGORY_COLUMNS
        ))
        .bind(store_id)
        .fetch_all(&self.pool)
        .await?;
        self.category_details(store_id, rows).await
    }

    async fn get_category(&self, store_id: Uuid, id: Uuid) -> Result<Option<CategoryDetail>, DatabaseError> {
        let row = sqlx::query_as::<_, Category>(&format!(
            "SELECT {} FROM categories WHERE id = $1 AND store_id = $2",
            CATEGORY_COLUMNS
        ))
        .bind(id)
        .bind(store_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(category) => Ok(self.category_details(store_id, vec![category]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn create_category(&self, store_id: Uuid, input: CategoryInput) -> Result<CategoryDetail, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        if !Self::exists_in_store(&mut tx, "billboards", store_id, input.billboard_id).await? {
            return Err(invalid_reference("Billboard"));
        }
        let category = sqlx::query_as::<_, Category>(&format!(
            "INSERT INTO categories (id, store_id, billboard_id, name) VALUES ($1, $2, $3, $4) RETURNING {}",
            CATEGORY_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(store_id)
        .bind(input.billboard_id)
        .bind(&input.name)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;

        self.category_details(store_id, vec![category])
            .await?
            .pop()
            .ok_or_else(|| not_found("Category"))
    }

    async fn update_category(&self, store_id: Uuid, id: Uuid, input: CategoryInput) -> Result<CategoryDetail, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        if !Self::exists_in_store(&mut tx, "categories", store_id, id).await? {
            return Err(not_found("Category"));
        }
        if !Self::exists_in_store(&mut tx, "billboards", store_id, input.billboard_id).await? {
            return Err(invalid_reference("Billboard"));
        }
        let category = sqlx::query_as::<_, Category>(&format!(
            "UPDATE categories SET name = $3, billboard_id = $4, updated_at = now() \
             WHERE id = $1 AND store_id = $2 RETURNING {}",
            CATEGORY_COLUMNS
        ))
        .bind(id)
        .bind(store_id)
        .bind(&input.name)
        .bind(input.billboard_id)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;

        self.category_details(store_id, vec![category])
            .await?
            .pop()
            .ok_or_else(|| not_found("Category"))
    }

    async fn delete_category(&self, store_id: Uuid, id: Uuid) -> Result<CategoryDetail, DatabaseError> {
        let detail = self.get_category(store_id, id).await?.ok_or_else(|| not_found("Category"))?;
        sqlx::query("DELETE FROM categories WHERE id = $1 AND store_id = $2")
            .bind(id)
            .bind(store_id)
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseManager::map_delete_error(e, conflicts::CATEGORY_IN_USE))?;
        Ok(detail)
    }

    async fn list_sizes(&self, store_id: Uuid) -> Result<Vec<Size>, DatabaseError> {
        let rows = sqlx::query_as::<_, Size>(&format!(
            "SELECT {} FROM sizes WHERE store_id = $1 ORDER BY created_at DESC",
            SIZE_COLUMNS
        ))
        .bind(store_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_size(&self, store_id: Uuid, id: Uuid) -> Result<Option<Size>, DatabaseError> {
        let row = sqlx::query_as::<_, Size>(&format!(
            "SELECT {} FROM sizes WHERE id = $1 AND store_id = $2",
            SIZE_COLUMNS
        ))
        .bind(id)
        .bind(store_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn create_size(&self, store_id: Uuid, input: SizeInput) -> Result<Size, DatabaseError> {
        let row = sqlx::query_as::<_, Size>(&format!(
            "INSERT INTO sizes (id, store_id, name, value) VALUES ($1, $2, $3, $4) RETURNING {}",
            SIZE_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(store_id)
        .bind(&input.name)
        .bind(&input.value)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_size(&self, store_id: Uuid, id: Uuid, input: SizeInput) -> Result<Size, DatabaseError> {
        sqlx::query_as::<_, Size>(&format!(
            "UPDATE sizes SET name = $3, value = $4, updated_at = now() \
             WHERE id = $1 AND store_id = $2 RETURNING {}",
            SIZE_COLUMNS
        ))
        .bind(id)
        .bind(store_id)
        .bind(&input.name)
        .bind(&input.value)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found("Size"))
    }

    async fn delete_size(&self, store_id: Uuid, id: Uuid) -> Result<Size, DatabaseError> {
        sqlx::query_as::<_, Size>(&format!(
            "DELETE FROM sizes WHERE id = $1 AND store_id = $2 RETURNING {}",
            SIZE_COLUMNS
        ))
        .bind(id)
        .bind(store_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DatabaseManager::map_delete_error(e, conflicts::SIZE_IN_USE))?
        .ok_or_else(|| not_found("Size"))
    }

    // Colors share the sizes column layout
    async fn list_colors(&self, store_id: Uuid) -> Result<Vec<Color>, DatabaseError> {
        let rows = sqlx::query_as::<_, Color>(&format!(
            "SELECT {} FROM colors WHERE store_id = $1 ORDER BY created_at DESC",
            SIZE_COLUMNS
        ))
        .bind(store_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_color(&self, store_id: Uuid, id: Uuid) -> Result<Option<Color>, DatabaseError> {
        let row = sqlx::query_as::<_, Color>(&format!(
            "SELECT {} FROM colors WHERE id = $1 AND store_id = $2",
            SIZE_COLUMNS
        ))
        .bind(id)
        .bind(store_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn create_color(&self, store_id: Uuid, input: ColorInput) -> Result<Color, DatabaseError> {
        let row = sqlx::query_as::<_, Color>(&format!(
            "INSERT INTO colors (id, store_id, name, value) VALUES ($1, $2, $3, $4) RETURNING {}",
            SIZE_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(store_id)
        .bind(&input.name)
        .bind(&input.value)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_color(&self, store_id: Uuid, id: Uuid, input: ColorInput) -> Result<Color, DatabaseError> {
        sqlx::query_as::<_, Color>(&format!(
            "UPDATE colors SET name = $3, value = $4, updated_at = now() \
             WHERE id = $1 AND store_id = $2 RETURNING {}",
            SIZE_COLUMNS
        ))
        .bind(id)
        .bind(store_id)
        .bind(&input.name)
        .bind(&input.value)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found("Color"))
    }

    async fn delete_color(&self, store_id: Uuid, id: Uuid) -> Result<Color, DatabaseError> {
        sqlx::query_as::<_, Color>(&format!(
            "DELETE FROM colors WHERE id = $1 AND store_id = $2 RETURNING {}",
            SIZE_COLUMNS
        ))
        .bind(id)
        .bind(store_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DatabaseManager::map_delete_error(e, conflicts::COLOR_IN_USE))?
        .ok_or_else(|| not_found("Color"))
    }

    async fn list_products(&self, store_id: Uuid, filter: &ProductFilter) -> Result<Vec<ProductDetail>, DatabaseError> {
        // Unset filters bind NULL and match every row
        let rows = sqlx::query_as::<_, Product>(&format!(
            "SELECT {} FROM products WHERE store_id = $1 \
             AND ($2::uuid IS NULL OR category_id = $2) \
             AND ($3::uuid IS NULL OR color_id = $3) \
             AND ($4::uuid IS NULL OR size_id = $4) \
             AND ($5::boolean IS NULL OR is_featured = $5) \
             AND ($6 OR NOT is_archived) \
             ORDER BY created_at DESC",
            PRODUCT_COLUMNS
        ))
        .bind(store_id)
        .bind(filter.category_id)
        .bind(filter.color_id)
        .bind(filter.size_id)
        .bind(filter.is_featured)
        .bind(filter.include_archived)
        .fetch_all(&self.pool)
        .await?;
        self.product_details(store_id, rows).await
    }

    async fn get_product(&self, store_id: Uuid, id: Uuid) -> Result<Option<ProductDetail>, DatabaseError> {
        let row = sqlx::query_as::<_, Product>(&format!(
            "SELECT {} FROM products WHERE id = $1 AND store_id = $2",
            PRODUCT_COLUMNS
        ))
        .bind(id)
        .bind(store_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(product) => Ok(self.product_details(store_id, vec![product]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn create_product(&self, store_id: Uuid, input: ProductInput) -> Result<ProductDetail, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        Self::check_product_references(&mut tx, store_id, &input).await?;

        let product = sqlx::query_as::<_, Product>(&format!(
            "INSERT INTO products (id, store_id, category_id, size_id, color_id, name, description, price, \
             star_rating, is_featured, is_archived) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING {}",
            PRODUCT_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(store_id)
        .bind(input.category_id)
        .bind(input.size_id)
        .bind(input.color_id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price)
        .bind(input.star_rating)
        .bind(input.is_featured)
        .bind(input.is_archived)
        .fetch_one(&mut *tx)
        .await?;
        Self::insert_images(&mut tx, product.id, &input.images).await?;
        tx.commit().await?;

        self.product_details(store_id, vec![product])
            .await?
            .pop()
            .ok_or_else(|| not_found("Product"))
    }

    async fn update_product(&self, store_id: Uuid, id: Uuid, input: ProductInput) -> Result<ProductDetail, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        if !Self::exists_in_store(&mut tx, "products", store_id, id).await? {
            return Err(not_found("Product"));
        }
        Self::check_product_references(&mut tx, store_id, &input).await?;

        let product = sqlx::query_as::<_, Product>(&format!(
            "UPDATE products SET name = $3, description = $4, price = $5, star_rating = $6, \
             category_id = $7, size_id = $8, color_id = $9, is_featured = $10, is_archived = $11, \
             updated_at = now() WHERE id = $1 AND store_id = $2 RETURNING {}",
            PRODUCT_COLUMNS
        ))
        .bind(id)
        .bind(store_id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price)
        .bind(input.star_rating)
        .bind(input.category_id)
        .bind(input.size_id)
        .bind(input.color_id)
        .bind(input.is_featured)
        .bind(input.is_archived)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM product_images WHERE product_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        Self::insert_images(&mut tx, id, &input.images).await?;
        tx.commit().await?;

        self.product_details(store_id, vec![product])
            .await?
            .pop()
            .ok_or_else(|| not_found("Product"))
    }

    async fn delete_product(&self, store_id: Uuid, id: Uuid) -> Result<Product, DatabaseError> {
        sqlx::query_as::<_, Product>(&format!(
            "DELETE FROM products WHERE id = $1 AND store_id = $2 RETURNING {}",
            PRODUCT_COLUMNS
        ))
        .bind(id)
        .bind(store_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DatabaseManager::map_delete_error(e, conflicts::PRODUCT_IN_USE))?
        .ok_or_else(|| not_found("Product"))
    }

    async fn list_orders(&self, store_id: Uuid) -> Result<Vec<OrderDetail>, DatabaseError> {
        let rows = sqlx::query_as::<_, Order>(&format!(
            "SELECT {} FROM orders WHERE store_id = $1 ORDER BY created_at DESC",
            ORDER_COLUMNS
        ))
        .bind(store_id)
        .fetch_all(&self.pool)
        .await?;
        self.order_details(rows).await
    }

    async fn create_order(&self, store_id: Uuid, order: NewOrder) -> Result<OrderDetail, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        for product_id in &order.product_ids {
            if !Self::exists_in_store(&mut tx, "products", store_id, *product_id).await? {
                return Err(invalid_reference("Product"));
            }
        }

        let record = sqlx::query_as::<_, Order>(&format!(
            "INSERT INTO orders (id, store_id, customer_name, phone, address, is_paid) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            ORDER_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(store_id)
        .bind(&order.customer_name)
        .bind(&order.phone)
        .bind(&order.address)
        .bind(order.is_paid)
        .fetch_one(&mut *tx)
        .await?;

        for (position, product_id) in order.product_ids.iter().enumerate() {
            sqlx::query("INSERT INTO order_items (id, order_id, product_id, position) VALUES ($1, $2, $3, $4)")
                .bind(Uuid::new_v4())
                .bind(record.id)
                .bind(product_id)
                .bind(position as i32)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        self.order_details(vec![record])
            .await?
            .pop()
            .ok_or_else(|| not_found("Order"))
    }
}
