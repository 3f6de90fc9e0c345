pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod repository;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryCatalog;
pub use postgres::PgCatalog;
pub use repository::{Catalog, NewOrder, ProductFilter};
