pub mod billboard;
pub mod category;
pub mod color;
pub mod order;
pub mod product;
pub mod size;
pub mod store;

pub use billboard::Billboard;
pub use category::{Category, CategoryDetail};
pub use color::Color;
pub use order::{Order, OrderDetail, OrderItemDetail};
pub use product::{Product, ProductDetail, ProductImage};
pub use size::Size;
pub use store::Store;
