pub mod dashboard;

pub use dashboard::{order_columns, overview, OrderColumn, Overview};
