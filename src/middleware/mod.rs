pub mod rejection;
pub mod request_log;
pub mod response;

pub use rejection::envelope_rejections;
pub use request_log::log_requests;
pub use response::{ApiResponse, ApiResult};
