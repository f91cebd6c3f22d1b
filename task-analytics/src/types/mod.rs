pub mod response;

pub use response::{ApiResponse, ResponseMeta, ResponsePaginationMeta};
