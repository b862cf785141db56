pub mod auth;
pub mod policy;
pub mod response;

pub use auth::require_scope;
pub use policy::{request_policy, ALLOWED_METHODS};
pub use response::{ApiResponse, ApiResult};
