//! Request payloads accepted by the HTTP surface

pub mod customers;
pub mod orders;
pub mod stocks;
pub mod users;

use serde::Deserialize;
use validator::Validate;

pub use customers::{CreateCustomerRequest, UpdateCustomerRequest};
pub use orders::{CreateBulkOrderRequest, CreateOrderRequest, UpdateOrderRequest};
pub use stocks::{CreateBulkStockRequest, CreateStockRequest, UpdateStockRequest};
pub use users::{CreateUserRequest, UpdateUserRequest};

/// `?limit=&offset=` on list endpoints. Defaults are applied by the services.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ListQuery {
    #[validate(range(min = 0))]
    pub limit: Option<i64>,
    #[validate(range(min = 0))]
    pub offset: Option<i64>,
}
