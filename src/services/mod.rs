pub mod customer_service;
pub mod order_service;
pub mod stock_service;
pub mod user_service;

pub use customer_service::CustomerService;
pub use order_service::OrderService;
pub use stock_service::StockService;
pub use user_service::UserService;
