pub mod customer;
pub mod order;
pub mod stock;
pub mod user;

pub use customer::{Customer, NewCustomer};
pub use order::{NewOrder, Order, OrderStatus};
pub use stock::{NewStock, Stock};
pub use user::{Gender, NewUser, User};
