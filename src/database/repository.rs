use async_trait::async_trait;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    Customer, NewCustomer, NewOrder, NewStock, NewUser, Order, Stock, User,
};
use crate::database::scope::{Page, Scope};

/// Scoped persistence for the four entity kinds.
///
/// Reads and writes that take a `Scope` must never observe or touch rows
/// outside it; a miss is reported as `DatabaseError::NotFound`. Creates are
/// unscoped and take their owning ids from the record itself.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Repository: Send + Sync {
    // Users
    async fn list_users(&self, scope: Scope, page: Page) -> Result<Vec<User>, DatabaseError>;
    async fn get_user(&self, scope: Scope, id: Uuid) -> Result<User, DatabaseError>;
    async fn create_user(&self, user: NewUser) -> Result<Uuid, DatabaseError>;
    async fn update_user(&self, scope: Scope, user: User) -> Result<User, DatabaseError>;
    async fn delete_user(&self, scope: Scope, id: Uuid) -> Result<(), DatabaseError>;

    // Stocks
    async fn list_stocks(&self, scope: Scope, page: Page) -> Result<Vec<Stock>, DatabaseError>;
    async fn get_stock(&self, scope: Scope, id: i64) -> Result<Stock, DatabaseError>;
    async fn create_stock(&self, stock: NewStock) -> Result<i64, DatabaseError>;
    /// All rows are inserted or none are
    async fn create_stocks(&self, stocks: Vec<NewStock>) -> Result<Vec<i64>, DatabaseError>;
    async fn update_stock(&self, scope: Scope, stock: Stock) -> Result<Stock, DatabaseError>;
    async fn delete_stock(&self, scope: Scope, id: i64) -> Result<(), DatabaseError>;

    // Customers
    async fn list_customers(&self, scope: Scope, page: Page) -> Result<Vec<Customer>, DatabaseError>;
    async fn get_customer(&self, scope: Scope, id: Uuid) -> Result<Customer, DatabaseError>;
    async fn create_customer(&self, customer: NewCustomer) -> Result<Uuid, DatabaseError>;
    async fn update_customer(&self, scope: Scope, customer: Customer) -> Result<Customer, DatabaseError>;
    async fn delete_customer(&self, scope: Scope, id: Uuid) -> Result<(), DatabaseError>;

    // Orders (no delete)
    async fn list_orders(&self, scope: Scope, page: Page) -> Result<Vec<Order>, DatabaseError>;
    async fn get_order(&self, scope: Scope, id: i64) -> Result<Order, DatabaseError>;
    async fn create_order(&self, order: NewOrder) -> Result<i64, DatabaseError>;
    /// All rows are inserted or none are
    async fn create_orders(&self, orders: Vec<NewOrder>) -> Result<Vec<i64>, DatabaseError>;
    async fn update_order(&self, scope: Scope, order: Order) -> Result<Order, DatabaseError>;

    /// Readiness probe
    async fn ping(&self) -> Result<(), DatabaseError>;
}
