#![allow(dead_code)]

// In-process harness: the full router over an in-memory repository that
// enforces the same scope rules as the Postgres one.

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use uuid::Uuid;

use tenant_stock_api::auth::issue_token;
use tenant_stock_api::config::AppConfig;
use tenant_stock_api::database::models::{
    Customer, NewCustomer, NewOrder, NewStock, NewUser, Order, Stock, User,
};
use tenant_stock_api::database::{DatabaseError, Page, Repository, Scope};
use tenant_stock_api::{app, AppState};

#[derive(Default)]
struct Tables {
    /// store_id -> tenant_id
    stores: HashMap<Uuid, Uuid>,
    users: Vec<User>,
    stocks: Vec<Stock>,
    customers: Vec<Customer>,
    orders: Vec<Order>,
    next_stock_id: i64,
    next_order_id: i64,
}

impl Tables {
    fn tenant_of_store(&self, store_id: Uuid) -> Option<Uuid> {
        self.stores.get(&store_id).copied()
    }

    fn user_in_scope(&self, scope: &Scope, user: &User) -> bool {
        self.tenant_of_store(user.store_id) == Some(scope.tenant_id)
    }

    fn order_in_scope(&self, scope: &Scope, order: &Order) -> bool {
        self.customers
            .iter()
            .any(|c| c.id == order.customer_id && c.tenant_id == scope.tenant_id)
    }

    fn with_stocks(&self, mut user: User) -> User {
        user.stocks = self
            .stocks
            .iter()
            .filter(|s| s.user_id == user.id)
            .cloned()
            .collect();
        user
    }

    fn with_orders(&self, mut customer: Customer) -> Customer {
        customer.orders = self
            .orders
            .iter()
            .filter(|o| o.customer_id == customer.id)
            .cloned()
            .collect();
        customer
    }

    fn check_stock(&self, stock: &NewStock) -> Result<(), DatabaseError> {
        if !self.stores.contains_key(&stock.store_id) {
            return Err(DatabaseError::InvalidReference("unknown store".to_string()));
        }
        if !self.users.iter().any(|u| u.id == stock.user_id) {
            return Err(DatabaseError::InvalidReference("unknown user".to_string()));
        }
        Ok(())
    }

    fn check_order(&self, order: &NewOrder) -> Result<(), DatabaseError> {
        if !self.customers.iter().any(|c| c.id == order.customer_id) {
            return Err(DatabaseError::InvalidReference("unknown customer".to_string()));
        }
        if !self.stocks.iter().any(|s| s.id == order.stock_id) {
            return Err(DatabaseError::InvalidReference("unknown stock".to_string()));
        }
        Ok(())
    }

    fn insert_stock(&mut self, stock: NewStock) -> i64 {
        self.next_stock_id += 1;
        let now = Utc::now();
        self.stocks.push(Stock {
            id: self.next_stock_id,
            store_id: stock.store_id,
            user_id: stock.user_id,
            name: stock.name,
            quantity: stock.quantity,
            price: stock.price,
            created_at: now,
            updated_at: now,
        });
        self.next_stock_id
    }

    fn insert_order(&mut self, order: NewOrder) -> i64 {
        self.next_order_id += 1;
        let now = Utc::now();
        self.orders.push(Order {
            id: self.next_order_id,
            customer_id: order.customer_id,
            stock_id: order.stock_id,
            total_amount: order.total_amount,
            quantity: order.quantity,
            delivery_date: order.delivery_date,
            status: order.status,
            created_at: now,
            updated_at: now,
        });
        self.next_order_id
    }
}

fn page_of<T>(rows: impl Iterator<Item = T>, page: Page) -> Vec<T> {
    rows.skip(page.offset as usize).take(page.limit as usize).collect()
}

fn not_found(label: &str) -> DatabaseError {
    DatabaseError::NotFound(format!("{} not found", label))
}

#[derive(Default)]
pub struct MemoryRepository {
    tables: Mutex<Tables>,
}

impl MemoryRepository {
    /// Register a store under a tenant; stores are provisioned out of band
    pub fn add_store(&self, tenant_id: Uuid) -> Uuid {
        let store_id = Uuid::new_v4();
        self.tables.lock().unwrap().stores.insert(store_id, tenant_id);
        store_id
    }

    pub fn customer(&self, id: Uuid) -> Option<Customer> {
        self.tables.lock().unwrap().customers.iter().find(|c| c.id == id).cloned()
    }

    pub fn order(&self, id: i64) -> Option<Order> {
        self.tables.lock().unwrap().orders.iter().find(|o| o.id == id).cloned()
    }

    pub fn stock_count(&self) -> usize {
        self.tables.lock().unwrap().stocks.len()
    }

    pub fn order_count(&self) -> usize {
        self.tables.lock().unwrap().orders.len()
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn list_users(&self, scope: Scope, page: Page) -> Result<Vec<User>, DatabaseError> {
        let t = self.tables.lock().unwrap();
        let rows = t.users.iter().filter(|u| t.user_in_scope(&scope, u)).cloned();
        Ok(page_of(rows, page).into_iter().map(|u| t.with_stocks(u)).collect())
    }

    async fn get_user(&self, scope: Scope, id: Uuid) -> Result<User, DatabaseError> {
        let t = self.tables.lock().unwrap();
        t.users
            .iter()
            .find(|u| u.id == id && t.user_in_scope(&scope, u))
            .cloned()
            .map(|u| t.with_stocks(u))
            .ok_or_else(|| not_found("User"))
    }

    async fn create_user(&self, user: NewUser) -> Result<Uuid, DatabaseError> {
        let mut t = self.tables.lock().unwrap();
        if !t.stores.contains_key(&user.store_id) {
            return Err(DatabaseError::InvalidReference("unknown store".to_string()));
        }
        let now = Utc::now();
        t.users.push(User {
            id: user.id,
            store_id: user.store_id,
            name: user.name,
            email: user.email,
            employee_number: user.employee_number,
            gender: user.gender.map(|g| g.as_str().to_string()),
            created_at: now,
            updated_at: now,
            deleted_at: None,
            stocks: vec![],
        });
        Ok(user.id)
    }

    async fn update_user(&self, scope: Scope, user: User) -> Result<User, DatabaseError> {
        let mut t = self.tables.lock().unwrap();
        let index = t
            .users
            .iter()
            .position(|u| u.id == user.id && u.deleted_at.is_none() && t.user_in_scope(&scope, u))
            .ok_or_else(|| not_found("User"))?;
        let row = &mut t.users[index];
        row.name = user.name;
        row.email = user.email;
        row.employee_number = user.employee_number;
        row.gender = user.gender;
        row.updated_at = Utc::now();
        let row = row.clone();
        Ok(t.with_stocks(row))
    }

    async fn delete_user(&self, scope: Scope, id: Uuid) -> Result<(), DatabaseError> {
        let mut t = self.tables.lock().unwrap();
        let index = t
            .users
            .iter()
            .position(|u| u.id == id && u.deleted_at.is_none() && t.user_in_scope(&scope, u))
            .ok_or_else(|| not_found("User"))?;
        t.users[index].deleted_at = Some(Utc::now());
        Ok(())
    }

    async fn list_stocks(&self, scope: Scope, page: Page) -> Result<Vec<Stock>, DatabaseError> {
        let t = self.tables.lock().unwrap();
        let rows = t.stocks.iter().filter(|s| s.store_id == scope.store_id).cloned();
        Ok(page_of(rows, page))
    }

    async fn get_stock(&self, scope: Scope, id: i64) -> Result<Stock, DatabaseError> {
        let t = self.tables.lock().unwrap();
        t.stocks
            .iter()
            .find(|s| s.id == id && s.store_id == scope.store_id)
            .cloned()
            .ok_or_else(|| not_found("Stock"))
    }

    async fn create_stock(&self, stock: NewStock) -> Result<i64, DatabaseError> {
        let mut t = self.tables.lock().unwrap();
        t.check_stock(&stock)?;
        Ok(t.insert_stock(stock))
    }

    async fn create_stocks(&self, stocks: Vec<NewStock>) -> Result<Vec<i64>, DatabaseError> {
        let mut t = self.tables.lock().unwrap();
        for stock in &stocks {
            t.check_stock(stock)?;
        }
        Ok(stocks.into_iter().map(|s| t.insert_stock(s)).collect())
    }

    async fn update_stock(&self, scope: Scope, stock: Stock) -> Result<Stock, DatabaseError> {
        let mut t = self.tables.lock().unwrap();
        let row = t
            .stocks
            .iter_mut()
            .find(|s| s.id == stock.id && s.store_id == scope.store_id)
            .ok_or_else(|| not_found("Stock"))?;
        row.name = stock.name;
        row.quantity = stock.quantity;
        row.price = stock.price;
        row.user_id = stock.user_id;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete_stock(&self, scope: Scope, id: i64) -> Result<(), DatabaseError> {
        let mut t = self.tables.lock().unwrap();
        let index = t
            .stocks
            .iter()
            .position(|s| s.id == id && s.store_id == scope.store_id)
            .ok_or_else(|| not_found("Stock"))?;
        if t.orders.iter().any(|o| o.stock_id == id) {
            return Err(DatabaseError::StillReferenced("Stock is still referenced".to_string()));
        }
        t.stocks.remove(index);
        Ok(())
    }

    async fn list_customers(&self, scope: Scope, page: Page) -> Result<Vec<Customer>, DatabaseError> {
        let t = self.tables.lock().unwrap();
        let rows = t.customers.iter().filter(|c| c.tenant_id == scope.tenant_id).cloned();
        Ok(page_of(rows, page).into_iter().map(|c| t.with_orders(c)).collect())
    }

    async fn get_customer(&self, scope: Scope, id: Uuid) -> Result<Customer, DatabaseError> {
        let t = self.tables.lock().unwrap();
        t.customers
            .iter()
            .find(|c| c.id == id && c.tenant_id == scope.tenant_id)
            .cloned()
            .map(|c| t.with_orders(c))
            .ok_or_else(|| not_found("Customer"))
    }

    async fn create_customer(&self, customer: NewCustomer) -> Result<Uuid, DatabaseError> {
        let mut t = self.tables.lock().unwrap();
        let now = Utc::now();
        t.customers.push(Customer {
            id: customer.id,
            tenant_id: customer.tenant_id,
            name: customer.name,
            email: customer.email,
            phone_number: customer.phone_number,
            address: customer.address,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            orders: vec![],
        });
        Ok(customer.id)
    }

    async fn update_customer(&self, scope: Scope, customer: Customer) -> Result<Customer, DatabaseError> {
        let mut t = self.tables.lock().unwrap();
        let index = t
            .customers
            .iter()
            .position(|c| {
                c.id == customer.id && c.tenant_id == scope.tenant_id && c.deleted_at.is_none()
            })
            .ok_or_else(|| not_found("Customer"))?;
        let row = &mut t.customers[index];
        row.name = customer.name;
        row.email = customer.email;
        row.phone_number = customer.phone_number;
        row.address = customer.address;
        row.updated_at = Utc::now();
        let row = row.clone();
        Ok(t.with_orders(row))
    }

    async fn delete_customer(&self, scope: Scope, id: Uuid) -> Result<(), DatabaseError> {
        let mut t = self.tables.lock().unwrap();
        let row = t
            .customers
            .iter_mut()
            .find(|c| c.id == id && c.tenant_id == scope.tenant_id && c.deleted_at.is_none())
            .ok_or_else(|| not_found("Customer"))?;
        row.deleted_at = Some(Utc::now());
        Ok(())
    }

    async fn list_orders(&self, scope: Scope, page: Page) -> Result<Vec<Order>, DatabaseError> {
        let t = self.tables.lock().unwrap();
        let rows = t.orders.iter().filter(|o| t.order_in_scope(&scope, o)).cloned();
        Ok(page_of(rows, page))
    }

    async fn get_order(&self, scope: Scope, id: i64) -> Result<Order, DatabaseError> {
        let t = self.tables.lock().unwrap();
        t.orders
            .iter()
            .find(|o| o.id == id && t.order_in_scope(&scope, o))
            .cloned()
            .ok_or_else(|| not_found("Order"))
    }

    async fn create_order(&self, order: NewOrder) -> Result<i64, DatabaseError> {
        let mut t = self.tables.lock().unwrap();
        t.check_order(&order)?;
        Ok(t.insert_order(order))
    }

    async fn create_orders(&self, orders: Vec<NewOrder>) -> Result<Vec<i64>, DatabaseError> {
        let mut t = self.tables.lock().unwrap();
        for order in &orders {
            t.check_order(order)?;
        }
        Ok(orders.into_iter().map(|o| t.insert_order(o)).collect())
    }

    async fn update_order(&self, scope: Scope, order: Order) -> Result<Order, DatabaseError> {
        let mut t = self.tables.lock().unwrap();
        let index = t
            .orders
            .iter()
            .position(|o| o.id == order.id && t.order_in_scope(&scope, o))
            .ok_or_else(|| not_found("Order"))?;
        let row = &mut t.orders[index];
        row.total_amount = order.total_amount;
        row.quantity = order.quantity;
        row.delivery_date = order.delivery_date;
        row.status = order.status;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub repository: Arc<MemoryRepository>,
    pub config: AppConfig,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(AppConfig::local())
    }

    pub fn with_config(config: AppConfig) -> Self {
        let repository = Arc::new(MemoryRepository::default());
        let state = AppState::new(config.clone(), repository.clone());
        Self {
            router: app(state),
            repository,
            config,
        }
    }

    /// A fresh tenant with one store, returned as the scope a token would carry
    pub fn tenant(&self) -> Scope {
        let tenant_id = Uuid::new_v4();
        let store_id = self.repository.add_store(tenant_id);
        Scope::new(tenant_id, store_id)
    }

    pub fn token(&self, scope: &Scope) -> String {
        issue_token(scope, &self.config.security).unwrap()
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.server.api_prefix, path)
    }

    pub async fn get(&self, path: &str, scope: &Scope) -> (StatusCode, Value) {
        self.send(Method::GET, path, Some(scope), None).await
    }

    pub async fn post(&self, path: &str, scope: &Scope, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, path, Some(scope), Some(body)).await
    }

    pub async fn put(&self, path: &str, scope: &Scope, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, path, Some(scope), Some(body)).await
    }

    pub async fn delete(&self, path: &str, scope: &Scope) -> (StatusCode, Value) {
        self.send(Method::DELETE, path, Some(scope), None).await
    }

    pub async fn send(
        &self,
        method: Method,
        path: &str,
        scope: Option<&Scope>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder()
            .method(method)
            .uri(self.url(path))
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(scope) = scope {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", self.token(scope)));
        }
        let body = body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty);

        self.raw(request.body(body).unwrap()).await
    }

    pub async fn raw(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, body)
    }
}

pub fn customer_body(tenant_id: Uuid) -> Value {
    serde_json::json!({
        "tenant_id": tenant_id,
        "name": "Yamada Taro",
        "email": "taro@example.com",
        "phone_number": "090-1234-5678",
        "address": "1-1 Chiyoda, Tokyo"
    })
}

pub fn user_body(store_id: Uuid) -> Value {
    serde_json::json!({
        "name": "Suzuki Hanako",
        "email": "hanako@example.com",
        "employee_number": "E0001",
        "gender": "female",
        "store_id": store_id
    })
}

pub fn stock_body(store_id: Uuid, user_id: Uuid, name: &str) -> Value {
    serde_json::json!({
        "name": name,
        "quantity": 10,
        "price": 500,
        "store_id": store_id,
        "user_id": user_id
    })
}
