use async_trait::async_trait;
use sqlx::{postgres::PgRow, FromRow, PgPool, Postgres};
use std::collections::HashMap;
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{
    Customer, NewCustomer, NewOrder, NewStock, NewUser, Order, Stock, User,
};
use crate::database::query_builder::{
    bind_param_query, bind_param_query_as, EntityTable, ScopedQuery, SqlParam, CUSTOMERS,
    ORDERS, STOCKS, USERS,
};
use crate::database::repository::Repository;
use crate::database::scope::{Page, Scope};

/// Rows per INSERT statement in bulk creates
const BULK_CHUNK_SIZE: usize = 1000;

/// PostgreSQL-backed repository sharing a single connection pool
#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn select_page<T>(
        &self,
        table: &EntityTable,
        scope: Scope,
        page: Page,
    ) -> Result<Vec<T>, DatabaseError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let sql = ScopedQuery::new(table, &scope).select_page(page);
        let mut query = sqlx::query_as::<_, T>(&sql.query);
        for param in sql.params {
            query = bind_param_query_as(query, param);
        }
        query.fetch_all(&self.pool).await.map_err(DatabaseError::from_sqlx)
    }

    async fn select_404<T>(
        &self,
        table: &EntityTable,
        scope: Scope,
        id: SqlParam,
        label: &str,
    ) -> Result<T, DatabaseError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let sql = ScopedQuery::new(table, &scope).select_by_id(id);
        let mut query = sqlx::query_as::<_, T>(&sql.query);
        for param in sql.params {
            query = bind_param_query_as(query, param);
        }
        query
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from_sqlx)?
            .ok_or_else(|| DatabaseError::NotFound(format!("{} not found", label)))
    }

    async fn update_404<T>(
        &self,
        table: &EntityTable,
        scope: Scope,
        id: SqlParam,
        changes: Vec<(&'static str, SqlParam)>,
        label: &str,
    ) -> Result<T, DatabaseError>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let sql = ScopedQuery::new(table, &scope).update_by_id(id, changes);
        let mut query = sqlx::query_as::<_, T>(&sql.query);
        for param in sql.params {
            query = bind_param_query_as(query, param);
        }
        query
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from_sqlx)?
            .ok_or_else(|| DatabaseError::NotFound(format!("{} not found", label)))
    }

    async fn delete_404(
        &self,
        table: &EntityTable,
        scope: Scope,
        id: SqlParam,
        label: &str,
    ) -> Result<(), DatabaseError> {
        let sql = ScopedQuery::new(table, &scope).delete_by_id(id);
        let mut query = sqlx::query(&sql.query);
        for param in sql.params {
            query = bind_param_query(query, param);
        }
        // Physical deletes are refused while other rows still point at the target
        let result = query.execute(&self.pool).await.map_err(|e| match DatabaseError::from_sqlx(e) {
            DatabaseError::InvalidReference(_) => {
                DatabaseError::StillReferenced(format!("{} is still referenced", label))
            }
            other => other,
        })?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("{} not found", label)));
        }
        Ok(())
    }

    /// Attach the stocks each user registered
    async fn attach_stocks(&self, users: &mut [User]) -> Result<(), DatabaseError> {
        if users.is_empty() {
            return Ok(());
        }
        let ids: Vec<Uuid> = users.iter().map(|u| u.id).collect();
        let stocks: Vec<Stock> =
            sqlx::query_as(r#"SELECT * FROM "stocks" WHERE "user_id" = ANY($1) ORDER BY "id""#)
                .bind(ids)
                .fetch_all(&self.pool)
                .await
                .map_err(DatabaseError::from_sqlx)?;

        let mut by_user: HashMap<Uuid, Vec<Stock>> = HashMap::new();
        for stock in stocks {
            by_user.entry(stock.user_id).or_default().push(stock);
        }
        for user in users.iter_mut() {
            user.stocks = by_user.remove(&user.id).unwrap_or_default();
        }
        Ok(())
    }

    /// Attach the orders each customer placed
    async fn attach_orders(&self, customers: &mut [Customer]) -> Result<(), DatabaseError> {
        if customers.is_empty() {
            return Ok(());
        }
        let ids: Vec<Uuid> = customers.iter().map(|c| c.id).collect();
        let orders: Vec<Order> =
            sqlx::query_as(r#"SELECT * FROM "orders" WHERE "customer_id" = ANY($1) ORDER BY "id""#)
                .bind(ids)
                .fetch_all(&self.pool)
                .await
                .map_err(DatabaseError::from_sqlx)?;

        let mut by_customer: HashMap<Uuid, Vec<Order>> = HashMap::new();
        for order in orders {
            by_customer.entry(order.customer_id).or_default().push(order);
        }
        for customer in customers.iter_mut() {
            customer.orders = by_customer.remove(&customer.id).unwrap_or_default();
        }
        Ok(())
    }
}

#[async_trait]
impl Repository for PgRepository {
    async fn list_users(&self, scope: Scope, page: Page) -> Result<Vec<User>, DatabaseError> {
        let mut users: Vec<User> = self.select_page(&USERS, scope, page).await?;
        self.attach_stocks(&mut users).await?;
        Ok(users)
    }

    async fn get_user(&self, scope: Scope, id: Uuid) -> Result<User, DatabaseError> {
        let mut user: User = self.select_404(&USERS, scope, SqlParam::Uuid(id), "User").await?;
        self.attach_stocks(std::slice::from_mut(&mut user)).await?;
        Ok(user)
    }

    async fn create_user(&self, user: NewUser) -> Result<Uuid, DatabaseError> {
        sqlx::query_scalar::<_, Uuid>(
            r#"INSERT INTO "users" ("id", "store_id", "name", "email", "employee_number", "gender")
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING "id""#,
        )
        .bind(user.id)
        .bind(user.store_id)
        .bind(user.name)
        .bind(user.email)
        .bind(user.employee_number)
        .bind(user.gender.map(|g| g.as_str()))
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_sqlx)
    }

    async fn update_user(&self, scope: Scope, user: User) -> Result<User, DatabaseError> {
        let changes = vec![
            ("name", SqlParam::Text(user.name)),
            ("email", SqlParam::Text(user.email)),
            ("employee_number", SqlParam::Text(user.employee_number)),
            ("gender", SqlParam::OptText(user.gender)),
        ];
        let mut updated: User = self
            .update_404(&USERS, scope, SqlParam::Uuid(user.id), changes, "User")
            .await?;
        self.attach_stocks(std::slice::from_mut(&mut updated)).await?;
        Ok(updated)
    }

    async fn delete_user(&self, scope: Scope, id: Uuid) -> Result<(), DatabaseError> {
        self.delete_404(&USERS, scope, SqlParam::Uuid(id), "User").await
    }

    async fn list_stocks(&self, scope: Scope, page: Page) -> Result<Vec<Stock>, DatabaseError> {
        self.select_page(&STOCKS, scope, page).await
    }

    async fn get_stock(&self, scope: Scope, id: i64) -> Result<Stock, DatabaseError> {
        self.select_404(&STOCKS, scope, SqlParam::Int(id), "Stock").await
    }

    async fn create_stock(&self, stock: NewStock) -> Result<i64, DatabaseError> {
        sqlx::query_scalar::<_, i64>(
            r#"INSERT INTO "stocks" ("store_id", "user_id", "name", "quantity", "price")
               VALUES ($1, $2, $3, $4, $5)
               RETURNING "id""#,
        )
        .bind(stock.store_id)
        .bind(stock.user_id)
        .bind(stock.name)
        .bind(stock.quantity)
        .bind(stock.price)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_sqlx)
    }

    async fn create_stocks(&self, stocks: Vec<NewStock>) -> Result<Vec<i64>, DatabaseError> {
        if stocks.is_empty() {
            return Ok(vec![]);
        }

        let mut tx = self.pool.begin().await?;
        let mut ids = Vec::with_capacity(stocks.len());

        for chunk in stocks.chunks(BULK_CHUNK_SIZE) {
            let mut builder = sqlx::QueryBuilder::<Postgres>::new(
                r#"INSERT INTO "stocks" ("store_id", "user_id", "name", "quantity", "price") "#,
            );
            builder.push_values(chunk, |mut row, stock| {
                row.push_bind(stock.store_id)
                    .push_bind(stock.user_id)
                    .push_bind(stock.name.clone())
                    .push_bind(stock.quantity)
                    .push_bind(stock.price);
            });
            builder.push(r#" RETURNING "id""#);

            let chunk_ids: Vec<i64> = builder
                .build_query_scalar()
                .fetch_all(&mut *tx)
                .await
                .map_err(DatabaseError::from_sqlx)?;
            ids.extend(chunk_ids);
        }

        tx.commit().await?;
        tracing::debug!("Inserted {} stocks", ids.len());
        Ok(ids)
    }

    async fn update_stock(&self, scope: Scope, stock: Stock) -> Result<Stock, DatabaseError> {
        let changes = vec![
            ("name", SqlParam::Text(stock.name)),
            ("quantity", SqlParam::Int(stock.quantity)),
            ("price", SqlParam::Int(stock.price)),
            ("user_id", SqlParam::Uuid(stock.user_id)),
        ];
        self.update_404(&STOCKS, scope, SqlParam::Int(stock.id), changes, "Stock")
            .await
    }

    async fn delete_stock(&self, scope: Scope, id: i64) -> Result<(), DatabaseError> {
        self.delete_404(&STOCKS, scope, SqlParam::Int(id), "Stock").await
    }

    async fn list_customers(&self, scope: Scope, page: Page) -> Result<Vec<Customer>, DatabaseError> {
        let mut customers: Vec<Customer> = self.select_page(&CUSTOMERS, scope, page).await?;
        self.attach_orders(&mut customers).await?;
        Ok(customers)
    }

    async fn get_customer(&self, scope: Scope, id: Uuid) -> Result<Customer, DatabaseError> {
        let mut customer: Customer = self
            .select_404(&CUSTOMERS, scope, SqlParam::Uuid(id), "Customer")
            .await?;
        self.attach_orders(std::slice::from_mut(&mut customer)).await?;
        Ok(customer)
    }

    async fn create_customer(&self, customer: NewCustomer) -> Result<Uuid, DatabaseError> {
        sqlx::query_scalar::<_, Uuid>(
            r#"INSERT INTO "customers" ("id", "tenant_id", "name", "email", "phone_number", "address")
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING "id""#,
        )
        .bind(customer.id)
        .bind(customer.tenant_id)
        .bind(customer.name)
        .bind(customer.email)
        .bind(customer.phone_number)
        .bind(customer.address)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_sqlx)
    }

    async fn update_customer(&self, scope: Scope, customer: Customer) -> Result<Customer, DatabaseError> {
        let changes = vec![
            ("name", SqlParam::Text(customer.name)),
            ("email", SqlParam::Text(customer.email)),
            ("phone_number", SqlParam::Text(customer.phone_number)),
            ("address", SqlParam::Text(customer.address)),
        ];
        let mut updated: Customer = self
            .update_404(&CUSTOMERS, scope, SqlParam::Uuid(customer.id), changes, "Customer")
            .await?;
        self.attach_orders(std::slice::from_mut(&mut updated)).await?;
        Ok(updated)
    }

    async fn delete_customer(&self, scope: Scope, id: Uuid) -> Result<(), DatabaseError> {
        self.delete_404(&CUSTOMERS, scope, SqlParam::Uuid(id), "Customer").await
    }

    async fn list_orders(&self, scope: Scope, page: Page) -> Result<Vec<Order>, DatabaseError> {
        self.select_page(&ORDERS, scope, page).await
    }

    async fn get_order(&self, scope: Scope, id: i64) -> Result<Order, DatabaseError> {
        self.select_404(&ORDERS, scope, SqlParam::Int(id), "Order").await
    }

    async fn create_order(&self, order: NewOrder) -> Result<i64, DatabaseError> {
        sqlx::query_scalar::<_, i64>(
            r#"INSERT INTO "orders" ("customer_id", "stock_id", "total_amount", "quantity", "delivery_date", "status")
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING "id""#,
        )
        .bind(order.customer_id)
        .bind(order.stock_id)
        .bind(order.total_amount)
        .bind(order.quantity)
        .bind(order.delivery_date)
        .bind(order.status.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_sqlx)
    }

    async fn create_orders(&self, orders: Vec<NewOrder>) -> Result<Vec<i64>, DatabaseError> {
        if orders.is_empty() {
            return Ok(vec![]);
        }

        let mut tx = self.pool.begin().await?;
        let mut ids = Vec::with_capacity(orders.len());

        for chunk in orders.chunks(BULK_CHUNK_SIZE) {
            let mut builder = sqlx::QueryBuilder::<Postgres>::new(
                r#"INSERT INTO "orders" ("customer_id", "stock_id", "total_amount", "quantity", "delivery_date", "status") "#,
            );
            builder.push_values(chunk, |mut row, order| {
                row.push_bind(order.customer_id)
                    .push_bind(order.stock_id)
                    .push_bind(order.total_amount)
                    .push_bind(order.quantity)
                    .push_bind(order.delivery_date)
                    .push_bind(order.status.as_str());
            });
            builder.push(r#" RETURNING "id""#);

            let chunk_ids: Vec<i64> = builder
                .build_query_scalar()
                .fetch_all(&mut *tx)
                .await
                .map_err(DatabaseError::from_sqlx)?;
            ids.extend(chunk_ids);
        }

        tx.commit().await?;
        tracing::debug!("Inserted {} orders", ids.len());
        Ok(ids)
    }

    async fn update_order(&self, scope: Scope, order: Order) -> Result<Order, DatabaseError> {
        let changes = vec![
            ("total_amount", SqlParam::Int(order.total_amount)),
            ("quantity", SqlParam::Int(order.quantity)),
            ("delivery_date", SqlParam::Date(order.delivery_date)),
            ("status", SqlParam::Text(order.status.as_str().to_string())),
        ];
        self.update_404(&ORDERS, scope, SqlParam::Int(order.id), changes, "Order")
            .await
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}
