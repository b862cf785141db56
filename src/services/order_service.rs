use std::sync::Arc;

use crate::api::{CreateOrderRequest, ListQuery, UpdateOrderRequest};
use crate::database::models::{NewOrder, Order, OrderStatus};
use crate::database::{DatabaseError, Page, Repository, Scope};

pub struct OrderService {
    repository: Arc<dyn Repository>,
}

impl OrderService {
    pub fn new(repository: Arc<dyn Repository>) -> Self {
        Self { repository }
    }

    pub async fn list(&self, scope: Scope, query: ListQuery) -> Result<Vec<Order>, DatabaseError> {
        let page = Page::resolve(query.limit, query.offset);
        self.repository.list_orders(scope, page).await
    }

    pub async fn select_404(&self, scope: Scope, id: i64) -> Result<Order, DatabaseError> {
        self.repository.get_order(scope, id).await
    }

    pub async fn create_one(&self, request: CreateOrderRequest) -> Result<i64, DatabaseError> {
        self.repository.create_order(new_order(request)).await
    }

    /// Insert all orders atomically. An empty list is a successful no-op.
    pub async fn create_many(&self, requests: Vec<CreateOrderRequest>) -> Result<Vec<i64>, DatabaseError> {
        if requests.is_empty() {
            return Ok(vec![]);
        }
        let orders = requests.into_iter().map(new_order).collect();
        self.repository.create_orders(orders).await
    }

    pub async fn update_404(
        &self,
        scope: Scope,
        id: i64,
        request: UpdateOrderRequest,
    ) -> Result<Order, DatabaseError> {
        let mut order = self.repository.get_order(scope, id).await?;

        if let Some(total_amount) = request.total_amount {
            order.total_amount = total_amount;
        }
        if let Some(quantity) = request.quantity {
            order.quantity = quantity;
        }
        if let Some(delivery_date) = request.delivery_date {
            order.delivery_date = delivery_date;
        }
        if let Some(status) = request.status {
            order.status = OrderStatus::normalize(&status);
        }

        self.repository.update_order(scope, order).await
    }
}

fn new_order(request: CreateOrderRequest) -> NewOrder {
    NewOrder {
        customer_id: request.customer_id,
        stock_id: request.stock_id,
        total_amount: request.total_amount,
        quantity: request.quantity,
        delivery_date: request.delivery_date,
        status: OrderStatus::normalize(&request.status),
    }
}
