use std::sync::Arc;

use crate::api::{CreateStockRequest, ListQuery, UpdateStockRequest};
use crate::database::models::{NewStock, Stock};
use crate::database::{DatabaseError, Page, Repository, Scope};

pub struct StockService {
    repository: Arc<dyn Repository>,
}

impl StockService {
    pub fn new(repository: Arc<dyn Repository>) -> Self {
        Self { repository }
    }

    pub async fn list(&self, scope: Scope, query: ListQuery) -> Result<Vec<Stock>, DatabaseError> {
        let page = Page::resolve(query.limit, query.offset);
        self.repository.list_stocks(scope, page).await
    }

    pub async fn select_404(&self, scope: Scope, id: i64) -> Result<Stock, DatabaseError> {
        self.repository.get_stock(scope, id).await
    }

    pub async fn create_one(&self, request: CreateStockRequest) -> Result<i64, DatabaseError> {
        self.repository.create_stock(new_stock(request)).await
    }

    /// Insert all stocks atomically. An empty list is a successful no-op.
    pub async fn create_many(&self, requests: Vec<CreateStockRequest>) -> Result<Vec<i64>, DatabaseError> {
        if requests.is_empty() {
            return Ok(vec![]);
        }
        let stocks = requests.into_iter().map(new_stock).collect();
        self.repository.create_stocks(stocks).await
    }

    pub async fn update_404(
        &self,
        scope: Scope,
        id: i64,
        request: UpdateStockRequest,
    ) -> Result<Stock, DatabaseError> {
        let mut stock = self.repository.get_stock(scope, id).await?;

        if let Some(name) = request.name {
            stock.name = name;
        }
        if let Some(quantity) = request.quantity {
            stock.quantity = quantity;
        }
        if let Some(price) = request.price {
            stock.price = price;
        }
        if let Some(user_id) = request.user_id {
            stock.user_id = user_id;
        }

        self.repository.update_stock(scope, stock).await
    }

    pub async fn delete_404(&self, scope: Scope, id: i64) -> Result<(), DatabaseError> {
        self.repository.delete_stock(scope, id).await
    }
}

fn new_stock(request: CreateStockRequest) -> NewStock {
    NewStock {
        store_id: request.store_id,
        user_id: request.user_id,
        name: request.name,
        quantity: request.quantity,
        price: request.price,
    }
}
