use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::validation::{validate_future_date, validate_order_status, validate_uuid_v4, BulkPayload};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateOrderRequest {
    #[validate(range(min = 0))]
    pub total_amount: i64,
    #[validate(range(min = 0))]
    pub quantity: i64,
    /// `YYYY-MM-DD`, strictly after today
    #[validate(custom = "validate_future_date")]
    pub delivery_date: NaiveDate,
    #[validate(custom = "validate_order_status")]
    pub status: String,
    #[validate(range(min = 1))]
    pub stock_id: i64,
    #[validate(custom = "validate_uuid_v4")]
    pub customer_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateBulkOrderRequest {
    pub orders: Vec<CreateOrderRequest>,
}

impl BulkPayload for CreateBulkOrderRequest {
    type Item = CreateOrderRequest;
    const FIELD: &'static str = "orders";

    fn items(&self) -> &[CreateOrderRequest] {
        &self.orders
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateOrderRequest {
    #[validate(range(min = 0))]
    pub total_amount: Option<i64>,
    #[validate(range(min = 0))]
    pub quantity: Option<i64>,
    #[validate(custom = "validate_future_date")]
    pub delivery_date: Option<NaiveDate>,
    #[validate(custom = "validate_order_status")]
    pub status: Option<String>,
}
