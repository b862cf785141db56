use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::validation::{validate_uuid_v4, BulkPayload};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateStockRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(range(min = 0))]
    pub quantity: i64,
    #[validate(range(min = 0))]
    pub price: i64,
    #[validate(custom = "validate_uuid_v4")]
    pub store_id: Uuid,
    #[validate(custom = "validate_uuid_v4")]
    pub user_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateBulkStockRequest {
    pub stocks: Vec<CreateStockRequest>,
}

impl BulkPayload for CreateBulkStockRequest {
    type Item = CreateStockRequest;
    const FIELD: &'static str = "stocks";

    fn items(&self) -> &[CreateStockRequest] {
        &self.stocks
    }
}

/// Partial update; omitted fields keep their stored values
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateStockRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(range(min = 0))]
    pub quantity: Option<i64>,
    #[validate(range(min = 0))]
    pub price: Option<i64>,
    #[validate(custom = "validate_uuid_v4")]
    pub user_id: Option<Uuid>,
}
