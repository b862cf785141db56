use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub id: i64,
    pub customer_id: Uuid,
    pub stock_id: i64,
    pub total_amount: i64,
    pub quantity: i64,
    pub delivery_date: NaiveDate,
    #[sqlx(try_from = "String")]
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub customer_id: Uuid,
    pub stock_id: i64,
    pub total_amount: i64,
    pub quantity: i64,
    pub delivery_date: NaiveDate,
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    /// Exact match against the four literals
    pub fn parse(input: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == input)
    }

    /// Map free text onto the enumeration. Unrecognised input becomes `Pending`.
    pub fn normalize(input: &str) -> Self {
        Self::parse(input).unwrap_or_else(|| {
            tracing::debug!("Unrecognised order status {:?}, defaulting to PENDING", input);
            OrderStatus::Pending
        })
    }
}

impl From<String> for OrderStatus {
    fn from(value: String) -> Self {
        OrderStatus::normalize(&value)
    }
}
