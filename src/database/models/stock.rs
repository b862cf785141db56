use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Stock item held by a store. Has no tombstone column: deletes are physical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Stock {
    pub id: i64,
    pub store_id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub quantity: i64,
    pub price: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewStock {
    pub store_id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub quantity: i64,
    pub price: i64,
}
