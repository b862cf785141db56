use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::validation::{validate_jp_phone_number, validate_uuid_v4};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCustomerRequest {
    #[validate(custom = "validate_uuid_v4")]
    pub tenant_id: Uuid,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[serde(alias = "phone")]
    #[validate(custom = "validate_jp_phone_number")]
    pub phone_number: String,
    #[validate(length(min = 1, max = 255))]
    pub address: String,
}

/// Partial update; the owning tenant always comes from the caller's claims
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCustomerRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[serde(default, alias = "phone")]
    #[validate(custom = "validate_jp_phone_number")]
    pub phone_number: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub address: Option<String>,
}
