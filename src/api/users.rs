use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::database::models::Gender;
use crate::validation::{double_option, validate_uuid_v4};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 10))]
    pub employee_number: String,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[validate(custom = "validate_uuid_v4")]
    pub store_id: Uuid,
}

/// Partial update. `gender: null` clears the value, an absent key keeps it.
/// The owning store cannot be changed.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 10))]
    pub employee_number: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub gender: Option<Option<Gender>>,
}
