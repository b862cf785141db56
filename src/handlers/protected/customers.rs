use axum::extract::{Extension, Path, State};
use uuid::Uuid;

use crate::api::{CreateCustomerRequest, ListQuery, UpdateCustomerRequest};
use crate::app::AppState;
use crate::database::{models::Customer, Scope};
use crate::middleware::{ApiResponse, ApiResult};
use crate::validation::{parse_uuid_id, ValidatedJson, ValidatedQuery};

/// GET /customers
pub async fn customers_get(
    State(state): State<AppState>,
    Extension(scope): Extension<Scope>,
    ValidatedQuery(query): ValidatedQuery<ListQuery>,
) -> ApiResult<Vec<Customer>> {
    let customers = state.customers.list(scope, query).await?;
    Ok(ApiResponse::success(customers))
}

/// GET /customers/:id
pub async fn customer_get(
    State(state): State<AppState>,
    Extension(scope): Extension<Scope>,
    Path(id): Path<String>,
) -> ApiResult<Customer> {
    let id = parse_uuid_id(&id)?;
    let customer = state.customers.select_404(scope, id).await?;
    Ok(ApiResponse::success(customer))
}

/// POST /customers
pub async fn customer_post(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateCustomerRequest>,
) -> ApiResult<Uuid> {
    let id = state.customers.create_one(request).await?;
    Ok(ApiResponse::created(id))
}

/// PUT /customers/:id
pub async fn customer_put(
    State(state): State<AppState>,
    Extension(scope): Extension<Scope>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateCustomerRequest>,
) -> ApiResult<Customer> {
    let id = parse_uuid_id(&id)?;
    let customer = state.customers.update_404(scope, id, request).await?;
    Ok(ApiResponse::success(customer))
}

/// DELETE /customers/:id - tombstones the customer
pub async fn customer_delete(
    State(state): State<AppState>,
    Extension(scope): Extension<Scope>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let id = parse_uuid_id(&id)?;
    state.customers.delete_404(scope, id).await?;
    Ok(ApiResponse::no_content())
}
