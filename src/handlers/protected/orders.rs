use axum::extract::{Extension, Path, State};

use crate::api::{CreateBulkOrderRequest, CreateOrderRequest, ListQuery, UpdateOrderRequest};
use crate::app::AppState;
use crate::database::{models::Order, Scope};
use crate::middleware::{ApiResponse, ApiResult};
use crate::validation::{parse_serial_id, ValidatedBulkJson, ValidatedJson, ValidatedQuery};

/// GET /orders - orders placed by customers of the caller's tenant
pub async fn orders_get(
    State(state): State<AppState>,
    Extension(scope): Extension<Scope>,
    ValidatedQuery(query): ValidatedQuery<ListQuery>,
) -> ApiResult<Vec<Order>> {
    let orders = state.orders.list(scope, query).await?;
    Ok(ApiResponse::success(orders))
}

/// GET /orders/:id
pub async fn order_get(
    State(state): State<AppState>,
    Extension(scope): Extension<Scope>,
    Path(id): Path<String>,
) -> ApiResult<Order> {
    let id = parse_serial_id(&id)?;
    let order = state.orders.select_404(scope, id).await?;
    Ok(ApiResponse::success(order))
}

/// POST /orders
pub async fn order_post(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateOrderRequest>,
) -> ApiResult<i64> {
    let id = state.orders.create_one(request).await?;
    Ok(ApiResponse::created(id))
}

/// POST /orders/bulk
pub async fn orders_bulk_post(
    State(state): State<AppState>,
    ValidatedBulkJson(request): ValidatedBulkJson<CreateBulkOrderRequest>,
) -> ApiResult<Vec<i64>> {
    let ids = state.orders.create_many(request.orders).await?;
    Ok(ApiResponse::created(ids))
}

/// PUT /orders/:id
pub async fn order_put(
    State(state): State<AppState>,
    Extension(scope): Extension<Scope>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateOrderRequest>,
) -> ApiResult<Order> {
    let id = parse_serial_id(&id)?;
    let order = state.orders.update_404(scope, id, request).await?;
    Ok(ApiResponse::success(order))
}
