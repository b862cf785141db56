use axum::extract::{Extension, Path, State};

use crate::api::{CreateBulkStockRequest, CreateStockRequest, ListQuery, UpdateStockRequest};
use crate::app::AppState;
use crate::database::{models::Stock, Scope};
use crate::middleware::{ApiResponse, ApiResult};
use crate::validation::{parse_serial_id, ValidatedBulkJson, ValidatedJson, ValidatedQuery};

/// GET /stocks - stocks of the caller's store
pub async fn stocks_get(
    State(state): State<AppState>,
    Extension(scope): Extension<Scope>,
    ValidatedQuery(query): ValidatedQuery<ListQuery>,
) -> ApiResult<Vec<Stock>> {
    let stocks = state.stocks.list(scope, query).await?;
    Ok(ApiResponse::success(stocks))
}

/// GET /stocks/:id
pub async fn stock_get(
    State(state): State<AppState>,
    Extension(scope): Extension<Scope>,
    Path(id): Path<String>,
) -> ApiResult<Stock> {
    let id = parse_serial_id(&id)?;
    let stock = state.stocks.select_404(scope, id).await?;
    Ok(ApiResponse::success(stock))
}

/// POST /stocks
pub async fn stock_post(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateStockRequest>,
) -> ApiResult<i64> {
    let id = state.stocks.create_one(request).await?;
    Ok(ApiResponse::created(id))
}

/// POST /stocks/bulk
pub async fn stocks_bulk_post(
    State(state): State<AppState>,
    ValidatedBulkJson(request): ValidatedBulkJson<CreateBulkStockRequest>,
) -> ApiResult<Vec<i64>> {
    let ids = state.stocks.create_many(request.stocks).await?;
    Ok(ApiResponse::created(ids))
}

/// PUT /stocks/:id
pub async fn stock_put(
    State(state): State<AppState>,
    Extension(scope): Extension<Scope>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateStockRequest>,
) -> ApiResult<Stock> {
    let id = parse_serial_id(&id)?;
    let stock = state.stocks.update_404(scope, id, request).await?;
    Ok(ApiResponse::success(stock))
}

/// DELETE /stocks/:id - stocks have no tombstone, the row is removed
pub async fn stock_delete(
    State(state): State<AppState>,
    Extension(scope): Extension<Scope>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let id = parse_serial_id(&id)?;
    state.stocks.delete_404(scope, id).await?;
    Ok(ApiResponse::no_content())
}
