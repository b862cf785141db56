use axum::extract::{Extension, Path, State};
use uuid::Uuid;

use crate::api::{CreateUserRequest, ListQuery, UpdateUserRequest};
use crate::app::AppState;
use crate::database::{models::User, Scope};
use crate::middleware::{ApiResponse, ApiResult};
use crate::validation::{parse_uuid_id, ValidatedJson, ValidatedQuery};

/// GET /users - users of every store in the caller's tenant
pub async fn users_get(
    State(state): State<AppState>,
    Extension(scope): Extension<Scope>,
    ValidatedQuery(query): ValidatedQuery<ListQuery>,
) -> ApiResult<Vec<User>> {
    let users = state.users.list(scope, query).await?;
    Ok(ApiResponse::success(users))
}

/// GET /users/:id
pub async fn user_get(
    State(state): State<AppState>,
    Extension(scope): Extension<Scope>,
    Path(id): Path<String>,
) -> ApiResult<User> {
    let id = parse_uuid_id(&id)?;
    let user = state.users.select_404(scope, id).await?;
    Ok(ApiResponse::success(user))
}

/// POST /users
pub async fn user_post(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> ApiResult<Uuid> {
    let id = state.users.create_one(request).await?;
    Ok(ApiResponse::created(id))
}

/// PUT /users/:id
pub async fn user_put(
    State(state): State<AppState>,
    Extension(scope): Extension<Scope>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<User> {
    let id = parse_uuid_id(&id)?;
    let user = state.users.update_404(scope, id, request).await?;
    Ok(ApiResponse::success(user))
}

/// DELETE /users/:id - tombstones the user
pub async fn user_delete(
    State(state): State<AppState>,
    Extension(scope): Extension<Scope>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let id = parse_uuid_id(&id)?;
    state.users.delete_404(scope, id).await?;
    Ok(ApiResponse::no_content())
}
