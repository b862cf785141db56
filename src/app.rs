use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE, ORIGIN},
        HeaderValue,
    },
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::{AppConfig, SecurityConfig};
use crate::database::Repository;
use crate::handlers::{protected, public};
use crate::middleware::{request_policy, require_scope, ALLOWED_METHODS};
use crate::services::{CustomerService, OrderService, StockService, UserService};

/// Shared, immutable application state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub repository: Arc<dyn Repository>,
    pub users: Arc<UserService>,
    pub stocks: Arc<StockService>,
    pub customers: Arc<CustomerService>,
    pub orders: Arc<OrderService>,
}

impl AppState {
    pub fn new(config: AppConfig, repository: Arc<dyn Repository>) -> Self {
        Self {
            config: Arc::new(config),
            users: Arc::new(UserService::new(repository.clone())),
            stocks: Arc::new(StockService::new(repository.clone())),
            customers: Arc::new(CustomerService::new(repository.clone())),
            orders: Arc::new(OrderService::new(repository.clone())),
            repository,
        }
    }
}

/// Build the full router: routes nested under the configured prefix, CORS and tracing
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(public_routes())
        .merge(protected_routes(state.clone()));

    let prefix = state.config.server.api_prefix.trim_end_matches('/');
    let router = if prefix.is_empty() {
        api
    } else {
        Router::new().nest(prefix, api)
    };

    router
        .layer(cors_layer(&state.config.security))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(public::health_get))
        .route("/health/ready", get(public::ready_get))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use protected::{customers, orders, stocks, users};

    Router::new()
        // Users
        .route("/users", get(users::users_get).post(users::user_post))
        .route(
            "/users/:id",
            get(users::user_get)
                .put(users::user_put)
                .delete(users::user_delete),
        )
        // Stocks
        .route("/stocks", get(stocks::stocks_get).post(stocks::stock_post))
        .route("/stocks/bulk", post(stocks::stocks_bulk_post))
        .route(
            "/stocks/:id",
            get(stocks::stock_get)
                .put(stocks::stock_put)
                .delete(stocks::stock_delete),
        )
        // Customers
        .route(
            "/customers",
            get(customers::customers_get).post(customers::customer_post),
        )
        .route(
            "/customers/:id",
            get(customers::customer_get)
                .put(customers::customer_put)
                .delete(customers::customer_delete),
        )
        // Orders (no delete)
        .route("/orders", get(orders::orders_get).post(orders::order_post))
        .route("/orders/bulk", post(orders::orders_bulk_post))
        .route("/orders/:id", get(orders::order_get).put(orders::order_put))
        // Claims first, then the outer request policy
        .route_layer(from_fn(require_scope))
        .route_layer(from_fn_with_state(state, request_policy))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(ALLOWED_METHODS.to_vec())
        .allow_headers([ORIGIN, CONTENT_TYPE, CONTENT_LENGTH, AUTHORIZATION])
        .allow_credentials(true)
}
