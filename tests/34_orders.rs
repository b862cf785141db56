mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tenant_stock_api::database::models::OrderStatus;
use tenant_stock_api::database::Scope;
use uuid::Uuid;

use common::{customer_body, stock_body, user_body, TestApp};

struct Fixture {
    scope: Scope,
    customer_id: Uuid,
    stock_id: i64,
}

async fn fixture(app: &TestApp) -> Fixture {
    let scope = app.tenant();
    let (_, body) = app.post("/users", &scope, user_body(scope.store_id)).await;
    let user_id = Uuid::parse_str(body["data"].as_str().unwrap()).unwrap();
    let (_, body) = app
        .post("/stocks", &scope, stock_body(scope.store_id, user_id, "Sake"))
        .await;
    let stock_id = body["data"].as_i64().unwrap();
    let (_, body) = app.post("/customers", &scope, customer_body(scope.tenant_id)).await;
    let customer_id = Uuid::parse_str(body["data"].as_str().unwrap()).unwrap();

    Fixture { scope, customer_id, stock_id }
}

fn order_body(fx: &Fixture, days_ahead: i64, status: &str) -> Value {
    let delivery = Utc::now().date_naive() + Duration::days(days_ahead);
    json!({
        "total_amount": 12000,
        "quantity": 2,
        "delivery_date": delivery.format("%Y-%m-%d").to_string(),
        "status": status,
        "stock_id": fx.stock_id,
        "customer_id": fx.customer_id
    })
}

#[tokio::test]
async fn order_is_reached_through_its_customer_tenant() -> Result<()> {
    let app = TestApp::new();
    let fx = fixture(&app).await;
    let other = app.tenant();

    let (status, body) = app.post("/orders", &fx.scope, order_body(&fx, 3, "PENDING")).await;
    assert_eq!(status, StatusCode::CREATED);
    let path = format!("/orders/{}", body["data"].as_i64().unwrap());

    let (status, body) = app.get(&path, &fx.scope).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "PENDING");

    let (status, _) = app.get(&path, &other).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = app.get(&format!("/customers/{}", fx.customer_id), &fx.scope).await;
    assert_eq!(body["data"]["orders"].as_array().unwrap().len(), 1);
    Ok(())
}

#[tokio::test]
async fn delivery_today_is_rejected() -> Result<()> {
    let app = TestApp::new();
    let fx = fixture(&app).await;

    let (status, body) = app.post("/orders", &fx.scope, order_body(&fx, 0, "PENDING")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["field_errors"]["delivery_date"].is_string());
    assert_eq!(app.repository.order_count(), 0);
    Ok(())
}

#[tokio::test]
async fn unknown_status_is_rejected() -> Result<()> {
    let app = TestApp::new();
    let fx = fixture(&app).await;

    let (status, body) = app.post("/orders", &fx.scope, order_body(&fx, 3, "LOST")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["field_errors"]["status"].is_string());
    Ok(())
}

#[tokio::test]
async fn unknown_stock_is_a_bad_reference() -> Result<()> {
    let app = TestApp::new();
    let fx = fixture(&app).await;
    let mut body = order_body(&fx, 3, "PENDING");
    body["stock_id"] = json!(fx.stock_id + 100);

    let (status, _) = app.post("/orders", &fx.scope, body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn status_update_is_applied() -> Result<()> {
    let app = TestApp::new();
    let fx = fixture(&app).await;
    let (_, body) = app.post("/orders", &fx.scope, order_body(&fx, 3, "PENDING")).await;
    let path = format!("/orders/{}", body["data"].as_i64().unwrap());

    let (status, body) = app.put(&path, &fx.scope, json!({ "status": "SHIPPED" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "SHIPPED");
    assert_eq!(body["data"]["quantity"], 2);
    Ok(())
}

#[tokio::test]
async fn bulk_orders_are_all_or_nothing() -> Result<()> {
    let app = TestApp::new();
    let fx = fixture(&app).await;
    let mut orphan = order_body(&fx, 5, "PENDING");
    orphan["customer_id"] = json!(Uuid::new_v4());

    let (status, _) = app
        .post("/orders/bulk", &fx.scope, json!({ "orders": [order_body(&fx, 5, "PENDING"), orphan] }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.repository.order_count(), 0);

    let (status, body) = app
        .post(
            "/orders/bulk",
            &fx.scope,
            json!({ "orders": [order_body(&fx, 5, "PENDING"), order_body(&fx, 6, "CANCELLED")] }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    Ok(())
}

#[tokio::test]
async fn orders_cannot_be_deleted() -> Result<()> {
    let app = TestApp::new();
    let fx = fixture(&app).await;
    let (_, body) = app.post("/orders", &fx.scope, order_body(&fx, 3, "PENDING")).await;
    let path = format!("/orders/{}", body["data"].as_i64().unwrap());

    let (status, _) = app.send(Method::DELETE, &path, Some(&fx.scope), None).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(app.repository.order_count(), 1);
    Ok(())
}

#[tokio::test]
async fn stock_with_orders_cannot_be_deleted() -> Result<()> {
    let app = TestApp::new();
    let seller = fixture(&app).await;

    // A customer of another tenant orders against the seller's stock
    let buyer = app.tenant();
    let (_, body) = app.post("/customers", &buyer, customer_body(buyer.tenant_id)).await;
    let buyer_customer = Uuid::parse_str(body["data"].as_str().unwrap())?;
    let mut order = order_body(&seller, 3, "PENDING");
    order["customer_id"] = json!(buyer_customer);
    let (status, body) = app.post("/orders", &buyer, order).await;
    assert_eq!(status, StatusCode::CREATED);
    let order_id = body["data"].as_i64().unwrap();
    let order_path = format!("/orders/{}", order_id);

    let (status, body) = app
        .delete(&format!("/stocks/{}", seller.stock_id), &seller.scope)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    let (status, body) = app.get(&order_path, &buyer).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["stock_id"], seller.stock_id);
    assert!(app.repository.order(order_id).is_some());

    let (status, _) = app.get(&format!("/stocks/{}", seller.stock_id), &seller.scope).await;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn other_tenant_cannot_update_an_order() -> Result<()> {
    let app = TestApp::new();
    let fx = fixture(&app).await;
    let intruder = app.tenant();
    let (_, body) = app.post("/orders", &fx.scope, order_body(&fx, 3, "PENDING")).await;
    let order_id = body["data"].as_i64().unwrap();

    let (status, _) = app
        .put(&format!("/orders/{}", order_id), &intruder, json!({ "status": "CANCELLED", "quantity": 99 }))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let stored = app.repository.order(order_id).unwrap();
    assert_eq!(stored.status, OrderStatus::Pending);
    assert_eq!(stored.quantity, 2);
    Ok(())
}
