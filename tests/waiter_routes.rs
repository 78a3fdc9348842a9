mod common;

use axum::http::StatusCode;
use common::{FakeBackend, app, call};
use restaurant_orderservice::{app_state::AppState, routes};
use serde_json::json;

#[tokio::test]
async fn adding_the_same_dish_twice_merges_into_one_line() {
    let backend = FakeBackend::seeded();
    let app = app(backend);

    call(&app, Some("waiter"), "w1", "POST", "/waiter/cart/items", Some(json!({"itemId": "1", "quantity": 2}))).await;
    let (status, body) = call(
        &app,
        Some("waiter"),
        "w1",
        "POST",
        "/waiter/cart/items",
        Some(json!({"itemId": "1", "quantity": 3})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let lines = body["data"]["lines"].as_array().unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["quantity"], 5);
    assert_eq!(lines[0]["name"], "Paneer Pakoda");
    assert_eq!(body["data"]["totalAmount"], 600.0);
}

#[tokio::test]
async fn quantity_defaults_to_one_and_zero_is_rejected() {
    let app = app(FakeBackend::seeded());

    let (status, body) =
        call(&app, Some("waiter"), "w1", "POST", "/waiter/cart/items", Some(json!({"itemId": "2"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["lines"][0]["quantity"], 1);

    let (status, body) = call(
        &app,
        Some("waiter"),
        "w1",
        "POST",
        "/waiter/cart/items",
        Some(json!({"itemId": "2", "quantity": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Quantity must be at least 1");
}

#[tokio::test]
async fn unknown_dish_is_not_found() {
    let app = app(FakeBackend::seeded());

    let (status, body) =
        call(&app, Some("waiter"), "w1", "POST", "/waiter/cart/items", Some(json!({"itemId": "404"}))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Menu item 404 not found");
}

#[tokio::test]
async fn stepping_down_the_last_unit_drops_the_line() {
    let app = app(FakeBackend::seeded());
    call(&app, Some("waiter"), "w1", "POST", "/waiter/cart/items", Some(json!({"itemId": "1"}))).await;
    call(&app, Some("waiter"), "w1", "POST", "/waiter/cart/items", Some(json!({"itemId": "9", "quantity": 2}))).await;

    let (_, body) =
        call(&app, Some("waiter"), "w1", "PATCH", "/waiter/cart/items/9", Some(json!({"delta": "dec"}))).await;
    assert_eq!(body["data"]["lines"][1]["quantity"], 1);

    let (_, body) =
        call(&app, Some("waiter"), "w1", "PATCH", "/waiter/cart/items/1", Some(json!({"delta": "dec"}))).await;
    let lines = body["data"]["lines"].as_array().unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["itemId"], "9");

    // a dish that is not in the cart is left alone
    let (status, body) =
        call(&app, Some("waiter"), "w1", "PATCH", "/waiter/cart/items/2", Some(json!({"delta": "inc"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["lines"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["totalAmount"], 140.0);
}

#[tokio::test]
async fn remove_and_cancel_empty_the_cart() {
    let app = app(FakeBackend::seeded());
    call(&app, Some("waiter"), "w1", "POST", "/waiter/cart/items", Some(json!({"itemId": "1"}))).await;
    call(&app, Some("waiter"), "w1", "POST", "/waiter/cart/items", Some(json!({"itemId": "2"}))).await;

    let (_, body) = call(&app, Some("waiter"), "w1", "DELETE", "/waiter/cart/items/1", None).await;
    assert_eq!(body["data"]["lines"].as_array().unwrap().len(), 1);

    let (status, body) = call(&app, Some("waiter"), "w1", "DELETE", "/waiter/cart", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["lines"].as_array().unwrap().is_empty());
    assert_eq!(body["data"]["totalAmount"], 0.0);
}

#[tokio::test]
async fn submit_sends_the_cart_and_clears_it() {
    let backend = FakeBackend::seeded();
    let app = app(backend.clone());
    call(&app, Some("waiter"), "w1", "POST", "/waiter/cart/items", Some(json!({"itemId": "1", "quantity": 2}))).await;

    let (status, body) = call(
        &app,
        Some("waiter"),
        "w1",
        "POST",
        "/waiter/cart/submit",
        Some(json!({"tableId": "Table 1"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "NEW");
    assert_eq!(body["data"]["tableId"], "Table 1");
    assert_eq!(body["data"]["totalAmount"], 240.0);

    let submitted = backend.submitted.lock().unwrap().clone();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].total_amount, 240.0);
    assert_eq!(submitted[0].lines[0].quantity, 2);
    assert!(
        backend
            .tokens
            .lock()
            .unwrap()
            .iter()
            .all(|token| token.as_deref() == Some("w1"))
    );

    let (_, body) = call(&app, Some("waiter"), "w1", "GET", "/waiter/cart", None).await;
    assert!(body["data"]["lines"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn submit_without_table_or_lines_never_reaches_the_backend() {
    let backend = FakeBackend::seeded();
    let app = app(backend.clone());

    let (status, body) =
        call(&app, Some("waiter"), "w1", "POST", "/waiter/cart/submit", Some(json!({"tableId": "Table 1"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Please add at least one item");

    call(&app, Some("waiter"), "w1", "POST", "/waiter/cart/items", Some(json!({"itemId": "1"}))).await;
    let (status, body) = call(&app, Some("waiter"), "w1", "POST", "/waiter/cart/submit", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Please select a table before placing the order");

    assert!(backend.submitted.lock().unwrap().is_empty());
}

#[tokio::test]
async fn rejected_submit_keeps_the_cart_intact() {
    let backend = FakeBackend::seeded();
    *backend.reject_orders.lock().unwrap() = Some("Kitchen closed".into());
    let app = app(backend.clone());
    call(&app, Some("waiter"), "w1", "POST", "/waiter/cart/items", Some(json!({"itemId": "2", "quantity": 3}))).await;

    let (status, body) =
        call(&app, Some("waiter"), "w1", "POST", "/waiter/cart/submit", Some(json!({"tableId": "Table 2"}))).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["message"], "Order submission failed: Kitchen closed");

    let (_, body) = call(&app, Some("waiter"), "w1", "GET", "/waiter/cart", None).await;
    assert_eq!(body["data"]["lines"][0]["quantity"], 3);
    assert_eq!(body["data"]["totalAmount"], 450.0);
}

#[tokio::test]
async fn every_waiter_gets_a_separate_cart() {
    let app = app(FakeBackend::seeded());
    call(&app, Some("waiter"), "w1", "POST", "/waiter/cart/items", Some(json!({"itemId": "1"}))).await;

    let (_, body) = call(&app, Some("waiter"), "w2", "GET", "/waiter/cart", None).await;
    assert!(body["data"]["lines"].as_array().unwrap().is_empty());

    let (_, body) = call(&app, Some("waiter"), "w1", "GET", "/waiter/cart", None).await;
    assert_eq!(body["data"]["lines"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn cart_routes_are_gated_by_role() {
    let app = app(FakeBackend::seeded());

    let (status, _) = call(&app, Some("chef"), "c1", "GET", "/waiter/cart", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = call(&app, None, "anon", "GET", "/waiter/cart", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = call(&app, Some("janitor"), "j1", "GET", "/waiter/cart", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = call(&app, Some("admin"), "a1", "GET", "/waiter/cart", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn carts_are_forgotten_once_submitted_or_cancelled() {
    let state = AppState::new(FakeBackend::seeded());
    let carts = state.carts.clone();
    let app = routes::app(state);

    call(&app, Some("waiter"), "w1", "POST", "/waiter/cart/items", Some(json!({"itemId": "1"}))).await;
    call(&app, Some("waiter"), "w2", "POST", "/waiter/cart/items", Some(json!({"itemId": "2"}))).await;
    call(&app, Some("waiter"), "w3", "GET", "/waiter/cart", None).await;
    assert_eq!(carts.len().await, 2);

    let (status, _) =
        call(&app, Some("waiter"), "w1", "POST", "/waiter/cart/submit", Some(json!({"tableId": "Table 1"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(carts.len().await, 1);

    call(&app, Some("waiter"), "w2", "DELETE", "/waiter/cart", None).await;
    assert!(carts.is_empty().await);
}

#[tokio::test]
async fn rejected_submit_keeps_the_cart_registered() {
    let backend = FakeBackend::seeded();
    *backend.reject_orders.lock().unwrap() = Some("Kitchen closed".into());
    let state = AppState::new(backend);
    let carts = state.carts.clone();
    let app = routes::app(state);

    call(&app, Some("waiter"), "w1", "POST", "/waiter/cart/items", Some(json!({"itemId": "1"}))).await;
    call(&app, Some("waiter"), "w1", "POST", "/waiter/cart/submit", Some(json!({"tableId": "Table 1"}))).await;

    assert_eq!(carts.len().await, 1);
}

#[tokio::test]
async fn cart_needs_a_bearer_token() {
    let app = app(FakeBackend::seeded());

    let (status, body) =
        call(&app, Some("waiter"), "", "POST", "/waiter/cart/items", Some(json!({"itemId": "1"}))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Missing or invalid session");
}
