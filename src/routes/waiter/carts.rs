use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::router::OpenApiRouter;

use crate::{
    api::MenuApi,
    app_error::{AppError, StdResponse},
    app_state::AppState,
    cart::{OrderCart, QuantityDelta},
    middleware,
    models::{CartLine, Order},
    session::Session,
};

/// Defines the waiter's cart routes (order entry + authorization).
pub fn routes_with_openapi() -> OpenApiRouter<AppState> {
    utoipa_axum::router::OpenApiRouter::new().nest(
        "/waiter/cart",
        OpenApiRouter::new()
            .routes(utoipa_axum::routes!(get_cart, cancel_cart))
            .routes(utoipa_axum::routes!(add_cart_item))
            .routes(utoipa_axum::routes!(change_cart_item, remove_cart_item))
            .routes(utoipa_axum::routes!(submit_cart))
            .route_layer(axum::middleware::from_fn(middleware::waiter_authorization)),
    )
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub total_amount: f64,
}

impl From<&OrderCart> for CartView {
    fn from(cart: &OrderCart) -> Self {
        Self {
            lines: cart.lines().to_vec(),
            total_amount: cart.compute_total(),
        }
    }
}

/// Show the cart of the signed-in waiter.
#[utoipa::path(
    get,
    path = "/",
    tags = ["Waiter"],
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Current cart", body = StdResponse<CartView, String>)
    )
)]
async fn get_cart(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, AppError> {
    let view = {
        let cart = state.carts.cart_for(&session).await?;
        let cart = cart.lock().await;
        CartView::from(&*cart)
    };
    state.carts.release(&session).await;

    Ok(StdResponse {
        data: Some(view),
        message: Some("Get cart successfully"),
    })
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct AddCartItemReq {
    item_id: String,
    #[serde(default = "default_quantity")]
    quantity: i64,
}

fn default_quantity() -> i64 {
    1
}

/// Add a dish from the current menu to the cart.
#[utoipa::path(
    post,
    path = "/items",
    tags = ["Waiter"],
    security(("bearerAuth" = [])),
    request_body = AddCartItemReq,
    responses(
        (status = 200, description = "Item added", body = StdResponse<CartView, String>)
    )
)]
async fn add_cart_item(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(body): Json<AddCartItemReq>,
) -> Result<impl IntoResponse, AppError> {
    let quantity = u32::try_from(body.quantity)
        .ok()
        .filter(|quantity| *quantity >= 1)
        .ok_or_else(|| AppError::Validation("Quantity must be at least 1".into()))?;

    let menu = state.backend.list_menu_items(&session).await?;
    let item = menu
        .iter()
        .find(|item| item.id == body.item_id)
        .ok_or_else(|| AppError::NotFound(format!("Menu item {}", body.item_id)))?;

    let cart = state.carts.cart_for(&session).await?;
    let mut cart = cart.lock().await;
    cart.add_item(item, quantity);

    Ok(StdResponse {
        data: Some(CartView::from(&*cart)),
        message: Some("Item added successfully"),
    })
}

#[derive(Deserialize, ToSchema)]
struct ChangeCartItemReq {
    delta: QuantityDelta,
}

/// Step a cart line up or down by one.
#[utoipa::path(
    patch,
    path = "/items/{item_id}",
    tags = ["Waiter"],
    security(("bearerAuth" = [])),
    params(
        ("item_id" = String, Path, description = "Menu item ID of the cart line")
    ),
    request_body = ChangeCartItemReq,
    responses(
        (status = 200, description = "Quantity changed", body = StdResponse<CartView, String>)
    )
)]
async fn change_cart_item(
    Path(item_id): Path<String>,
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(body): Json<ChangeCartItemReq>,
) -> Result<impl IntoResponse, AppError> {
    let view = {
        let cart = state.carts.cart_for(&session).await?;
        let mut cart = cart.lock().await;
        cart.change_quantity(&item_id, body.delta);
        CartView::from(&*cart)
    };
    state.carts.release(&session).await;

    Ok(StdResponse {
        data: Some(view),
        message: Some("Quantity changed successfully"),
    })
}

/// Drop a line from the cart.
#[utoipa::path(
    delete,
    path = "/items/{item_id}",
    tags = ["Waiter"],
    security(("bearerAuth" = [])),
    params(
        ("item_id" = String, Path, description = "Menu item ID of the cart line")
    ),
    responses(
        (status = 200, description = "Line removed", body = StdResponse<CartView, String>)
    )
)]
async fn remove_cart_item(
    Path(item_id): Path<String>,
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, AppError> {
    let view = {
        let cart = state.carts.cart_for(&session).await?;
        let mut cart = cart.lock().await;
        cart.remove_item(&item_id);
        CartView::from(&*cart)
    };
    state.carts.release(&session).await;

    Ok(StdResponse {
        data: Some(view),
        message: Some("Item removed successfully"),
    })
}

/// Throw away the whole cart.
#[utoipa::path(
    delete,
    path = "/",
    tags = ["Waiter"],
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Cart cleared", body = StdResponse<CartView, String>)
    )
)]
async fn cancel_cart(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, AppError> {
    let view = {
        let cart = state.carts.cart_for(&session).await?;
        let mut cart = cart.lock().await;
        cart.cancel();
        CartView::from(&*cart)
    };
    state.carts.release(&session).await;

    Ok(StdResponse {
        data: Some(view),
        message: Some("Cart cleared successfully"),
    })
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct SubmitCartReq {
    #[serde(default)]
    table_id: String,
}

/// Place the cart as an order for a table.
#[utoipa::path(
    post,
    path = "/submit",
    tags = ["Waiter"],
    security(("bearerAuth" = [])),
    request_body = SubmitCartReq,
    responses(
        (status = 200, description = "Order placed", body = StdResponse<Order, String>)
    )
)]
async fn submit_cart(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(body): Json<SubmitCartReq>,
) -> Result<impl IntoResponse, AppError> {
    let submitted = {
        let cart = state.carts.cart_for(&session).await?;
        let mut cart = cart.lock().await;
        cart.submit(state.backend.as_ref(), &session, &body.table_id).await
    };
    state.carts.release(&session).await;
    let order = submitted?;

    Ok(StdResponse {
        data: Some(order),
        message: Some("Create order successfully"),
    })
}
