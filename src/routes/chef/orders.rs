use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::ToSchema;
use utoipa_axum::router::OpenApiRouter;

use crate::{
    app_error::{AppError, StdResponse},
    app_state::AppState,
    kitchen::{KitchenBoard, KitchenTicket, normalize_status},
    middleware,
    session::Session,
};

/// Defines the chef board routes (kitchen orders + authorization).
pub fn routes_with_openapi() -> OpenApiRouter<AppState> {
    utoipa_axum::router::OpenApiRouter::new().nest(
        "/chef/orders",
        OpenApiRouter::new()
            .routes(utoipa_axum::routes!(get_kitchen_orders))
            .routes(utoipa_axum::routes!(update_order_status))
            .route_layer(axum::middleware::from_fn(middleware::chef_authorization)),
    )
}

/// Fetch the live kitchen board.
#[utoipa::path(
    get,
    path = "/",
    tags = ["Chef"],
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Kitchen orders with their next action", body = StdResponse<Vec<KitchenTicket>, String>)
    )
)]
async fn get_kitchen_orders(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, AppError> {
    let mut board = KitchenBoard::default();
    board.refresh(state.backend.as_ref(), &session).await?;

    Ok(StdResponse {
        data: Some(board.tickets()),
        message: Some("Get kitchen orders successfully"),
    })
}

#[derive(Deserialize, ToSchema)]
struct UpdateStatusReq {
    status: String,
}

/// Move an order one step forward: NEW to PREPARING, PREPARING to READY.
#[utoipa::path(
    put,
    path = "/{id}/status",
    tags = ["Chef"],
    security(("bearerAuth" = [])),
    params(
        ("id" = String, Path, description = "Order ID to move forward")
    ),
    request_body = UpdateStatusReq,
    responses(
        (status = 200, description = "Status updated", body = StdResponse<KitchenTicket, String>)
    )
)]
async fn update_order_status(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(body): Json<UpdateStatusReq>,
) -> Result<impl IntoResponse, AppError> {
    let next_status = normalize_status(&body.status);

    let mut board = KitchenBoard::default();
    board.refresh(state.backend.as_ref(), &session).await?;
    let updated = board
        .apply_transition(state.backend.as_ref(), &session, &id, next_status)
        .await?;

    Ok(StdResponse {
        data: Some(KitchenTicket::from(updated)),
        message: Some("Status updated successfully"),
    })
}
