use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use tracing::info;
use utoipa_axum::router::OpenApiRouter;

use crate::{
    api::TableApi,
    app_error::{AppError, StdResponse},
    app_state::AppState,
    middleware,
    models::Table,
    routes,
    session::Session,
    tables::{self, BookingReq, NewTable},
};

/// Defines the table desk routes (availability, booking + authorization).
pub fn routes_with_openapi() -> OpenApiRouter<AppState> {
    utoipa_axum::router::OpenApiRouter::new().nest(
        "/admin/tables",
        OpenApiRouter::new()
            .routes(utoipa_axum::routes!(get_tables, add_table))
            .routes(utoipa_axum::routes!(remove_table))
            .routes(utoipa_axum::routes!(book_table, unbook_table))
            .route_layer(axum::middleware::from_fn(middleware::admin_authorization)),
    )
}

/// Fetch all tables with their booking state.
#[utoipa::path(
    get,
    path = "/",
    tags = ["Tables"],
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "List tables", body = StdResponse<Vec<Table>, String>)
    )
)]
async fn get_tables(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, AppError> {
    let tables = state.backend.list_tables(&session).await?;

    Ok(StdResponse {
        data: Some(tables),
        message: Some("Get tables successfully"),
    })
}

/// Add a new table.
#[utoipa::path(
    post,
    path = "/",
    tags = ["Tables"],
    security(("bearerAuth" = [])),
    request_body = NewTable,
    responses(
        (status = 200, description = "Table added", body = StdResponse<Vec<Table>, String>)
    )
)]
async fn add_table(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(body): Json<NewTable>,
) -> Result<impl IntoResponse, AppError> {
    let table = body.validate()?;
    let tables = state.backend.add_table(&session, &table).await?;
    info!("Table {} added by {}", table.name, session.display_name);

    let message = routes::mutation_message(&tables, "Add table successfully");

    Ok(StdResponse {
        data: tables,
        message: Some(message),
    })
}

/// Remove a table.
#[utoipa::path(
    delete,
    path = "/{id}",
    tags = ["Tables"],
    security(("bearerAuth" = [])),
    params(
        ("id" = String, Path, description = "Table ID to remove")
    ),
    responses(
        (status = 200, description = "Table removed", body = StdResponse<Vec<Table>, String>)
    )
)]
async fn remove_table(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, AppError> {
    let tables = state.backend.remove_table(&session, &id).await?;
    info!("Table {} removed by {}", id, session.display_name);

    let message = routes::mutation_message(&tables, "Remove table successfully");

    Ok(StdResponse {
        data: tables,
        message: Some(message),
    })
}

/// Book a free table for a party.
#[utoipa::path(
    post,
    path = "/{id}/booking",
    tags = ["Tables"],
    security(("bearerAuth" = [])),
    params(
        ("id" = String, Path, description = "Table ID to book")
    ),
    request_body = BookingReq,
    responses(
        (status = 200, description = "Table booked", body = StdResponse<Vec<Table>, String>)
    )
)]
async fn book_table(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(body): Json<BookingReq>,
) -> Result<impl IntoResponse, AppError> {
    let booking = body.validate()?;

    let current = state.backend.list_tables(&session).await?;
    tables::ensure_bookable(&current, &id)?;

    let tables = state.backend.book_table(&session, &id, &booking).await?;
    info!(
        "Table {} booked for {} ({} members)",
        id, booking.customer_name, booking.members
    );

    let message = routes::mutation_message(&tables, "Book table successfully");

    Ok(StdResponse {
        data: tables,
        message: Some(message),
    })
}

/// Free a booked table.
#[utoipa::path(
    delete,
    path = "/{id}/booking",
    tags = ["Tables"],
    security(("bearerAuth" = [])),
    params(
        ("id" = String, Path, description = "Table ID to free")
    ),
    responses(
        (status = 200, description = "Table freed", body = StdResponse<Vec<Table>, String>)
    )
)]
async fn unbook_table(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, AppError> {
    let tables = state.backend.unbook_table(&session, &id).await?;

    let message = routes::mutation_message(&tables, "Free table successfully");

    Ok(StdResponse {
        data: tables,
        message: Some(message),
    })
}
