use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use tracing::info;
use utoipa_axum::router::OpenApiRouter;

use crate::{
    api::MenuApi,
    app_error::{AppError, StdResponse},
    app_state::AppState,
    menu::{NewCategory, NewMenuItemReq},
    middleware,
    models::{Category, MenuItem},
    routes,
    session::Session,
};

/// Defines the menu management routes (dishes, categories + authorization).
pub fn routes_with_openapi() -> OpenApiRouter<AppState> {
    utoipa_axum::router::OpenApiRouter::new().nest(
        "/admin/menu",
        OpenApiRouter::new()
            .routes(utoipa_axum::routes!(add_menu_item))
            .routes(utoipa_axum::routes!(remove_menu_item))
            .routes(utoipa_axum::routes!(add_category))
            .routes(utoipa_axum::routes!(remove_category))
            .route_layer(axum::middleware::from_fn(middleware::admin_authorization)),
    )
}

/// Add a dish to a category.
#[utoipa::path(
    post,
    path = "/items",
    tags = ["Menu management"],
    security(("bearerAuth" = [])),
    request_body = NewMenuItemReq,
    responses(
        (status = 200, description = "Dish added", body = StdResponse<Vec<MenuItem>, String>)
    )
)]
async fn add_menu_item(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(body): Json<NewMenuItemReq>,
) -> Result<impl IntoResponse, AppError> {
    let item = body.validate()?;
    let items = state.backend.add_menu_item(&session, &item).await?;
    info!("Dish {} added by {}", item.name, session.display_name);

    let message = routes::mutation_message(&items, "Add menu item successfully");

    Ok(StdResponse {
        data: items,
        message: Some(message),
    })
}

/// Remove a dish.
#[utoipa::path(
    delete,
    path = "/items/{id}",
    tags = ["Menu management"],
    security(("bearerAuth" = [])),
    params(
        ("id" = String, Path, description = "Dish ID to remove")
    ),
    responses(
        (status = 200, description = "Dish removed", body = StdResponse<Vec<MenuItem>, String>)
    )
)]
async fn remove_menu_item(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, AppError> {
    let items = state.backend.remove_menu_item(&session, &id).await?;

    let message = routes::mutation_message(&items, "Remove menu item successfully");

    Ok(StdResponse {
        data: items,
        message: Some(message),
    })
}

/// Add a category.
#[utoipa::path(
    post,
    path = "/categories",
    tags = ["Menu management"],
    security(("bearerAuth" = [])),
    request_body = NewCategory,
    responses(
        (status = 200, description = "Category added", body = StdResponse<Vec<Category>, String>)
    )
)]
async fn add_category(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(body): Json<NewCategory>,
) -> Result<impl IntoResponse, AppError> {
    let category = body.validate()?;
    let categories = state.backend.add_category(&session, &category).await?;
    info!("Category {} added by {}", category.name, session.display_name);

    let message = routes::mutation_message(&categories, "Add category successfully");

    Ok(StdResponse {
        data: categories,
        message: Some(message),
    })
}

/// Remove a category.
#[utoipa::path(
    delete,
    path = "/categories/{id}",
    tags = ["Menu management"],
    security(("bearerAuth" = [])),
    params(
        ("id" = String, Path, description = "Category ID to remove")
    ),
    responses(
        (status = 200, description = "Category removed", body = StdResponse<Vec<Category>, String>)
    )
)]
async fn remove_category(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, AppError> {
    let categories = state.backend.remove_category(&session, &id).await?;

    let message = routes::mutation_message(&categories, "Remove category successfully");

    Ok(StdResponse {
        data: categories,
        message: Some(message),
    })
}
