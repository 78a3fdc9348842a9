use axum::{
    Extension,
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::IntoParams;
use utoipa_axum::router::OpenApiRouter;

use crate::{
    api::MenuApi,
    app_error::{AppError, StdResponse},
    app_state::AppState,
    menu::{self, MenuSection},
    middleware,
    models::{Category, MenuItem},
    session::Session,
};

/// Defines the read-only menu routes shared by every panel.
pub fn routes_with_openapi() -> OpenApiRouter<AppState> {
    utoipa_axum::router::OpenApiRouter::new().nest(
        "/menu",
        OpenApiRouter::new()
            .routes(utoipa_axum::routes!(get_menu))
            .routes(utoipa_axum::routes!(get_menu_items))
            .routes(utoipa_axum::routes!(get_categories))
            .route_layer(axum::middleware::from_fn(middleware::staff_authorization)),
    )
}

/// Fetch the whole menu grouped by category.
#[utoipa::path(
    get,
    path = "/",
    tags = ["Menu"],
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Menu sections", body = StdResponse<Vec<MenuSection>, String>)
    )
)]
async fn get_menu(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, AppError> {
    let (items, categories) = futures::try_join!(
        state.backend.list_menu_items(&session),
        state.backend.list_categories(&session),
    )?;

    Ok(StdResponse {
        data: Some(menu::sections(categories, items)),
        message: Some("Get menu successfully"),
    })
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
struct MenuFilter {
    /// Only dishes of this category.
    category: Option<String>,
    /// Case-insensitive part of the dish name.
    search: Option<String>,
}

/// Fetch dishes, optionally narrowed by category and name.
#[utoipa::path(
    get,
    path = "/items",
    tags = ["Menu"],
    security(("bearerAuth" = [])),
    params(MenuFilter),
    responses(
        (status = 200, description = "Matching dishes", body = StdResponse<Vec<MenuItem>, String>)
    )
)]
async fn get_menu_items(
    Query(filter): Query<MenuFilter>,
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, AppError> {
    let items = state.backend.list_menu_items(&session).await?;
    let category = filter.category.as_deref().filter(|c| !c.is_empty());

    Ok(StdResponse {
        data: Some(menu::filter_items(&items, category, filter.search.as_deref())),
        message: Some("Get menu items successfully"),
    })
}

/// Fetch all categories.
#[utoipa::path(
    get,
    path = "/categories",
    tags = ["Menu"],
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Categories", body = StdResponse<Vec<Category>, String>)
    )
)]
async fn get_categories(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<impl IntoResponse, AppError> {
    let categories = state.backend.list_categories(&session).await?;

    Ok(StdResponse {
        data: Some(categories),
        message: Some("Get categories successfully"),
    })
}
