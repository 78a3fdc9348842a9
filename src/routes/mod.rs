pub mod admin;
pub mod chef;
pub mod menu;
pub mod waiter;

use axum::Router;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use crate::app_state::AppState;

/// Answer for a mutation whose refreshed list could not be loaded.
const SAVED_WITHOUT_LIST: &str = "Saved, but the updated list could not be loaded. Reload to see it";

/// The applied change stands either way; only the message tells the panel
/// whether `data` holds the fresh list.
pub(crate) fn mutation_message<T>(list: &Option<T>, done: &'static str) -> &'static str {
    if list.is_some() { done } else { SAVED_WITHOUT_LIST }
}

/// Every panel's routes, with their OpenAPI description.
pub fn routes_with_openapi() -> OpenApiRouter<AppState> {
    waiter::carts::routes_with_openapi()
        .merge(chef::orders::routes_with_openapi())
        .merge(menu::routes_with_openapi())
        .merge(admin::tables::routes_with_openapi())
        .merge(admin::menu::routes_with_openapi())
}

/// The complete service: panel routes plus the Swagger UI.
pub fn app(state: AppState) -> Router {
    let routes = routes_with_openapi();

    let mut openapi = routes.get_openapi().clone();
    openapi.info = utoipa::openapi::InfoBuilder::new()
        .title("Restaurant OrderService API")
        .version("1.0.0")
        .build();
    openapi
        .components
        .get_or_insert_with(Default::default)
        .add_security_scheme(
            "bearerAuth",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
        );
    let swagger_ui = SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi);

    Router::new()
        .merge(routes)
        .merge(swagger_ui)
        .with_state(state)
}
