pub mod dashboard;
pub mod dto;
pub mod errors;
pub mod middleware;
pub mod orders;
pub mod rest;
pub mod state;

use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::warn;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use middleware::{coming_soon_gate, require_auth};
pub use rest::ApiDoc;
pub use state::AppState;

/// Builds the complete application: public API, dashboard API and Swagger UI.
pub fn router(app_state: Arc<AppState>) -> Router {
    // Public routes (hidden while the site is in coming-soon mode)
    let public_routes = Router::new()
        .route("/api/status", get(rest::status_handler))
        .route("/api/opening-hours", get(rest::opening_hours_handler))
        .route("/api/special-hours/active", get(rest::active_special_hours_handler))
        .route("/api/special-hours/upcoming", get(rest::upcoming_special_hours_handler))
        .route("/api/kg-products", get(rest::kg_products_handler))
        .route("/api/send-order-emails", post(orders::send_order_emails_handler))
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            coming_soon_gate,
        ));

    // Dashboard routes (bearer token required)
    let dashboard_routes = Router::new()
        .route(
            "/api/dashboard/opening-hours",
            get(dashboard::get_opening_hours_handler).put(dashboard::save_opening_hours_handler),
        )
        .route(
            "/api/dashboard/opening-hours/{day}",
            patch(dashboard::update_day_hours_handler),
        )
        .route(
            "/api/dashboard/special-hours",
            get(dashboard::list_special_periods_handler)
                .post(dashboard::create_special_period_handler),
        )
        .route(
            "/api/dashboard/special-hours/check-conflicts",
            post(dashboard::check_conflicts_handler),
        )
        .route(
            "/api/dashboard/special-hours/{id}",
            get(dashboard::get_special_period_handler)
                .put(dashboard::update_special_period_handler)
                .delete(dashboard::delete_special_period_handler),
        )
        .route("/api/dashboard/kg-products", get(dashboard::list_products_handler))
        .route(
            "/api/dashboard/kg-products/{id}",
            patch(dashboard::update_product_handler),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    let mut api_router = Router::new()
        .route("/api/health", get(rest::health_handler))
        .merge(public_routes)
        .merge(dashboard_routes);

    match app_state.config.cors_origin.parse::<HeaderValue>() {
        Ok(origin) => {
            let cors = CorsLayer::new()
                .allow_origin(origin)
                .allow_credentials(true)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);
            api_router = api_router.layer(cors);
        }
        Err(_) => warn!(
            "CORS_ORIGIN '{}' is not a valid header value; CORS disabled",
            app_state.config.cors_origin
        ),
    }

    // Merge the API router with the Swagger UI router for a complete application.
    Router::new()
        .merge(api_router.with_state(app_state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
