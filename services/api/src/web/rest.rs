//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the public REST endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::{
    dashboard, dto::*, errors::{port_error, HandlerError}, orders, state::AppState,
};
use axum::{extract::State, response::Json};
use chrono::Datelike;
use restaurant_core::hours::{combined_status, next_opening};
use restaurant_core::special_hours::{active_special_period, upcoming_special_periods};
use std::sync::Arc;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        status_handler,
        opening_hours_handler,
        active_special_hours_handler,
        upcoming_special_hours_handler,
        kg_products_handler,
        orders::send_order_emails_handler,
        dashboard::get_opening_hours_handler,
        dashboard::save_opening_hours_handler,
        dashboard::update_day_hours_handler,
        dashboard::list_special_periods_handler,
        dashboard::get_special_period_handler,
        dashboard::create_special_period_handler,
        dashboard::update_special_period_handler,
        dashboard::delete_special_period_handler,
        dashboard::check_conflicts_handler,
        dashboard::list_products_handler,
        dashboard::update_product_handler,
    ),
    components(
        schemas(
            ErrorResponse, DayHoursDto, WeeklyHoursDto, DayHoursPatchDto, StatusResponse,
            SpecialPeriodDto, SpecialPeriodRequest, ConflictCheckRequest, ConflictCheckResponse,
            SavedSpecialPeriodResponse, ProductDto, ProductPatchRequest, OrderProductDto,
            OrderLineDto, OrderDataDto, OrderSourceDto, SendOrderEmailsRequest,
            SendOrderEmailsResponse, OrderErrorResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Restaurant API", description = "Opening hours, holidays and KG-Verkauf pre-orders.")
    )
)]
pub struct ApiDoc;

/// Registers the `bearer` scheme the dashboard paths refer to.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

//=========================================================================================
// Public Handlers
//=========================================================================================

/// Current open/closed status, including the holiday banner if one is active.
#[utoipa::path(
    get,
    path = "/api/status",
    responses(
        (status = 200, description = "Current status", body = StatusResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn status_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, HandlerError> {
    let snapshot = app_state
        .public_snapshot()
        .await
        .map_err(|e| port_error("Failed to load opening hours", e))?;

    let now = app_state.now();
    let tz = app_state.config.timezone;
    let status = combined_status(now, tz, &snapshot.weekly, &snapshot.specials);
    let next = if status.is_open {
        None
    } else {
        next_opening(now, tz, &snapshot.weekly, &snapshot.specials).map(|dt| dt.to_rfc3339())
    };
    let today = DayHoursDto::from(snapshot.weekly.get(now.with_timezone(&tz).weekday()));

    Ok(Json(StatusResponse::new(status, next, today)))
}

/// The regular weekly schedule, Monday first.
#[utoipa::path(
    get,
    path = "/api/opening-hours",
    responses(
        (status = 200, description = "Weekly opening hours", body = WeeklyHoursDto),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn opening_hours_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<WeeklyHoursDto>, HandlerError> {
    let snapshot = app_state
        .public_snapshot()
        .await
        .map_err(|e| port_error("Failed to load opening hours", e))?;
    Ok(Json(WeeklyHoursDto {
        days: snapshot.weekly.iter().map(DayHoursDto::from).collect(),
    }))
}

/// The special period in effect today, or `null`.
#[utoipa::path(
    get,
    path = "/api/special-hours/active",
    responses(
        (status = 200, description = "Active period or null", body = Option<SpecialPeriodDto>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn active_special_hours_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Option<SpecialPeriodDto>>, HandlerError> {
    let snapshot = app_state
        .public_snapshot()
        .await
        .map_err(|e| port_error("Failed to load special hours", e))?;
    let active = active_special_period(app_state.today(), &snapshot.specials);
    Ok(Json(active.map(SpecialPeriodDto::from)))
}

/// Active periods that have not ended yet, soonest first.
#[utoipa::path(
    get,
    path = "/api/special-hours/upcoming",
    responses(
        (status = 200, description = "Upcoming periods", body = Vec<SpecialPeriodDto>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn upcoming_special_hours_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<SpecialPeriodDto>>, HandlerError> {
    let snapshot = app_state
        .public_snapshot()
        .await
        .map_err(|e| port_error("Failed to load special hours", e))?;
    let upcoming = upcoming_special_periods(app_state.today(), &snapshot.specials);
    Ok(Json(upcoming.iter().map(SpecialPeriodDto::from).collect()))
}

/// Products currently offered for pre-order.
#[utoipa::path(
    get,
    path = "/api/kg-products",
    responses(
        (status = 200, description = "Available products", body = Vec<ProductDto>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn kg_products_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<ProductDto>>, HandlerError> {
    let snapshot = app_state
        .public_snapshot()
        .await
        .map_err(|e| port_error("Failed to load products", e))?;
    Ok(Json(
        snapshot
            .products
            .iter()
            .filter(|p| p.available)
            .map(ProductDto::from)
            .collect(),
    ))
}

pub async fn health_handler() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::ApiDoc;
    use utoipa::OpenApi;

    #[test]
    fn dashboard_security_scheme_is_declared() {
        let doc = ApiDoc::openapi();
        let components = doc.components.as_ref().expect("schemas are registered");
        assert!(components.security_schemes.contains_key("bearer"));

        let json = doc.to_json().unwrap();
        assert!(json.contains("\"scheme\":\"bearer\""));
    }
}
