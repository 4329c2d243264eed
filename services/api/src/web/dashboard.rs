//! services/api/src/web/dashboard.rs
//!
//! Owner-facing endpoints: weekly hours editor, holiday manager and product
//! pricing. All routes here sit behind `require_auth`, and every successful
//! write revalidates the public snapshot.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use restaurant_core::{
    domain::{parse_weekday_key, DateRange, ProductPatch, SpecialPeriodInput},
    hours::{apply_patch, WeeklyHoursDraft},
    special_hours::{check_date_conflicts, validate_special_period},
    ValidationError,
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::web::{
    dto::*,
    errors::{error_response, port_error, validation_error, validation_errors, HandlerError},
    state::AppState,
};

//=========================================================================================
// Weekly Opening Hours
//=========================================================================================

#[utoipa::path(
    get,
    path = "/api/dashboard/opening-hours",
    responses(
        (status = 200, description = "Weekly opening hours", body = WeeklyHoursDto),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer" = []))
)]
pub async fn get_opening_hours_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<WeeklyHoursDto>, HandlerError> {
    let week = app_state
        .db
        .get_weekly_hours()
        .await
        .map_err(|e| port_error("Failed to load opening hours", e))?;
    Ok(Json(WeeklyHoursDto {
        days: week.iter().map(DayHoursDto::from).collect(),
    }))
}

/// Saves the whole week in one batch, as sent by the editor's "Save" button.
///
/// The request must contain all seven days. Nothing is written if any day is
/// invalid or if nothing changed.
#[utoipa::path(
    put,
    path = "/api/dashboard/opening-hours",
    request_body = WeeklyHoursDto,
    responses(
        (status = 200, description = "Saved schedule", body = WeeklyHoursDto),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer" = []))
)]
pub async fn save_opening_hours_handler(
    State(app_state): State<Arc<AppState>>,
    Json(req): Json<WeeklyHoursDto>,
) -> Result<Json<WeeklyHoursDto>, HandlerError> {
    let mut edits = Vec::with_capacity(req.days.len());
    for dto in &req.days {
        let day = parse_weekday_key(&dto.day).ok_or_else(|| {
            error_response(StatusCode::BAD_REQUEST, format!("Unknown weekday '{}'", dto.day))
        })?;
        edits.push((day, dto.to_patch()));
    }

    let persisted = app_state
        .db
        .get_weekly_hours()
        .await
        .map_err(|e| port_error("Failed to load opening hours", e))?;
    let mut draft = WeeklyHoursDraft::new(persisted);
    draft.apply_batch(edits).map_err(validation_errors)?;

    if !draft.is_dirty() {
        return Ok(Json(WeeklyHoursDto {
            days: draft.commit().iter().map(DayHoursDto::from).collect(),
        }));
    }

    let changed = draft.changed_days().len();
    let saved = app_state
        .db
        .save_weekly_hours(&draft.commit())
        .await
        .map_err(|e| port_error("Failed to save opening hours", e))?;
    app_state.revalidate().await;
    info!(changed_days = changed, "Weekly opening hours saved");

    Ok(Json(WeeklyHoursDto {
        days: saved.iter().map(DayHoursDto::from).collect(),
    }))
}

#[utoipa::path(
    patch,
    path = "/api/dashboard/opening-hours/{day}",
    params(("day" = String, Path, description = "Weekday, e.g. `monday`")),
    request_body = DayHoursPatchDto,
    responses(
        (status = 200, description = "Updated day", body = DayHoursDto),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Unknown weekday", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub async fn update_day_hours_handler(
    State(app_state): State<Arc<AppState>>,
    Path(day): Path<String>,
    Json(req): Json<DayHoursPatchDto>,
) -> Result<Json<DayHoursDto>, HandlerError> {
    let weekday = parse_weekday_key(&day)
        .ok_or_else(|| error_response(StatusCode::NOT_FOUND, format!("Unknown weekday '{}'", day)))?;

    let current = app_state
        .db
        .get_day_hours(weekday)
        .await
        .map_err(|e| port_error("Failed to load opening hours", e))?;
    let updated = apply_patch(&current, &req.into()).map_err(validation_error)?;
    let saved = app_state
        .db
        .update_day_hours(&updated)
        .await
        .map_err(|e| port_error("Failed to update opening hours", e))?;
    app_state.revalidate().await;

    Ok(Json(DayHoursDto::from(&saved)))
}

//=========================================================================================
// Special Hours
//=========================================================================================

#[utoipa::path(
    get,
    path = "/api/dashboard/special-hours",
    responses(
        (status = 200, description = "All special periods", body = Vec<SpecialPeriodDto>),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer" = []))
)]
pub async fn list_special_periods_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<SpecialPeriodDto>>, HandlerError> {
    let periods = app_state
        .db
        .list_special_periods()
        .await
        .map_err(|e| port_error("Failed to load special hours", e))?;
    Ok(Json(periods.iter().map(SpecialPeriodDto::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/special-hours/{id}",
    params(("id" = Uuid, Path, description = "Special period id")),
    responses(
        (status = 200, description = "The period", body = SpecialPeriodDto),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "No such period", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub async fn get_special_period_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SpecialPeriodDto>, HandlerError> {
    let period = app_state
        .db
        .get_special_period(id)
        .await
        .map_err(|e| port_error("Failed to load special period", e))?;
    Ok(Json(SpecialPeriodDto::from(&period)))
}

/// Validates the input and runs the advisory conflict check against the
/// stored periods.
async fn prepare_special_period(
    app_state: &AppState,
    req: SpecialPeriodRequest,
    editing: Option<Uuid>,
) -> Result<(SpecialPeriodInput, ConflictCheckResponse), HandlerError> {
    let input = validate_special_period(req.into()).map_err(validation_error)?;
    let existing = app_state
        .db
        .list_special_periods()
        .await
        .map_err(|e| port_error("Failed to load special hours", e))?;
    let conflicts = if input.is_active {
        ConflictCheckResponse::from(&check_date_conflicts(input.range(), &existing, editing))
    } else {
        ConflictCheckResponse {
            has_conflict: false,
            conflicts: Vec::new(),
        }
    };
    Ok((input, conflicts))
}

#[utoipa::path(
    post,
    path = "/api/dashboard/special-hours",
    request_body = SpecialPeriodRequest,
    responses(
        (status = 201, description = "Period created", body = SavedSpecialPeriodResponse),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer" = []))
)]
pub async fn create_special_period_handler(
    State(app_state): State<Arc<AppState>>,
    Json(req): Json<SpecialPeriodRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let (input, conflicts) = prepare_special_period(&app_state, req, None).await?;
    let period = app_state
        .db
        .create_special_period(&input)
        .await
        .map_err(|e| port_error("Failed to create special period", e))?;
    app_state.revalidate().await;
    info!(id = %period.id, has_conflict = conflicts.has_conflict, "Special period created");

    Ok((
        StatusCode::CREATED,
        Json(SavedSpecialPeriodResponse {
            period: SpecialPeriodDto::from(&period),
            conflicts,
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/api/dashboard/special-hours/{id}",
    params(("id" = Uuid, Path, description = "Special period id")),
    request_body = SpecialPeriodRequest,
    responses(
        (status = 200, description = "Period updated", body = SavedSpecialPeriodResponse),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "No such period", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub async fn update_special_period_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<SpecialPeriodRequest>,
) -> Result<Json<SavedSpecialPeriodResponse>, HandlerError> {
    let (input, conflicts) = prepare_special_period(&app_state, req, Some(id)).await?;
    let period = app_state
        .db
        .update_special_period(id, &input)
        .await
        .map_err(|e| port_error("Failed to update special period", e))?;
    app_state.revalidate().await;

    Ok(Json(SavedSpecialPeriodResponse {
        period: SpecialPeriodDto::from(&period),
        conflicts,
    }))
}

/// Deleting an id that does not exist still answers 204.
#[utoipa::path(
    delete,
    path = "/api/dashboard/special-hours/{id}",
    params(("id" = Uuid, Path, description = "Special period id")),
    responses(
        (status = 204, description = "Period removed or already absent"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer" = []))
)]
pub async fn delete_special_period_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, HandlerError> {
    let removed = app_state
        .db
        .delete_special_period(id)
        .await
        .map_err(|e| port_error("Failed to delete special period", e))?;
    if removed {
        app_state.revalidate().await;
        info!(id = %id, "Special period deleted");
    }
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/dashboard/special-hours/check-conflicts",
    request_body = ConflictCheckRequest,
    responses(
        (status = 200, description = "Overlapping active periods", body = ConflictCheckResponse),
        (status = 400, description = "Inverted date range", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer" = []))
)]
pub async fn check_conflicts_handler(
    State(app_state): State<Arc<AppState>>,
    Json(req): Json<ConflictCheckRequest>,
) -> Result<Json<ConflictCheckResponse>, HandlerError> {
    if req.start_date > req.end_date {
        return Err(validation_error(ValidationError::InvertedDateRange {
            start: req.start_date,
            end: req.end_date,
        }));
    }
    let existing = app_state
        .db
        .list_special_periods()
        .await
        .map_err(|e| port_error("Failed to load special hours", e))?;
    let result = check_date_conflicts(
        DateRange::new(req.start_date, req.end_date),
        &existing,
        req.exclude_id,
    );
    Ok(Json(ConflictCheckResponse::from(&result)))
}

//=========================================================================================
// KG Products
//=========================================================================================

#[utoipa::path(
    get,
    path = "/api/dashboard/kg-products",
    responses(
        (status = 200, description = "All products, including unavailable ones", body = Vec<ProductDto>),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer" = []))
)]
pub async fn list_products_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<ProductDto>>, HandlerError> {
    let products = app_state
        .db
        .list_products()
        .await
        .map_err(|e| port_error("Failed to load products", e))?;
    Ok(Json(products.iter().map(ProductDto::from).collect()))
}

/// Changes price and/or availability. Other product fields are read-only.
#[utoipa::path(
    patch,
    path = "/api/dashboard/kg-products/{id}",
    params(("id" = String, Path, description = "Product id")),
    request_body = ProductPatchRequest,
    responses(
        (status = 200, description = "Updated product", body = ProductDto),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "No such product", body = ErrorResponse)
    ),
    security(("bearer" = []))
)]
pub async fn update_product_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<ProductPatchRequest>,
) -> Result<Json<ProductDto>, HandlerError> {
    if req.price.is_some_and(|p| p.is_sign_negative()) {
        return Err(validation_error(ValidationError::NegativePrice));
    }
    let patch = ProductPatch {
        price: req.price.map(|p| p.round_dp(2)),
        available: req.available,
    };
    let product = app_state
        .db
        .update_product(&id, &patch)
        .await
        .map_err(|e| port_error("Failed to update product", e))?;
    app_state.revalidate().await;

    Ok(Json(ProductDto::from(&product)))
}
