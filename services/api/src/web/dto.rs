//! services/api/src/web/dto.rs
//!
//! JSON request and response payloads. Field names are camelCase to match the
//! site's frontend; conversion to and from the core domain types lives here.

use chrono::NaiveDate;
use restaurant_core::domain::{
    weekday_key, DayHours, KgOrderData, KgOrderLine, KgProduct, OrderSource, ProductUnit,
    RestaurantStatus, SpecialPeriod, SpecialPeriodInput,
};
use restaurant_core::hours::{format_time, DayHoursPatch};
use restaurant_core::special_hours::ConflictCheckResult;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

//=========================================================================================
// Errors
//=========================================================================================

/// Body of every 4xx/5xx answer from the dashboard and public routes.
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

//=========================================================================================
// Opening Hours
//=========================================================================================

#[derive(Serialize, Deserialize, ToSchema, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DayHoursDto {
    /// Lowercase English weekday, e.g. `monday`.
    pub day: String,
    pub is_open: bool,
    /// `HH:MM`, 24h.
    pub open_time: String,
    pub close_time: String,
}

impl From<&DayHours> for DayHoursDto {
    fn from(hours: &DayHours) -> Self {
        Self {
            day: weekday_key(hours.day).to_string(),
            is_open: hours.is_open,
            open_time: format_time(hours.open_time),
            close_time: format_time(hours.close_time),
        }
    }
}

impl DayHoursDto {
    /// Treats every field as set; used by the batch save.
    pub fn to_patch(&self) -> DayHoursPatch {
        DayHoursPatch {
            is_open: Some(self.is_open),
            open_time: Some(self.open_time.clone()),
            close_time: Some(self.close_time.clone()),
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct WeeklyHoursDto {
    pub days: Vec<DayHoursDto>,
}

#[derive(Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct DayHoursPatchDto {
    pub is_open: Option<bool>,
    pub open_time: Option<String>,
    pub close_time: Option<String>,
}

impl From<DayHoursPatchDto> for DayHoursPatch {
    fn from(dto: DayHoursPatchDto) -> Self {
        Self {
            is_open: dto.is_open,
            open_time: dto.open_time,
            close_time: dto.close_time,
        }
    }
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub is_open: bool,
    /// `regular-hours`, `special-closure` or `outside-hours`.
    pub reason: String,
    /// Banner text of an active special period.
    pub message: Option<String>,
    /// RFC 3339 local time of the next opening, when currently closed.
    pub next_opening: Option<String>,
    pub today: DayHoursDto,
}

impl StatusResponse {
    pub fn new(status: RestaurantStatus, next_opening: Option<String>, today: DayHoursDto) -> Self {
        Self {
            is_open: status.is_open,
            reason: status.reason.as_str().to_string(),
            message: status.message,
            next_opening,
            today,
        }
    }
}

//=========================================================================================
// Special Hours
//=========================================================================================

#[derive(Serialize, ToSchema, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SpecialPeriodDto {
    pub id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub message: String,
    pub is_active: bool,
}

impl From<&SpecialPeriod> for SpecialPeriodDto {
    fn from(period: &SpecialPeriod) -> Self {
        Self {
            id: period.id,
            start_date: period.start_date,
            end_date: period.end_date,
            message: period.message.clone(),
            is_active: period.is_active,
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SpecialPeriodRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub message: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl From<SpecialPeriodRequest> for SpecialPeriodInput {
    fn from(req: SpecialPeriodRequest) -> Self {
        Self {
            start_date: req.start_date,
            end_date: req.end_date,
            message: req.message,
            is_active: req.is_active,
        }
    }
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConflictCheckRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// The period being edited, which must not conflict with itself.
    pub exclude_id: Option<Uuid>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConflictCheckResponse {
    pub has_conflict: bool,
    pub conflicts: Vec<SpecialPeriodDto>,
}

impl From<&ConflictCheckResult> for ConflictCheckResponse {
    fn from(result: &ConflictCheckResult) -> Self {
        Self {
            has_conflict: result.has_conflict,
            conflicts: result.conflicts.iter().map(SpecialPeriodDto::from).collect(),
        }
    }
}

/// Answer to a create or update: the saved period plus the advisory check.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SavedSpecialPeriodResponse {
    pub period: SpecialPeriodDto,
    pub conflicts: ConflictCheckResponse,
}

//=========================================================================================
// KG Products
//=========================================================================================

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    /// `kg`, `stk` or `pack`.
    pub unit: String,
    pub min_order: Decimal,
    pub max_order: Decimal,
    pub available: bool,
    pub preparation_time: String,
}

impl From<&KgProduct> for ProductDto {
    fn from(product: &KgProduct) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            unit: product.unit.as_str().to_string(),
            min_order: product.min_order,
            max_order: product.max_order,
            available: product.available,
            preparation_time: product.preparation_time.clone(),
        }
    }
}

#[derive(Deserialize, ToSchema, Default)]
pub struct ProductPatchRequest {
    pub price: Option<Decimal>,
    pub available: Option<bool>,
}

//=========================================================================================
// KG Orders
//=========================================================================================

/// The product reference inside an order line. Only `id` is trusted; the rest
/// is replaced by the current catalog entry.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct OrderProductDto {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct OrderLineDto {
    pub product: OrderProductDto,
    pub quantity: Decimal,
}

#[derive(Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderDataDto {
    pub products: Vec<OrderLineDto>,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub pickup_date: String,
    pub special_requests: Option<String>,
    pub total_price: Option<Decimal>,
}

impl OrderDataDto {
    /// Builds the domain order. Product details are placeholders until the
    /// order is reconciled with the catalog.
    pub fn into_domain(self) -> KgOrderData {
        let products = self
            .products
            .into_iter()
            .map(|line| KgOrderLine {
                product: KgProduct {
                    id: line.product.id,
                    name: line.product.name,
                    description: String::new(),
                    price: Decimal::ZERO,
                    unit: ProductUnit::Kg,
                    min_order: Decimal::ZERO,
                    max_order: Decimal::ZERO,
                    available: false,
                    preparation_time: String::new(),
                },
                quantity: line.quantity,
            })
            .collect();
        KgOrderData {
            products,
            customer_name: self.customer_name,
            customer_email: self.customer_email,
            customer_phone: self.customer_phone,
            pickup_date: self.pickup_date,
            special_requests: self.special_requests,
            total_price: self.total_price.unwrap_or_default(),
        }
    }
}

#[derive(Deserialize, ToSchema, Clone, Copy, Default)]
#[serde(rename_all = "kebab-case")]
pub enum OrderSourceDto {
    Hero,
    #[default]
    KgVerkaufSection,
}

impl From<OrderSourceDto> for OrderSource {
    fn from(dto: OrderSourceDto) -> Self {
        match dto {
            OrderSourceDto::Hero => OrderSource::Hero,
            OrderSourceDto::KgVerkaufSection => OrderSource::KgVerkaufSection,
        }
    }
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendOrderEmailsRequest {
    pub order_data: Option<OrderDataDto>,
    #[serde(default)]
    pub order_source: OrderSourceDto,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendOrderEmailsResponse {
    pub success: bool,
    pub confirmation_sent: bool,
    pub notification_sent: bool,
    pub order_number: String,
    pub product_summary: String,
    pub errors: Vec<String>,
    /// User-facing summary of what went out.
    pub message: String,
}

#[derive(Serialize, ToSchema)]
pub struct OrderErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}
