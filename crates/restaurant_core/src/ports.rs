//! crates/restaurant_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the concrete database and mail transport.

use async_trait::async_trait;
use chrono::Weekday;
use uuid::Uuid;

use crate::domain::{
    DayHours, EmailMessage, KgProduct, ProductPatch, SpecialPeriod, SpecialPeriodInput,
    WeeklyHours,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, SMTP).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait DatabaseService: Send + Sync {
    // --- Weekly Opening Hours ---
    async fn get_weekly_hours(&self) -> PortResult<WeeklyHours>;

    /// Writes all seven days in one batch. Either every row is written or none.
    async fn save_weekly_hours(&self, week: &WeeklyHours) -> PortResult<WeeklyHours>;

    async fn update_day_hours(&self, hours: &DayHours) -> PortResult<DayHours>;

    async fn get_day_hours(&self, day: Weekday) -> PortResult<DayHours>;

    // --- Special Hours ---
    /// Returns all periods ordered by start date.
    async fn list_special_periods(&self) -> PortResult<Vec<SpecialPeriod>>;

    async fn get_special_period(&self, id: Uuid) -> PortResult<SpecialPeriod>;

    async fn create_special_period(&self, input: &SpecialPeriodInput) -> PortResult<SpecialPeriod>;

    async fn update_special_period(
        &self,
        id: Uuid,
        input: &SpecialPeriodInput,
    ) -> PortResult<SpecialPeriod>;

    /// Returns whether a row was removed. Deleting a missing id is not an error.
    async fn delete_special_period(&self, id: Uuid) -> PortResult<bool>;

    // --- KG Products ---
    async fn list_products(&self) -> PortResult<Vec<KgProduct>>;

    async fn update_product(&self, id: &str, patch: &ProductPatch) -> PortResult<KgProduct>;
}

#[async_trait]
pub trait MailService: Send + Sync {
    /// Delivers a single message. No retries are attempted.
    async fn send(&self, message: &EmailMessage) -> PortResult<()>;
}
