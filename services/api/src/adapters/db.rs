//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `DatabaseService` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, Weekday};
use restaurant_core::domain::{
    parse_weekday_key, weekday_key, DayHours, KgProduct, ProductPatch, ProductUnit,
    SpecialPeriod, SpecialPeriodInput, WeeklyHours,
};
use restaurant_core::ports::{DatabaseService, PortError, PortResult};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DatabaseService` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct DayHoursRecord {
    day: String,
    is_open: bool,
    open_time: NaiveTime,
    close_time: NaiveTime,
}
impl DayHoursRecord {
    fn to_domain(self) -> PortResult<DayHours> {
        let day = parse_weekday_key(&self.day)
            .ok_or_else(|| PortError::Unexpected(format!("Unknown weekday '{}'", self.day)))?;
        Ok(DayHours {
            day,
            is_open: self.is_open,
            open_time: self.open_time,
            close_time: self.close_time,
        })
    }
}

#[derive(FromRow)]
struct SpecialPeriodRecord {
    id: Uuid,
    start_date: NaiveDate,
    end_date: NaiveDate,
    message: String,
    is_active: bool,
}
impl SpecialPeriodRecord {
    fn to_domain(self) -> SpecialPeriod {
        SpecialPeriod {
            id: self.id,
            start_date: self.start_date,
            end_date: self.end_date,
            message: self.message,
            is_active: self.is_active,
        }
    }
}

#[derive(FromRow)]
struct ProductRecord {
    id: String,
    name: String,
    description: String,
    price: Decimal,
    unit: String,
    min_order: Decimal,
    max_order: Decimal,
    available: bool,
    preparation_time: String,
}
impl ProductRecord {
    fn to_domain(self) -> PortResult<KgProduct> {
        let unit = ProductUnit::parse(&self.unit).ok_or_else(|| {
            PortError::Unexpected(format!("Unknown unit '{}' for product {}", self.unit, self.id))
        })?;
        Ok(KgProduct {
            id: self.id,
            name: self.name,
            description: self.description,
            price: self.price,
            unit,
            min_order: self.min_order,
            max_order: self.max_order,
            available: self.available,
            preparation_time: self.preparation_time,
        })
    }
}

const HOURS_COLUMNS: &str = "day, is_open, open_time, close_time";
const SPECIAL_COLUMNS: &str = "id, start_date, end_date, message, is_active";
const PRODUCT_COLUMNS: &str =
    "id, name, description, price, unit, min_order, max_order, available, preparation_time";

//=========================================================================================
// `DatabaseService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DatabaseService for DbAdapter {
    async fn get_weekly_hours(&self) -> PortResult<WeeklyHours> {
        let records: Vec<DayHoursRecord> =
            sqlx::query_as(&format!("SELECT {HOURS_COLUMNS} FROM opening_hours"))
                .fetch_all(&self.pool)
                .await
                .map_err(unexpected)?;

        let days = records
            .into_iter()
            .map(DayHoursRecord::to_domain)
            .collect::<PortResult<Vec<_>>>()?;
        WeeklyHours::from_days(days).ok_or_else(|| {
            PortError::Unexpected("opening_hours does not contain exactly seven weekdays".to_string())
        })
    }

    async fn save_weekly_hours(&self, week: &WeeklyHours) -> PortResult<WeeklyHours> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;
        for hours in week.iter() {
            sqlx::query(
                "INSERT INTO opening_hours (day, is_open, open_time, close_time, updated_at)
                 VALUES ($1, $2, $3, $4, NOW())
                 ON CONFLICT (day) DO UPDATE SET
                    is_open = $2, open_time = $3, close_time = $4, updated_at = NOW()",
            )
            .bind(weekday_key(hours.day))
            .bind(hours.is_open)
            .bind(hours.open_time)
            .bind(hours.close_time)
            .execute(&mut *tx)
            .await
            .map_err(unexpected)?;
        }
        tx.commit().await.map_err(unexpected)?;

        self.get_weekly_hours().await
    }

    async fn update_day_hours(&self, hours: &DayHours) -> PortResult<DayHours> {
        let record: Option<DayHoursRecord> = sqlx::query_as(&format!(
            "UPDATE opening_hours SET is_open = $2, open_time = $3, close_time = $4, updated_at = NOW()
             WHERE day = $1 RETURNING {HOURS_COLUMNS}"
        ))
        .bind(weekday_key(hours.day))
        .bind(hours.is_open)
        .bind(hours.open_time)
        .bind(hours.close_time)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;

        record
            .ok_or_else(|| PortError::NotFound(format!("Opening hours for {} not found", weekday_key(hours.day))))?
            .to_domain()
    }

    async fn get_day_hours(&self, day: Weekday) -> PortResult<DayHours> {
        let record: Option<DayHoursRecord> = sqlx::query_as(&format!(
            "SELECT {HOURS_COLUMNS} FROM opening_hours WHERE day = $1"
        ))
        .bind(weekday_key(day))
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;

        record
            .ok_or_else(|| PortError::NotFound(format!("Opening hours for {} not found", weekday_key(day))))?
            .to_domain()
    }

    async fn list_special_periods(&self) -> PortResult<Vec<SpecialPeriod>> {
        let records: Vec<SpecialPeriodRecord> = sqlx::query_as(&format!(
            "SELECT {SPECIAL_COLUMNS} FROM special_hours ORDER BY start_date ASC, id ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn get_special_period(&self, id: Uuid) -> PortResult<SpecialPeriod> {
        let record: SpecialPeriodRecord = sqlx::query_as(&format!(
            "SELECT {SPECIAL_COLUMNS} FROM special_hours WHERE id = $1"
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => PortError::NotFound(format!("Special period {} not found", id)),
            _ => PortError::Unexpected(e.to_string()),
        })?;
        Ok(record.to_domain())
    }

    async fn create_special_period(&self, input: &SpecialPeriodInput) -> PortResult<SpecialPeriod> {
        let record: SpecialPeriodRecord = sqlx::query_as(&format!(
            "INSERT INTO special_hours (id, start_date, end_date, message, is_active)
             VALUES ($1, $2, $3, $4, $5) RETURNING {SPECIAL_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(&input.message)
        .bind(input.is_active)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn update_special_period(
        &self,
        id: Uuid,
        input: &SpecialPeriodInput,
    ) -> PortResult<SpecialPeriod> {
        let record: Option<SpecialPeriodRecord> = sqlx::query_as(&format!(
            "UPDATE special_hours
             SET start_date = $2, end_date = $3, message = $4, is_active = $5, updated_at = NOW()
             WHERE id = $1 RETURNING {SPECIAL_COLUMNS}"
        ))
        .bind(id)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(&input.message)
        .bind(input.is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;

        record
            .map(SpecialPeriodRecord::to_domain)
            .ok_or_else(|| PortError::NotFound(format!("Special period {} not found", id)))
    }

    async fn delete_special_period(&self, id: Uuid) -> PortResult<bool> {
        let result = sqlx::query("DELETE FROM special_hours WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_products(&self) -> PortResult<Vec<KgProduct>> {
        let records: Vec<ProductRecord> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM kg_products ORDER BY sort_order ASC, name ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        records.into_iter().map(ProductRecord::to_domain).collect()
    }

    async fn update_product(&self, id: &str, patch: &ProductPatch) -> PortResult<KgProduct> {
        let record: Option<ProductRecord> = sqlx::query_as(&format!(
            "UPDATE kg_products
             SET price = COALESCE($2, price), available = COALESCE($3, available), updated_at = NOW()
             WHERE id = $1 RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .bind(patch.price)
        .bind(patch.available)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;

        record
            .ok_or_else(|| PortError::NotFound(format!("Product {} not found", id)))?
            .to_domain()
    }
}
