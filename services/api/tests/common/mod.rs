//! In-memory stand-ins for the database and the SMTP relay, plus helpers for
//! driving the router without a network socket.
#![allow(dead_code)]

use api_lib::{
    config::{Config, SmtpConfig},
    web::{router, state::AppState},
};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use http_body_util::BodyExt;
use restaurant_core::{
    domain::{
        DayHours, EmailMessage, KgProduct, ProductPatch, ProductUnit, SpecialPeriod,
        SpecialPeriodInput, WeeklyHours, WEEK,
    },
    ports::{DatabaseService, MailService, PortError, PortResult},
};
use rust_decimal::Decimal;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use uuid::Uuid;

pub const TOKEN: &str = "test-dashboard-token-0123";
pub const RESTAURANT_EMAIL: &str = "kueche@restaurant.test";

/// Monday 2026-10-19, 12:00 in Zurich.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 10, 0, 0).single().unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

//=========================================================================================
// Fake Database
//=========================================================================================

pub struct InMemoryDb {
    pub weekly: Mutex<WeeklyHours>,
    pub specials: Mutex<Vec<SpecialPeriod>>,
    pub products: Mutex<Vec<KgProduct>>,
    pub fail_reads: Mutex<bool>,
}

impl InMemoryDb {
    /// Open 11:00-23:00 every day except Sunday.
    pub fn seeded() -> Self {
        let days = WEEK
            .iter()
            .map(|&day| DayHours {
                day,
                is_open: day != Weekday::Sun,
                open_time: time(11, 0),
                close_time: time(23, 0),
            })
            .collect();
        Self {
            weekly: Mutex::new(WeeklyHours::from_days(days).unwrap()),
            specials: Mutex::new(Vec::new()),
            products: Mutex::new(vec![
                product("bratwurst", "Bratwurst", "24.50", true),
                product("speck", "Bauernspeck", "32.00", false),
            ]),
            fail_reads: Mutex::new(false),
        }
    }

    fn check_reads(&self) -> PortResult<()> {
        if *self.fail_reads.lock().unwrap() {
            return Err(PortError::Unexpected("connection refused".to_string()));
        }
        Ok(())
    }
}

pub fn product(id: &str, name: &str, price: &str, available: bool) -> KgProduct {
    KgProduct {
        id: id.to_string(),
        name: name.to_string(),
        description: String::new(),
        price: price.parse().unwrap(),
        unit: ProductUnit::Kg,
        min_order: Decimal::ONE,
        max_order: Decimal::TEN,
        available,
        preparation_time: "24h".to_string(),
    }
}

#[async_trait]
impl DatabaseService for InMemoryDb {
    async fn get_weekly_hours(&self) -> PortResult<WeeklyHours> {
        self.check_reads()?;
        Ok(self.weekly.lock().unwrap().clone())
    }

    async fn save_weekly_hours(&self, week: &WeeklyHours) -> PortResult<WeeklyHours> {
        *self.weekly.lock().unwrap() = week.clone();
        Ok(week.clone())
    }

    async fn update_day_hours(&self, hours: &DayHours) -> PortResult<DayHours> {
        self.weekly.lock().unwrap().set(hours.clone());
        Ok(hours.clone())
    }

    async fn get_day_hours(&self, day: Weekday) -> PortResult<DayHours> {
        Ok(self.weekly.lock().unwrap().get(day).clone())
    }

    async fn list_special_periods(&self) -> PortResult<Vec<SpecialPeriod>> {
        self.check_reads()?;
        let mut periods = self.specials.lock().unwrap().clone();
        periods.sort_by_key(|p| p.start_date);
        Ok(periods)
    }

    async fn get_special_period(&self, id: Uuid) -> PortResult<SpecialPeriod> {
        self.specials
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Special period {id}")))
    }

    async fn create_special_period(&self, input: &SpecialPeriodInput) -> PortResult<SpecialPeriod> {
        let period = SpecialPeriod {
            id: Uuid::new_v4(),
            start_date: input.start_date,
            end_date: input.end_date,
            message: input.message.clone(),
            is_active: input.is_active,
        };
        self.specials.lock().unwrap().push(period.clone());
        Ok(period)
    }

    async fn update_special_period(
        &self,
        id: Uuid,
        input: &SpecialPeriodInput,
    ) -> PortResult<SpecialPeriod> {
        let mut specials = self.specials.lock().unwrap();
        let period = specials
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| PortError::NotFound(format!("Special period {id}")))?;
        period.start_date = input.start_date;
        period.end_date = input.end_date;
        period.message = input.message.clone();
        period.is_active = input.is_active;
        Ok(period.clone())
    }

    async fn delete_special_period(&self, id: Uuid) -> PortResult<bool> {
        let mut specials = self.specials.lock().unwrap();
        let before = specials.len();
        specials.retain(|p| p.id != id);
        Ok(specials.len() < before)
    }

    async fn list_products(&self) -> PortResult<Vec<KgProduct>> {
        self.check_reads()?;
        Ok(self.products.lock().unwrap().clone())
    }

    async fn update_product(&self, id: &str, patch: &ProductPatch) -> PortResult<KgProduct> {
        let mut products = self.products.lock().unwrap();
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| PortError::NotFound(format!("Product {id}")))?;
        if let Some(price) = patch.price {
            product.price = price;
        }
        if let Some(available) = patch.available {
            product.available = available;
        }
        Ok(product.clone())
    }
}

//=========================================================================================
// Fake Mailer
//=========================================================================================

/// Records every message and fails deliveries to the listed recipients.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<EmailMessage>>,
    pub failing: Vec<String>,
}

#[async_trait]
impl MailService for RecordingMailer {
    async fn send(&self, message: &EmailMessage) -> PortResult<()> {
        if self.failing.contains(&message.to) {
            return Err(PortError::Unexpected("550 mailbox unavailable".to_string()));
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

//=========================================================================================
// App Harness
//=========================================================================================

pub fn test_config(show_coming_soon: bool) -> Config {
    Config {
        bind_address: "127.0.0.1:0".parse().unwrap(),
        database_url: "postgres://unused".to_string(),
        log_level: tracing::Level::INFO,
        timezone: chrono_tz::Europe::Zurich,
        app_base_url: "http://localhost:3000".to_string(),
        cors_origin: "http://localhost:3000".to_string(),
        smtp: SmtpConfig {
            host: "smtp.test".to_string(),
            port: 587,
            username: "user".to_string(),
            password: "pass".to_string(),
            from: "Restaurant <bestellung@restaurant.test>".to_string(),
        },
        restaurant_name: "Restaurant Test".to_string(),
        restaurant_email: RESTAURANT_EMAIL.to_string(),
        restaurant_phone: "044 123 45 67".to_string(),
        dashboard_token: TOKEN.to_string(),
        show_coming_soon,
    }
}

pub struct TestApp {
    pub router: Router,
    pub db: Arc<InMemoryDb>,
    pub mailer: Arc<RecordingMailer>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::build(InMemoryDb::seeded(), RecordingMailer::default(), false)
    }

    pub fn build(db: InMemoryDb, mailer: RecordingMailer, show_coming_soon: bool) -> Self {
        let db = Arc::new(db);
        let mailer = Arc::new(mailer);
        let mut state = AppState::new(db.clone(), mailer.clone(), Arc::new(test_config(show_coming_soon)));
        state.clock = fixed_now;
        Self {
            router: router(Arc::new(state)),
            db,
            mailer,
        }
    }

    pub async fn call(&self, method: Method, uri: &str, body: Option<Value>, auth: bool) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if auth {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {TOKEN}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.call(Method::GET, uri, None, false).await
    }

    pub async fn dashboard(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.call(method, uri, body, true).await
    }
}
