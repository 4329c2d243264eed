//! services/api/src/web/state.rs
//!
//! Defines the application's shared state and the cached public snapshot.

use crate::config::Config;
use chrono::{DateTime, NaiveDate, Utc};
use restaurant_core::domain::{KgProduct, SpecialPeriod, WeeklyHours};
use restaurant_core::email_templates::OrderMailContext;
use restaurant_core::ports::{DatabaseService, MailService, PortResult};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn DatabaseService>,
    pub mailer: Arc<dyn MailService>,
    pub config: Arc<Config>,
    pub public_cache: Arc<PublicCache>,
    /// Source of the current time; swapped out in tests.
    pub clock: fn() -> DateTime<Utc>,
}

impl AppState {
    pub fn new(
        db: Arc<dyn DatabaseService>,
        mailer: Arc<dyn MailService>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            db,
            mailer,
            config,
            public_cache: Arc::new(PublicCache::default()),
            clock: Utc::now,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    /// Today's date in the restaurant's time zone.
    pub fn today(&self) -> NaiveDate {
        self.now().with_timezone(&self.config.timezone).date_naive()
    }

    pub fn mail_context(&self) -> OrderMailContext {
        OrderMailContext {
            restaurant_name: self.config.restaurant_name.clone(),
            restaurant_email: self.config.restaurant_email.clone(),
            restaurant_phone: self.config.restaurant_phone.clone(),
            base_url: self.config.app_base_url.clone(),
        }
    }

    /// Current public data, loaded from the database on the first read after
    /// a revalidation.
    pub async fn public_snapshot(&self) -> PortResult<Arc<PublicSnapshot>> {
        self.public_cache.load(self.db.as_ref()).await
    }

    /// Drops the cached public data after a dashboard write.
    pub async fn revalidate(&self) {
        self.public_cache.invalidate().await;
    }
}

//=========================================================================================
// Public Snapshot Cache
//=========================================================================================

/// Everything the public pages read.
#[derive(Debug)]
pub struct PublicSnapshot {
    pub weekly: WeeklyHours,
    pub specials: Vec<SpecialPeriod>,
    pub products: Vec<KgProduct>,
}

#[derive(Default)]
pub struct PublicCache {
    snapshot: RwLock<Option<Arc<PublicSnapshot>>>,
}

impl PublicCache {
    pub async fn load(&self, db: &dyn DatabaseService) -> PortResult<Arc<PublicSnapshot>> {
        if let Some(snapshot) = self.snapshot.read().await.as_ref() {
            return Ok(snapshot.clone());
        }

        let mut slot = self.snapshot.write().await;
        // Another request may have filled the slot while we waited.
        if let Some(snapshot) = slot.as_ref() {
            return Ok(snapshot.clone());
        }

        let snapshot = Arc::new(PublicSnapshot {
            weekly: db.get_weekly_hours().await?,
            specials: db.list_special_periods().await?,
            products: db.list_products().await?,
        });
        debug!("Public snapshot reloaded from database");
        *slot = Some(snapshot.clone());
        Ok(snapshot)
    }

    pub async fn invalidate(&self) {
        *self.snapshot.write().await = None;
    }
}
