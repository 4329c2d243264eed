//! crates/restaurant_core/src/domain.rs
//!
//! Defines the pure, core data structures for the restaurant backend.
//! These structs are independent of any database or serialization format.

use chrono::{NaiveDate, NaiveTime, Weekday};
use rust_decimal::Decimal;
use uuid::Uuid;

//=========================================================================================
// Weekly Opening Hours
//=========================================================================================

/// All weekdays in the order the schedule is stored and displayed.
pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// The lowercase English weekday name used as the storage and URL key.
pub fn weekday_key(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

/// Parses a weekday key produced by [`weekday_key`]. Case-insensitive.
pub fn parse_weekday_key(key: &str) -> Option<Weekday> {
    WEEK.into_iter()
        .find(|day| weekday_key(*day).eq_ignore_ascii_case(key.trim()))
}

/// German display name, used in emails and banners.
pub fn weekday_label_de(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Montag",
        Weekday::Tue => "Dienstag",
        Weekday::Wed => "Mittwoch",
        Weekday::Thu => "Donnerstag",
        Weekday::Fri => "Freitag",
        Weekday::Sat => "Samstag",
        Weekday::Sun => "Sonntag",
    }
}

/// The regular opening hours of a single weekday.
///
/// `open_time` and `close_time` are only meaningful while `is_open` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayHours {
    pub day: Weekday,
    pub is_open: bool,
    pub open_time: NaiveTime,
    pub close_time: NaiveTime,
}

/// The recurring weekly baseline schedule: exactly one entry per weekday.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyHours {
    days: [DayHours; 7],
}

impl WeeklyHours {
    /// Builds a schedule from an unordered list of days.
    ///
    /// Returns `None` unless every weekday appears exactly once.
    pub fn from_days(days: Vec<DayHours>) -> Option<Self> {
        if days.len() != 7 {
            return None;
        }
        let mut slots: [Option<DayHours>; 7] = Default::default();
        for day in days {
            let slot = &mut slots[day.day.num_days_from_monday() as usize];
            if slot.is_some() {
                return None;
            }
            *slot = Some(day);
        }
        let [mon, tue, wed, thu, fri, sat, sun] = slots;
        Some(Self {
            days: [mon?, tue?, wed?, thu?, fri?, sat?, sun?],
        })
    }

    pub fn get(&self, day: Weekday) -> &DayHours {
        &self.days[day.num_days_from_monday() as usize]
    }

    /// Replaces the entry for `hours.day`.
    pub fn set(&mut self, hours: DayHours) {
        let index = hours.day.num_days_from_monday() as usize;
        self.days[index] = hours;
    }

    /// Iterates Monday through Sunday.
    pub fn iter(&self) -> impl Iterator<Item = &DayHours> {
        self.days.iter()
    }

    pub fn into_days(self) -> Vec<DayHours> {
        self.days.into()
    }
}

//=========================================================================================
// Special Hours / Holidays
//=========================================================================================

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// True when both ranges share at least one day.
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

/// A dated override period (holiday, closure) that suspends the weekly schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialPeriod {
    pub id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Customer-facing banner text, e.g. "Sommerferien".
    pub message: String,
    pub is_active: bool,
}

impl SpecialPeriod {
    pub fn range(&self) -> DateRange {
        DateRange::new(self.start_date, self.end_date)
    }
}

/// The editable fields of a special period, used for create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialPeriodInput {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub message: String,
    pub is_active: bool,
}

impl SpecialPeriodInput {
    pub fn range(&self) -> DateRange {
        DateRange::new(self.start_date, self.end_date)
    }
}

//=========================================================================================
// Derived Status
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusReason {
    RegularHours,
    SpecialClosure,
    OutsideHours,
}

impl StatusReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusReason::RegularHours => "regular-hours",
            StatusReason::SpecialClosure => "special-closure",
            StatusReason::OutsideHours => "outside-hours",
        }
    }
}

/// Whether the restaurant is open right now, and why. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestaurantStatus {
    pub is_open: bool,
    pub reason: StatusReason,
    pub message: Option<String>,
}

//=========================================================================================
// KG-Verkauf Products & Orders
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductUnit {
    Kg,
    Stk,
    Pack,
}

impl ProductUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductUnit::Kg => "kg",
            ProductUnit::Stk => "stk",
            ProductUnit::Pack => "pack",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "kg" => Some(ProductUnit::Kg),
            "stk" => Some(ProductUnit::Stk),
            "pack" => Some(ProductUnit::Pack),
            _ => None,
        }
    }

    /// Short label as printed next to a quantity.
    pub fn label(&self) -> &'static str {
        match self {
            ProductUnit::Kg => "kg",
            ProductUnit::Stk => "Stk.",
            ProductUnit::Pack => "Pack",
        }
    }
}

/// A product offered for pre-order. Prices are in CHF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KgProduct {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub unit: ProductUnit,
    pub min_order: Decimal,
    pub max_order: Decimal,
    pub available: bool,
    pub preparation_time: String,
}

/// The only fields the dashboard may change on a product.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductPatch {
    pub price: Option<Decimal>,
    pub available: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KgOrderLine {
    pub product: KgProduct,
    pub quantity: Decimal,
}

impl KgOrderLine {
    /// `None` when the product leaves the decimal range.
    pub fn line_total(&self) -> Option<Decimal> {
        self.product.price.checked_mul(self.quantity)
    }
}

/// A submitted pre-order. Built per request and discarded after dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KgOrderData {
    pub products: Vec<KgOrderLine>,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    /// `YYYY-MM-DD`, parsed during validation.
    pub pickup_date: String,
    pub special_requests: Option<String>,
    pub total_price: Decimal,
}

/// Which call-to-action on the public site the order came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderSource {
    Hero,
    #[default]
    KgVerkaufSection,
}

impl OrderSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSource::Hero => "hero",
            OrderSource::KgVerkaufSection => "kg-verkauf-section",
        }
    }
}

//=========================================================================================
// Outgoing Mail
//=========================================================================================

/// A fully rendered email, ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}
