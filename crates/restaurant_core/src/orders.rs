//! crates/restaurant_core/src/orders.rs
//!
//! Validation and bookkeeping for KG-Verkauf pre-orders. Orders are never
//! stored; everything here works on the submitted `KgOrderData` alone.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use rust_decimal::Decimal;

use crate::domain::{KgOrderData, KgOrderLine, KgProduct, ProductUnit};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid"));

/// Outcome of [`validate_order_data`]. `errors` lists every violation found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderValidation {
    pub valid: bool,
    pub errors: Vec<String>,
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value.trim())
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp (date part only).
pub fn parse_pickup_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}

/// Checks a submitted order and collects all problems instead of stopping at
/// the first one, so the form can show a complete list.
pub fn validate_order_data(order: &KgOrderData, today: NaiveDate) -> OrderValidation {
    let mut errors = Vec::new();

    if order.customer_name.trim().is_empty() {
        errors.push("Name ist erforderlich".to_string());
    }
    if !is_valid_email(&order.customer_email) {
        errors.push("Gültige E-Mail-Adresse ist erforderlich".to_string());
    }
    if order.customer_phone.trim().is_empty() {
        errors.push("Telefonnummer ist erforderlich".to_string());
    }

    if order.pickup_date.trim().is_empty() {
        errors.push("Abholdatum ist erforderlich".to_string());
    } else {
        match parse_pickup_date(&order.pickup_date) {
            None => errors.push(format!("Abholdatum '{}' ist ungültig", order.pickup_date)),
            Some(date) if date < today => {
                errors.push("Abholdatum darf nicht in der Vergangenheit liegen".to_string())
            }
            Some(_) => {}
        }
    }

    if order.products.is_empty() {
        errors.push("Mindestens ein Produkt muss ausgewählt werden".to_string());
    }
    for line in &order.products {
        errors.extend(validate_line(line));
    }

    OrderValidation {
        valid: errors.is_empty(),
        errors,
    }
}

fn validate_line(line: &KgOrderLine) -> Option<String> {
    let product = &line.product;
    let unit = product.unit.label();
    if !product.available {
        Some(format!("{} ist derzeit nicht verfügbar", product.name))
    } else if line.quantity <= Decimal::ZERO {
        Some(format!("{}: Menge muss grösser als 0 sein", product.name))
    } else if product.unit != ProductUnit::Kg && !line.quantity.fract().is_zero() {
        Some(format!("{}: Menge muss eine ganze Zahl ({unit}) sein", product.name))
    } else if line.quantity < product.min_order {
        Some(format!(
            "{}: Mindestbestellmenge ist {} {}",
            product.name,
            product.min_order.normalize(),
            unit
        ))
    } else if line.quantity > product.max_order {
        Some(format!(
            "{}: Maximale Bestellmenge ist {} {}",
            product.name,
            product.max_order.normalize(),
            unit
        ))
    } else {
        None
    }
}

/// Swaps the submitted product snapshots for the current catalog entries and
/// recomputes the total. Lines naming an unknown product are dropped and
/// reported.
pub fn reconcile_with_catalog(order: KgOrderData, catalog: &[KgProduct]) -> (KgOrderData, Vec<String>) {
    let mut errors = Vec::new();
    let products: Vec<KgOrderLine> = order
        .products
        .into_iter()
        .filter_map(|line| match catalog.iter().find(|p| p.id == line.product.id) {
            Some(current) => Some(KgOrderLine {
                product: current.clone(),
                quantity: line.quantity,
            }),
            None => {
                let label = if line.product.name.trim().is_empty() {
                    &line.product.id
                } else {
                    &line.product.name
                };
                errors.push(format!("Unbekanntes Produkt: {label}"));
                None
            }
        })
        .collect();
    let total_price = order_total(&products).unwrap_or_else(|| {
        errors.push("Bestellmenge ausserhalb des zulässigen Bereichs".to_string());
        Decimal::ZERO
    });
    (
        KgOrderData {
            products,
            total_price,
            ..order
        },
        errors,
    )
}

/// Sum of all lines rounded to centimes, or `None` on overflow.
pub fn order_total(lines: &[KgOrderLine]) -> Option<Decimal> {
    lines
        .iter()
        .try_fold(Decimal::ZERO, |total, line| total.checked_add(line.line_total()?))
        .map(|total| total.round_dp(2))
}

/// A time-based order reference, e.g. `KG-261019143012087`.
pub fn generate_order_number(now: DateTime<Utc>) -> String {
    format!(
        "KG-{}{:03}",
        now.format("%y%m%d%H%M%S"),
        now.timestamp_subsec_millis()
    )
}

pub fn format_chf(amount: Decimal) -> String {
    format!("CHF {:.2}", amount.round_dp(2))
}

pub fn format_quantity(line: &KgOrderLine) -> String {
    format!("{} {}", line.quantity.normalize(), line.product.unit.label())
}

/// One-line overview such as `1.5 kg Bratwurst, 4 Stk. Cervelat`.
pub fn product_summary(order: &KgOrderData) -> String {
    order
        .products
        .iter()
        .map(|line| format!("{} {}", format_quantity(line), line.product.name))
        .collect::<Vec<_>>()
        .join(", ")
}
