//! crates/restaurant_core/src/notifications.rs
//!
//! Fans a validated order out to the customer confirmation and the restaurant
//! notification. Both sends are attempted once and concurrently; a failure of
//! one never blocks the other.

use chrono::{DateTime, Utc};
use tracing::{error, info};

use crate::domain::{KgOrderData, OrderSource};
use crate::email_templates::{confirmation_email, notification_email, OrderMailContext};
use crate::orders::generate_order_number;
use crate::ports::MailService;

/// Which of the two emails went out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Both,
    ConfirmationOnly,
    NotificationOnly,
    Neither,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderEmailOutcome {
    pub confirmation_sent: bool,
    pub notification_sent: bool,
    pub order_number: String,
    pub errors: Vec<String>,
}

impl OrderEmailOutcome {
    pub fn delivery(&self) -> Delivery {
        match (self.confirmation_sent, self.notification_sent) {
            (true, true) => Delivery::Both,
            (true, false) => Delivery::ConfirmationOnly,
            (false, true) => Delivery::NotificationOnly,
            (false, false) => Delivery::Neither,
        }
    }
}

/// Renders and sends both order emails.
///
/// The order must already be validated. Transport errors end up in
/// `errors`; this function itself never fails.
pub async fn send_order_emails(
    mailer: &dyn MailService,
    order: &KgOrderData,
    source: OrderSource,
    ctx: &OrderMailContext,
    now: DateTime<Utc>,
) -> OrderEmailOutcome {
    let order_number = generate_order_number(now);
    let confirmation = confirmation_email(order, &order_number, ctx);
    let notification = notification_email(order, &order_number, source, ctx);

    let (confirmation_result, notification_result) =
        futures::join!(mailer.send(&confirmation), mailer.send(&notification));

    let mut errors = Vec::new();
    let confirmation_sent = match confirmation_result {
        Ok(()) => {
            info!(order_number = %order_number, "Order confirmation sent to customer");
            true
        }
        Err(e) => {
            error!(order_number = %order_number, "Failed to send order confirmation: {:?}", e);
            errors.push(format!("Bestätigung an Kunden fehlgeschlagen: {e}"));
            false
        }
    };
    let notification_sent = match notification_result {
        Ok(()) => {
            info!(order_number = %order_number, "Order notification sent to restaurant");
            true
        }
        Err(e) => {
            error!(order_number = %order_number, "Failed to send order notification: {:?}", e);
            errors.push(format!("Benachrichtigung an Restaurant fehlgeschlagen: {e}"));
            false
        }
    };

    OrderEmailOutcome {
        confirmation_sent,
        notification_sent,
        order_number,
        errors,
    }
}
