//! services/api/src/web/orders.rs
//!
//! KG-Verkauf pre-order submission: validates the order against the live
//! catalog and sends the customer confirmation and restaurant notification.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use restaurant_core::{
    notifications::{send_order_emails, Delivery},
    orders::{product_summary, reconcile_with_catalog, validate_order_data},
};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::web::{dto::*, state::AppState};

fn order_error(status: StatusCode, error: &str, details: Option<Vec<String>>) -> Response {
    (
        status,
        Json(OrderErrorResponse {
            success: false,
            error: error.to_string(),
            details,
        }),
    )
        .into_response()
}

fn delivery_message(delivery: Delivery, phone: &str) -> String {
    match delivery {
        Delivery::Both => {
            "Vielen Dank! Ihre Bestellung ist eingegangen. Eine Bestätigung wurde an Ihre E-Mail-Adresse gesendet.".to_string()
        }
        Delivery::ConfirmationOnly => format!(
            "Ihre Bestätigung wurde versendet, die Benachrichtigung an das Restaurant ist jedoch fehlgeschlagen. Bitte rufen Sie uns unter {phone} an."
        ),
        Delivery::NotificationOnly => {
            "Ihre Bestellung ist beim Restaurant eingegangen, die Bestätigungs-E-Mail konnte jedoch nicht versendet werden.".to_string()
        }
        Delivery::Neither => format!(
            "Ihre Bestellung konnte nicht per E-Mail übermittelt werden. Bitte rufen Sie uns unter {phone} an."
        ),
    }
}

/// Validates a pre-order and sends both order emails.
///
/// Any validation error rejects the order with 400 before a mail is sent.
/// Once validation passes the answer is 200 even if a send failed; the
/// per-email flags and `errors` tell the caller what went out.
#[utoipa::path(
    post,
    path = "/api/send-order-emails",
    request_body = SendOrderEmailsRequest,
    responses(
        (status = 200, description = "Order accepted; see per-email flags", body = SendOrderEmailsResponse),
        (status = 400, description = "Invalid order", body = OrderErrorResponse),
        (status = 500, description = "Internal server error", body = OrderErrorResponse)
    )
)]
pub async fn send_order_emails_handler(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<SendOrderEmailsRequest>, JsonRejection>,
) -> Response {
    // 1. Parse the request envelope
    let (order_dto, source) = match payload {
        Ok(Json(SendOrderEmailsRequest {
            order_data: Some(order_data),
            order_source,
        })) => (order_data, order_source),
        Ok(_) => return order_error(StatusCode::BAD_REQUEST, "Ungültige Bestelldaten", None),
        Err(rejection) => {
            warn!("Rejected order payload: {}", rejection.body_text());
            return order_error(StatusCode::BAD_REQUEST, "Ungültige Bestelldaten", None);
        }
    };

    // 2. Swap submitted product details for the current catalog
    let snapshot = match app_state.public_snapshot().await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            error!("Failed to load product catalog: {:?}", e);
            return order_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Interner Serverfehler",
                None,
            );
        }
    };
    let (order, mut errors) = reconcile_with_catalog(order_dto.into_domain(), &snapshot.products);

    // 3. Validate everything and report all problems at once
    errors.extend(validate_order_data(&order, app_state.today()).errors);
    if !errors.is_empty() {
        info!(error_count = errors.len(), "Order rejected by validation");
        return order_error(
            StatusCode::BAD_REQUEST,
            "Ungültige Bestelldaten",
            Some(errors),
        );
    }

    // 4. Send both emails
    let outcome = send_order_emails(
        app_state.mailer.as_ref(),
        &order,
        source.into(),
        &app_state.mail_context(),
        app_state.now(),
    )
    .await;

    let message = delivery_message(outcome.delivery(), &app_state.config.restaurant_phone);
    Json(SendOrderEmailsResponse {
        success: true,
        confirmation_sent: outcome.confirmation_sent,
        notification_sent: outcome.notification_sent,
        order_number: outcome.order_number,
        product_summary: product_summary(&order),
        errors: outcome.errors,
        message,
    })
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_delivery_points_to_the_phone() {
        let msg = delivery_message(Delivery::ConfirmationOnly, "044 123 45 67");
        assert!(msg.contains("044 123 45 67"));
        let msg = delivery_message(Delivery::Neither, "044 123 45 67");
        assert!(msg.contains("044 123 45 67"));
        assert!(!delivery_message(Delivery::Both, "044 123 45 67").contains("044"));
    }
}
