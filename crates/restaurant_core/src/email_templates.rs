//! crates/restaurant_core/src/email_templates.rs
//!
//! Renders the two KG-Verkauf emails: the customer confirmation and the
//! internal notification for the restaurant. Both carry a plain-text and an
//! HTML body; all customer input is escaped before it reaches the HTML.

use chrono::Datelike;

use crate::domain::{weekday_label_de, EmailMessage, KgOrderData, OrderSource};
use crate::orders::{format_chf, format_quantity, parse_pickup_date};

/// Restaurant details that appear in every order email.
#[derive(Debug, Clone)]
pub struct OrderMailContext {
    pub restaurant_name: String,
    /// Recipient of the internal notification.
    pub restaurant_email: String,
    pub restaurant_phone: String,
    /// Public site URL, used for links in the emails.
    pub base_url: String,
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// `Freitag, 23.10.2026`, or the raw value if it does not parse.
fn pickup_label(raw: &str) -> String {
    match parse_pickup_date(raw) {
        Some(date) => format!(
            "{}, {}",
            weekday_label_de(date.weekday()),
            date.format("%d.%m.%Y")
        ),
        None => raw.to_string(),
    }
}

fn source_label(source: OrderSource) -> &'static str {
    match source {
        OrderSource::Hero => "Startseite (Hero)",
        OrderSource::KgVerkaufSection => "KG-Verkauf Bereich",
    }
}

fn text_lines(order: &KgOrderData) -> String {
    order
        .products
        .iter()
        .map(|line| {
            format!(
                "- {} {} à {} = {}",
                format_quantity(line),
                line.product.name,
                format_chf(line.product.price),
                line.line_total().map(format_chf).unwrap_or_default()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn html_table(order: &KgOrderData) -> String {
    let rows: String = order
        .products
        .iter()
        .map(|line| {
            format!(
                "<tr><td>{}</td><td>{}</td><td style=\"text-align:right\">{}</td></tr>",
                escape_html(&line.product.name),
                escape_html(&format_quantity(line)),
                line.line_total().map(format_chf).unwrap_or_default()
            )
        })
        .collect();
    format!(
        "<table style=\"border-collapse:collapse;width:100%\">\
         <thead><tr><th align=\"left\">Produkt</th><th align=\"left\">Menge</th><th align=\"right\">Betrag</th></tr></thead>\
         <tbody>{rows}</tbody>\
         <tfoot><tr><td colspan=\"2\"><strong>Total (Richtpreis)</strong></td>\
         <td style=\"text-align:right\"><strong>{total}</strong></td></tr></tfoot></table>",
        total = format_chf(order.total_price)
    )
}

/// The confirmation sent to the customer.
pub fn confirmation_email(
    order: &KgOrderData,
    order_number: &str,
    ctx: &OrderMailContext,
) -> EmailMessage {
    let pickup = pickup_label(&order.pickup_date);
    let requests = order
        .special_requests
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty());

    let mut text_body = format!(
        "Guten Tag {name}\n\n\
         Vielen Dank für Ihre Bestellung bei {restaurant}. Wir haben sie erhalten und bereiten alles vor.\n\n\
         Bestellnummer: {order_number}\n\
         Abholung: {pickup}\n\n\
         {lines}\n\n\
         Total (Richtpreis): {total}\n\
         Bezahlt wird bei der Abholung; massgebend ist das effektive Gewicht.\n",
        name = order.customer_name.trim(),
        restaurant = ctx.restaurant_name,
        lines = text_lines(order),
        total = format_chf(order.total_price),
    );
    if let Some(requests) = requests {
        text_body.push_str(&format!("\nIhre Wünsche: {requests}\n"));
    }
    text_body.push_str(&format!(
        "\nFragen? Rufen Sie uns an: {phone}\n{url}\n\nFreundliche Grüsse\n{restaurant}\n",
        phone = ctx.restaurant_phone,
        url = ctx.base_url,
        restaurant = ctx.restaurant_name,
    ));

    let requests_html = requests
        .map(|r| format!("<p><strong>Ihre Wünsche:</strong> {}</p>", escape_html(r)))
        .unwrap_or_default();
    let html_body = format!(
        "<html><body style=\"font-family:sans-serif\">\
         <p>Guten Tag {name}</p>\
         <p>Vielen Dank für Ihre Bestellung bei {restaurant}. Wir haben sie erhalten und bereiten alles vor.</p>\
         <p><strong>Bestellnummer:</strong> {order_number}<br><strong>Abholung:</strong> {pickup}</p>\
         {table}{requests_html}\
         <p>Bezahlt wird bei der Abholung; massgebend ist das effektive Gewicht.</p>\
         <p>Fragen? Rufen Sie uns an: {phone}<br><a href=\"{url}\">{url}</a></p>\
         <p>Freundliche Grüsse<br>{restaurant}</p></body></html>",
        name = escape_html(order.customer_name.trim()),
        restaurant = escape_html(&ctx.restaurant_name),
        order_number = escape_html(order_number),
        pickup = escape_html(&pickup),
        table = html_table(order),
        phone = escape_html(&ctx.restaurant_phone),
        url = escape_html(&ctx.base_url),
    );

    EmailMessage {
        to: order.customer_email.trim().to_string(),
        reply_to: Some(ctx.restaurant_email.clone()),
        subject: format!("Ihre Bestellung {order_number} bei {}", ctx.restaurant_name),
        text_body,
        html_body,
    }
}

/// The internal notification sent to the restaurant.
pub fn notification_email(
    order: &KgOrderData,
    order_number: &str,
    source: OrderSource,
    ctx: &OrderMailContext,
) -> EmailMessage {
    let pickup = pickup_label(&order.pickup_date);
    let requests = order
        .special_requests
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .unwrap_or("keine");

    let text_body = format!(
        "Neue KG-Verkauf Bestellung {order_number}\n\n\
         Kunde: {name}\n\
         E-Mail: {email}\n\
         Telefon: {phone}\n\
         Abholung: {pickup}\n\
         Quelle: {source}\n\n\
         {lines}\n\n\
         Total (Richtpreis): {total}\n\n\
         Wünsche: {requests}\n",
        name = order.customer_name.trim(),
        email = order.customer_email.trim(),
        phone = order.customer_phone.trim(),
        source = source_label(source),
        lines = text_lines(order),
        total = format_chf(order.total_price),
    );

    let html_body = format!(
        "<html><body style=\"font-family:sans-serif\">\
         <h2>Neue KG-Verkauf Bestellung {order_number}</h2>\
         <p><strong>Kunde:</strong> {name}<br>\
         <strong>E-Mail:</strong> <a href=\"mailto:{email}\">{email}</a><br>\
         <strong>Telefon:</strong> {phone}<br>\
         <strong>Abholung:</strong> {pickup}<br>\
         <strong>Quelle:</strong> {source}</p>\
         {table}\
         <p><strong>Wünsche:</strong> {requests}</p></body></html>",
        order_number = escape_html(order_number),
        name = escape_html(order.customer_name.trim()),
        email = escape_html(order.customer_email.trim()),
        phone = escape_html(order.customer_phone.trim()),
        pickup = escape_html(&pickup),
        source = source_label(source),
        table = html_table(order),
        requests = escape_html(requests),
    );

    EmailMessage {
        to: ctx.restaurant_email.clone(),
        reply_to: Some(order.customer_email.trim().to_string()),
        subject: format!(
            "Neue KG-Bestellung {order_number} von {}",
            order.customer_name.trim()
        ),
        text_body,
        html_body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{KgOrderLine, KgProduct, ProductUnit};
    use rust_decimal::Decimal;

    fn ctx() -> OrderMailContext {
        OrderMailContext {
            restaurant_name: "Restaurant Sonne".to_string(),
            restaurant_email: "info@sonne.ch".to_string(),
            restaurant_phone: "044 123 45 67".to_string(),
            base_url: "https://sonne.ch".to_string(),
        }
    }

    fn order() -> KgOrderData {
        KgOrderData {
            products: vec![KgOrderLine {
                product: KgProduct {
                    id: "bratwurst".to_string(),
                    name: "Bratwurst".to_string(),
                    description: String::new(),
                    price: "24.50".parse().unwrap(),
                    unit: ProductUnit::Kg,
                    min_order: Decimal::ONE,
                    max_order: Decimal::TEN,
                    available: true,
                    preparation_time: "2 Tage".to_string(),
                },
                quantity: Decimal::TWO,
            }],
            customer_name: "Anna <b>Muster</b>".to_string(),
            customer_email: "anna@example.ch".to_string(),
            customer_phone: "079 123 45 67".to_string(),
            pickup_date: "2026-10-23".to_string(),
            special_requests: Some("Bitte dünn geschnitten".to_string()),
            total_price: "49.00".parse().unwrap(),
        }
    }

    #[test]
    fn confirmation_goes_to_customer_with_escaped_html() {
        let mail = confirmation_email(&order(), "KG-1", &ctx());
        assert_eq!(mail.to, "anna@example.ch");
        assert_eq!(mail.reply_to.as_deref(), Some("info@sonne.ch"));
        assert!(mail.subject.contains("KG-1"));
        assert!(mail.text_body.contains("Freitag, 23.10.2026"));
        assert!(mail.text_body.contains("CHF 49.00"));
        assert!(mail.text_body.contains("Bitte dünn geschnitten"));
        assert!(mail.html_body.contains("Anna &lt;b&gt;Muster&lt;/b&gt;"));
        assert!(!mail.html_body.contains("<b>Muster</b>"));
    }

    #[test]
    fn notification_goes_to_restaurant_with_source() {
        let mail = notification_email(&order(), "KG-1", OrderSource::Hero, &ctx());
        assert_eq!(mail.to, "info@sonne.ch");
        assert_eq!(mail.reply_to.as_deref(), Some("anna@example.ch"));
        assert!(mail.text_body.contains("Startseite (Hero)"));
        assert!(mail.text_body.contains("2 kg Bratwurst"));
        assert!(mail.text_body.contains("079 123 45 67"));
    }

    #[test]
    fn missing_requests_render_placeholder() {
        let mut o = order();
        o.special_requests = Some("   ".to_string());
        let mail = notification_email(&o, "KG-1", OrderSource::KgVerkaufSection, &ctx());
        assert!(mail.text_body.contains("Wünsche: keine"));
        let confirmation = confirmation_email(&o, "KG-1", &ctx());
        assert!(!confirmation.text_body.contains("Ihre Wünsche"));
    }
}
