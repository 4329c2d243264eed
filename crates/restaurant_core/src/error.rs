//! Validation errors raised by the dashboard editors.
//!
//! These are always recoverable: the caller shows the message next to the
//! offending field and lets the user correct it.

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field}: '{value}' ist keine gültige Uhrzeit (HH:MM)")]
    InvalidTimeFormat { field: &'static str, value: String },

    /// `day` carries the German weekday label.
    #[error("{day}: Öffnungszeit muss vor der Schliesszeit liegen")]
    InvertedTimeRange { day: &'static str },

    #[error("Der Wochenplan muss jeden Wochentag genau einmal enthalten")]
    IncompleteWeek,

    #[error("Startdatum {start} liegt nach dem Enddatum {end}")]
    InvertedDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Die Banner-Nachricht darf nicht leer sein")]
    EmptyMessage,

    #[error("Die Banner-Nachricht ist zu lang (maximal {max} Zeichen)")]
    MessageTooLong { max: usize },

    #[error("Preis darf nicht negativ sein")]
    NegativePrice,
}
