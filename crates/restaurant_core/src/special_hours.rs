//! crates/restaurant_core/src/special_hours.rs
//!
//! Holiday and closure periods that override the weekly schedule.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{DateRange, SpecialPeriod, SpecialPeriodInput};
use crate::error::ValidationError;

pub const MAX_MESSAGE_LEN: usize = 500;

/// Active periods that intersect a candidate range.
///
/// A non-empty result is advisory: callers decide whether to block the save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictCheckResult {
    pub has_conflict: bool,
    pub conflicts: Vec<SpecialPeriod>,
}

/// Returns the period in effect on `today`, if any.
///
/// When several active periods cover the same day, the one that started
/// earliest wins (ties broken by id).
pub fn active_special_period(today: NaiveDate, periods: &[SpecialPeriod]) -> Option<&SpecialPeriod> {
    periods
        .iter()
        .filter(|p| p.is_active && p.range().contains(today))
        .min_by_key(|p| (p.start_date, p.id))
}

/// Finds every active period whose inclusive range shares a day with `candidate`.
///
/// `exclude` skips the period being edited so it does not conflict with itself.
pub fn check_date_conflicts(
    candidate: DateRange,
    existing: &[SpecialPeriod],
    exclude: Option<Uuid>,
) -> ConflictCheckResult {
    let conflicts: Vec<SpecialPeriod> = existing
        .iter()
        .filter(|p| p.is_active && Some(p.id) != exclude)
        .filter(|p| p.range().overlaps(&candidate))
        .cloned()
        .collect();
    ConflictCheckResult {
        has_conflict: !conflicts.is_empty(),
        conflicts,
    }
}

/// Normalizes and validates a create/update payload.
pub fn validate_special_period(input: SpecialPeriodInput) -> Result<SpecialPeriodInput, ValidationError> {
    if input.start_date > input.end_date {
        return Err(ValidationError::InvertedDateRange {
            start: input.start_date,
            end: input.end_date,
        });
    }
    let message = input.message.trim().to_string();
    if message.is_empty() {
        return Err(ValidationError::EmptyMessage);
    }
    if message.chars().count() > MAX_MESSAGE_LEN {
        return Err(ValidationError::MessageTooLong {
            max: MAX_MESSAGE_LEN,
        });
    }
    Ok(SpecialPeriodInput { message, ..input })
}

/// Active periods that have not ended yet, soonest first. Feeds the public
/// holiday list.
pub fn upcoming_special_periods(today: NaiveDate, periods: &[SpecialPeriod]) -> Vec<SpecialPeriod> {
    let mut upcoming: Vec<SpecialPeriod> = periods
        .iter()
        .filter(|p| p.is_active && p.end_date >= today)
        .cloned()
        .collect();
    upcoming.sort_by_key(|p| (p.start_date, p.id));
    upcoming
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
    }

    fn period(start: &str, end: &str, message: &str, is_active: bool) -> SpecialPeriod {
        SpecialPeriod {
            id: Uuid::new_v4(),
            start_date: date(start),
            end_date: date(end),
            message: message.to_string(),
            is_active,
        }
    }

    #[test]
    fn active_period_covers_inclusive_range() {
        let periods = vec![period("2026-07-01", "2026-07-10", "Sommerferien", true)];
        assert!(active_special_period(date("2026-06-30"), &periods).is_none());
        assert!(active_special_period(date("2026-07-01"), &periods).is_some());
        assert!(active_special_period(date("2026-07-10"), &periods).is_some());
        assert!(active_special_period(date("2026-07-11"), &periods).is_none());
    }

    #[test]
    fn inactive_period_is_never_active() {
        let periods = vec![period("2026-07-01", "2026-07-10", "Sommerferien", false)];
        assert!(active_special_period(date("2026-07-05"), &periods).is_none());
    }

    #[test]
    fn overlapping_active_periods_pick_earliest_start() {
        let periods = vec![
            period("2026-12-24", "2026-12-26", "Weihnachten", true),
            period("2026-12-20", "2027-01-05", "Betriebsferien", true),
        ];
        let active = active_special_period(date("2026-12-25"), &periods).unwrap();
        assert_eq!(active.message, "Betriebsferien");
    }

    #[test]
    fn conflicts_found_for_any_shared_day() {
        let existing = vec![period("2026-07-01", "2026-07-10", "A", true)];
        let touching = DateRange::new(date("2026-07-10"), date("2026-07-20"));
        let result = check_date_conflicts(touching, &existing, None);
        assert!(result.has_conflict);
        assert_eq!(result.conflicts.len(), 1);

        let inside = DateRange::new(date("2026-07-03"), date("2026-07-04"));
        assert!(check_date_conflicts(inside, &existing, None).has_conflict);
    }

    #[test]
    fn adjacent_ranges_do_not_conflict() {
        let existing = vec![period("2026-07-01", "2026-07-10", "A", true)];
        let next = DateRange::new(date("2026-07-11"), date("2026-07-20"));
        let result = check_date_conflicts(next, &existing, None);
        assert!(!result.has_conflict);
        assert!(result.conflicts.is_empty());
    }

    #[test]
    fn inactive_and_excluded_periods_do_not_conflict() {
        let edited = period("2026-07-01", "2026-07-10", "A", true);
        let existing = vec![edited.clone(), period("2026-07-05", "2026-07-06", "B", false)];
        let candidate = DateRange::new(date("2026-07-02"), date("2026-07-08"));
        assert!(!check_date_conflicts(candidate, &existing, Some(edited.id)).has_conflict);
    }

    #[test]
    fn validation_rejects_inverted_and_empty() {
        let inverted = SpecialPeriodInput {
            start_date: date("2026-07-10"),
            end_date: date("2026-07-01"),
            message: "Ferien".to_string(),
            is_active: true,
        };
        assert!(matches!(
            validate_special_period(inverted),
            Err(ValidationError::InvertedDateRange { .. })
        ));

        let empty = SpecialPeriodInput {
            start_date: date("2026-07-01"),
            end_date: date("2026-07-01"),
            message: "   ".to_string(),
            is_active: true,
        };
        assert_eq!(validate_special_period(empty), Err(ValidationError::EmptyMessage));
    }

    #[test]
    fn validation_trims_message_and_allows_single_day() {
        let input = SpecialPeriodInput {
            start_date: date("2026-08-01"),
            end_date: date("2026-08-01"),
            message: "  Nationalfeiertag ".to_string(),
            is_active: true,
        };
        let valid = validate_special_period(input).unwrap();
        assert_eq!(valid.message, "Nationalfeiertag");
    }

    #[test]
    fn upcoming_lists_unfinished_active_periods_in_order() {
        let periods = vec![
            period("2026-12-24", "2026-12-26", "Weihnachten", true),
            period("2026-01-01", "2026-01-02", "Neujahr", true),
            period("2026-10-01", "2026-10-30", "Herbst", true),
            period("2026-11-01", "2026-11-01", "Entwurf", false),
        ];
        let upcoming = upcoming_special_periods(date("2026-10-19"), &periods);
        let messages: Vec<&str> = upcoming.iter().map(|p| p.message.as_str()).collect();
        assert_eq!(messages, vec!["Herbst", "Weihnachten"]);
    }
}
