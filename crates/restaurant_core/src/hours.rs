//! crates/restaurant_core/src/hours.rs
//!
//! The opening-hours resolver: derives the current open/closed status from the
//! weekly schedule, validates dashboard edits, and models the draft-then-save
//! editor used for the weekly schedule.

use std::sync::LazyLock;

use chrono::{DateTime, Datelike, Duration, NaiveTime, TimeZone, Utc, Weekday};
use chrono_tz::Tz;
use regex::Regex;

use crate::domain::{
    weekday_label_de, DayHours, RestaurantStatus, SpecialPeriod, StatusReason, WeeklyHours,
};
use crate::error::ValidationError;
use crate::special_hours::active_special_period;

static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").expect("time regex is valid"));

//=========================================================================================
// Time Strings
//=========================================================================================

/// Parses a strict 24h `HH:MM` string.
pub fn parse_time(field: &'static str, value: &str) -> Result<NaiveTime, ValidationError> {
    let invalid = || ValidationError::InvalidTimeFormat {
        field,
        value: value.to_string(),
    };
    if !TIME_RE.is_match(value) {
        return Err(invalid());
    }
    NaiveTime::parse_from_str(value, "%H:%M").map_err(|_| invalid())
}

pub fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

//=========================================================================================
// Status Resolution
//=========================================================================================

/// Resolves the status from the weekly schedule alone.
///
/// The interval is half-open: `open_time` counts as open, `close_time` as closed.
/// A day whose `close_time` is not after `open_time` never reports open.
pub fn restaurant_status(now: DateTime<Utc>, tz: Tz, weekly: &WeeklyHours) -> RestaurantStatus {
    let local = now.with_timezone(&tz);
    let hours = weekly.get(local.weekday());

    if !hours.is_open {
        return RestaurantStatus {
            is_open: false,
            reason: StatusReason::RegularHours,
            message: None,
        };
    }

    let time = local.time();
    if hours.open_time <= time && time < hours.close_time {
        RestaurantStatus {
            is_open: true,
            reason: StatusReason::RegularHours,
            message: None,
        }
    } else {
        RestaurantStatus {
            is_open: false,
            reason: StatusReason::OutsideHours,
            message: None,
        }
    }
}

/// The status shown on the public site. An active special period always wins
/// over the weekly schedule and contributes its banner message.
pub fn combined_status(
    now: DateTime<Utc>,
    tz: Tz,
    weekly: &WeeklyHours,
    specials: &[SpecialPeriod],
) -> RestaurantStatus {
    let today = now.with_timezone(&tz).date_naive();
    match active_special_period(today, specials) {
        Some(period) => RestaurantStatus {
            is_open: false,
            reason: StatusReason::SpecialClosure,
            message: Some(period.message.clone()),
        },
        None => restaurant_status(now, tz, weekly),
    }
}

/// Finds the next moment the restaurant opens within the coming week, skipping
/// days covered by an active special period.
pub fn next_opening(
    now: DateTime<Utc>,
    tz: Tz,
    weekly: &WeeklyHours,
    specials: &[SpecialPeriod],
) -> Option<DateTime<Tz>> {
    let local = now.with_timezone(&tz);
    let today = local.date_naive();

    (0..=7).find_map(|offset| {
        let date = today + Duration::days(offset);
        let hours = weekly.get(date.weekday());
        if !hours.is_open || hours.open_time >= hours.close_time {
            return None;
        }
        if active_special_period(date, specials).is_some() {
            return None;
        }
        let opening = date.and_time(hours.open_time);
        if opening <= local.naive_local() {
            return None;
        }
        tz.from_local_datetime(&opening).earliest()
    })
}

//=========================================================================================
// Dashboard Edits
//=========================================================================================

/// A partial update to one day, as submitted by the dashboard. Times are raw
/// `HH:MM` strings and are validated when applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayHoursPatch {
    pub is_open: Option<bool>,
    pub open_time: Option<String>,
    pub close_time: Option<String>,
}

fn check_day(hours: &DayHours) -> Result<(), ValidationError> {
    if hours.is_open && hours.open_time >= hours.close_time {
        return Err(ValidationError::InvertedTimeRange {
            day: weekday_label_de(hours.day),
        });
    }
    Ok(())
}

/// Applies `patch` on top of `current`, validating the result.
pub fn apply_patch(current: &DayHours, patch: &DayHoursPatch) -> Result<DayHours, ValidationError> {
    let open_time = match &patch.open_time {
        Some(value) => parse_time("openTime", value)?,
        None => current.open_time,
    };
    let close_time = match &patch.close_time {
        Some(value) => parse_time("closeTime", value)?,
        None => current.close_time,
    };
    let updated = DayHours {
        day: current.day,
        is_open: patch.is_open.unwrap_or(current.is_open),
        open_time,
        close_time,
    };
    check_day(&updated)?;
    Ok(updated)
}

//=========================================================================================
// Draft Editor
//=========================================================================================

/// A working copy of the weekly schedule. Edits stay local until the whole
/// week is committed in one batch; cancelling resets to the source of truth.
#[derive(Debug, Clone)]
pub struct WeeklyHoursDraft {
    persisted: WeeklyHours,
    draft: WeeklyHours,
}

impl WeeklyHoursDraft {
    pub fn new(persisted: WeeklyHours) -> Self {
        Self {
            draft: persisted.clone(),
            persisted,
        }
    }

    pub fn day(&self, day: Weekday) -> &DayHours {
        self.draft.get(day)
    }

    /// Validates and applies a patch to the local copy only.
    pub fn edit(&mut self, day: Weekday, patch: &DayHoursPatch) -> Result<&DayHours, ValidationError> {
        let updated = apply_patch(self.draft.get(day), patch)?;
        self.draft.set(updated);
        Ok(self.draft.get(day))
    }

    /// Applies one patch per weekday, as sent by the "Save" of the weekly
    /// editor. Every weekday must appear exactly once. All problems are
    /// collected; on any error the draft is left unchanged.
    pub fn apply_batch(&mut self, edits: Vec<(Weekday, DayHoursPatch)>) -> Result<(), Vec<ValidationError>> {
        let mut seen = [false; 7];
        let mut complete = edits.len() == 7;
        for (day, _) in &edits {
            let slot = &mut seen[day.num_days_from_monday() as usize];
            complete &= !*slot;
            *slot = true;
        }
        if !complete {
            return Err(vec![ValidationError::IncompleteWeek]);
        }

        let mut staged = self.draft.clone();
        let mut errors = Vec::new();
        for (day, patch) in &edits {
            match apply_patch(staged.get(*day), patch) {
                Ok(updated) => staged.set(updated),
                Err(e) => errors.push(e),
            }
        }
        if !errors.is_empty() {
            return Err(errors);
        }
        self.draft = staged;
        Ok(())
    }

    pub fn is_dirty(&self) -> bool {
        self.draft != self.persisted
    }

    pub fn changed_days(&self) -> Vec<&DayHours> {
        self.draft
            .iter()
            .filter(|d| self.persisted.get(d.day) != *d)
            .collect()
    }

    /// The batch to hand to the save call: always all seven days.
    pub fn commit(&self) -> WeeklyHours {
        self.draft.clone()
    }

    /// Records a successful save as the new source of truth.
    pub fn mark_saved(&mut self, saved: WeeklyHours) {
        self.draft = saved.clone();
        self.persisted = saved;
    }

    /// Discards local edits and adopts the freshly reloaded schedule.
    pub fn cancel(&mut self, reloaded: WeeklyHours) {
        self.mark_saved(reloaded);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::WEEK;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn t(value: &str) -> NaiveTime {
        NaiveTime::parse_from_str(value, "%H:%M").unwrap()
    }

    fn week_open(open: &str, close: &str) -> WeeklyHours {
        let days = WEEK
            .into_iter()
            .map(|day| DayHours {
                day,
                is_open: true,
                open_time: t(open),
                close_time: t(close),
            })
            .collect();
        WeeklyHours::from_days(days).unwrap()
    }

    /// 2026-10-19 is a Monday. Zurich is on CEST (UTC+2) until 2026-10-25.
    fn zurich(date: &str, time: &str) -> DateTime<Utc> {
        let naive = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .unwrap()
            .and_time(t(time));
        chrono_tz::Europe::Zurich
            .from_local_datetime(&naive)
            .single()
            .unwrap()
            .with_timezone(&Utc)
    }

    const TZ: Tz = chrono_tz::Europe::Zurich;

    #[test]
    fn parse_time_accepts_24h_and_rejects_malformed() {
        assert_eq!(parse_time("openTime", "09:30").unwrap(), t("09:30"));
        assert_eq!(parse_time("openTime", "23:59").unwrap(), t("23:59"));
        for bad in ["9:30", "24:00", "12:60", "12-30", "", "12:30:00", " 12:30"] {
            assert!(parse_time("openTime", bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn closed_day_reports_regular_hours_at_any_time() {
        let mut week = week_open("11:00", "22:00");
        week.set(DayHours {
            day: Weekday::Mon,
            is_open: false,
            open_time: t("11:00"),
            close_time: t("22:00"),
        });
        for time in ["00:00", "11:00", "15:30", "23:59"] {
            let status = restaurant_status(zurich("2026-10-19", time), TZ, &week);
            assert!(!status.is_open);
            assert_eq!(status.reason, StatusReason::RegularHours);
        }
    }

    #[test]
    fn boundaries_are_half_open() {
        let week = week_open("11:00", "22:00");
        assert!(restaurant_status(zurich("2026-10-19", "11:00"), TZ, &week).is_open);
        assert!(restaurant_status(zurich("2026-10-19", "21:59"), TZ, &week).is_open);

        let at_close = restaurant_status(zurich("2026-10-19", "22:00"), TZ, &week);
        assert!(!at_close.is_open);
        assert_eq!(at_close.reason, StatusReason::OutsideHours);

        let before = restaurant_status(zurich("2026-10-19", "10:59"), TZ, &week);
        assert!(!before.is_open);
        assert_eq!(before.reason, StatusReason::OutsideHours);
    }

    #[test]
    fn status_uses_local_time_not_utc() {
        // 09:30 UTC is 11:30 in Zurich during summer time.
        let week = week_open("11:00", "12:00");
        let now = NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
            .and_utc();
        assert!(restaurant_status(now, TZ, &week).is_open);
    }

    #[test]
    fn inverted_configuration_never_opens() {
        let week = week_open("22:00", "11:00");
        let status = restaurant_status(zurich("2026-10-19", "23:00"), TZ, &week);
        assert!(!status.is_open);
    }

    #[test]
    fn active_special_period_overrides_open_schedule() {
        let week = week_open("00:00", "23:59");
        let specials = vec![SpecialPeriod {
            id: Uuid::new_v4(),
            start_date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 10, 25).unwrap(),
            message: "Herbstferien".to_string(),
            is_active: true,
        }];
        let status = combined_status(zurich("2026-10-19", "12:00"), TZ, &week, &specials);
        assert!(!status.is_open);
        assert_eq!(status.reason, StatusReason::SpecialClosure);
        assert_eq!(status.message.as_deref(), Some("Herbstferien"));
    }

    #[test]
    fn inactive_special_period_is_ignored() {
        let week = week_open("00:00", "23:59");
        let specials = vec![SpecialPeriod {
            id: Uuid::new_v4(),
            start_date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            message: "Betriebsferien".to_string(),
            is_active: false,
        }];
        let status = combined_status(zurich("2026-10-19", "12:00"), TZ, &week, &specials);
        assert!(status.is_open);
    }

    #[test]
    fn next_opening_skips_closed_days_and_holidays() {
        let mut week = week_open("11:00", "22:00");
        week.set(DayHours {
            day: Weekday::Tue,
            is_open: false,
            open_time: t("11:00"),
            close_time: t("22:00"),
        });
        let specials = vec![SpecialPeriod {
            id: Uuid::new_v4(),
            start_date: NaiveDate::from_ymd_opt(2026, 10, 21).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 10, 21).unwrap(),
            message: "Geschlossen".to_string(),
            is_active: true,
        }];
        // Monday evening after close: Tuesday is closed, Wednesday is a holiday.
        let next = next_opening(zurich("2026-10-19", "22:30"), TZ, &week, &specials).unwrap();
        assert_eq!(next.date_naive(), NaiveDate::from_ymd_opt(2026, 10, 22).unwrap());
        assert_eq!(next.time(), t("11:00"));
    }

    #[test]
    fn apply_patch_validates_format_and_order() {
        let current = week_open("11:00", "22:00").get(Weekday::Fri).clone();

        let bad_format = DayHoursPatch {
            open_time: Some("7am".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            apply_patch(&current, &bad_format),
            Err(ValidationError::InvalidTimeFormat { field: "openTime", .. })
        ));

        let inverted = DayHoursPatch {
            close_time: Some("10:00".to_string()),
            ..Default::default()
        };
        assert_eq!(
            apply_patch(&current, &inverted),
            Err(ValidationError::InvertedTimeRange { day: "Freitag" })
        );

        // A closed day may keep any times.
        let closing = DayHoursPatch {
            is_open: Some(false),
            close_time: Some("10:00".to_string()),
            ..Default::default()
        };
        let closed = apply_patch(&current, &closing).unwrap();
        assert!(!closed.is_open);
    }

    fn full_batch(patch: DayHoursPatch) -> Vec<(Weekday, DayHoursPatch)> {
        WEEK.into_iter().map(|day| (day, patch.clone())).collect()
    }

    #[test]
    fn batch_requires_every_weekday_once() {
        let mut draft = WeeklyHoursDraft::new(week_open("11:00", "22:00"));
        let mut edits = full_batch(DayHoursPatch::default());
        edits.pop();
        assert_eq!(draft.apply_batch(edits), Err(vec![ValidationError::IncompleteWeek]));

        let mut duplicated = full_batch(DayHoursPatch::default());
        duplicated[6].0 = Weekday::Mon;
        assert_eq!(draft.apply_batch(duplicated), Err(vec![ValidationError::IncompleteWeek]));
    }

    #[test]
    fn batch_collects_all_errors_and_keeps_draft() {
        let mut draft = WeeklyHoursDraft::new(week_open("11:00", "22:00"));
        let mut edits = full_batch(DayHoursPatch::default());
        edits[0].1.open_time = Some("abc".to_string());
        edits[3].1.close_time = Some("09:00".to_string());
        let errors = draft.apply_batch(edits).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(!draft.is_dirty());
    }

    #[test]
    fn batch_applies_all_seven_days() {
        let mut draft = WeeklyHoursDraft::new(week_open("11:00", "22:00"));
        let edits = full_batch(DayHoursPatch {
            is_open: Some(true),
            open_time: Some("10:00".to_string()),
            close_time: Some("20:00".to_string()),
        });
        draft.apply_batch(edits).unwrap();
        assert_eq!(draft.changed_days().len(), 7);
        assert!(draft.commit().iter().all(|d| d.open_time == t("10:00")));
    }

    #[test]
    fn draft_edits_stay_local_until_commit_and_cancel_resets() {
        let persisted = week_open("11:00", "22:00");
        let mut draft = WeeklyHoursDraft::new(persisted.clone());
        assert!(!draft.is_dirty());

        draft
            .edit(
                Weekday::Sun,
                &DayHoursPatch {
                    is_open: Some(false),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(draft.is_dirty());
        assert_eq!(draft.changed_days().len(), 1);

        let batch = draft.commit();
        assert_eq!(batch.iter().count(), 7);
        assert!(!batch.get(Weekday::Sun).is_open);

        draft.cancel(persisted.clone());
        assert!(!draft.is_dirty());
        assert!(draft.day(Weekday::Sun).is_open);
    }

    #[test]
    fn failed_draft_edit_leaves_draft_untouched() {
        let persisted = week_open("11:00", "22:00");
        let mut draft = WeeklyHoursDraft::new(persisted);
        let result = draft.edit(
            Weekday::Mon,
            &DayHoursPatch {
                open_time: Some("23:00".to_string()),
                ..Default::default()
            },
        );
        assert!(result.is_err());
        assert!(!draft.is_dirty());
    }
}
