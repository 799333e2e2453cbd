//! Normalized event model.
//!
//! Providers hand over loosely-typed `EventRecord`s. They are resolved into
//! `Event`s once per run, at which point reminders are final and the event
//! has been validated. Everything downstream only reads `Event`s.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CalNotifyError, CalNotifyResult};

/// Key under which providers store a video-call link in `other`.
pub const HANGOUT_LINK: &str = "hangoutLink";

/// A calendar event with resolved reminders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Label of the owning calendar (its section name in the config)
    #[serde(rename = "calendar")]
    pub calendar_label: String,
    /// Provider color code, e.g. "1".."11" for Google
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_id: Option<String>,
    /// Minutes before start, sorted descending
    #[serde(default)]
    pub reminders: Vec<u32>,
    /// Provider-specific extras (conference links etc.)
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub other: Map<String, Value>,
}

/// An event as delivered by a provider or read back from the cache.
///
/// Every field is optional on the wire so that a missing start or end
/// surfaces as a validation error naming the event instead of a generic
/// parse failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventRecord {
    pub start: Option<DateTime<FixedOffset>>,
    pub end: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub calendar: Option<String>,
    #[serde(default)]
    pub color_id: Option<String>,
    /// `None` means "use the calendar's default reminders"
    #[serde(default)]
    pub reminders: Option<Vec<i64>>,
    #[serde(default)]
    pub other: Map<String, Value>,
}

impl EventRecord {
    /// Resolve the record into an `Event` owned by `calendar_label`.
    ///
    /// Reminders fall back to `default_reminders` when the record carries none.
    pub fn resolve(self, calendar_label: &str, default_reminders: &[u32]) -> CalNotifyResult<Event> {
        let start = self
            .start
            .ok_or_else(|| CalNotifyError::invalid_event(&self.summary, "missing start"))?;
        let end = self
            .end
            .ok_or_else(|| CalNotifyError::invalid_event(&self.summary, "missing end"))?;

        let reminders = match self.reminders {
            Some(offsets) => normalize_reminders(offsets),
            None => default_reminders.to_vec(),
        };

        let event = Event {
            start,
            end,
            summary: self.summary,
            description: self.description,
            calendar_label: calendar_label.to_string(),
            color_id: self.color_id,
            reminders,
            other: self.other,
        };
        event.validate()?;

        Ok(event)
    }
}

impl Event {
    /// Check the invariants every event must satisfy before it is used.
    pub fn validate(&self) -> CalNotifyResult<()> {
        if self.end <= self.start {
            return Err(CalNotifyError::invalid_event(
                &self.summary,
                format!("end ({}) is not after start ({})", self.end, self.start),
            ));
        }
        Ok(())
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Events lasting a day or more are shown without a start time.
    pub fn is_multi_day(&self) -> bool {
        self.duration() >= Duration::days(1)
    }

    /// Video-call link stored by the provider, if any.
    pub fn link(&self) -> Option<&str> {
        self.other.get(HANGOUT_LINK).and_then(Value::as_str)
    }

    /// First and last calendar date the event touches, seen from `offset`.
    ///
    /// An event ending exactly at midnight does not touch the following day.
    pub fn span_dates(&self, offset: &FixedOffset) -> (NaiveDate, NaiveDate) {
        let first = self.start.with_timezone(offset).date_naive();
        let last = (self.end - Duration::seconds(1))
            .with_timezone(offset)
            .date_naive();
        (first, last.max(first))
    }
}

/// Drop negative offsets, deduplicate and sort descending.
pub fn normalize_reminders(offsets: impl IntoIterator<Item = i64>) -> Vec<u32> {
    let mut reminders: Vec<u32> = offsets
        .into_iter()
        .filter_map(|minutes| u32::try_from(minutes).ok())
        .collect();
    reminders.sort_unstable_by(|a, b| b.cmp(a));
    reminders.dedup();
    reminders
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::TimeZone;

    pub(crate) fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .and_then(|tz| tz.with_ymd_and_hms(y, m, d, h, min, 0).single())
            .unwrap()
    }

    pub(crate) fn event(summary: &str, start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Event {
        Event {
            start,
            end,
            summary: summary.to_string(),
            description: None,
            calendar_label: "personal".to_string(),
            color_id: None,
            reminders: vec![],
            other: Map::new(),
        }
    }

    #[test]
    fn test_resolve_uses_calendar_default_when_record_has_no_reminders() {
        let record = EventRecord {
            start: Some(at(2024, 3, 20, 15, 0)),
            end: Some(at(2024, 3, 20, 16, 0)),
            summary: "Standup".to_string(),
            ..Default::default()
        };

        let event = record.resolve("work", &[10, 5]).unwrap();

        assert_eq!(event.reminders, vec![10, 5]);
        assert_eq!(event.calendar_label, "work");
    }

    #[test]
    fn test_resolve_keeps_own_reminders_sorted_descending() {
        let record = EventRecord {
            start: Some(at(2024, 3, 20, 15, 0)),
            end: Some(at(2024, 3, 20, 16, 0)),
            summary: "Standup".to_string(),
            reminders: Some(vec![5, 30, -2, 5, 10]),
            ..Default::default()
        };

        let event = record.resolve("work", &[60]).unwrap();

        assert_eq!(event.reminders, vec![30, 10, 5]);
    }

    #[test]
    fn test_resolve_rejects_missing_start() {
        let record = EventRecord {
            end: Some(at(2024, 3, 20, 16, 0)),
            summary: "Broken".to_string(),
            ..Default::default()
        };

        let err = record.resolve("work", &[]).unwrap_err();

        assert!(matches!(err, CalNotifyError::InvalidEvent { ref summary, .. } if summary == "Broken"));
        assert!(err.to_string().contains("missing start"));
    }

    #[test]
    fn test_validate_rejects_end_before_start() {
        let broken = event("Backwards", at(2024, 3, 20, 16, 0), at(2024, 3, 20, 15, 0));
        assert!(broken.validate().is_err());

        let empty = event("Instant", at(2024, 3, 20, 16, 0), at(2024, 3, 20, 16, 0));
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_span_dates_excludes_midnight_end() {
        let utc = FixedOffset::east_opt(0).unwrap();

        let all_day = event("Holiday", at(2024, 1, 31, 0, 0), at(2024, 2, 1, 0, 0));
        assert_eq!(
            all_day.span_dates(&utc),
            (NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(), NaiveDate::from_ymd_opt(2024, 1, 31).unwrap())
        );

        let crossing = event("Late", at(2024, 1, 31, 22, 0), at(2024, 2, 1, 1, 0));
        assert_eq!(
            crossing.span_dates(&utc),
            (NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap())
        );
    }

    #[test]
    fn test_link_reads_hangout_link() {
        let mut meeting = event("Call", at(2024, 1, 31, 10, 0), at(2024, 1, 31, 11, 0));
        assert_eq!(meeting.link(), None);

        meeting
            .other
            .insert(HANGOUT_LINK.to_string(), Value::String("https://meet.example/abc".into()));
        assert_eq!(meeting.link(), Some("https://meet.example/abc"));
    }
}
