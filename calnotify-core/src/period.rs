//! Time periods bounding both event fetching and rendering.

use chrono::{DateTime, Datelike, Days, Duration, FixedOffset, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{CalNotifyError, CalNotifyResult};
use crate::event::Event;
use crate::render::Format;

/// First day of the week in week and month views.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    pub fn weekday(self) -> Weekday {
        match self {
            WeekStart::Sunday => Weekday::Sun,
            WeekStart::Monday => Weekday::Mon,
        }
    }

    /// The seven weekdays in display order.
    pub fn weekdays(self) -> impl Iterator<Item = Weekday> {
        let first = self.weekday();
        (0..7u8).scan(first, |day, _| {
            let current = *day;
            *day = day.succ();
            Some(current)
        })
    }

    /// Position of `date` within its week (0 for the first day of the week).
    pub fn position(self, date: NaiveDate) -> usize {
        let day = date.weekday().num_days_from_sunday();
        let first = self.weekday().num_days_from_sunday();
        ((day + 7 - first) % 7) as usize
    }
}

/// A closed-open interval `[time_min, time_max)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    time_min: DateTime<FixedOffset>,
    time_max: DateTime<FixedOffset>,
}

impl Period {
    pub fn new(time_min: DateTime<FixedOffset>, time_max: DateTime<FixedOffset>) -> CalNotifyResult<Self> {
        if time_max <= time_min {
            return Err(CalNotifyError::InvalidPeriod(format!(
                "end ({time_max}) must be after start ({time_min})"
            )));
        }
        Ok(Period { time_min, time_max })
    }

    /// The period shown by a `print` view containing `now`.
    pub fn for_format(format: Format, now: DateTime<FixedOffset>, week_start: WeekStart) -> CalNotifyResult<Self> {
        let today = now.date_naive();

        let (first, days) = match format {
            Format::Day => (today, Days::new(1)),
            Format::Week => {
                let offset = Days::new(week_start.position(today) as u64);
                (checked(today.checked_sub_days(offset))?, Days::new(7))
            }
            Format::Month => {
                let first = checked(today.with_day(1))?;
                let next = checked(first.checked_add_months(Months::new(1)))?;
                (first, Days::new((next - first).num_days() as u64))
            }
        };
        let next = checked(first.checked_add_days(days))?;

        // End inside the last shown day so that its date is the period's last.
        let time_max = midnight(next, now.offset())? - Duration::nanoseconds(1);
        Period::new(midnight(first, now.offset())?, time_max)
    }

    /// `days` whole days starting at the beginning of today.
    pub fn upcoming_days(now: DateTime<FixedOffset>, days: u32) -> CalNotifyResult<Self> {
        let today = now.date_naive();
        let last = checked(today.checked_add_days(Days::new(u64::from(days.max(1)))))?;
        Period::new(midnight(today, now.offset())?, midnight(last, now.offset())?)
    }

    pub fn time_min(&self) -> DateTime<FixedOffset> {
        self.time_min
    }

    pub fn time_max(&self) -> DateTime<FixedOffset> {
        self.time_max
    }

    /// Offset the period is expressed in; dates are computed in this offset.
    pub fn offset(&self) -> FixedOffset {
        *self.time_min.offset()
    }

    pub fn first_date(&self) -> NaiveDate {
        self.time_min.date_naive()
    }

    /// Date of `time_max`, seen from the period's offset.
    ///
    /// The date is included in `dates` even though `time_max` itself lies
    /// outside the period.
    pub fn last_date(&self) -> NaiveDate {
        self.time_max.with_timezone(&self.offset()).date_naive()
    }

    /// Every date from `first_date` to `last_date`, inclusive.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        let last = self.last_date();
        self.first_date().iter_days().take_while(move |date| *date <= last)
    }

    pub fn overlaps(&self, event: &Event) -> bool {
        event.start < self.time_max && event.end > self.time_min
    }
}

fn midnight(date: NaiveDate, offset: &FixedOffset) -> CalNotifyResult<DateTime<FixedOffset>> {
    date.and_hms_opt(0, 0, 0)
        .and_then(|naive| naive.and_local_timezone(*offset).single())
        .ok_or_else(|| CalNotifyError::InvalidPeriod(format!("no midnight on {date}")))
}

fn checked<T>(value: Option<T>) -> CalNotifyResult<T> {
    value.ok_or_else(|| CalNotifyError::InvalidPeriod("date out of range".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::tests::{at, event};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_rejects_empty_period() {
        let now = at(2024, 5, 1, 12, 0);
        assert!(Period::new(now, now).is_err());
        assert!(Period::new(now, now - Duration::minutes(1)).is_err());
    }

    #[test]
    fn test_day_period_covers_only_today() {
        // Wednesday
        let period = Period::for_format(Format::Day, at(2024, 5, 1, 15, 30), WeekStart::Sunday).unwrap();

        assert_eq!(period.time_min(), at(2024, 5, 1, 0, 0));
        assert_eq!(period.time_max(), at(2024, 5, 2, 0, 0) - Duration::nanoseconds(1));
        assert_eq!(period.dates().collect::<Vec<_>>(), vec![date(2024, 5, 1)]);
        assert!(period.overlaps(&event("Late", at(2024, 5, 1, 23, 59), at(2024, 5, 2, 0, 0))));
    }

    #[test]
    fn test_week_period_starts_on_configured_weekday() {
        let now = at(2024, 5, 1, 15, 30);

        let sunday = Period::for_format(Format::Week, now, WeekStart::Sunday).unwrap();
        assert_eq!(sunday.first_date(), date(2024, 4, 28));
        assert_eq!(sunday.last_date(), date(2024, 5, 4));

        let monday = Period::for_format(Format::Week, now, WeekStart::Monday).unwrap();
        assert_eq!(monday.first_date(), date(2024, 4, 29));
        assert_eq!(monday.dates().count(), 7);
    }

    #[test]
    fn test_month_period_covers_whole_month() {
        let period = Period::for_format(Format::Month, at(2024, 2, 14, 9, 0), WeekStart::Sunday).unwrap();

        assert_eq!(period.first_date(), date(2024, 2, 1));
        assert_eq!(period.last_date(), date(2024, 2, 29));
        assert_eq!(period.dates().count(), 29);
    }

    #[test]
    fn test_month_period_wraps_year() {
        let period = Period::for_format(Format::Month, at(2024, 12, 31, 23, 0), WeekStart::Sunday).unwrap();

        assert_eq!(period.last_date(), date(2024, 12, 31));
        assert_eq!(period.time_max(), at(2025, 1, 1, 0, 0) - Duration::nanoseconds(1));
    }

    #[test]
    fn test_dates_run_through_time_max_date() {
        let period = Period::new(at(2024, 1, 31, 0, 0), at(2024, 2, 1, 0, 0)).unwrap();

        assert_eq!(period.dates().collect::<Vec<_>>(), vec![date(2024, 1, 31), date(2024, 2, 1)]);
    }

    #[test]
    fn test_week_start_positions() {
        // 2024-05-05 is a Sunday
        assert_eq!(WeekStart::Sunday.position(date(2024, 5, 5)), 0);
        assert_eq!(WeekStart::Monday.position(date(2024, 5, 5)), 6);
        assert_eq!(WeekStart::Monday.position(date(2024, 5, 6)), 0);

        let days: Vec<_> = WeekStart::Monday.weekdays().collect();
        assert_eq!(days.first(), Some(&Weekday::Mon));
        assert_eq!(days.last(), Some(&Weekday::Sun));
    }

    #[test]
    fn test_overlaps() {
        let period = Period::new(at(2024, 5, 1, 0, 0), at(2024, 5, 2, 0, 0)).unwrap();

        assert!(period.overlaps(&event("Inside", at(2024, 5, 1, 9, 0), at(2024, 5, 1, 10, 0))));
        assert!(period.overlaps(&event("Spanning", at(2024, 4, 30, 22, 0), at(2024, 5, 1, 1, 0))));
        assert!(!period.overlaps(&event("Before", at(2024, 4, 30, 9, 0), at(2024, 5, 1, 0, 0))));
        assert!(!period.overlaps(&event("After", at(2024, 5, 2, 0, 0), at(2024, 5, 2, 1, 0))));
    }
}
