//! Date-keyed bucketing of events for rendering.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::event::Event;
use crate::period::Period;

/// Events grouped by the dates they overlap within a period.
///
/// Every date of the period has a bucket, even when it stays empty. Within a
/// bucket events keep chronological order.
#[derive(Debug, Clone, PartialEq)]
pub struct Agenda<'a> {
    days: BTreeMap<NaiveDate, Vec<&'a Event>>,
}

impl<'a> Agenda<'a> {
    pub fn build(events: &'a [Event], period: &Period) -> Self {
        let mut days: BTreeMap<NaiveDate, Vec<&'a Event>> =
            period.dates().map(|date| (date, Vec::new())).collect();

        let first_date = period.first_date();
        let last_date = period.last_date();
        let offset = period.offset();

        let mut ordered: Vec<&'a Event> = events.iter().collect();
        ordered.sort_by_key(|event| event.start);

        for event in ordered {
            if !period.overlaps(event) {
                continue;
            }
            let (first, last) = event.span_dates(&offset);
            if last < first_date || first > last_date {
                continue;
            }

            let from = first.max(first_date);
            let to = last.min(last_date);
            for date in from.iter_days().take_while(|date| *date <= to) {
                if let Some(bucket) = days.get_mut(&date) {
                    bucket.push(event);
                }
            }
        }

        Agenda { days }
    }

    pub fn get(&self, date: NaiveDate) -> Option<&[&'a Event]> {
        self.days.get(&date).map(Vec::as_slice)
    }

    /// Buckets in date order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, &[&'a Event])> {
        self.days.iter().map(|(date, events)| (*date, events.as_slice()))
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.days.keys().next().copied()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn has_events(&self) -> bool {
        self.days.values().any(|events| !events.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::tests::{at, event};
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn summaries(agenda: &Agenda, day: NaiveDate) -> Vec<String> {
        agenda
            .get(day)
            .unwrap_or_default()
            .iter()
            .map(|e| e.summary.clone())
            .collect()
    }

    #[test]
    fn test_every_period_date_gets_a_bucket() {
        let period = Period::new(at(2024, 1, 30, 0, 0), at(2024, 2, 2, 0, 0)).unwrap();
        let agenda = Agenda::build(&[], &period);

        // time_max's own date is included
        assert_eq!(agenda.len(), 4);
        assert!(!agenda.has_events());
        assert_eq!(agenda.first_date(), Some(date(2024, 1, 30)));
    }

    #[test]
    fn test_crossing_event_lands_in_both_days() {
        let events = vec![event("Late", at(2024, 1, 31, 22, 0), at(2024, 2, 1, 1, 0))];
        let period = Period::new(at(2024, 1, 31, 0, 0), at(2024, 2, 2, 0, 0)).unwrap();

        let agenda = Agenda::build(&events, &period);

        assert_eq!(summaries(&agenda, date(2024, 1, 31)), vec!["Late"]);
        assert_eq!(summaries(&agenda, date(2024, 2, 1)), vec!["Late"]);
    }

    #[test]
    fn test_multi_day_event_is_clipped_to_period() {
        let events = vec![event("Trip", at(2024, 1, 28, 0, 0), at(2024, 2, 5, 0, 0))];
        let period = Period::new(at(2024, 2, 1, 0, 0), at(2024, 2, 3, 0, 0)).unwrap();

        let agenda = Agenda::build(&events, &period);

        assert_eq!(agenda.len(), 3);
        assert_eq!(summaries(&agenda, date(2024, 2, 1)), vec!["Trip"]);
        assert_eq!(summaries(&agenda, date(2024, 2, 3)), vec!["Trip"]);
        assert_eq!(agenda.get(date(2024, 1, 31)), None);
        assert_eq!(agenda.get(date(2024, 2, 4)), None);
    }

    #[test]
    fn test_events_outside_period_are_dropped() {
        let events = vec![
            event("Before", at(2024, 1, 29, 9, 0), at(2024, 1, 29, 10, 0)),
            event("After", at(2024, 2, 3, 9, 0), at(2024, 2, 3, 10, 0)),
        ];
        let period = Period::new(at(2024, 1, 30, 0, 0), at(2024, 2, 1, 0, 0)).unwrap();

        assert!(!Agenda::build(&events, &period).has_events());
    }

    #[test]
    fn test_event_crossing_time_max_shows_on_its_date() {
        let events = vec![
            event("Breakfast", at(2024, 1, 31, 9, 0), at(2024, 1, 31, 10, 0)),
            event("Late show", at(2024, 1, 31, 23, 30), at(2024, 2, 1, 0, 30)),
            event("Tomorrow", at(2024, 2, 1, 9, 0), at(2024, 2, 1, 10, 0)),
        ];
        let period = Period::new(at(2024, 1, 31, 0, 0), at(2024, 2, 1, 0, 0)).unwrap();

        let agenda = Agenda::build(&events, &period);

        assert_eq!(summaries(&agenda, date(2024, 1, 31)), vec!["Breakfast", "Late show"]);
        // only events overlapping the period reach time_max's date
        assert_eq!(summaries(&agenda, date(2024, 2, 1)), vec!["Late show"]);
    }

    #[test]
    fn test_midnight_end_does_not_spill_into_next_day() {
        let events = vec![event("Holiday", at(2024, 1, 31, 0, 0), at(2024, 2, 1, 0, 0))];
        let period = Period::new(at(2024, 1, 31, 0, 0), at(2024, 2, 2, 0, 0)).unwrap();

        let agenda = Agenda::build(&events, &period);

        assert_eq!(summaries(&agenda, date(2024, 1, 31)), vec!["Holiday"]);
        assert!(summaries(&agenda, date(2024, 2, 1)).is_empty());
    }

    #[test]
    fn test_buckets_are_chronological_and_stable() {
        let mut first = event("First", at(2024, 1, 31, 9, 0), at(2024, 1, 31, 10, 0));
        first.calendar_label = "work".into();
        let events = vec![
            event("Late", at(2024, 1, 31, 23, 30), at(2024, 2, 1, 0, 30)),
            first,
            event("Second", at(2024, 1, 31, 9, 0), at(2024, 1, 31, 9, 30)),
        ];
        let period = Period::new(at(2024, 1, 31, 0, 0), at(2024, 2, 1, 0, 0)).unwrap();

        let agenda = Agenda::build(&events, &period);
        let again = Agenda::build(&events, &period);

        assert_eq!(summaries(&agenda, date(2024, 1, 31)), vec!["First", "Second", "Late"]);
        assert_eq!(agenda, again);
    }
}
