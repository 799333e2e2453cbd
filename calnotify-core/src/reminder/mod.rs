//! Reminder matching.
//!
//! The engine is stateless: it is meant to be invoked about once a minute
//! (cron, systemd timer) and fires every reminder whose one-minute firing
//! window contains `now`. A reminder with offset `r` on an event starting at
//! `start` fires iff `start - r <= now < start - r + 1min`.

mod template;

pub use template::{CommandTemplate, DEFAULT_NOTIFICATION_CMD, Placeholder};

use std::path::PathBuf;

use chrono::{DateTime, Duration, FixedOffset};
use log::{debug, info, warn};

use crate::config::{Calendars, GeneralParams};
use crate::event::Event;
use crate::notify::Dispatcher;

/// Width of the firing window, and grace period after an event has started.
const FIRING_WINDOW_MINUTES: i64 = 1;

/// A reminder that is due now.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DueReminder<'a> {
    pub event: &'a Event,
    pub offset: u32,
}

/// A notification ready to be dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    pub command: String,
    pub sound: Option<PathBuf>,
}

fn firing_window() -> Duration {
    Duration::minutes(FIRING_WINDOW_MINUTES)
}

/// Whether the event is too far in the past for any of its reminders.
pub fn is_past(event: &Event, now: DateTime<FixedOffset>) -> bool {
    now > event.start + firing_window()
}

/// Whether the reminder `offset` minutes before `event` fires at `now`.
pub fn fires(event: &Event, offset: u32, now: DateTime<FixedOffset>) -> bool {
    let threshold = event.start - Duration::minutes(i64::from(offset));
    threshold <= now && now < threshold + firing_window()
}

/// Every (event, offset) pair whose firing window contains `now`.
///
/// Offsets are scanned in stored order. When they are sorted descending the
/// scan of an event stops at the first threshold still in the future, since
/// every later offset lies further ahead.
pub fn due_reminders(events: &[Event], now: DateTime<FixedOffset>) -> Vec<DueReminder<'_>> {
    let mut due = Vec::new();

    for event in events {
        if is_past(event, now) {
            continue;
        }

        let descending = event.reminders.windows(2).all(|pair| pair[0] >= pair[1]);

        for &offset in &event.reminders {
            let threshold = event.start - Duration::minutes(i64::from(offset));
            if now < threshold {
                if descending {
                    break;
                }
                continue;
            }
            if fires(event, offset, now) {
                debug!("Reminder due: '{}' {} minutes before start", event.summary, offset);
                due.push(DueReminder { event, offset });
            }
        }
    }

    due
}

/// Matches reminders and turns them into notification requests using the
/// general and per-calendar notification settings.
pub struct ReminderEngine<'a> {
    general: &'a GeneralParams,
    calendars: &'a Calendars,
}

impl<'a> ReminderEngine<'a> {
    pub fn new(general: &'a GeneralParams, calendars: &'a Calendars) -> Self {
        ReminderEngine { general, calendars }
    }

    fn template_for(&self, event: &Event) -> &CommandTemplate {
        self.calendars
            .get(&event.calendar_label)
            .and_then(|params| params.notification_cmd.as_ref())
            .unwrap_or(&self.general.notification_cmd)
    }

    fn sound_for(&self, event: &Event) -> Option<PathBuf> {
        self.calendars
            .get(&event.calendar_label)
            .and_then(|params| params.notification_sound.clone())
            .or_else(|| self.general.notification_sound.clone())
    }

    pub fn request(&self, event: &Event, now: DateTime<FixedOffset>) -> NotificationRequest {
        NotificationRequest {
            command: self.template_for(event).render(event, now.offset()),
            sound: self.sound_for(event),
        }
    }

    /// One request per due (event, offset) pair.
    pub fn requests(&self, events: &[Event], now: DateTime<FixedOffset>) -> Vec<NotificationRequest> {
        due_reminders(events, now)
            .into_iter()
            .map(|due| self.request(due.event, now))
            .collect()
    }

    /// Dispatch every due notification and play its sound.
    ///
    /// A broken sound asset is logged and does not stop the remaining
    /// notifications. Returns the number of notifications sent.
    pub fn run(&self, events: &[Event], now: DateTime<FixedOffset>, dispatcher: &dyn Dispatcher) -> usize {
        let requests = self.requests(events, now);

        for request in &requests {
            info!("Sending notification: {}", request.command);
            dispatcher.send(&request.command);

            if let Some(sound) = &request.sound {
                if let Err(e) = dispatcher.play_sound(sound) {
                    warn!("{e}");
                }
            }
        }

        requests.len()
    }
}
