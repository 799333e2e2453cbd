pub mod get;
pub mod notify;
pub mod print;

use anyhow::Result;
use calnotify_core::config::Settings;
use calnotify_core::{source, Event, Period};
use owo_colors::OwoColorize;

use crate::utils::tui::create_spinner;

/// Fetch events of every enabled calendar, sorted by start.
///
/// Calendars that fail are reported and skipped. Fails only when every
/// calendar failed.
pub async fn fetch_events(settings: &Settings, period: &Period) -> Result<Vec<Event>> {
    let mut events = Vec::new();
    let mut fetched = 0;
    let mut failed = 0;

    for (label, params) in settings.enabled_calendars() {
        let name = params.display_label(label);
        let spinner = create_spinner(name.to_string());
        let result = source::calendar_events(label, params, period).await;
        spinner.finish_and_clear();

        match result {
            Ok(found) => {
                log::info!("{}: {} events", label, found.len());
                fetched += 1;
                events.extend(found);
            }
            Err(e) => {
                eprintln!("{} {}", name.bold(), e.to_string().red());
                failed += 1;
            }
        }
    }

    if fetched == 0 && failed > 0 {
        anyhow::bail!("Could not fetch events from any calendar");
    }

    source::sort_by_start(&mut events);
    Ok(events)
}
