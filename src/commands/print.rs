use anyhow::Result;
use calnotify_core::cache::EventCache;
use calnotify_core::config::Settings;
use calnotify_core::render::{terminal_columns, Format, Renderer};
use calnotify_core::Period;
use chrono::Local;
use clap::ValueEnum;
use owo_colors::OwoColorize;

use super::fetch_events;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum View {
    #[value(alias = "d")]
    Day,
    #[value(alias = "w")]
    Week,
    #[value(alias = "m")]
    Month,
}

impl From<View> for Format {
    fn from(view: View) -> Self {
        match view {
            View::Day => Format::Day,
            View::Week => Format::Week,
            View::Month => Format::Month,
        }
    }
}

pub async fn run(settings: &Settings, format: Format, cached: bool) -> Result<()> {
    let now = Local::now().fixed_offset();
    let period = Period::for_format(format, now, settings.general.week_start)?;

    let events = if cached {
        EventCache::new(settings.general.cache_dir()?)
            .load()?
            .into_iter()
            .filter(|event| period.overlaps(event))
            .collect()
    } else {
        fetch_events(settings, &period).await?
    };

    let renderer = Renderer::new(&settings.general, &settings.calendars, terminal_columns(), now.date_naive());
    let output = renderer.render(&events, &period, format);

    if output.is_empty() {
        println!("{}", "No events found".dimmed());
    } else {
        println!("{output}");
    }

    Ok(())
}
