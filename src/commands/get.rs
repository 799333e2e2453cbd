use anyhow::Result;
use calnotify_core::cache::EventCache;
use calnotify_core::config::Settings;
use calnotify_core::Period;
use chrono::Local;
use owo_colors::OwoColorize;

use super::fetch_events;

pub async fn run(settings: &Settings) -> Result<()> {
    let now = Local::now().fixed_offset();
    let period = Period::upcoming_days(now, settings.general.cache_days)?;

    let events = fetch_events(settings, &period).await?;

    let cache = EventCache::new(settings.general.cache_dir()?);
    cache.save(&events)?;

    println!(
        "Cached {} events {}",
        events.len(),
        format!("({})", cache.path().display()).dimmed()
    );

    Ok(())
}
