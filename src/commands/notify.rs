use std::path::Path;

use anyhow::Result;
use calnotify_core::cache::EventCache;
use calnotify_core::config::Settings;
use calnotify_core::notify::{validate_sound_asset, Dispatcher, SystemDispatcher};
use calnotify_core::reminder::ReminderEngine;
use calnotify_core::CalNotifyResult;
use chrono::{DateTime, FixedOffset, Local};

/// Prints what would be dispatched.
struct DryRun;

impl Dispatcher for DryRun {
    fn send(&self, command: &str) {
        println!("{command}");
    }

    fn play_sound(&self, sound: &Path) -> CalNotifyResult<()> {
        validate_sound_asset(sound)?;
        println!("play {}", sound.display());
        Ok(())
    }
}

pub fn run(settings: &Settings, at: Option<DateTime<FixedOffset>>, dry_run: bool) -> Result<()> {
    let cache = EventCache::new(settings.general.cache_dir()?);
    let events = cache.load()?;

    let now = at.unwrap_or_else(|| Local::now().fixed_offset());
    let engine = ReminderEngine::new(&settings.general, &settings.calendars);

    let fired = if dry_run {
        engine.run(&events, now, &DryRun)
    } else {
        engine.run(&events, now, &SystemDispatcher::new(&settings.general.sound_player))
    };
    log::debug!("{fired} reminders due at {now}");

    Ok(())
}
