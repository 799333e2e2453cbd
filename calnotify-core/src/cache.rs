//! JSON cache of upcoming events.
//!
//! `get` writes the cache, `notify` reads it on every invocation so that
//! reminder matching never waits on the network.

use std::io::Write;
use std::path::{Path, PathBuf};

use log::info;
use tempfile::NamedTempFile;

use crate::error::{CalNotifyError, CalNotifyResult};
use crate::event::{Event, EventRecord};

pub const CACHE_FILE_NAME: &str = "events.json";

#[derive(Debug, Clone)]
pub struct EventCache {
    path: PathBuf,
}

impl EventCache {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        EventCache {
            path: dir.as_ref().join(CACHE_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the cache with `events`, sorted by start.
    pub fn save(&self, events: &[Event]) -> CalNotifyResult<()> {
        let mut sorted = events.to_vec();
        sorted.sort_by_key(|event| event.start);

        let json = serde_json::to_string_pretty(&sorted)
            .map_err(|e| CalNotifyError::Serialization(e.to_string()))?;

        let dir = self
            .path
            .parent()
            .ok_or_else(|| CalNotifyError::Cache(format!("Invalid cache path {}", self.path.display())))?;
        std::fs::create_dir_all(dir)?;

        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(json.as_bytes())?;
        file.persist(&self.path).map_err(|e| CalNotifyError::Io(e.error))?;

        info!("Cached {} events to {}", sorted.len(), self.path.display());
        Ok(())
    }

    /// Load and validate cached events.
    pub fn load(&self) -> CalNotifyResult<Vec<Event>> {
        if !self.path.exists() {
            return Err(CalNotifyError::Cache(format!(
                "No cached events at {}. Run `calnotify get` first.",
                self.path.display()
            )));
        }

        let content = std::fs::read_to_string(&self.path)?;
        let records: Vec<EventRecord> = serde_json::from_str(&content).map_err(|e| {
            CalNotifyError::Cache(format!("Failed to parse {}: {e}", self.path.display()))
        })?;

        records
            .into_iter()
            .map(|mut record| {
                let label = record.calendar.take().unwrap_or_default();
                record.resolve(&label, &[])
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::tests::{at, event};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_save_then_load_sorts_by_start() {
        let dir = tempfile::tempdir().unwrap();
        let cache = EventCache::new(dir.path().join("nested"));

        let mut later = event("Later", at(2024, 3, 20, 15, 0), at(2024, 3, 20, 16, 0));
        later.reminders = vec![30, 10];
        later.description = Some("Agenda".into());
        let earlier = event("Earlier", at(2024, 3, 20, 9, 0), at(2024, 3, 20, 10, 0));

        cache.save(&[later.clone(), earlier.clone()]).unwrap();
        let loaded = cache.load().unwrap();

        assert_eq!(loaded, vec![earlier, later]);
    }

    #[test]
    fn test_load_missing_cache_advises_get() {
        let dir = tempfile::tempdir().unwrap();
        let err = EventCache::new(dir.path()).load().unwrap_err();

        assert!(err.to_string().contains("calnotify get"));
    }

    #[test]
    fn test_load_rejects_event_without_end() {
        let dir = tempfile::tempdir().unwrap();
        let cache = EventCache::new(dir.path());
        std::fs::write(
            cache.path(),
            r#"[{"start": "2024-03-20T15:00:00+00:00", "summary": "Broken", "calendar": "work"}]"#,
        )
        .unwrap();

        let err = cache.load().unwrap_err();

        assert!(matches!(err, CalNotifyError::InvalidEvent { .. }));
    }

    #[test]
    fn test_cached_empty_reminders_stay_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cache = EventCache::new(dir.path());
        cache
            .save(&[event("Quiet", at(2024, 3, 20, 9, 0), at(2024, 3, 20, 10, 0))])
            .unwrap();

        assert!(cache.load().unwrap()[0].reminders.is_empty());
    }
}
