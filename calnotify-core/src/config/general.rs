//! `[general]` section of the config file.

use std::path::PathBuf;

use serde::Deserialize;

use super::expand_path;
use crate::error::{CalNotifyError, CalNotifyResult};
use crate::notify::DEFAULT_SOUND_PLAYER;
use crate::period::WeekStart;
use crate::reminder::CommandTemplate;

const DEFAULT_CACHE_DAYS: u32 = 7;

fn default_sound_player() -> String {
    DEFAULT_SOUND_PLAYER.to_string()
}

fn default_use_color() -> bool {
    true
}

fn default_cache_days() -> u32 {
    DEFAULT_CACHE_DAYS
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneralParams {
    #[serde(default)]
    pub notification_cmd: CommandTemplate,

    pub notification_sound: Option<PathBuf>,

    #[serde(default = "default_sound_player")]
    pub sound_player: String,

    #[serde(default = "default_use_color")]
    pub use_color: bool,

    #[serde(default)]
    pub week_start: WeekStart,

    /// Number of days `get` caches, starting today
    #[serde(default = "default_cache_days")]
    pub cache_days: u32,

    pub cache_dir: Option<PathBuf>,
}

impl Default for GeneralParams {
    fn default() -> Self {
        GeneralParams {
            notification_cmd: CommandTemplate::default(),
            notification_sound: None,
            sound_player: default_sound_player(),
            use_color: default_use_color(),
            week_start: WeekStart::default(),
            cache_days: DEFAULT_CACHE_DAYS,
            cache_dir: None,
        }
    }
}

impl GeneralParams {
    /// Directory holding the event cache, `~` expanded.
    pub fn cache_dir(&self) -> CalNotifyResult<PathBuf> {
        match &self.cache_dir {
            Some(dir) => Ok(expand_path(&dir.to_string_lossy())),
            None => Ok(dirs::cache_dir()
                .ok_or_else(|| CalNotifyError::Config("Could not determine cache directory".into()))?
                .join("calnotify")),
        }
    }

    /// Expand `~` in paths read from the file.
    pub(crate) fn expand_paths(mut self) -> Self {
        self.notification_sound = self
            .notification_sound
            .map(|path| expand_path(&path.to_string_lossy()));
        self
    }
}
