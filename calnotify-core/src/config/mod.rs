//! Configuration loading.
//!
//! Settings live in `~/.config/calnotify/config.toml`. Values of the
//! `[general]` section can be overridden from the environment, e.g.
//! `CALNOTIFY_GENERAL__USE_COLOR=false`.

mod calendar;
mod general;

pub use calendar::{CalendarParams, Calendars, FieldKind, FieldValue, field_kind};
pub use general::GeneralParams;

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat, Value};
use log::debug;
use serde::Deserialize;

use crate::error::{CalNotifyError, CalNotifyResult};
use crate::reminder::DEFAULT_NOTIFICATION_CMD;

#[derive(Deserialize, Default)]
struct RawSettings {
    #[serde(default)]
    general: GeneralParams,
    #[serde(default)]
    calendars: BTreeMap<String, HashMap<String, Value>>,
}

#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub general: GeneralParams,
    pub calendars: Calendars,
}

impl Settings {
    pub fn config_path() -> CalNotifyResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CalNotifyError::Config("Could not determine config directory".into()))?
            .join("calnotify");

        Ok(config_dir.join("config.toml"))
    }

    /// Load settings from `path`, or from the default location, creating a
    /// commented default file there on first run.
    ///
    /// An explicit `path` must exist.
    pub fn load(path: Option<&Path>) -> CalNotifyResult<Self> {
        let path = match path {
            Some(path) if !path.is_file() => {
                return Err(CalNotifyError::Config(format!("Config file not found: {}", path.display())));
            }
            Some(path) => path.to_path_buf(),
            None => {
                let path = Self::config_path()?;
                if !path.exists() {
                    Self::create_default_config(&path)?;
                }
                path
            }
        };
        debug!("Loading config from {}", path.display());

        let builder = Config::builder()
            .add_source(File::from(path.as_path()).format(FileFormat::Toml).required(true))
            .add_source(
                Environment::with_prefix("CALNOTIFY")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        Self::build(builder)
    }

    /// Parse settings from TOML text.
    pub fn parse(contents: &str) -> CalNotifyResult<Self> {
        Self::build(Config::builder().add_source(File::from_str(contents, FileFormat::Toml)))
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> CalNotifyResult<Self> {
        let raw: RawSettings = builder
            .build()
            .map_err(|e| CalNotifyError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CalNotifyError::Config(e.to_string()))?;

        let calendars = raw
            .calendars
            .into_iter()
            .map(|(label, table)| CalendarParams::from_table(&label, table).map(|params| (label, params)))
            .collect::<CalNotifyResult<Calendars>>()?;

        Ok(Settings {
            general: raw.general.expand_paths(),
            calendars,
        })
    }

    /// Calendars that are not disabled, in label order.
    pub fn enabled_calendars(&self) -> impl Iterator<Item = (&str, &CalendarParams)> {
        self.calendars
            .iter()
            .filter(|(_, params)| params.enabled)
            .map(|(label, params)| (label.as_str(), params))
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> CalNotifyResult<()> {
        let contents = format!(
            "\
# calnotify configuration

[general]
# Command run for each due reminder. Placeholders:
# {{title}} {{calendar}} {{start}} {{end}} {{description}} {{link}}
# notification_cmd = \"{DEFAULT_NOTIFICATION_CMD}\"

# Sound played with every notification (.wav only):
# notification_sound = \"~/.local/share/sounds/pop.wav\"
# sound_player = \"aplay\"

# use_color = true
# week_start = \"sunday\"
# cache_days = 7

# One section per calendar. Keys other than provider, label, color,
# default_reminders, notification_cmd, notification_sound and enabled
# are passed to the provider.
#
# [calendars.personal]
# provider = \"google\"
# calendar_id = \"primary\"
# default_reminders = [10]
# color = \"brightblue\"
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CalNotifyError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| CalNotifyError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

/// Expand a leading `~` like the shell does.
pub(crate) fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}
