//! Per-calendar configuration (`[calendars.<label>]` sections).
//!
//! Sections are free-form tables. Keys listed in `CALENDAR_FIELDS` are
//! converted according to their field kind; every other key is handed to the
//! provider untouched.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use config::Value;
use serde_json::Map;

use super::expand_path;
use crate::error::{CalNotifyError, CalNotifyResult};
use crate::event::normalize_reminders;
use crate::reminder::CommandTemplate;

/// Calendars keyed by label, in label order.
pub type Calendars = BTreeMap<String, CalendarParams>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Path,
    IntegerList,
    Bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Path(PathBuf),
    IntegerList(Vec<i64>),
    Bool(bool),
}

const CALENDAR_FIELDS: &[(&str, FieldKind)] = &[
    ("provider", FieldKind::Text),
    ("label", FieldKind::Text),
    ("color", FieldKind::Text),
    ("default_reminders", FieldKind::IntegerList),
    ("notification_cmd", FieldKind::Text),
    ("notification_sound", FieldKind::Path),
    ("enabled", FieldKind::Bool),
];

pub fn field_kind(key: &str) -> Option<FieldKind> {
    CALENDAR_FIELDS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, kind)| *kind)
}

impl FieldKind {
    pub fn convert(self, key: &str, value: Value) -> CalNotifyResult<FieldValue> {
        match self {
            FieldKind::Text => to_text(key, value),
            FieldKind::Path => to_path(key, value),
            FieldKind::IntegerList => to_integer_list(key, value),
            FieldKind::Bool => to_bool(key, value),
        }
    }
}

fn invalid(key: &str, expected: &str, err: impl std::fmt::Display) -> CalNotifyError {
    CalNotifyError::Config(format!("'{key}' must be {expected}: {err}"))
}

fn to_text(key: &str, value: Value) -> CalNotifyResult<FieldValue> {
    value
        .into_string()
        .map(FieldValue::Text)
        .map_err(|e| invalid(key, "text", e))
}

fn to_path(key: &str, value: Value) -> CalNotifyResult<FieldValue> {
    value
        .into_string()
        .map(|s| FieldValue::Path(expand_path(&s)))
        .map_err(|e| invalid(key, "a path", e))
}

fn to_integer_list(key: &str, value: Value) -> CalNotifyResult<FieldValue> {
    let items = value
        .into_array()
        .map_err(|e| invalid(key, "a list of integers", e))?;

    items
        .into_iter()
        .map(|item| item.into_int().map_err(|e| invalid(key, "a list of integers", e)))
        .collect::<CalNotifyResult<Vec<_>>>()
        .map(FieldValue::IntegerList)
}

fn to_bool(key: &str, value: Value) -> CalNotifyResult<FieldValue> {
    value
        .into_bool()
        .map(FieldValue::Bool)
        .map_err(|e| invalid(key, "true or false", e))
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarParams {
    /// Provider name; `calnotify-provider-<provider>` is run to list events
    pub provider: String,
    /// Human readable name, defaults to the section label
    pub label: Option<String>,
    /// Palette color used when an event has no color of its own
    pub color: Option<String>,
    /// Reminders for events that don't carry their own, sorted descending
    pub default_reminders: Vec<u32>,
    pub notification_cmd: Option<CommandTemplate>,
    pub notification_sound: Option<PathBuf>,
    pub enabled: bool,
    /// Remaining keys, passed to the provider
    pub provider_params: Map<String, serde_json::Value>,
}

impl CalendarParams {
    pub fn new(provider: &str) -> Self {
        CalendarParams {
            provider: provider.to_string(),
            label: None,
            color: None,
            default_reminders: Vec::new(),
            notification_cmd: None,
            notification_sound: None,
            enabled: true,
            provider_params: Map::new(),
        }
    }

    pub fn from_table(section: &str, table: HashMap<String, Value>) -> CalNotifyResult<Self> {
        let mut provider = None;
        let mut params = CalendarParams::new("");

        for (key, value) in table {
            let Some(kind) = field_kind(&key) else {
                let json = value
                    .try_deserialize::<serde_json::Value>()
                    .map_err(|e| invalid(&key, "a plain value", e))?;
                params.provider_params.insert(key, json);
                continue;
            };

            match (key.as_str(), kind.convert(&key, value)?) {
                ("provider", FieldValue::Text(name)) => provider = Some(name),
                ("label", FieldValue::Text(label)) => params.label = Some(label),
                ("color", FieldValue::Text(color)) => params.color = Some(color),
                ("default_reminders", FieldValue::IntegerList(minutes)) => {
                    params.default_reminders = normalize_reminders(minutes)
                }
                ("notification_cmd", FieldValue::Text(cmd)) => {
                    params.notification_cmd = Some(CommandTemplate::parse(&cmd)?)
                }
                ("notification_sound", FieldValue::Path(path)) => params.notification_sound = Some(path),
                ("enabled", FieldValue::Bool(enabled)) => params.enabled = enabled,
                _ => {}
            }
        }

        params.provider = provider.ok_or_else(|| {
            CalNotifyError::Config(format!("Calendar '{section}' has no provider configured"))
        })?;

        Ok(params)
    }

    pub fn display_label<'a>(&'a self, section: &'a str) -> &'a str {
        self.label.as_deref().unwrap_or(section)
    }
}
