//! Core types for calnotify.
//!
//! This crate holds everything the CLI works with:
//! - `Event` and `Period`, the normalized event model
//! - `reminder`, which decides which reminders are due at a given instant
//! - `agenda` and `render`, which turn events into day lists and weekday grids
//! - `config`, `cache` and `source` for loading settings and events

pub mod agenda;
pub mod cache;
pub mod config;
pub mod error;
pub mod event;
pub mod notify;
pub mod period;
pub mod reminder;
pub mod render;
pub mod source;

pub use error::{CalNotifyError, CalNotifyResult};
pub use event::Event;
pub use period::Period;
