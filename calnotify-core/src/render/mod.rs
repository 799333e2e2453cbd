//! Terminal rendering of events: a flat day list, or week and month grids.

pub mod grid;
pub mod palette;
pub mod table;

pub use grid::{Column, Grid};
pub use table::{DEFAULT_TERMINAL_COLUMNS, terminal_columns};

use chrono::{Datelike, FixedOffset, NaiveDate};
use owo_colors::OwoColorize;

use crate::agenda::Agenda;
use crate::config::{Calendars, GeneralParams};
use crate::event::Event;
use crate::period::Period;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Day,
    Week,
    Month,
}

/// Suffix marking today's day number in grids.
const TODAY_MARKER: &str = " **";

pub struct Renderer<'a> {
    general: &'a GeneralParams,
    calendars: &'a Calendars,
    columns: u16,
    today: NaiveDate,
}

impl<'a> Renderer<'a> {
    /// `columns` is the terminal width the output has to fit, `today` the
    /// date marked in grids.
    pub fn new(general: &'a GeneralParams, calendars: &'a Calendars, columns: u16, today: NaiveDate) -> Self {
        Renderer {
            general,
            calendars,
            columns,
            today,
        }
    }

    pub fn render(&self, events: &[Event], period: &Period, format: Format) -> String {
        let agenda = Agenda::build(events, period);

        match format {
            Format::Day => self.day_list(&agenda, &period.offset()),
            Format::Week => table::draw(&self.grid(&agenda, &period.offset()), self.columns),
            Format::Month => format!(
                "{}\n{}",
                self.month_title(period),
                table::draw(&self.grid(&agenda, &period.offset()), self.columns)
            ),
        }
    }

    /// "May 2024", for the month the period starts in.
    fn month_title(&self, period: &Period) -> String {
        let title = period.first_date().format("%B %Y").to_string();
        if self.general.use_color {
            title.bold().to_string()
        } else {
            title
        }
    }

    /// "HH:MM - summary" for events shorter than a day, the bare summary otherwise.
    pub fn event_text(&self, event: &Event, offset: &FixedOffset) -> String {
        let text = if event.is_multi_day() {
            event.summary.clone()
        } else {
            format!("{} - {}", event.start.with_timezone(offset).format("%H:%M"), event.summary)
        };

        if !self.general.use_color {
            return text;
        }

        let calendar_color = self
            .calendars
            .get(&event.calendar_label)
            .and_then(|params| params.color.as_deref());
        let color = palette::event_color(event.color_id.as_deref(), calendar_color);
        text.color(color).to_string()
    }

    /// Dates with events, each followed by its indented events.
    fn day_list(&self, agenda: &Agenda, offset: &FixedOffset) -> String {
        let mut lines = Vec::new();

        for (date, events) in agenda.iter() {
            if events.is_empty() {
                continue;
            }
            lines.push(date.format("%d/%m - %A:").to_string());
            lines.extend(
                events
                    .iter()
                    .map(|event| format!("    {}", self.event_text(event, offset))),
            );
        }

        lines.join("\n")
    }

    pub fn grid(&self, agenda: &Agenda, offset: &FixedOffset) -> Grid {
        Grid::build(agenda, self.general.week_start, |date, events| {
            let mut lines = vec![self.day_number(date)];
            lines.extend(events.iter().map(|event| self.event_text(event, offset)));
            lines.join("\n")
        })
    }

    fn day_number(&self, date: NaiveDate) -> String {
        let is_today = date == self.today;
        let mut day = date.day().to_string();
        if is_today {
            day.push_str(TODAY_MARKER);
        }

        match (self.general.use_color, is_today) {
            (false, _) => day,
            (true, true) => day.bright_red().bold().to_string(),
            (true, false) => day.bold().to_string(),
        }
    }
}
