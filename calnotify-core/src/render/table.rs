//! Box-drawn tables for grids.

use std::io;

use chrono::Weekday;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ColumnConstraint, ContentArrangement, Table, Width};
use log::warn;

use super::grid::Grid;

/// Width used when the terminal size cannot be determined.
pub const DEFAULT_TERMINAL_COLUMNS: u16 = 80;

/// Columns per cell taken by borders and padding.
const CELL_MARGIN: u16 = 4;
const MIN_CELL_WIDTH: u16 = 6;
/// Narrowest cell that still fits "Wednesday".
const FULL_NAME_WIDTH: u16 = 9;

const WEEKDAY_NAMES: &[(Weekday, &str, &str)] = &[
    (Weekday::Mon, "Monday", "Mon"),
    (Weekday::Tue, "Tuesday", "Tue"),
    (Weekday::Wed, "Wednesday", "Wed"),
    (Weekday::Thu, "Thursday", "Thu"),
    (Weekday::Fri, "Friday", "Fri"),
    (Weekday::Sat, "Saturday", "Sat"),
    (Weekday::Sun, "Sunday", "Sun"),
];

/// Current terminal width, or `DEFAULT_TERMINAL_COLUMNS` when not attached
/// to a terminal.
pub fn terminal_columns() -> u16 {
    columns_or_default(crossterm::terminal::size())
}

/// Column count from a `(columns, rows)` terminal size query.
fn columns_or_default(size: io::Result<(u16, u16)>) -> u16 {
    match size {
        Ok((columns, _)) if columns > 0 => columns,
        Ok(_) => DEFAULT_TERMINAL_COLUMNS,
        Err(e) => {
            warn!("Could not read terminal size ({e}), using {DEFAULT_TERMINAL_COLUMNS} columns");
            DEFAULT_TERMINAL_COLUMNS
        }
    }
}

/// Width of a single weekday cell for a terminal `columns` wide.
pub fn cell_width(columns: u16) -> u16 {
    (columns / 7).saturating_sub(CELL_MARGIN).max(MIN_CELL_WIDTH)
}

fn weekday_name(weekday: Weekday, width: u16) -> &'static str {
    WEEKDAY_NAMES
        .iter()
        .find(|(day, _, _)| *day == weekday)
        .map(|(_, full, short)| if width >= FULL_NAME_WIDTH { *full } else { *short })
        .unwrap_or("")
}

/// Draw the grid with a weekday header, wrapping cell text to fit.
pub fn draw(grid: &Grid, columns: u16) -> String {
    let width = cell_width(columns);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(columns)
        .set_header(
            grid.columns()
                .iter()
                .map(|column| weekday_name(column.weekday, width)),
        );

    for row in grid.rows() {
        table.add_row(row);
    }

    table.set_constraints(
        grid.columns()
            .iter()
            .map(|_| ColumnConstraint::Absolute(Width::Fixed(width))),
    );

    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agenda::Agenda;
    use crate::event::tests::{at, event};
    use crate::period::{Period, WeekStart};
    use crate::render::Format;
    use chrono::Datelike;

    #[test]
    fn test_cell_width() {
        assert_eq!(cell_width(80), 7);
        assert_eq!(cell_width(140), 16);
        assert_eq!(cell_width(20), MIN_CELL_WIDTH);
    }

    #[test]
    fn test_terminal_width_falls_back_to_default() {
        assert_eq!(columns_or_default(Ok((132, 40))), 132);
        assert_eq!(columns_or_default(Ok((0, 0))), DEFAULT_TERMINAL_COLUMNS);
        assert_eq!(
            columns_or_default(Err(io::Error::new(io::ErrorKind::Unsupported, "not a tty"))),
            DEFAULT_TERMINAL_COLUMNS
        );
    }

    #[test]
    fn test_weekday_names_shrink_with_width() {
        assert_eq!(weekday_name(Weekday::Wed, 16), "Wednesday");
        assert_eq!(weekday_name(Weekday::Wed, 7), "Wed");
    }

    #[test]
    fn test_draw_fits_terminal() {
        let events = vec![event("Dentist appointment downtown", at(2024, 5, 14, 9, 0), at(2024, 5, 14, 10, 0))];
        let period = Period::for_format(Format::Month, at(2024, 5, 14, 12, 0), WeekStart::Sunday).unwrap();
        let agenda = Agenda::build(&events, &period);
        let grid = Grid::build(&agenda, WeekStart::Sunday, |date, events| {
            let mut lines = vec![date.day().to_string()];
            lines.extend(events.iter().map(|e| e.summary.clone()));
            lines.join("\n")
        });

        let drawn = draw(&grid, 100);

        assert!(drawn.lines().all(|line| line.chars().count() <= 100));
        assert!(drawn.contains("Sunday"));
        assert!(drawn.contains("Dentist"));
        assert!(drawn.contains('┌'));
    }
}
