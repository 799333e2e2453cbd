//! Weekday-column grid for week and month views.

use chrono::{NaiveDate, Weekday};

use crate::agenda::Agenda;
use crate::event::Event;
use crate::period::WeekStart;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub weekday: Weekday,
    /// One cell per week row
    pub cells: Vec<String>,
}

/// Seven weekday columns of equal height.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    columns: Vec<Column>,
}

impl Grid {
    /// Lay out the agenda's dates by weekday, one row per week.
    ///
    /// Weekdays before the first date of the agenda get an empty cell so that
    /// row `n` of every column belongs to the same week. If no date has any
    /// event all cells are blanked.
    pub fn build<'e>(
        agenda: &Agenda<'e>,
        week_start: WeekStart,
        mut cell: impl FnMut(NaiveDate, &[&'e Event]) -> String,
    ) -> Self {
        let mut columns: Vec<Column> = week_start
            .weekdays()
            .map(|weekday| Column {
                weekday,
                cells: Vec::new(),
            })
            .collect();

        if let Some(first) = agenda.first_date() {
            let lead = week_start.position(first);
            for column in columns.iter_mut().take(lead) {
                column.cells.push(String::new());
            }
        }

        for (date, events) in agenda.iter() {
            columns[week_start.position(date)].cells.push(cell(date, events));
        }

        let mut grid = Grid { columns };
        if !agenda.has_events() {
            grid.blank();
        }
        grid.pad();
        grid
    }

    /// Right-pad every column with empty cells to the tallest column.
    fn pad(&mut self) {
        let height = self.height().max(1);
        for column in &mut self.columns {
            column.cells.resize(height, String::new());
        }
    }

    fn blank(&mut self) {
        for cell in self.columns.iter_mut().flat_map(|column| column.cells.iter_mut()) {
            cell.clear();
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Number of week rows.
    pub fn height(&self) -> usize {
        self.columns
            .iter()
            .map(|column| column.cells.len())
            .max()
            .unwrap_or(0)
    }

    pub fn is_rectangular(&self) -> bool {
        let height = self.height();
        self.columns.iter().all(|column| column.cells.len() == height)
    }

    /// Cells row by row, in column order.
    pub fn rows(&self) -> impl Iterator<Item = Vec<&str>> + '_ {
        (0..self.height()).map(move |row| {
            self.columns
                .iter()
                .map(|column| column.cells.get(row).map(String::as_str).unwrap_or(""))
                .collect()
        })
    }
}
