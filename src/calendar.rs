//! Month arithmetic, and the grid of days that is displayed for a month

use std::convert::TryFrom;
use std::error::Error;
use std::fmt::{Display, Formatter};

use chrono::{Datelike, Months, NaiveDate};

use crate::config::{DEFAULT_MONTH, DEFAULT_YEAR};
use crate::Task;

/// The number of cells of a month grid (five weeks).
/// Months that do not fit keep all their days, and get no trailing blanks
pub const GRID_CELLS: usize = 35;
pub const DAYS_PER_WEEK: usize = 7;

/// A month of a given year
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonthYear {
    month: u32,
    year: i32,
}

impl MonthYear {
    /// Create a new instance. `month` is 1-based (1 is January)
    pub fn new(month: u32, year: i32) -> Result<Self, Box<dyn Error + Send + Sync>> {
        if month < 1 || month > 12 {
            return Err(format!("Invalid month {} (must be between 1 and 12)", month).into());
        }
        // The following month must exist as well, so that the length of this one is known
        let next_first = NaiveDate::from_ymd_opt(year, month, 1)
            .and_then(|first| first.checked_add_months(Months::new(1)));
        if next_first.is_none() {
            return Err(format!("Year {} is out of the supported range", year).into());
        }
        Ok(Self { month, year })
    }

    pub fn month(&self) -> u32 { self.month }
    pub fn year(&self) -> i32  { self.year  }

    /// The month that follows this one. December rolls over to January of the next year
    pub fn next(&self) -> Option<Self> {
        self.shifted(1)
    }

    /// The month that precedes this one. January rolls over to December of the previous year
    pub fn previous(&self) -> Option<Self> {
        self.shifted(-1)
    }

    /// Move by `increment` months (that may be negative).
    /// Returns `None` when the resulting month is out of the supported date range
    pub fn shifted(&self, increment: i32) -> Option<Self> {
        let zero_based = self.year as i64 * 12 + (self.month as i64 - 1) + increment as i64;
        let year = i32::try_from(zero_based.div_euclid(12)).ok()?;
        let month = zero_based.rem_euclid(12) as u32 + 1;
        Self::new(month, year).ok()
    }

    /// The first day of this month
    pub fn first_day(&self) -> NaiveDate {
        // `new` already checked this date is valid
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// The weekday the 1st of this month falls on, counted from Sunday (0) to Saturday (6)
    pub fn first_weekday(&self) -> u32 {
        self.first_day().weekday().num_days_from_sunday()
    }

    pub fn days_in_month(&self) -> u32 {
        let first = self.first_day();
        match first.checked_add_months(Months::new(1)) {
            Some(next) => next.signed_duration_since(first).num_days() as u32,
            // `new` made sure the following month exists
            None => 0,
        }
    }

    /// The date of the given day of this month, if it exists
    pub fn date(&self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, day)
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl Default for MonthYear {
    fn default() -> Self {
        Self { month: DEFAULT_MONTH, year: DEFAULT_YEAR }
    }
}

impl TryFrom<NaiveDate> for MonthYear {
    type Error = Box<dyn Error + Send + Sync>;

    fn try_from(date: NaiveDate) -> Result<Self, Self::Error> {
        Self::new(date.month(), date.year())
    }
}

impl Display for MonthYear {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}/{}", self.month, self.year)
    }
}


/// A slot of the month grid
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    /// Padding before the 1st or after the last day of the month
    Blank,
    /// A day of the month (1-based)
    Day(u32),
}

impl Cell {
    pub fn day(&self) -> Option<u32> {
        match self {
            Cell::Day(d) => Some(*d),
            Cell::Blank => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Blank => true,
            _ => false,
        }
    }
}


/// The cells that are displayed for a month, week by week, starting on Sunday
#[derive(Clone, Debug, PartialEq)]
pub struct MonthGrid {
    period: MonthYear,
    cells: Vec<Cell>,
}

impl MonthGrid {
    pub fn new(period: MonthYear) -> Self {
        let leading = period.first_weekday() as usize;
        let days = period.days_in_month();

        let mut cells = Vec::with_capacity(GRID_CELLS.max(leading + days as usize));
        cells.extend(std::iter::repeat(Cell::Blank).take(leading));
        cells.extend((1..=days).map(Cell::Day));

        cells.resize(cells.len().max(GRID_CELLS), Cell::Blank);

        Self { period, cells }
    }

    pub fn period(&self) -> MonthYear { self.period }
    pub fn cells(&self) -> &[Cell]    { &self.cells }

    /// The count of blank cells before the 1st of the month
    pub fn leading_blanks(&self) -> usize {
        self.cells.iter().take_while(|c| c.is_blank()).count()
    }

    /// The count of blank cells after the last day of the month
    pub fn trailing_blanks(&self) -> usize {
        self.cells.iter().rev().take_while(|c| c.is_blank()).count()
    }

    /// The cells, split into rows of seven days
    pub fn weeks(&self) -> std::slice::Chunks<'_, Cell> {
        self.cells.chunks(DAYS_PER_WEEK)
    }

    /// The position of a given day in the grid, as `(week, weekday)`
    pub fn position_of(&self, day: u32) -> Option<(usize, usize)> {
        self.cells.iter()
            .position(|c| *c == Cell::Day(day))
            .map(|index| (index / DAYS_PER_WEEK, index % DAYS_PER_WEEK))
    }
}


/// How the due date of a task is compared to the days of the grid
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DayMatch {
    /// Only the day of the month is compared, whatever the month and year of the task
    DayOfMonth,
    /// The full date must match
    ExactDate,
}

impl Default for DayMatch {
    fn default() -> Self {
        DayMatch::DayOfMonth
    }
}

/// Returns the tasks that are due on a given day of the displayed month.
///
/// Tasks that have no valid due date are never returned
pub fn tasks_for_day<'t>(tasks: &'t [Task], period: MonthYear, day: u32, mode: DayMatch) -> Vec<&'t Task> {
    tasks.iter()
        .filter(|task| match task.due_date() {
            None => false,
            Some(due) => match mode {
                DayMatch::DayOfMonth => due.day() == day,
                DayMatch::ExactDate => period.contains(&due) && due.day() == day,
            },
        })
        .collect()
}
