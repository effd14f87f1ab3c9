//! Month calendar grid
//!
//! Lays out the 35 or 42 day cells needed to show one month in full weeks,
//! padding with days borrowed from the adjacent months, and buckets planner
//! items into the cells in display order.

use std::{fmt, str::FromStr};

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::{
    entities::{CalendarCell, DisplaySlot, PlannerItem, months_between},
    errors::DomainError,
    value_objects::ItemId,
};

const DAYS_PER_WEEK: usize = 7;
const MIN_ROWS: usize = 5;

/// First column of the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    /// Column (0-based) of `day` in a grid starting on this weekday
    #[must_use]
    pub fn column_of(self, day: Weekday) -> u32 {
        match self {
            Self::Sunday => day.num_days_from_sunday(),
            Self::Monday => day.num_days_from_monday(),
        }
    }

    /// Weekdays in column order
    #[must_use]
    pub fn columns(self) -> [Weekday; 7] {
        let first = match self {
            Self::Sunday => Weekday::Sun,
            Self::Monday => Weekday::Mon,
        };
        let mut next = first;
        std::array::from_fn(|_| {
            let day = next;
            next = next.succ();
            day
        })
    }
}

impl fmt::Display for WeekStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sunday => write!(f, "sunday"),
            Self::Monday => write!(f, "monday"),
        }
    }
}

impl FromStr for WeekStart {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sunday" | "sun" => Ok(Self::Sunday),
            "monday" | "mon" => Ok(Self::Monday),
            other => Err(DomainError::ValidationError(format!(
                "weeks start on sunday or monday, not '{other}'"
            ))),
        }
    }
}

/// Which kinds of items a month view shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewFilter {
    #[default]
    All,
    AssignmentsOnly,
    EventsOnly,
}

impl FromStr for ViewFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "all" => Ok(Self::All),
            "assignments" | "assignments_only" => Ok(Self::AssignmentsOnly),
            "events" | "events_only" => Ok(Self::EventsOnly),
            other => Err(DomainError::ValidationError(format!("unknown view filter '{other}'"))),
        }
    }
}

/// Filter applied while bucketing items into cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GridFilter {
    #[serde(default)]
    pub kinds: ViewFilter,
    /// Leave finished assignments off the grid
    #[serde(default)]
    pub hide_completed: bool,
}

impl GridFilter {
    /// Check whether `item` should be shown
    #[must_use]
    pub const fn admits(&self, item: &PlannerItem) -> bool {
        match item {
            PlannerItem::Assignment(a) => {
                !matches!(self.kinds, ViewFilter::EventsOnly) && !(self.hide_completed && a.is_done)
            },
            PlannerItem::Event(_) => !matches!(self.kinds, ViewFilter::AssignmentsOnly),
        }
    }
}

/// Number of days in `month` of `year`
#[must_use]
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let (next_year, next_month) = next_month(year, month);
    let next_first = NaiveDate::from_ymd_opt(next_year, next_month, 1)?;
    u32::try_from((next_first - first).num_days()).ok()
}

/// The month before (`year`, `month`)
#[must_use]
pub const fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month <= 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

/// The month after (`year`, `month`)
#[must_use]
pub const fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month >= 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

/// A month laid out in full weeks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub week_start: WeekStart,
    cells: Vec<CalendarCell>,
}

impl MonthGrid {
    /// Lay out the empty grid for (`year`, `month`)
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidDateTime`] if the month does not exist
    /// or its padding days fall outside the supported date range.
    pub fn layout(year: i32, month: u32, week_start: WeekStart) -> Result<Self, DomainError> {
        let invalid = || DomainError::InvalidDateTime(format!("no such month {year}-{month:02}"));
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let last_day = days_in_month(year, month).ok_or_else(invalid)?;

        let leading = week_start.column_of(first.weekday());
        let used = (leading + last_day) as usize;
        let rows = used.div_ceil(DAYS_PER_WEEK).max(MIN_ROWS);

        let out_of_range = || {
            DomainError::InvalidDateTime(format!("{year}-{month:02} cannot be shown in full weeks"))
        };
        let grid_start = first
            .checked_sub_days(Days::new(u64::from(leading)))
            .ok_or_else(out_of_range)?;
        let cells: Vec<CalendarCell> = grid_start
            .iter_days()
            .take(rows * DAYS_PER_WEEK)
            .map(|date| {
                let outside = date.year() != year || date.month() != month;
                CalendarCell::new(date, outside)
            })
            .collect();
        if cells.len() < rows * DAYS_PER_WEEK {
            return Err(out_of_range());
        }

        Ok(Self {
            year,
            month,
            week_start,
            cells,
        })
    }

    /// Lay out the grid and bucket `items` into it
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidDateTime`] if the month does not exist.
    pub fn build<'a, I>(
        year: i32,
        month: u32,
        week_start: WeekStart,
        items: I,
        filter: &GridFilter,
    ) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = &'a PlannerItem>,
    {
        let mut grid = Self::layout(year, month, week_start)?;
        grid.populate(items, filter);
        Ok(grid)
    }

    /// Replace the cells' contents with `items`, in display order
    ///
    /// Items more than one month away from the displayed month, or in an
    /// adjacent month but outside the padding, are skipped. Returns how many
    /// items were placed.
    pub fn populate<'a, I>(&mut self, items: I, filter: &GridFilter) -> usize
    where
        I: IntoIterator<Item = &'a PlannerItem>,
    {
        let first_visible = self.first_visible();
        let mut buckets: Vec<Vec<(DisplaySlot, ItemId)>> = vec![Vec::new(); self.cells.len()];
        let mut placed = 0;

        for item in items {
            if !filter.admits(item) {
                continue;
            }
            if !(-1..=1).contains(&self.month_offset(item.date())) {
                continue;
            }
            let Ok(index) = usize::try_from((item.date() - first_visible).num_days()) else {
                continue;
            };
            if let Some(bucket) = buckets.get_mut(index) {
                bucket.push((item.display_slot(), item.id()));
                placed += 1;
            }
        }

        for (cell, mut bucket) in self.cells.iter_mut().zip(buckets) {
            bucket.sort_by_key(|(slot, _)| *slot);
            cell.items = bucket.into_iter().map(|(_, id)| id).collect();
        }
        placed
    }

    /// Months between the displayed month and `date` (-1 previous, 0 same, 1 next)
    #[must_use]
    pub fn month_offset(&self, date: NaiveDate) -> i64 {
        self.first_of_month()
            .map_or(i64::MAX, |first| months_between(first, date))
    }

    fn first_of_month(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// All cells, row by row
    #[must_use]
    pub fn cells(&self) -> &[CalendarCell] {
        &self.cells
    }

    /// Cells grouped into weeks
    pub fn weeks(&self) -> impl Iterator<Item = &[CalendarCell]> {
        self.cells.chunks(DAYS_PER_WEEK)
    }

    /// Number of week rows (5 or 6)
    #[must_use]
    pub fn rows(&self) -> usize {
        self.cells.len() / DAYS_PER_WEEK
    }

    /// Date of the top-left cell
    #[must_use]
    pub fn first_visible(&self) -> NaiveDate {
        self.cells.first().map_or(NaiveDate::MIN, |c| c.date)
    }

    /// Date of the bottom-right cell
    #[must_use]
    pub fn last_visible(&self) -> NaiveDate {
        self.cells.last().map_or(NaiveDate::MIN, |c| c.date)
    }

    /// Cells borrowed from the previous month
    #[must_use]
    pub fn leading_count(&self) -> usize {
        self.cells
            .iter()
            .take_while(|c| c.is_outside_current_month)
            .count()
    }

    /// Cells borrowed from the next month
    #[must_use]
    pub fn trailing_count(&self) -> usize {
        self.cells
            .iter()
            .rev()
            .take_while(|c| c.is_outside_current_month)
            .count()
    }

    /// Cell showing `date`, if visible
    #[must_use]
    pub fn cell_for(&self, date: NaiveDate) -> Option<&CalendarCell> {
        let index = usize::try_from((date - self.first_visible()).num_days()).ok()?;
        self.cells.get(index)
    }

    /// Days of the displayed month that have something scheduled
    #[must_use]
    pub fn busy_days(&self) -> Vec<NaiveDate> {
        self.cells
            .iter()
            .filter(|c| !c.is_outside_current_month && c.is_busy())
            .map(|c| c.date)
            .collect()
    }
}
