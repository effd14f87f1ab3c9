//! Calendar cell - one day square of a month view

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::value_objects::ItemId;

/// One day of a month grid and the items shown on it, in display order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarCell {
    pub date: NaiveDate,
    /// Day shown in the cell, borrowed from an adjacent month when outside
    pub day_number: u32,
    pub is_outside_current_month: bool,
    pub items: Vec<ItemId>,
}

impl CalendarCell {
    /// Empty cell for `date`
    #[must_use]
    pub fn new(date: NaiveDate, is_outside_current_month: bool) -> Self {
        Self {
            date,
            day_number: date.day(),
            is_outside_current_month,
            items: Vec::new(),
        }
    }

    /// Check if anything is scheduled on this day
    #[must_use]
    pub fn is_busy(&self) -> bool {
        !self.items.is_empty()
    }
}
