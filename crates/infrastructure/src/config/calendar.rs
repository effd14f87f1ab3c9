//! Month view configuration.

use domain::{GridFilter, ViewFilter, WeekStart};
use serde::{Deserialize, Serialize};

/// How the month grid is laid out and which items it shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// First column of the grid: "sunday" (default) or "monday"
    #[serde(default)]
    pub week_starts_on: WeekStart,

    /// Which kinds of items to show: "all", "assignments_only" or "events_only"
    #[serde(default)]
    pub filter: ViewFilter,

    /// Leave finished assignments off the grid
    #[serde(default)]
    pub hide_completed: bool,
}

impl CalendarConfig {
    /// Filter applied while building month grids
    #[must_use]
    pub const fn grid_filter(&self) -> GridFilter {
        GridFilter {
            kinds: self.filter,
            hide_completed: self.hide_completed,
        }
    }
}
