//! Weekday mask for weekly recurrences

use std::{fmt, str::FromStr};

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

const ALL_DAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// A set of weekdays, stored as a seven-bit mask (bit 0 = Monday)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Weekday>", into = "Vec<Weekday>")]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    /// The empty set
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Every day of the week
    #[must_use]
    pub const fn all() -> Self {
        Self(0b111_1111)
    }

    /// Set containing a single day
    #[must_use]
    pub const fn single(day: Weekday) -> Self {
        Self(Self::bit(day))
    }

    const fn bit(day: Weekday) -> u8 {
        1 << day.num_days_from_monday()
    }

    /// Add a day, returning the updated set
    #[must_use]
    pub const fn with(self, day: Weekday) -> Self {
        Self(self.0 | Self::bit(day))
    }

    /// Add a day in place
    pub fn insert(&mut self, day: Weekday) {
        self.0 |= Self::bit(day);
    }

    /// Remove a day in place
    pub fn remove(&mut self, day: Weekday) {
        self.0 &= !Self::bit(day);
    }

    /// Check membership
    #[must_use]
    pub const fn contains(self, day: Weekday) -> bool {
        self.0 & Self::bit(day) != 0
    }

    /// Check if no day is selected
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of selected days
    #[must_use]
    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }

    /// Selected days, Monday first
    pub fn iter(self) -> impl Iterator<Item = Weekday> {
        ALL_DAYS.into_iter().filter(move |d| self.contains(*d))
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}

impl From<Vec<Weekday>> for WeekdaySet {
    fn from(days: Vec<Weekday>) -> Self {
        days.into_iter().collect()
    }
}

impl From<WeekdaySet> for Vec<Weekday> {
    fn from(set: WeekdaySet) -> Self {
        set.iter().collect()
    }
}

impl FromStr for WeekdaySet {
    type Err = DomainError;

    /// Parse a comma separated list such as `mon,wed` or `Monday, Friday`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<Weekday>()
                    .map_err(|_| DomainError::ValidationError(format!("unknown weekday '{part}'")))
            })
            .collect()
    }
}

impl fmt::Display for WeekdaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.iter().map(|d| d.to_string()).collect();
        write!(f, "{}", names.join(","))
    }
}
