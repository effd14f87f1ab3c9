//! Recurrence rule - how an event repeats

use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{
    errors::DomainError,
    value_objects::{SeriesId, WeekdaySet},
};

/// How often a series repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    /// Does not repeat
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    /// Get a human-readable label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::None => "Does not repeat",
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
            Self::Yearly => "Yearly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Frequency {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "never" => Ok(Self::None),
            "daily" | "day" => Ok(Self::Daily),
            "weekly" | "week" => Ok(Self::Weekly),
            "monthly" | "month" => Ok(Self::Monthly),
            "yearly" | "year" | "annually" => Ok(Self::Yearly),
            other => Err(DomainError::ValidationError(format!(
                "unknown frequency '{other}'"
            ))),
        }
    }
}

fn weekdays_unset(set: &WeekdaySet) -> bool {
    set.is_empty()
}

/// Describes how an event repeats between two inclusive dates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    /// Series shared by every materialized instance; `None` once detached
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series_id: Option<SeriesId>,
    pub frequency: Frequency,
    /// Every N periods
    pub interval: u32,
    /// Only consulted for weekly rules
    #[serde(default, skip_serializing_if = "weekdays_unset")]
    pub weekdays: WeekdaySet,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Date periods are counted from when it precedes `start_date`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<NaiveDate>,
}

impl RecurrenceRule {
    /// Create a rule repeating every period between `start_date` and `end_date`
    #[must_use]
    pub fn new(frequency: Frequency, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            series_id: None,
            frequency,
            interval: 1,
            weekdays: WeekdaySet::empty(),
            start_date,
            end_date,
            anchor: None,
        }
    }

    /// Daily rule
    #[must_use]
    pub fn daily(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self::new(Frequency::Daily, start_date, end_date)
    }

    /// Weekly rule on the given weekdays
    #[must_use]
    pub fn weekly(weekdays: WeekdaySet, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self::new(Frequency::Weekly, start_date, end_date).with_weekdays(weekdays)
    }

    /// Monthly rule on the start date's day of month
    #[must_use]
    pub fn monthly(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self::new(Frequency::Monthly, start_date, end_date)
    }

    /// Yearly rule on the start date's month and day
    #[must_use]
    pub fn yearly(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self::new(Frequency::Yearly, start_date, end_date)
    }

    /// Repeat every `interval` periods
    #[must_use]
    pub const fn with_interval(mut self, interval: u32) -> Self {
        self.interval = interval;
        self
    }

    /// Set the weekday mask
    #[must_use]
    pub const fn with_weekdays(mut self, weekdays: WeekdaySet) -> Self {
        self.weekdays = weekdays;
        self
    }

    /// Assign the series this rule belongs to
    #[must_use]
    pub const fn with_series_id(mut self, series_id: SeriesId) -> Self {
        self.series_id = Some(series_id);
        self
    }

    /// Date the interval and the day of month are counted from
    #[must_use]
    pub fn anchor_date(&self) -> NaiveDate {
        self.anchor.unwrap_or(self.start_date)
    }

    /// Start selecting on `date` without shifting the pattern
    ///
    /// Dates before `date` are no longer selected, but every later date the
    /// rule selected before is still selected.
    pub fn start_on(&mut self, date: NaiveDate) {
        let anchor = self.anchor_date();
        self.anchor = (anchor < date).then_some(anchor);
        self.start_date = date;
    }

    /// Whether this rule currently ties its event to a series
    #[must_use]
    pub const fn is_recurring(&self) -> bool {
        self.series_id.is_some() && !matches!(self.frequency, Frequency::None)
    }

    /// Check the rule's invariants
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::MalformedRecurrence`] if the end date precedes
    /// the start date, the interval is zero, or a weekly rule selects no day.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.end_date < self.start_date {
            return Err(DomainError::MalformedRecurrence(format!(
                "end date {} is before start date {}",
                self.end_date, self.start_date
            )));
        }
        if self.interval == 0 {
            return Err(DomainError::MalformedRecurrence(
                "interval must be at least 1".to_string(),
            ));
        }
        if self.frequency == Frequency::Weekly && self.weekdays.is_empty() {
            return Err(DomainError::MalformedRecurrence(
                "weekly rule selects no weekday".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether `date` is one of the dates this rule selects
    ///
    /// Monthly and yearly rules compare the day of month literally, so a
    /// series starting on the 31st skips months without a 31st.
    #[must_use]
    pub fn selects(&self, date: NaiveDate) -> bool {
        let anchor = self.anchor_date();
        if date < self.start_date || date < anchor || date > self.end_date || self.interval == 0 {
            return false;
        }
        let interval = i64::from(self.interval);
        let days = (date - anchor).num_days();

        match self.frequency {
            Frequency::None => false,
            Frequency::Daily => days % interval == 0,
            Frequency::Weekly => {
                self.weekdays.contains(date.weekday()) && (days / 7) % interval == 0
            },
            Frequency::Monthly => {
                date.day() == anchor.day() && months_between(anchor, date) % interval == 0
            },
            Frequency::Yearly => {
                date.month() == anchor.month()
                    && date.day() == anchor.day()
                    && i64::from(date.year() - anchor.year()) % interval == 0
            },
        }
    }

    /// Short description such as "Every 2 weeks on Mon,Wed until 2024-05-01"
    #[must_use]
    pub fn summary(&self) -> String {
        let unit = match self.frequency {
            Frequency::None => return Frequency::None.label().to_string(),
            Frequency::Daily => "day",
            Frequency::Weekly => "week",
            Frequency::Monthly => "month",
            Frequency::Yearly => "year",
        };
        let every = if self.interval == 1 {
            format!("Every {unit}")
        } else {
            format!("Every {} {unit}s", self.interval)
        };
        let on = if self.frequency == Frequency::Weekly {
            format!(" on {}", self.weekdays)
        } else {
            String::new()
        };
        format!("{every}{on} until {}", self.end_date)
    }
}

/// Number of month boundaries crossed going from `from` to `to`
#[must_use]
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    i64::from(to.year() - from.year()) * 12 + i64::from(to.month()) - i64::from(from.month())
}
