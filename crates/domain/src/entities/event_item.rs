//! Calendar event entity

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::{
    entities::RecurrenceRule,
    errors::DomainError,
    value_objects::{ItemId, SeriesId},
};

/// When during its day an event takes place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventTiming {
    /// No specific start or end time
    AllDay,
    /// Occupies `start..end` on its date
    Timed { start: NaiveTime, end: NaiveTime },
}

impl EventTiming {
    /// Create a timed slot, rejecting an end before the start
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidDateTime`] if `end < start`.
    pub fn timed(start: NaiveTime, end: NaiveTime) -> Result<Self, DomainError> {
        if end < start {
            return Err(DomainError::InvalidDateTime(format!(
                "event ends at {end} before it starts at {start}"
            )));
        }
        Ok(Self::Timed { start, end })
    }

    /// Start time, if timed
    #[must_use]
    pub const fn start(&self) -> Option<NaiveTime> {
        match self {
            Self::AllDay => None,
            Self::Timed { start, .. } => Some(*start),
        }
    }

    /// End time, if timed
    #[must_use]
    pub const fn end(&self) -> Option<NaiveTime> {
        match self {
            Self::AllDay => None,
            Self::Timed { end, .. } => Some(*end),
        }
    }
}

/// A calendar event, optionally one instance of a recurrence series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventItem {
    pub id: ItemId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub date: NaiveDate,
    pub timing: EventTiming,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<RecurrenceRule>,
}

impl EventItem {
    /// Create a new event
    #[must_use]
    pub fn new(name: impl Into<String>, date: NaiveDate, timing: EventTiming) -> Self {
        Self {
            id: ItemId::new(),
            name: name.into(),
            category: None,
            location: None,
            description: None,
            date,
            timing,
            recurrence: None,
        }
    }

    /// Create an all-day event
    #[must_use]
    pub fn all_day(name: impl Into<String>, date: NaiveDate) -> Self {
        Self::new(name, date, EventTiming::AllDay)
    }

    /// Set the category
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the location
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Set a description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach a recurrence rule
    #[must_use]
    pub fn with_recurrence(mut self, rule: RecurrenceRule) -> Self {
        self.recurrence = Some(rule);
        self
    }

    /// Check if this is an all-day event
    #[must_use]
    pub const fn is_all_day(&self) -> bool {
        matches!(self.timing, EventTiming::AllDay)
    }

    /// Series this event belongs to, if any
    #[must_use]
    pub fn series_id(&self) -> Option<SeriesId> {
        self.recurrence.as_ref().and_then(|r| r.series_id)
    }

    /// Copy of this event on another date, under a fresh id, in the same series
    #[must_use]
    pub fn instance_on(&self, date: NaiveDate) -> Self {
        Self {
            id: ItemId::new(),
            date,
            ..self.clone()
        }
    }

    /// Cut this event loose from its series, keeping the repeat pattern for display
    pub fn detach(&mut self) {
        if let Some(rule) = self.recurrence.as_mut() {
            rule.series_id = None;
        }
    }
}

/// Field changes applied to one or more events of a series
///
/// `None` leaves a field untouched. For the optional text fields, an empty
/// string clears the value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEdit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timing: Option<EventTiming>,
    /// Replacement repeat pattern; its series id is ignored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<RecurrenceRule>,
}

fn replace_text(target: &mut Option<String>, value: Option<&String>) {
    if let Some(value) = value {
        *target = if value.trim().is_empty() {
            None
        } else {
            Some(value.clone())
        };
    }
}

impl EventEdit {
    /// Check if the edit changes nothing
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.location.is_none()
            && self.description.is_none()
            && self.date.is_none()
            && self.timing.is_none()
            && self.recurrence.is_none()
    }

    /// Apply the descriptive fields (everything but date and recurrence)
    pub fn apply_details(&self, event: &mut EventItem) {
        if let Some(name) = &self.name {
            event.name.clone_from(name);
        }
        replace_text(&mut event.category, self.category.as_ref());
        replace_text(&mut event.location, self.location.as_ref());
        replace_text(&mut event.description, self.description.as_ref());
        if let Some(timing) = self.timing {
            event.timing = timing;
        }
    }

    /// Apply every field, keeping the event's current series id
    pub fn apply_to(&self, event: &mut EventItem) {
        self.apply_details(event);
        if let Some(date) = self.date {
            event.date = date;
        }
        if let Some(rule) = &self.recurrence {
            let series_id = event.series_id();
            event.recurrence = Some(RecurrenceRule {
                series_id,
                ..rule.clone()
            });
        }
    }
}
