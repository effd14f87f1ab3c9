//! Planner item - the unit stored in the planner arena

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::{
    entities::{Assignment, EventItem},
    value_objects::ItemId,
};

/// Anything that can appear on the calendar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlannerItem {
    Assignment(Assignment),
    Event(EventItem),
}

/// Position of an item inside a day cell
///
/// Sorting by this key puts all-day events first, then assignments, then
/// timed events by start time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DisplaySlot {
    AllDay,
    Assignment,
    Timed(NaiveTime),
}

impl PlannerItem {
    /// Item identifier
    #[must_use]
    pub const fn id(&self) -> ItemId {
        match self {
            Self::Assignment(a) => a.id,
            Self::Event(e) => e.id,
        }
    }

    /// Display name
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Assignment(a) => &a.name,
            Self::Event(e) => &e.name,
        }
    }

    /// Day the item sits on in the calendar
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        match self {
            Self::Assignment(a) => a.due_date,
            Self::Event(e) => e.date,
        }
    }

    /// Borrow as an event
    #[must_use]
    pub const fn as_event(&self) -> Option<&EventItem> {
        match self {
            Self::Event(e) => Some(e),
            Self::Assignment(_) => None,
        }
    }

    /// Mutably borrow as an event
    pub fn as_event_mut(&mut self) -> Option<&mut EventItem> {
        match self {
            Self::Event(e) => Some(e),
            Self::Assignment(_) => None,
        }
    }

    /// Borrow as an assignment
    #[must_use]
    pub const fn as_assignment(&self) -> Option<&Assignment> {
        match self {
            Self::Assignment(a) => Some(a),
            Self::Event(_) => None,
        }
    }

    /// Mutably borrow as an assignment
    pub fn as_assignment_mut(&mut self) -> Option<&mut Assignment> {
        match self {
            Self::Assignment(a) => Some(a),
            Self::Event(_) => None,
        }
    }

    /// Where the item goes inside its day cell
    #[must_use]
    pub const fn display_slot(&self) -> DisplaySlot {
        match self {
            Self::Assignment(_) => DisplaySlot::Assignment,
            Self::Event(e) => match e.timing.start() {
                None => DisplaySlot::AllDay,
                Some(start) => DisplaySlot::Timed(start),
            },
        }
    }

    /// Copy under a fresh id; duplicated events leave their series
    #[must_use]
    pub fn duplicate(&self) -> Self {
        match self {
            Self::Assignment(a) => Self::Assignment(a.duplicate()),
            Self::Event(e) => {
                let mut copy = e.instance_on(e.date);
                copy.detach();
                Self::Event(copy)
            },
        }
    }
}

impl From<Assignment> for PlannerItem {
    fn from(assignment: Assignment) -> Self {
        Self::Assignment(assignment)
    }
}

impl From<EventItem> for PlannerItem {
    fn from(event: EventItem) -> Self {
        Self::Event(event)
    }
}
