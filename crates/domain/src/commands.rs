//! Planner commands - Strongly typed representations of user intents
//!
//! The presentation layer turns user actions into these values; the
//! application layer executes them and hands data back for rendering.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    entities::{Assignment, AssignmentType, Course, EventEdit, EventItem, RecurrenceRule, Term},
    errors::DomainError,
    value_objects::{CourseId, ItemId, TermId},
};

/// Which members of a recurrence series an edit or removal applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesScope {
    /// Only the selected instance; it leaves the series
    #[default]
    ThisInstance,
    /// Every instance sharing the series id
    AllInSeries,
    /// The selected instance and everything dated on or after it
    AllFollowing,
}

impl fmt::Display for SeriesScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ThisInstance => write!(f, "this"),
            Self::AllInSeries => write!(f, "all"),
            Self::AllFollowing => write!(f, "following"),
        }
    }
}

impl FromStr for SeriesScope {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "this" | "instance" | "only" => Ok(Self::ThisInstance),
            "all" | "series" => Ok(Self::AllInSeries),
            "following" | "future" => Ok(Self::AllFollowing),
            other => Err(DomainError::ValidationError(format!(
                "unknown series scope '{other}', use this, all or following"
            ))),
        }
    }
}

/// All intents the planner core understands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlannerCommand {
    /// Add a standalone event, expanding it if it carries a repeat pattern
    AddEvent { event: EventItem },

    /// Add an assignment
    AddAssignment { assignment: Assignment },

    /// Turn an existing event into the seed of a new series
    AttachRecurrence { item_id: ItemId, rule: RecurrenceRule },

    /// Edit an event and, depending on scope, its siblings
    EditEvent {
        item_id: ItemId,
        edit: EventEdit,
        scope: SeriesScope,
    },

    /// Remove an item and, depending on scope, its siblings
    RemoveItem { item_id: ItemId, scope: SeriesScope },

    /// Copy an item under a new id
    DuplicateItem { item_id: ItemId },

    /// Mark an assignment done or open
    SetAssignmentDone { item_id: ItemId, done: bool },

    /// Record or clear an assignment's grade
    SetAssignmentGrade {
        item_id: ItemId,
        grade: Option<String>,
    },

    /// Add a term
    AddTerm { term: Term },

    /// Add a course to an existing term
    AddCourse { course: Course },

    /// Add a weighted assignment type to a course
    AddAssignmentType {
        course_id: CourseId,
        assignment_type: AssignmentType,
    },

    /// Compute course grades, for one term or all of them
    ShowGrades { term_id: Option<TermId> },

    /// Build the month view
    ShowMonth { year: i32, month: u32 },

    /// List items dated within an inclusive range
    ListItems { from: NaiveDate, to: NaiveDate },
}

impl PlannerCommand {
    /// Check if executing this command changes the item collection
    pub const fn is_mutation(&self) -> bool {
        !matches!(
            self,
            Self::ShowMonth { .. } | Self::ListItems { .. } | Self::ShowGrades { .. }
        )
    }

    /// Get a human-readable description of the command
    pub fn description(&self) -> String {
        match self {
            Self::AddEvent { event } => format!("Add event '{}' on {}", event.name, event.date),
            Self::AddAssignment { assignment } => format!(
                "Add assignment '{}' due {}",
                assignment.name, assignment.due_date
            ),
            Self::AttachRecurrence { item_id, rule } => {
                format!("Repeat {} {}", item_id.short(), rule.summary())
            },
            Self::EditEvent { item_id, scope, .. } => {
                format!("Edit {} ({scope})", item_id.short())
            },
            Self::RemoveItem { item_id, scope } => {
                format!("Remove {} ({scope})", item_id.short())
            },
            Self::DuplicateItem { item_id } => format!("Duplicate {}", item_id.short()),
            Self::SetAssignmentDone { item_id, done } => {
                let state = if *done { "done" } else { "open" };
                format!("Mark {} {state}", item_id.short())
            },
            Self::SetAssignmentGrade { item_id, grade } => match grade {
                Some(grade) => format!("Grade {} {grade}", item_id.short()),
                None => format!("Clear grade of {}", item_id.short()),
            },
            Self::AddTerm { term } => format!("Add term '{}'", term.name),
            Self::AddCourse { course } => format!("Add course '{}'", course.name),
            Self::AddAssignmentType {
                course_id,
                assignment_type,
            } => format!(
                "Add type '{}' ({}%) to course {}",
                assignment_type.name,
                assignment_type.weight,
                course_id.short()
            ),
            Self::ShowGrades { term_id } => match term_id {
                Some(term_id) => format!("Show grades of term {}", term_id.short()),
                None => "Show grades".to_string(),
            },
            Self::ShowMonth { year, month } => format!("Show {year}-{month:02}"),
            Self::ListItems { from, to } => format!("List items {from} to {to}"),
        }
    }
}
