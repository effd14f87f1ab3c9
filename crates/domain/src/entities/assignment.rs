//! Assignment entity - coursework with a due date

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::value_objects::{CourseId, ItemId, Priority};

/// A piece of coursework due on a given day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: ItemId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_id: Option<CourseId>,
    /// Name of one of the course's assignment types
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignment_type: Option<String>,
    pub due_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_time: Option<NaiveTime>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub is_done: bool,
    /// Free-form grade as entered by the user ("A-", "87", ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub comments: String,
}

impl Assignment {
    /// Create a new open assignment
    #[must_use]
    pub fn new(name: impl Into<String>, due_date: NaiveDate) -> Self {
        Self {
            id: ItemId::new(),
            name: name.into(),
            course_id: None,
            assignment_type: None,
            due_date,
            due_time: None,
            priority: Priority::default(),
            is_done: false,
            grade: None,
            comments: String::new(),
        }
    }

    /// Attach to a course
    #[must_use]
    pub const fn with_course(mut self, course_id: CourseId) -> Self {
        self.course_id = Some(course_id);
        self
    }

    /// Set the assignment type, by name
    #[must_use]
    pub fn with_assignment_type(mut self, name: impl Into<String>) -> Self {
        self.assignment_type = Some(name.into());
        self
    }

    /// Set the due time
    #[must_use]
    pub const fn with_due_time(mut self, due_time: NaiveTime) -> Self {
        self.due_time = Some(due_time);
        self
    }

    /// Set the priority
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Set comments
    #[must_use]
    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = comments.into();
        self
    }

    /// Copy under a fresh id
    #[must_use]
    pub fn duplicate(&self) -> Self {
        Self {
            id: ItemId::new(),
            ..self.clone()
        }
    }

    /// Mark done or open again
    pub fn set_done(&mut self, done: bool) {
        self.is_done = done;
    }

    /// Record a grade; a blank grade clears it
    pub fn set_grade(&mut self, grade: Option<String>) {
        self.grade = grade
            .map(|g| g.trim().to_string())
            .filter(|g| !g.is_empty());
    }

    /// Numeric grade in percent, if the grade is a number such as "87" or "87.5%"
    #[must_use]
    pub fn grade_percent(&self) -> Option<f64> {
        self.grade
            .as_deref()
            .and_then(|g| g.trim().trim_end_matches('%').trim_end().parse::<f64>().ok())
            .filter(|g| g.is_finite())
    }

    /// Check whether the assignment is still open after `today`
    #[must_use]
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.is_done && self.due_date < today
    }
}
