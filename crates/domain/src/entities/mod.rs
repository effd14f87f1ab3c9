//! Domain entities - Objects with identity and lifecycle

mod assignment;
mod calendar_cell;
mod course;
mod event_item;
mod planner_item;
mod recurrence_rule;
mod term;

pub use assignment::Assignment;
pub use calendar_cell::CalendarCell;
pub use course::{AssignmentType, Course};
pub use event_item::{EventEdit, EventItem, EventTiming};
pub use planner_item::{DisplaySlot, PlannerItem};
pub use recurrence_rule::{Frequency, RecurrenceRule, months_between};
pub use term::Term;
