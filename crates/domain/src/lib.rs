//! Domain layer for the academic planner
//!
//! Contains the planner's entities, value objects, recurrence expansion,
//! month grid layout and course grades. Everything here is synchronous and free of I/O.

pub mod commands;
pub mod entities;
pub mod errors;
pub mod grades;
pub mod month_grid;
pub mod recurrence;
pub mod value_objects;

pub use commands::{PlannerCommand, SeriesScope};
pub use entities::*;
pub use errors::DomainError;
pub use grades::{CourseGrade, TypeAverage, course_grade};
pub use month_grid::{GridFilter, MonthGrid, ViewFilter, WeekStart};
pub use value_objects::*;
