//! Application services - Use case implementations

mod course_catalog;
mod planner_service;
mod series_editor;

pub use course_catalog::{
    CatalogChange, CourseCatalog, GradeReport, check_course_reference, grade_reports,
};
pub use planner_service::{CommandOutcome, MonthView, PlannerService, load_state};
pub use series_editor::{ChangeSet, SeriesEditor};
