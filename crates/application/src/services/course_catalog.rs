//! Terms, courses and grades
//!
//! Keeps the terms and courses assignments are filed under, and computes
//! the weighted grade of each course from its graded assignments.

use domain::{
    Assignment, AssignmentType, Course, CourseGrade, CourseId, DomainError, Term, TermId,
    course_grade,
};
use tracing::{debug, info};

use crate::{error::ApplicationError, state::PlannerState};

/// What a catalog command added
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogChange {
    TermAdded(TermId),
    CourseAdded(CourseId),
    TypeAdded { course_id: CourseId, name: String },
}

/// Grade of one course, `None` while nothing is graded
#[derive(Debug, Clone, PartialEq)]
pub struct GradeReport {
    pub course: Course,
    pub term_name: String,
    pub grade: Option<CourseGrade>,
}

/// Adds terms, courses and assignment types to the planner state
pub struct CourseCatalog<'a> {
    state: &'a mut PlannerState,
}

impl std::fmt::Debug for CourseCatalog<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CourseCatalog")
            .field("terms", &self.state.terms().len())
            .field("courses", &self.state.courses().len())
            .finish_non_exhaustive()
    }
}

impl<'a> CourseCatalog<'a> {
    pub const fn new(state: &'a mut PlannerState) -> Self {
        Self { state }
    }

    /// Add a term; names are unique ignoring case
    pub fn add_term(&mut self, term: Term) -> Result<CatalogChange, ApplicationError> {
        if self
            .state
            .terms()
            .iter()
            .any(|t| t.name.eq_ignore_ascii_case(&term.name))
        {
            return Err(DomainError::ValidationError(format!(
                "a term named '{}' already exists",
                term.name
            ))
            .into());
        }
        let id = self.state.push_term(term);
        info!(term = %id, "Added term");
        Ok(CatalogChange::TermAdded(id))
    }

    /// Add a course to its term; names are unique within a term
    pub fn add_course(&mut self, course: Course) -> Result<CatalogChange, ApplicationError> {
        if self.state.term(course.term_id).is_none() {
            return Err(DomainError::not_found("Term", course.term_id.to_string()).into());
        }
        if self
            .state
            .courses()
            .iter()
            .any(|c| c.term_id == course.term_id && c.name.eq_ignore_ascii_case(&course.name))
        {
            return Err(DomainError::ValidationError(format!(
                "the term already has a course named '{}'",
                course.name
            ))
            .into());
        }
        let id = self.state.push_course(course);
        info!(course = %id, "Added course");
        Ok(CatalogChange::CourseAdded(id))
    }

    /// Add a weighted assignment type to a course
    pub fn add_assignment_type(
        &mut self,
        course_id: CourseId,
        assignment_type: AssignmentType,
    ) -> Result<CatalogChange, ApplicationError> {
        let course = self
            .state
            .course_mut(course_id)
            .ok_or_else(|| DomainError::not_found("Course", course_id.to_string()))?;
        let name = assignment_type.name.clone();
        course.add_assignment_type(assignment_type)?;
        debug!(course = %course_id, %name, total = course.total_weight(), "Added assignment type");
        Ok(CatalogChange::TypeAdded { course_id, name })
    }
}

/// Check that an assignment's course and type exist
///
/// # Errors
///
/// Returns [`DomainError::NotFound`] for an unknown course and
/// [`DomainError::ValidationError`] for a type the course lacks or a type
/// without a course.
pub fn check_course_reference(
    state: &PlannerState,
    assignment: &Assignment,
) -> Result<(), DomainError> {
    let Some(course_id) = assignment.course_id else {
        return match &assignment.assignment_type {
            Some(name) => Err(DomainError::ValidationError(format!(
                "assignment type '{name}' needs a course"
            ))),
            None => Ok(()),
        };
    };
    let course = state
        .course(course_id)
        .ok_or_else(|| DomainError::not_found("Course", course_id.to_string()))?;
    match &assignment.assignment_type {
        Some(name) if course.assignment_type(name).is_none() => {
            Err(DomainError::ValidationError(format!(
                "course '{}' has no assignment type '{name}'",
                course.name
            )))
        },
        _ => Ok(()),
    }
}

/// Grades of every course, or of the courses of `term_id`
///
/// # Errors
///
/// Returns [`DomainError::NotFound`] if `term_id` names no term.
pub fn grade_reports(
    state: &PlannerState,
    term_id: Option<TermId>,
) -> Result<Vec<GradeReport>, ApplicationError> {
    if let Some(id) = term_id.filter(|id| state.term(*id).is_none()) {
        return Err(DomainError::not_found("Term", id.to_string()).into());
    }

    let reports = state
        .courses()
        .iter()
        .filter(|course| term_id.is_none_or(|id| course.term_id == id))
        .map(|course| GradeReport {
            course: course.clone(),
            term_name: state
                .term(course.term_id)
                .map(|term| term.name.clone())
                .unwrap_or_default(),
            grade: course_grade(course, state.assignments()),
        })
        .collect();
    Ok(reports)
}
