//! Weighted course grades
//!
//! A course grade averages the graded assignments of each assignment type,
//! then combines the type averages by weight. Only types with at least one
//! graded assignment count, so the grade reflects work handed back so far.

use serde::{Deserialize, Serialize};

use crate::entities::{Assignment, Course};

/// Average of one assignment type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeAverage {
    pub name: String,
    pub weight: f64,
    pub average: f64,
    pub graded: u32,
}

/// Current grade of a course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseGrade {
    /// Weighted grade in percent
    pub percent: f64,
    /// Sum of the weights of the types that have grades
    pub weight_graded: f64,
    /// Per type, in the course's type order
    pub by_type: Vec<TypeAverage>,
}

impl CourseGrade {
    /// Number of assignments the grade is based on
    #[must_use]
    pub fn graded(&self) -> u32 {
        self.by_type.iter().map(|t| t.graded).sum()
    }
}

/// Compute the grade of `course` from `assignments`
///
/// Counts assignments of this course that are done, carry a numeric grade
/// and name one of the course's types. Returns `None` when nothing counts.
pub fn course_grade<'a, I>(course: &Course, assignments: I) -> Option<CourseGrade>
where
    I: IntoIterator<Item = &'a Assignment>,
{
    let mut sums = vec![(0.0_f64, 0_u32); course.assignment_types.len()];

    for assignment in assignments {
        if assignment.course_id != Some(course.id) || !assignment.is_done {
            continue;
        }
        let Some(percent) = assignment.grade_percent() else {
            continue;
        };
        let Some(index) = assignment.assignment_type.as_deref().and_then(|name| {
            course
                .assignment_types
                .iter()
                .position(|t| t.name.eq_ignore_ascii_case(name.trim()))
        }) else {
            continue;
        };
        sums[index].0 += percent;
        sums[index].1 += 1;
    }

    let by_type: Vec<TypeAverage> = course
        .assignment_types
        .iter()
        .zip(sums)
        .filter(|(_, (_, graded))| *graded > 0)
        .map(|(t, (sum, graded))| TypeAverage {
            name: t.name.clone(),
            weight: t.weight,
            average: sum / f64::from(graded),
            graded,
        })
        .collect();

    let weight_graded: f64 = by_type.iter().map(|t| t.weight).sum();
    if by_type.is_empty() || weight_graded <= 0.0 {
        return None;
    }
    let weighted: f64 = by_type.iter().map(|t| t.average * t.weight).sum();
    Some(CourseGrade {
        percent: weighted / weight_graded,
        weight_graded,
        by_type,
    })
}
