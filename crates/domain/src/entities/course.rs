//! Course entity - a class taken during a term, with weighted assignment types

use serde::{Deserialize, Serialize};

use crate::{
    errors::DomainError,
    value_objects::{CourseId, TermId},
};

/// Rounding slack when summing weights such as 33.3 + 33.3 + 33.4
const WEIGHT_TOLERANCE: f64 = 1e-9;

/// A category of coursework and its share of the course grade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentType {
    pub name: String,
    /// Percent of the course grade, in `(0, 100]`
    pub weight: f64,
}

impl AssignmentType {
    /// Create a type, validating the weight
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ValidationError`] if the name is blank or the
    /// weight is not a percentage above zero.
    pub fn new(name: impl Into<String>, weight: f64) -> Result<Self, DomainError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::ValidationError(
                "assignment type name is empty".to_string(),
            ));
        }
        if !weight.is_finite() || weight <= 0.0 || weight > 100.0 {
            return Err(DomainError::ValidationError(format!(
                "weight of '{name}' must be above 0 and at most 100, got {weight}"
            )));
        }
        Ok(Self { name, weight })
    }
}

/// A class in a term
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub term_id: TermId,
    pub name: String,
    #[serde(default)]
    pub credits: u8,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assignment_types: Vec<AssignmentType>,
}

impl Course {
    /// Create a course without assignment types
    #[must_use]
    pub fn new(name: impl Into<String>, term_id: TermId) -> Self {
        Self {
            id: CourseId::new(),
            term_id,
            name: name.into(),
            credits: 0,
            assignment_types: Vec::new(),
        }
    }

    /// Set the credit hours
    #[must_use]
    pub const fn with_credits(mut self, credits: u8) -> Self {
        self.credits = credits;
        self
    }

    /// Look up a type by name, ignoring case
    #[must_use]
    pub fn assignment_type(&self, name: &str) -> Option<&AssignmentType> {
        let name = name.trim();
        self.assignment_types
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// Sum of all type weights, in percent
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.assignment_types.iter().map(|t| t.weight).sum()
    }

    /// Add a type
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ValidationError`] if a type of that name
    /// exists or the weights would add up to more than 100 percent.
    pub fn add_assignment_type(
        &mut self,
        assignment_type: AssignmentType,
    ) -> Result<(), DomainError> {
        if self.assignment_type(&assignment_type.name).is_some() {
            return Err(DomainError::ValidationError(format!(
                "course '{}' already has a type named '{}'",
                self.name, assignment_type.name
            )));
        }
        let total = self.total_weight() + assignment_type.weight;
        if total > 100.0 + WEIGHT_TOLERANCE {
            return Err(DomainError::ValidationError(format!(
                "weights of '{}' would add up to {total}%",
                self.name
            )));
        }
        self.assignment_types.push(assignment_type);
        Ok(())
    }
}
