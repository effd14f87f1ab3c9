//! Term entity - a school term that courses belong to

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{errors::DomainError, value_objects::TermId};

/// A named span of the school year, such as "Fall 2024"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub id: TermId,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Term {
    /// Create a term spanning `[start_date, end_date]`
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ValidationError`] if the name is blank or the
    /// term ends before it starts.
    pub fn new(
        name: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Self, DomainError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::ValidationError(
                "term name is empty".to_string(),
            ));
        }
        if end_date < start_date {
            return Err(DomainError::ValidationError(format!(
                "term '{name}' ends on {end_date}, before it starts on {start_date}"
            )));
        }
        Ok(Self {
            id: TermId::new(),
            name,
            start_date,
            end_date,
        })
    }

    /// Check whether `date` falls within the term
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        (self.start_date..=self.end_date).contains(&date)
    }
}
