//! Assignment priority value object

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Assignment priority on a 1 (lowest) to 5 (highest) scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Priority(u8);

impl Priority {
    /// Lowest priority level
    pub const MIN: u8 = 1;
    /// Highest priority level
    pub const MAX: u8 = 5;

    /// Create a priority, validating the range
    ///
    /// # Errors
    ///
    /// Returns an error if `level` is outside `1..=5`.
    pub fn new(level: u8) -> Result<Self, DomainError> {
        if (Self::MIN..=Self::MAX).contains(&level) {
            Ok(Self(level))
        } else {
            Err(DomainError::ValidationError(format!(
                "priority must be between {} and {}, got {level}",
                Self::MIN,
                Self::MAX
            )))
        }
    }

    /// Numeric level
    #[must_use]
    pub const fn level(self) -> u8 {
        self.0
    }

    /// Get a human-readable label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self.0 {
            1 => "Lowest",
            2 => "Low",
            3 => "Normal",
            4 => "High",
            _ => "Highest",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self(3)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl TryFrom<u8> for Priority {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> Self {
        priority.0
    }
}
