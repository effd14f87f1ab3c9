//! Recurrence series identifier

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier shared by every instance of one recurrence series
///
/// Legacy backups used `-1` for "not recurring"; that state is modelled as
/// `Option<SeriesId>::None` and never as a sentinel value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeriesId(u64);

impl SeriesId {
    /// Wrap a raw series number
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Raw series number
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Interpret a legacy signed id, where any negative value means "not recurring"
    #[must_use]
    pub fn from_legacy(raw: i64) -> Option<Self> {
        u64::try_from(raw).ok().map(Self)
    }
}

impl fmt::Display for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

impl From<u64> for SeriesId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}
