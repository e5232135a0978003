//! Run totals and the closing summary line

use std::fmt;

use crate::diagnostics::pluralize;
use crate::models::Level;

/// Error and warning counts for a run
///
/// Warnings include discovery and list failures, not only warning findings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub errors: usize,
    pub warnings: usize,
}

impl Tally {
    #[must_use]
    pub fn record(self, level: Level) -> Self {
        match level {
            Level::Error => Self {
                errors: self.errors + 1,
                ..self
            },
            Level::Warning => Self {
                warnings: self.warnings + 1,
                ..self
            },
        }
    }

    #[must_use]
    pub fn with_warnings(self, count: usize) -> Self {
        Self {
            warnings: self.warnings + count,
            ..self
        }
    }

    pub fn is_clean(&self) -> bool {
        self.errors == 0 && self.warnings == 0
    }
}

impl FromIterator<Level> for Tally {
    fn from_iter<I: IntoIterator<Item = Level>>(iter: I) -> Self {
        iter.into_iter().fold(Self::default(), Self::record)
    }
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_clean() {
            return f.write_str("No invalid ownerReferences found");
        }
        write!(
            f,
            "{}, {}",
            pluralize(self.errors, "error", "errors"),
            pluralize(self.warnings, "warning", "warnings")
        )
    }
}
