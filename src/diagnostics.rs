//! Human-readable progress and warning lines on the diagnostic stream
//!
//! The primary stream carries findings only; everything else a user sees
//! while the check runs goes through here.

use std::fmt;
use std::io::{self, Write};

use crate::models::GroupVersionResource;

/// Verbosity at which `fetching ...` lines are printed
pub const VERBOSITY_FETCHING: u8 = 2;
/// Verbosity at which `got N items` lines are printed
pub const VERBOSITY_COUNTS: u8 = 3;

/// Writer for the diagnostic stream
pub struct Diagnostics<'w> {
    out: &'w mut (dyn Write + Send),
    verbosity: u8,
}

impl<'w> Diagnostics<'w> {
    pub fn new(out: &'w mut (dyn Write + Send), verbosity: u8) -> Self {
        Self { out, verbosity }
    }

    pub fn fetching(&mut self, resource: &GroupVersionResource) -> io::Result<()> {
        tracing::debug!("Fetching {}", resource);
        if self.verbosity >= VERBOSITY_FETCHING {
            writeln!(
                self.out,
                "fetching {}, {}",
                resource.group_version(),
                resource.resource
            )?;
        }
        Ok(())
    }

    pub fn fetched(&mut self, resource: &GroupVersionResource, count: usize) -> io::Result<()> {
        tracing::debug!("Fetched {} from {}", pluralize(count, "item", "items"), resource);
        if self.verbosity >= VERBOSITY_COUNTS {
            writeln!(self.out, "got {}", pluralize(count, "item", "items"))?;
        }
        Ok(())
    }

    pub fn warning(&mut self, message: fmt::Arguments<'_>) -> io::Result<()> {
        tracing::warn!("{}", message);
        writeln!(self.out, "warning: {}", message)
    }

    /// Print a line unconditionally
    pub fn line(&mut self, message: fmt::Arguments<'_>) -> io::Result<()> {
        writeln!(self.out, "{}", message)
    }
}

/// `1 item`, `2 items`, `0 items`
pub fn pluralize(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}
