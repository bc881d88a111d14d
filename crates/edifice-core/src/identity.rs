//! # Identity Generator
//!
//! Issues unique ids for elements and relationships out of a single
//! identity space, and absorbs externally-assigned ids during hydration.
//!
//! The generator keeps the highest numeric id it has observed. Generation
//! returns the next unused value as a decimal string; `found` records an
//! id recovered from a persisted workspace, advancing the high-water mark
//! when the id is numeric and larger than the current mark. Non-numeric
//! legacy ids are accepted and do not touch the counter.
//!
//! Not thread-safe, by design: one generator is scoped to one `Model`.

use crate::Id;
use serde::{Deserialize, Serialize};

/// Sequential id generator with a numeric high-water mark.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdGenerator {
    /// Highest numeric id observed so far (generated or found).
    last: u64,
}

impl IdGenerator {
    /// Create a generator with no ids observed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate the next unused id as a decimal string.
    ///
    /// Never collides with a previously generated or found numeric id.
    pub fn generate(&mut self) -> Id {
        self.last = self.last.saturating_add(1);
        Id::new(self.last.to_string())
    }

    /// Record an externally-supplied id as consumed.
    ///
    /// Numeric ids advance the high-water mark if larger than the current
    /// mark; non-numeric legacy ids are accepted without affecting it.
    pub fn found(&mut self, id: &Id) {
        if let Some(n) = id.numeric() {
            if n > self.last {
                self.last = n;
            }
        }
    }

    /// The highest numeric id observed so far.
    #[must_use]
    pub const fn high_water_mark(&self) -> u64 {
        self.last
    }
}

// =============================================================================
// TESTS
// =============================================================================
