//! # Core Type Definitions
//!
//! Identifiers, interaction styles, and the error taxonomy shared by the
//! whole model graph engine.
//!
//! ## Determinism Guarantees
//!
//! All types in this module:
//! - Implement `Ord` for deterministic ordering in `BTreeMap`/`BTreeSet`
//! - Carry no interior mutability and no floating-point data

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Unique identifier shared by elements and relationships.
///
/// Elements and relationships draw from a single identity space: an `Id`
/// assigned to an element is never reused for a relationship and vice versa.
/// Freshly minted ids are decimal strings; ids recovered from a persisted
/// workspace may be arbitrary legacy strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(pub String);

impl Id {
    /// Create an id from a string.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value of the id, if it is a decimal string.
    ///
    /// Legacy ids from older persisted workspaces may be non-numeric;
    /// those return `None` and never influence the identity generator.
    #[must_use]
    pub fn numeric(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Required by the `thiserror` derive on `ModelError`: the derive treats the
// `RelationshipConflict::source` field as an error source, which must
// implement `std::error::Error`.
impl std::error::Error for Id {}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// =============================================================================
// INTERACTION STYLE
// =============================================================================

/// How two elements interact over a relationship.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum InteractionStyle {
    /// Blocking request/response interaction (the default).
    #[default]
    Synchronous,
    /// Fire-and-forget or message-based interaction.
    Asynchronous,
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors produced by the model graph engine.
///
/// Structural violations are hard errors and abort the operation. Expected
/// steady-state conditions (a top-level name collision, a duplicate
/// relationship, idempotent re-derivation) are NOT errors; they are reported
/// as ordinary "nothing changed" results (`None` / empty collections).
#[derive(Debug, Error)]
pub enum ModelError {
    /// A nested-scope creation collided with an existing sibling name.
    /// Callers of nested factories are expected to have checked first.
    #[error("a {kind} named {name:?} already exists in this scope")]
    DuplicateName {
        /// Human-readable element kind ("container", "component", ...).
        kind: &'static str,
        /// The colliding name.
        name: String,
    },

    /// Relationship creation was given a destination that is not
    /// registered in the model. Nothing is created.
    #[error("relationship destination not found: {0}")]
    MissingDestination(Id),

    /// Modifying a relationship would collide with another outgoing edge
    /// of the same source. The original relationship is left untouched.
    #[error("source {source} already has a relationship described {description:?} to that destination")]
    RelationshipConflict {
        /// The source element of the relationship being modified.
        source: Id,
        /// The description that would collide.
        description: String,
    },

    /// Hydration met an id with no matching registered element.
    /// Partial graphs are not valid; hydration aborts.
    #[error("unresolved reference: {0}")]
    UnresolvedReference(Id),

    /// An operation was handed an element of the wrong variant.
    #[error("element {id} is not a {expected}")]
    KindMismatch {
        /// The offending element id.
        id: Id,
        /// The variant the operation required.
        expected: &'static str,
    },

    /// A serialization error occurred.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A deserialization error occurred.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// An I/O error occurred (storage layer or app file handling).
    #[error("I/O error: {0}")]
    Io(String),
}

// =============================================================================
// TESTS
// =============================================================================
