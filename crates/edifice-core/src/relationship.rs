//! # Relationships
//!
//! Directed, described edges between two elements. Endpoints are held as
//! ids resolved through the owning `Model`; their lifetime is bound to
//! the model, not to the relationship.

use crate::{Id, InteractionStyle};
use serde::{Deserialize, Serialize};

/// A directed edge between two elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    /// Unique id, drawn from the model-wide identity space.
    pub id: Id,
    /// Source element; the source owns this edge in its outgoing list.
    pub source: Id,
    /// Destination element.
    pub destination: Id,
    /// What the relationship means ("uses", "reads from", ...).
    /// Part of the (source, destination, description) uniqueness key.
    pub description: String,
    /// Technology carrying the interaction ("HTTP", "gRPC", ...).
    pub technology: String,
    /// Synchronous or asynchronous interaction.
    pub interaction_style: InteractionStyle,
    /// Free-form tags. Mirrored instance-level edges carry none.
    pub tags: Vec<String>,
    /// For mirrored or derived edges, the id of the origin edge this one
    /// was replicated from.
    pub linked_relationship_id: Option<Id>,
}

