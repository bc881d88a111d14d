//! # Elements
//!
//! Typed nodes of the architecture graph: people, software systems,
//! containers, components, deployment nodes, and container instances.
//!
//! Ownership is strictly tree-shaped: a parent owns its children through
//! the `children` id list, while `parent` is a weak back-reference used
//! only for upward traversal (scoping and derivation). Outgoing
//! relationships are owned by their source element as an id list in
//! insertion order; the `Model` holds the actual `Relationship` records.

use crate::Id;
use serde::{Deserialize, Serialize};

// =============================================================================
// ELEMENT KIND
// =============================================================================

/// The variant of an element, with the variant-specific data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementKind {
    /// A person who uses the software systems.
    Person,
    /// A top-level software system.
    SoftwareSystem,
    /// A deployable unit inside a software system.
    Container {
        /// Implementation technology ("Spring Boot", "PostgreSQL", ...).
        technology: String,
    },
    /// A code-level building block inside a container.
    Component {
        /// Implementation technology.
        technology: String,
        /// Fully-qualified type backing the component, when discovered
        /// from source. Empty for hand-modelled components.
        component_type: String,
        /// Source location the component was discovered at, if any.
        source_path: String,
    },
    /// Physical or virtual infrastructure within a deployment environment.
    DeploymentNode {
        /// Infrastructure technology ("Docker", "AWS EC2", ...).
        technology: String,
        /// The deployment environment this node belongs to.
        environment: String,
    },
    /// An instance of a container running on a deployment node.
    ContainerInstance {
        /// The container this instance runs; non-owning reference.
        container: Id,
        /// The deployment environment, inherited from the owning node.
        environment: String,
        /// 1-based instance number, assigned at creation and never
        /// renumbered.
        instance_number: u64,
    },
}

impl ElementKind {
    /// Human-readable kind name, used in duplicate-name errors.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::SoftwareSystem => "software system",
            Self::Container { .. } => "container",
            Self::Component { .. } => "component",
            Self::DeploymentNode { .. } => "deployment node",
            Self::ContainerInstance { .. } => "container instance",
        }
    }
}

// =============================================================================
// ELEMENT
// =============================================================================

/// A node in the architecture graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    /// Unique id, drawn from the model-wide identity space.
    pub id: Id,
    /// Name; uniqueness is scope-local (see the model factories).
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Variant and variant-specific data.
    pub kind: ElementKind,
    /// Weak back-reference to the owning element; `None` for roots.
    pub parent: Option<Id>,
    /// Owned children, in insertion order.
    pub children: Vec<Id>,
    /// Outgoing relationships, in insertion order.
    pub relationships: Vec<Id>,
}

impl Element {
    /// Create a new element with no children and no relationships.
    #[must_use]
    pub fn new(
        id: Id,
        name: impl Into<String>,
        description: impl Into<String>,
        kind: ElementKind,
        parent: Option<Id>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            kind,
            parent,
            children: Vec::new(),
            relationships: Vec::new(),
        }
    }

    /// Implementation technology, for the technical variants.
    #[must_use]
    pub fn technology(&self) -> Option<&str> {
        match &self.kind {
            ElementKind::Container { technology }
            | ElementKind::Component { technology, .. }
            | ElementKind::DeploymentNode { technology, .. } => Some(technology),
            _ => None,
        }
    }

    /// Deployment environment, for the deployment variants.
    #[must_use]
    pub fn environment(&self) -> Option<&str> {
        match &self.kind {
            ElementKind::DeploymentNode { environment, .. }
            | ElementKind::ContainerInstance { environment, .. } => Some(environment),
            _ => None,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
