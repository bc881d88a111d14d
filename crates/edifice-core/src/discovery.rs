//! # Component Discovery Boundary
//!
//! The seam between the model graph and external component-scanning
//! collaborators. Scanners populate a container's components in two
//! steps: first every strategy identifies components, then every
//! strategy wires up dependencies. The split matters because a
//! dependency found by one strategy may target a component found by
//! another; running the steps interleaved would miss it.
//!
//! The scanning strategies themselves live outside this crate; the
//! `ComponentDiscovery` trait is the extension point.

use crate::element::ElementKind;
use crate::{Id, Model, ModelError};

impl Model {
    /// Return the existing component with this name under the container,
    /// or create one with the given attributes.
    ///
    /// This is the narrow contract discovery strategies work against: a
    /// component reported by several strategies resolves to one element,
    /// with the first reporter's attributes winning.
    pub fn get_or_create_component(
        &mut self,
        container: &Id,
        name: &str,
        component_type: &str,
        description: &str,
        technology: &str,
        source_path: &str,
    ) -> Result<Id, ModelError> {
        if let Some(existing) = self.child_with_name(container, name) {
            if !matches!(existing.kind, ElementKind::Component { .. }) {
                return Err(ModelError::KindMismatch {
                    id: existing.id.clone(),
                    expected: "component",
                });
            }
            return Ok(existing.id.clone());
        }
        self.add_component_full(
            container,
            name,
            component_type,
            description,
            technology,
            source_path,
        )
    }
}

/// A component-scanning strategy.
///
/// `discover_components` registers components on the container (through
/// [`Model::get_or_create_component`]); `discover_dependencies` adds
/// relationships between components that exist by then, including ones
/// other strategies registered.
pub trait ComponentDiscovery {
    /// Identify components and register them on the container.
    fn discover_components(&mut self, model: &mut Model, container: &Id)
    -> Result<(), ModelError>;

    /// Wire dependencies between already-registered components.
    fn discover_dependencies(
        &mut self,
        model: &mut Model,
        container: &Id,
    ) -> Result<(), ModelError>;
}

/// Runs a list of discovery strategies against one container, enforcing
/// the two-phase ordering across the whole list.
pub struct ComponentFinder {
    container: Id,
    strategies: Vec<Box<dyn ComponentDiscovery>>,
}

impl ComponentFinder {
    /// Create a finder for a container.
    #[must_use]
    pub fn new(container: Id) -> Self {
        Self {
            container,
            strategies: Vec::new(),
        }
    }

    /// Add a strategy. Strategies run in insertion order within each
    /// phase.
    #[must_use]
    pub fn with_strategy(mut self, strategy: Box<dyn ComponentDiscovery>) -> Self {
        self.strategies.push(strategy);
        self
    }

    /// Run every strategy's component step, then every strategy's
    /// dependency step.
    pub fn run(&mut self, model: &mut Model) -> Result<(), ModelError> {
        for strategy in &mut self.strategies {
            strategy.discover_components(model, &self.container)?;
        }
        for strategy in &mut self.strategies {
            strategy.discover_dependencies(model, &self.container)?;
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
