//! # Model
//!
//! The root owner of the architecture graph: all elements, all
//! relationships, the top-level collections, and the identity generator.
//!
//! All data structures use `BTreeMap` for deterministic ordering.
//!
//! ## Factories
//!
//! Creation follows a lookup-or-create pattern, but the duplicate-name
//! outcome differs by scope:
//! - Top-level factories (person, software system, top-level deployment
//!   node) treat a same-scope name collision as an expected steady-state
//!   condition and return `None`.
//! - Nested factories (container, component, nested deployment node)
//!   treat it as a hard `DuplicateName` error, since callers are expected
//!   to have checked first.
//!
//! ## Concurrency
//!
//! The model has no internal locking and is not safe for concurrent
//! mutation; callers needing concurrency serialize access externally.

use crate::element::{Element, ElementKind};
use crate::identity::IdGenerator;
use crate::primitives::DEFAULT_ENVIRONMENT;
use crate::relationship::Relationship;
use crate::{Id, InteractionStyle, ModelError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// MODEL
// =============================================================================

/// The in-memory architecture model graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Model {
    /// Global id index over every element, at all nesting levels.
    pub(crate) elements: BTreeMap<Id, Element>,
    /// Global id index over every relationship.
    pub(crate) relationships: BTreeMap<Id, Relationship>,
    /// Top-level people, in insertion order.
    pub(crate) people: Vec<Id>,
    /// Top-level software systems, in insertion order.
    pub(crate) software_systems: Vec<Id>,
    /// Top-level deployment nodes across all environments, in insertion
    /// order.
    pub(crate) deployment_nodes: Vec<Id>,
    /// Optional enterprise name carried in the persisted form.
    pub enterprise: Option<String>,
    /// The identity generator scoped to this model.
    pub(crate) ids: IdGenerator,
}

impl Model {
    /// Create a new empty model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // LOOKUPS
    // =========================================================================

    /// Get an element by id.
    #[must_use]
    pub fn element(&self, id: &Id) -> Option<&Element> {
        self.elements.get(id)
    }

    /// Get a relationship by id.
    #[must_use]
    pub fn relationship(&self, id: &Id) -> Option<&Relationship> {
        self.relationships.get(id)
    }

    /// Iterate over all elements in id order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }

    /// Iterate over all relationships in id order.
    pub fn relationships(&self) -> impl Iterator<Item = &Relationship> {
        self.relationships.values()
    }

    /// Number of elements at all nesting levels.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Number of relationships.
    #[must_use]
    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    /// Top-level people, in insertion order.
    pub fn people(&self) -> impl Iterator<Item = &Element> {
        self.people.iter().filter_map(|id| self.elements.get(id))
    }

    /// Top-level software systems, in insertion order.
    pub fn software_systems(&self) -> impl Iterator<Item = &Element> {
        self.software_systems
            .iter()
            .filter_map(|id| self.elements.get(id))
    }

    /// Top-level deployment nodes, in insertion order.
    pub fn deployment_nodes(&self) -> impl Iterator<Item = &Element> {
        self.deployment_nodes
            .iter()
            .filter_map(|id| self.elements.get(id))
    }

    /// Find a person by name.
    #[must_use]
    pub fn person_with_name(&self, name: &str) -> Option<&Element> {
        self.people().find(|e| e.name == name)
    }

    /// Find a software system by name.
    #[must_use]
    pub fn software_system_with_name(&self, name: &str) -> Option<&Element> {
        self.software_systems().find(|e| e.name == name)
    }

    /// Find a direct child of `parent` by name.
    #[must_use]
    pub fn child_with_name(&self, parent: &Id, name: &str) -> Option<&Element> {
        self.elements.get(parent).and_then(|p| {
            p.children
                .iter()
                .filter_map(|id| self.elements.get(id))
                .find(|c| c.name == name)
        })
    }

    /// The chain of ancestors of an element, nearest first.
    #[must_use]
    pub fn ancestors(&self, id: &Id) -> Vec<Id> {
        let mut chain = Vec::new();
        let mut current = self.elements.get(id).and_then(|e| e.parent.clone());
        while let Some(parent) = current {
            current = self.elements.get(&parent).and_then(|e| e.parent.clone());
            chain.push(parent);
        }
        chain
    }

    /// Iterate over the outgoing relationships of an element, in
    /// insertion order.
    pub fn outgoing(&self, source: &Id) -> impl Iterator<Item = &Relationship> + '_ {
        self.elements.get(source).into_iter().flat_map(move |e| {
            e.relationships
                .iter()
                .filter_map(move |rid| self.relationships.get(rid))
        })
    }

    /// Whether `source` has a direct outgoing relationship to
    /// `destination`, regardless of description.
    #[must_use]
    pub fn has_relationship_between(&self, source: &Id, destination: &Id) -> bool {
        self.outgoing(source).any(|r| r.destination == *destination)
    }

    pub(crate) fn expect_element(&self, id: &Id) -> Result<&Element, ModelError> {
        self.elements
            .get(id)
            .ok_or_else(|| ModelError::UnresolvedReference(id.clone()))
    }

    // =========================================================================
    // TOP-LEVEL FACTORIES (soft duplicate-name outcome)
    // =========================================================================

    /// Add a person, unless one with the same name already exists.
    ///
    /// Returns `None` on a name collision; the existing person is left
    /// unchanged and no element is produced.
    pub fn add_person(&mut self, name: &str, description: &str) -> Option<Id> {
        if self.person_with_name(name).is_some() {
            return None;
        }
        let id = self.ids.generate();
        let element = Element::new(id.clone(), name, description, ElementKind::Person, None);
        self.people.push(id.clone());
        self.elements.insert(id.clone(), element);
        Some(id)
    }

    /// Add a software system, unless one with the same name already
    /// exists. Returns `None` on a name collision.
    pub fn add_software_system(&mut self, name: &str, description: &str) -> Option<Id> {
        if self.software_system_with_name(name).is_some() {
            return None;
        }
        let id = self.ids.generate();
        let element = Element::new(
            id.clone(),
            name,
            description,
            ElementKind::SoftwareSystem,
            None,
        );
        self.software_systems.push(id.clone());
        self.elements.insert(id.clone(), element);
        Some(id)
    }

    /// Add a top-level deployment node in the given environment, unless
    /// one with the same name already exists in that environment.
    ///
    /// An empty environment selects the default environment. Returns
    /// `None` on a name collision within the environment.
    pub fn add_deployment_node(
        &mut self,
        environment: &str,
        name: &str,
        description: &str,
        technology: &str,
    ) -> Option<Id> {
        let environment = if environment.is_empty() {
            DEFAULT_ENVIRONMENT
        } else {
            environment
        };
        let collision = self
            .deployment_nodes()
            .any(|e| e.name == name && e.environment() == Some(environment));
        if collision {
            return None;
        }
        let id = self.ids.generate();
        let element = Element::new(
            id.clone(),
            name,
            description,
            ElementKind::DeploymentNode {
                technology: technology.to_string(),
                environment: environment.to_string(),
            },
            None,
        );
        self.deployment_nodes.push(id.clone());
        self.elements.insert(id.clone(), element);
        Some(id)
    }

    // =========================================================================
    // NESTED FACTORIES (hard duplicate-name outcome)
    // =========================================================================

    /// Add a container to a software system.
    ///
    /// Fails with `DuplicateName` if the system already owns a container
    /// with this name.
    pub fn add_container(
        &mut self,
        system: &Id,
        name: &str,
        description: &str,
        technology: &str,
    ) -> Result<Id, ModelError> {
        let parent = self.expect_element(system)?;
        if !matches!(parent.kind, ElementKind::SoftwareSystem) {
            return Err(ModelError::KindMismatch {
                id: system.clone(),
                expected: "software system",
            });
        }
        let kind = ElementKind::Container {
            technology: technology.to_string(),
        };
        if self.child_with_name(system, name).is_some() {
            return Err(ModelError::DuplicateName {
                kind: kind.name(),
                name: name.to_string(),
            });
        }
        let id = self.ids.generate();
        let element = Element::new(id.clone(), name, description, kind, Some(system.clone()));
        self.attach_child(system, element);
        Ok(id)
    }

    /// Add a component to a container.
    ///
    /// Fails with `DuplicateName` if the container already owns a
    /// component with this name.
    pub fn add_component(
        &mut self,
        container: &Id,
        name: &str,
        description: &str,
        technology: &str,
    ) -> Result<Id, ModelError> {
        self.add_component_full(container, name, "", description, technology, "")
    }

    /// Add a component with the full attribute set carried across the
    /// discovery boundary (backing type and source path).
    pub(crate) fn add_component_full(
        &mut self,
        container: &Id,
        name: &str,
        component_type: &str,
        description: &str,
        technology: &str,
        source_path: &str,
    ) -> Result<Id, ModelError> {
        let parent = self.expect_element(container)?;
        if !matches!(parent.kind, ElementKind::Container { .. }) {
            return Err(ModelError::KindMismatch {
                id: container.clone(),
                expected: "container",
            });
        }
        let kind = ElementKind::Component {
            technology: technology.to_string(),
            component_type: component_type.to_string(),
            source_path: source_path.to_string(),
        };
        if self.child_with_name(container, name).is_some() {
            return Err(ModelError::DuplicateName {
                kind: kind.name(),
                name: name.to_string(),
            });
        }
        let id = self.ids.generate();
        let element = Element::new(id.clone(), name, description, kind, Some(container.clone()));
        self.attach_child(container, element);
        Ok(id)
    }

    /// Add a deployment node nested under a parent node. The child
    /// inherits the parent's environment.
    ///
    /// Fails with `DuplicateName` if the parent already owns a node with
    /// this name.
    pub fn add_child_deployment_node(
        &mut self,
        parent: &Id,
        name: &str,
        description: &str,
        technology: &str,
    ) -> Result<Id, ModelError> {
        let environment = match &self.expect_element(parent)?.kind {
            ElementKind::DeploymentNode { environment, .. } => environment.clone(),
            _ => {
                return Err(ModelError::KindMismatch {
                    id: parent.clone(),
                    expected: "deployment node",
                });
            }
        };
        let kind = ElementKind::DeploymentNode {
            technology: technology.to_string(),
            environment,
        };
        if self.child_with_name(parent, name).is_some() {
            return Err(ModelError::DuplicateName {
                kind: kind.name(),
                name: name.to_string(),
            });
        }
        let id = self.ids.generate();
        let element = Element::new(id.clone(), name, description, kind, Some(parent.clone()));
        self.attach_child(parent, element);
        Ok(id)
    }

    /// Attach a freshly created element under its (already validated)
    /// parent and register it in the global index.
    pub(crate) fn attach_child(&mut self, parent: &Id, element: Element) {
        if let Some(p) = self.elements.get_mut(parent) {
            p.children.push(element.id.clone());
        }
        self.elements.insert(element.id.clone(), element);
    }

    // =========================================================================
    // RELATIONSHIP STORE
    // =========================================================================

    /// Add a relationship between two registered elements.
    ///
    /// Fails with `MissingDestination` if the destination is not
    /// registered. Returns `Ok(None)` without creating anything if the
    /// source already has an outgoing edge with identical (destination,
    /// description).
    pub fn add_relationship(
        &mut self,
        source: &Id,
        destination: &Id,
        description: &str,
        technology: &str,
        interaction_style: InteractionStyle,
    ) -> Result<Option<Id>, ModelError> {
        self.add_relationship_full(
            source,
            destination,
            description,
            technology,
            interaction_style,
            Vec::new(),
            None,
        )
    }

    /// Relationship insertion with the full field set; used by the
    /// instance replicator to carry tags and the linked-relationship id.
    pub(crate) fn add_relationship_full(
        &mut self,
        source: &Id,
        destination: &Id,
        description: &str,
        technology: &str,
        interaction_style: InteractionStyle,
        tags: Vec<String>,
        linked_relationship_id: Option<Id>,
    ) -> Result<Option<Id>, ModelError> {
        if !self.elements.contains_key(source) {
            return Err(ModelError::UnresolvedReference(source.clone()));
        }
        if !self.elements.contains_key(destination) {
            return Err(ModelError::MissingDestination(destination.clone()));
        }
        let duplicate = self
            .outgoing(source)
            .any(|r| r.destination == *destination && r.description == description);
        if duplicate {
            return Ok(None);
        }
        let id = self.ids.generate();
        let relationship = Relationship {
            id: id.clone(),
            source: source.clone(),
            destination: destination.clone(),
            description: description.to_string(),
            technology: technology.to_string(),
            interaction_style,
            tags,
            linked_relationship_id,
        };
        if let Some(e) = self.elements.get_mut(source) {
            e.relationships.push(id.clone());
        }
        self.relationships.insert(id.clone(), relationship);
        Ok(Some(id))
    }

    /// Change a relationship's description and technology in place.
    ///
    /// Fails with `RelationshipConflict` if another outgoing edge of the
    /// same source already carries (destination, new description); the
    /// original relationship is left unmodified. Identity and endpoints
    /// never change.
    pub fn modify_relationship(
        &mut self,
        id: &Id,
        description: &str,
        technology: &str,
    ) -> Result<(), ModelError> {
        let (source, destination) = match self.relationships.get(id) {
            Some(r) => (r.source.clone(), r.destination.clone()),
            None => return Err(ModelError::UnresolvedReference(id.clone())),
        };
        let conflict = self
            .outgoing(&source)
            .any(|r| r.id != *id && r.destination == destination && r.description == description);
        if conflict {
            return Err(ModelError::RelationshipConflict {
                source,
                description: description.to_string(),
            });
        }
        if let Some(r) = self.relationships.get_mut(id) {
            r.description = description.to_string();
            r.technology = technology.to_string();
        }
        Ok(())
    }

    // =========================================================================
    // STATISTICS
    // =========================================================================

    /// Summary counts over the whole graph.
    #[must_use]
    pub fn stats(&self) -> ModelStats {
        let mut stats = ModelStats {
            relationships: self.relationships.len(),
            ..ModelStats::default()
        };
        for element in self.elements.values() {
            match element.kind {
                ElementKind::Person => stats.people += 1,
                ElementKind::SoftwareSystem => stats.software_systems += 1,
                ElementKind::Container { .. } => stats.containers += 1,
                ElementKind::Component { .. } => stats.components += 1,
                ElementKind::DeploymentNode { .. } => stats.deployment_nodes += 1,
                ElementKind::ContainerInstance { .. } => stats.container_instances += 1,
            }
        }
        stats
    }
}

/// Model statistics for the status command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelStats {
    pub people: usize,
    pub software_systems: usize,
    pub containers: usize,
    pub components: usize,
    pub deployment_nodes: usize,
    pub container_instances: usize,
    pub relationships: usize,
}

// =============================================================================
// TESTS
// =============================================================================
