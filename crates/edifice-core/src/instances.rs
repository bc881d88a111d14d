//! # Instance Replicator
//!
//! Creates container instances on deployment nodes and mirrors the
//! container-level dependency graph at the instance level.
//!
//! When a container is instantiated onto a node in environment `E`, every
//! container-to-container edge between it and the containers behind the
//! instances already present in `E` is replicated as an
//! instance-to-instance edge, in both directions. Mirrored edges carry
//! the origin edge's description, technology, and interaction style,
//! have their tags cleared, and record the origin edge's id as
//! `linked_relationship_id`. Instances in other environments are never
//! linked.

use crate::element::{Element, ElementKind};
use crate::{Id, InteractionStyle, Model, ModelError};

impl Model {
    /// Instantiate a container onto a deployment node.
    ///
    /// The instance number is the count of existing instances of the same
    /// container anywhere in the model, plus one; it is assigned at
    /// creation and never renumbered.
    pub fn add_container_instance(
        &mut self,
        node: &Id,
        container: &Id,
    ) -> Result<Id, ModelError> {
        let environment = match &self.expect_element(node)?.kind {
            ElementKind::DeploymentNode { environment, .. } => environment.clone(),
            _ => {
                return Err(ModelError::KindMismatch {
                    id: node.clone(),
                    expected: "deployment node",
                });
            }
        };
        let container_name = {
            let c = self.expect_element(container)?;
            if !matches!(c.kind, ElementKind::Container { .. }) {
                return Err(ModelError::KindMismatch {
                    id: container.clone(),
                    expected: "container",
                });
            }
            c.name.clone()
        };

        let instance_number = self.instance_count(container) as u64 + 1;
        let id = self.ids.generate();
        let element = Element::new(
            id.clone(),
            container_name,
            "",
            ElementKind::ContainerInstance {
                container: container.clone(),
                environment: environment.clone(),
                instance_number,
            },
            Some(node.clone()),
        );
        self.attach_child(node, element);

        self.replicate_container_relationships(&id, container, &environment)?;
        Ok(id)
    }

    /// Count of existing instances of a container across the whole model.
    #[must_use]
    pub fn instance_count(&self, container: &Id) -> usize {
        self.elements
            .values()
            .filter(|e| {
                matches!(&e.kind, ElementKind::ContainerInstance { container: c, .. } if c == container)
            })
            .count()
    }

    /// Mirror container-level edges between the new instance and every
    /// other instance already present in the same environment.
    fn replicate_container_relationships(
        &mut self,
        instance: &Id,
        container: &Id,
        environment: &str,
    ) -> Result<(), ModelError> {
        // Snapshot peers first; replication mutates the relationship store.
        let peers: Vec<(Id, Id)> = self
            .elements
            .values()
            .filter_map(|e| match &e.kind {
                ElementKind::ContainerInstance {
                    container: peer_container,
                    environment: peer_env,
                    ..
                } if e.id != *instance && peer_env == environment => {
                    Some((e.id.clone(), peer_container.clone()))
                }
                _ => None,
            })
            .collect();

        for (peer_instance, peer_container) in peers {
            let forward: Vec<(Id, String, String, InteractionStyle)> = self
                .outgoing(container)
                .filter(|r| r.destination == peer_container)
                .map(|r| {
                    (
                        r.id.clone(),
                        r.description.clone(),
                        r.technology.clone(),
                        r.interaction_style,
                    )
                })
                .collect();
            for (origin, description, technology, style) in forward {
                self.add_relationship_full(
                    instance,
                    &peer_instance,
                    &description,
                    &technology,
                    style,
                    Vec::new(),
                    Some(origin),
                )?;
            }

            let backward: Vec<(Id, String, String, InteractionStyle)> = self
                .outgoing(&peer_container)
                .filter(|r| r.destination == *container)
                .map(|r| {
                    (
                        r.id.clone(),
                        r.description.clone(),
                        r.technology.clone(),
                        r.interaction_style,
                    )
                })
                .collect();
            for (origin, description, technology, style) in backward {
                self.add_relationship_full(
                    &peer_instance,
                    instance,
                    &description,
                    &technology,
                    style,
                    Vec::new(),
                    Some(origin),
                )?;
            }
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
