//! # Hydrator
//!
//! Rebuilds a live model from the flattened persisted form, and produces
//! the persisted form from a live model.
//!
//! Hydration takes two passes because persisted relationships reference
//! elements by id rather than embedding them, and resolution needs every
//! element already indexed globally:
//! - **Pass 1 (elements)** registers every person, software system (with
//!   its containers and their components) and the deployment-node forest
//!   (with container instances), restoring parent links and feeding each
//!   id to the identity generator.
//! - **Pass 2 (relationships)** resolves each persisted edge's stored
//!   source/destination ids against the global index and registers it.
//!
//! Pass 1 runs to completion across the entire graph before any pass 2
//! lookup; otherwise forward references between sibling subtrees would
//! fail to resolve. Any unresolved id aborts hydration - partial graphs
//! are not valid.

use crate::element::{Element, ElementKind};
use crate::formats::workspace::{
    PersistedComponent, PersistedContainer, PersistedContainerInstance, PersistedDeploymentNode,
    PersistedPerson, PersistedRelationship, PersistedSoftwareSystem, PersistedWorkspace,
};
use crate::relationship::Relationship;
use crate::{Id, Model, ModelError};

impl Model {
    // =========================================================================
    // HYDRATION
    // =========================================================================

    /// Reconstruct a live model from a persisted workspace document.
    pub fn hydrate(doc: &PersistedWorkspace) -> Result<Self, ModelError> {
        let mut model = Self::new();
        model.enterprise = doc.enterprise.clone();

        // Pass 1: elements.
        for p in &doc.people {
            model.register_hydrated(Element::new(
                p.id.clone(),
                &p.name,
                &p.description,
                ElementKind::Person,
                None,
            ));
            model.people.push(p.id.clone());
        }
        for s in &doc.software_systems {
            model.register_hydrated(Element::new(
                s.id.clone(),
                &s.name,
                &s.description,
                ElementKind::SoftwareSystem,
                None,
            ));
            model.software_systems.push(s.id.clone());
            for c in &s.containers {
                model.register_hydrated(Element::new(
                    c.id.clone(),
                    &c.name,
                    &c.description,
                    ElementKind::Container {
                        technology: c.technology.clone(),
                    },
                    Some(s.id.clone()),
                ));
                for comp in &c.components {
                    model.register_hydrated(Element::new(
                        comp.id.clone(),
                        &comp.name,
                        &comp.description,
                        ElementKind::Component {
                            technology: comp.technology.clone(),
                            component_type: comp.component_type.clone(),
                            source_path: comp.source_path.clone(),
                        },
                        Some(c.id.clone()),
                    ));
                }
            }
        }
        for n in &doc.deployment_nodes {
            model.hydrate_deployment_node(n, None)?;
            model.deployment_nodes.push(n.id.clone());
        }

        // Pass 2: relationships, only after every element is registered.
        for r in doc.relationships() {
            model.register_hydrated_relationship(r)?;
        }

        Ok(model)
    }

    /// Register a hydrated element: absorb its id, reattach it under its
    /// parent, and index it globally.
    fn register_hydrated(&mut self, element: Element) {
        self.ids.found(&element.id);
        if let Some(parent) = &element.parent {
            if let Some(p) = self.elements.get_mut(parent) {
                p.children.push(element.id.clone());
            }
        }
        self.elements.insert(element.id.clone(), element);
    }

    /// Recursively hydrate a deployment node, its children, and its
    /// container instances.
    fn hydrate_deployment_node(
        &mut self,
        node: &PersistedDeploymentNode,
        parent: Option<&Id>,
    ) -> Result<(), ModelError> {
        self.register_hydrated(Element::new(
            node.id.clone(),
            &node.name,
            &node.description,
            ElementKind::DeploymentNode {
                technology: node.technology.clone(),
                environment: node.environment.clone(),
            },
            parent.cloned(),
        ));
        for child in &node.children {
            self.hydrate_deployment_node(child, Some(&node.id))?;
        }
        for instance in &node.container_instances {
            // The referenced container must already be registered; the
            // software-system walk precedes the deployment forest.
            let container_name = match self.elements.get(&instance.container_id) {
                Some(c) if matches!(c.kind, ElementKind::Container { .. }) => c.name.clone(),
                _ => {
                    return Err(ModelError::UnresolvedReference(
                        instance.container_id.clone(),
                    ));
                }
            };
            self.register_hydrated(Element::new(
                instance.id.clone(),
                container_name,
                "",
                ElementKind::ContainerInstance {
                    container: instance.container_id.clone(),
                    environment: instance.environment.clone(),
                    instance_number: instance.instance_number,
                },
                Some(node.id.clone()),
            ));
        }
        Ok(())
    }

    /// Resolve and register a hydrated relationship.
    fn register_hydrated_relationship(
        &mut self,
        r: &PersistedRelationship,
    ) -> Result<(), ModelError> {
        if !self.elements.contains_key(&r.source_id) {
            return Err(ModelError::UnresolvedReference(r.source_id.clone()));
        }
        if !self.elements.contains_key(&r.destination_id) {
            return Err(ModelError::UnresolvedReference(r.destination_id.clone()));
        }
        self.ids.found(&r.id);
        if let Some(e) = self.elements.get_mut(&r.source_id) {
            e.relationships.push(r.id.clone());
        }
        self.relationships.insert(
            r.id.clone(),
            Relationship {
                id: r.id.clone(),
                source: r.source_id.clone(),
                destination: r.destination_id.clone(),
                description: r.description.clone(),
                technology: r.technology.clone(),
                interaction_style: r.interaction_style,
                tags: r.tags.clone(),
                linked_relationship_id: r.linked_relationship_id.clone(),
            },
        );
        Ok(())
    }

    // =========================================================================
    // SERIALIZATION (the inverse)
    // =========================================================================

    /// Flatten the model into its persisted form.
    #[must_use]
    pub fn to_persisted(&self) -> PersistedWorkspace {
        PersistedWorkspace {
            enterprise: self.enterprise.clone(),
            people: self
                .people()
                .map(|e| PersistedPerson {
                    id: e.id.clone(),
                    name: e.name.clone(),
                    description: e.description.clone(),
                    relationships: self.persisted_outgoing(&e.id),
                })
                .collect(),
            software_systems: self
                .software_systems()
                .map(|e| self.persist_software_system(e))
                .collect(),
            deployment_nodes: self
                .deployment_nodes()
                .map(|e| self.persist_deployment_node(e))
                .collect(),
        }
    }

    fn persist_software_system(&self, system: &Element) -> PersistedSoftwareSystem {
        PersistedSoftwareSystem {
            id: system.id.clone(),
            name: system.name.clone(),
            description: system.description.clone(),
            relationships: self.persisted_outgoing(&system.id),
            containers: system
                .children
                .iter()
                .filter_map(|id| self.elements.get(id))
                .filter_map(|c| match &c.kind {
                    ElementKind::Container { technology } => Some(PersistedContainer {
                        id: c.id.clone(),
                        name: c.name.clone(),
                        description: c.description.clone(),
                        technology: technology.clone(),
                        relationships: self.persisted_outgoing(&c.id),
                        components: self.persist_components(c),
                    }),
                    _ => None,
                })
                .collect(),
        }
    }

    fn persist_components(&self, container: &Element) -> Vec<PersistedComponent> {
        container
            .children
            .iter()
            .filter_map(|id| self.elements.get(id))
            .filter_map(|comp| match &comp.kind {
                ElementKind::Component {
                    technology,
                    component_type,
                    source_path,
                } => Some(PersistedComponent {
                    id: comp.id.clone(),
                    name: comp.name.clone(),
                    description: comp.description.clone(),
                    technology: technology.clone(),
                    component_type: component_type.clone(),
                    source_path: source_path.clone(),
                    relationships: self.persisted_outgoing(&comp.id),
                }),
                _ => None,
            })
            .collect()
    }

    fn persist_deployment_node(&self, node: &Element) -> PersistedDeploymentNode {
        let mut children = Vec::new();
        let mut container_instances = Vec::new();
        for child in node.children.iter().filter_map(|id| self.elements.get(id)) {
            match &child.kind {
                ElementKind::DeploymentNode { .. } => {
                    children.push(self.persist_deployment_node(child));
                }
                ElementKind::ContainerInstance {
                    container,
                    environment,
                    instance_number,
                } => {
                    container_instances.push(PersistedContainerInstance {
                        id: child.id.clone(),
                        container_id: container.clone(),
                        environment: environment.clone(),
                        instance_number: *instance_number,
                        relationships: self.persisted_outgoing(&child.id),
                    });
                }
                _ => {}
            }
        }
        let (technology, environment) = match &node.kind {
            ElementKind::DeploymentNode {
                technology,
                environment,
            } => (technology.clone(), environment.clone()),
            _ => (String::new(), String::new()),
        };
        PersistedDeploymentNode {
            id: node.id.clone(),
            name: node.name.clone(),
            description: node.description.clone(),
            technology,
            environment,
            relationships: self.persisted_outgoing(&node.id),
            children,
            container_instances,
        }
    }

    fn persisted_outgoing(&self, source: &Id) -> Vec<PersistedRelationship> {
        self.outgoing(source)
            .map(|r| PersistedRelationship {
                id: r.id.clone(),
                source_id: r.source.clone(),
                destination_id: r.destination.clone(),
                description: r.description.clone(),
                technology: r.technology.clone(),
                interaction_style: r.interaction_style,
                tags: r.tags.clone(),
                linked_relationship_id: r.linked_relationship_id.clone(),
            })
            .collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InteractionStyle;

    /// A model exercising every element variant and a forward reference
    /// between sibling subtrees.
    fn sample_model() -> Model {
        let mut model = Model::new();
        model.enterprise = Some("Acme".to_string());
        let alice = model.add_person("Alice", "admin").expect("create");
        let shop = model.add_software_system("Shop", "retail").expect("create");
        let billing = model.add_software_system("Billing", "").expect("create");
        let web = model
            .add_container(&shop, "Web", "front end", "Rust")
            .expect("create");
        let db = model
            .add_container(&shop, "Database", "", "PostgreSQL")
            .expect("create");
        let orders = model
            .add_component(&web, "Orders", "", "Rust")
            .expect("create");
        model
            .add_relationship(&alice, &shop, "uses", "web", InteractionStyle::Synchronous)
            .expect("add");
        model
            .add_relationship(&web, &db, "reads from", "SQL", InteractionStyle::Synchronous)
            .expect("add");
        // Forward reference: an edge from the first system's component to
        // the second system.
        model
            .add_relationship(&orders, &billing, "invoices via", "gRPC", InteractionStyle::Asynchronous)
            .expect("add");
        let live = model
            .add_deployment_node("Live", "AWS", "", "us-east-1")
            .expect("create");
        let ec2 = model
            .add_child_deployment_node(&live, "EC2", "", "t3.large")
            .expect("create");
        model.add_container_instance(&ec2, &web).expect("instantiate");
        model.add_container_instance(&ec2, &db).expect("instantiate");
        model
    }

    #[test]
    fn roundtrip_preserves_the_graph() {
        let model = sample_model();
        let doc = model.to_persisted();
        let rebuilt = Model::hydrate(&doc).expect("hydrate");

        // Same element set, same parent/child links, same relationship
        // endpoints: the persisted forms are identical.
        assert_eq!(rebuilt.to_persisted(), doc);
        assert_eq!(rebuilt.element_count(), model.element_count());
        assert_eq!(rebuilt.relationship_count(), model.relationship_count());
        assert_eq!(rebuilt.enterprise, model.enterprise);
    }

    #[test]
    fn hydration_restores_parent_links() {
        let model = sample_model();
        let rebuilt = Model::hydrate(&model.to_persisted()).expect("hydrate");

        let web = rebuilt
            .software_system_with_name("Shop")
            .map(|s| s.id.clone())
            .and_then(|sid| rebuilt.child_with_name(&sid, "Web").cloned())
            .expect("container");
        let orders = rebuilt
            .child_with_name(&web.id, "Orders")
            .expect("component");
        assert_eq!(orders.parent.as_ref(), Some(&web.id));
    }

    #[test]
    fn ids_strictly_increase_after_hydration() {
        let model = sample_model();
        let mut rebuilt = Model::hydrate(&model.to_persisted()).expect("hydrate");

        let highest = model
            .elements()
            .map(|e| e.id.numeric().unwrap_or(0))
            .chain(model.relationships().map(|r| r.id.numeric().unwrap_or(0)))
            .max()
            .unwrap_or(0);

        let fresh = rebuilt.add_person("Bob", "").expect("create");
        let fresh_numeric = fresh.numeric().expect("numeric id");
        assert!(fresh_numeric > highest);
    }

    #[test]
    fn unresolved_relationship_endpoint_aborts_hydration() {
        let model = sample_model();
        let mut doc = model.to_persisted();
        // Point the person's outgoing edge at an id that does not exist.
        if let Some(person) = doc.people.first_mut() {
            if let Some(rel) = person.relationships.first_mut() {
                rel.destination_id = Id::new("9999");
            }
        }
        let err = Model::hydrate(&doc);
        assert!(matches!(err, Err(ModelError::UnresolvedReference(_))));
    }

    #[test]
    fn unresolved_container_reference_aborts_hydration() {
        let model = sample_model();
        let mut doc = model.to_persisted();
        if let Some(node) = doc.deployment_nodes.first_mut() {
            if let Some(child) = node.children.first_mut() {
                if let Some(instance) = child.container_instances.first_mut() {
                    instance.container_id = Id::new("9999");
                }
            }
        }
        let err = Model::hydrate(&doc);
        assert!(matches!(err, Err(ModelError::UnresolvedReference(_))));
    }

    #[test]
    fn legacy_non_numeric_ids_survive_hydration() {
        let doc = PersistedWorkspace {
            people: vec![PersistedPerson {
                id: Id::new("legacy-alice"),
                name: "Alice".to_string(),
                description: String::new(),
                relationships: Vec::new(),
            }],
            ..PersistedWorkspace::default()
        };
        let mut rebuilt = Model::hydrate(&doc).expect("hydrate");
        assert!(rebuilt.element(&Id::new("legacy-alice")).is_some());
        // The legacy id did not advance the counter.
        assert_eq!(rebuilt.add_person("Bob", ""), Some(Id::new("1")));
    }

    #[test]
    fn instance_numbers_are_not_renumbered_by_hydration() {
        let model = sample_model();
        let rebuilt = Model::hydrate(&model.to_persisted()).expect("hydrate");
        let numbers: Vec<u64> = rebuilt
            .elements()
            .filter_map(|e| match &e.kind {
                ElementKind::ContainerInstance {
                    instance_number, ..
                } => Some(*instance_number),
                _ => None,
            })
            .collect();
        assert_eq!(numbers, vec![1, 1]);
    }
}
