//! # Persisted Workspace Document
//!
//! Serde types for the persisted form. Field names follow the document
//! convention (camelCase) so the same types serve both the binary
//! payload and JSON import/export.

use crate::{Id, InteractionStyle};
use serde::{Deserialize, Serialize};

/// The top-level persisted document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedWorkspace {
    /// Optional enterprise name.
    pub enterprise: Option<String>,
    #[serde(default)]
    pub people: Vec<PersistedPerson>,
    #[serde(default)]
    pub software_systems: Vec<PersistedSoftwareSystem>,
    #[serde(default)]
    pub deployment_nodes: Vec<PersistedDeploymentNode>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedPerson {
    pub id: Id,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub relationships: Vec<PersistedRelationship>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSoftwareSystem {
    pub id: Id,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub relationships: Vec<PersistedRelationship>,
    #[serde(default)]
    pub containers: Vec<PersistedContainer>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedContainer {
    pub id: Id,
    pub name: String,
    pub description: String,
    pub technology: String,
    #[serde(default)]
    pub relationships: Vec<PersistedRelationship>,
    #[serde(default)]
    pub components: Vec<PersistedComponent>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedComponent {
    pub id: Id,
    pub name: String,
    pub description: String,
    pub technology: String,
    #[serde(default)]
    pub component_type: String,
    #[serde(default)]
    pub source_path: String,
    #[serde(default)]
    pub relationships: Vec<PersistedRelationship>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedDeploymentNode {
    pub id: Id,
    pub name: String,
    pub description: String,
    pub technology: String,
    pub environment: String,
    #[serde(default)]
    pub relationships: Vec<PersistedRelationship>,
    #[serde(default)]
    pub children: Vec<PersistedDeploymentNode>,
    #[serde(default)]
    pub container_instances: Vec<PersistedContainerInstance>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedContainerInstance {
    pub id: Id,
    /// Resolved to the Container element during hydration.
    pub container_id: Id,
    pub environment: String,
    pub instance_number: u64,
    #[serde(default)]
    pub relationships: Vec<PersistedRelationship>,
}

/// A persisted edge. Endpoints are carried as ids (`sourceId` /
/// `destinationId`), not embedded element objects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedRelationship {
    pub id: Id,
    pub source_id: Id,
    pub destination_id: Id,
    pub description: String,
    pub technology: String,
    #[serde(default)]
    pub interaction_style: InteractionStyle,
    #[serde(default)]
    pub tags: Vec<String>,
    pub linked_relationship_id: Option<Id>,
}

impl PersistedWorkspace {
    /// All persisted relationships in canonical traversal order: people,
    /// software systems (system, containers, components), then the
    /// deployment-node forest.
    ///
    /// Hydration pass 2 consumes this after pass 1 has registered every
    /// element, so forward references between sibling subtrees resolve.
    #[must_use]
    pub fn relationships(&self) -> Vec<&PersistedRelationship> {
        let mut out = Vec::new();
        for p in &self.people {
            out.extend(&p.relationships);
        }
        for s in &self.software_systems {
            out.extend(&s.relationships);
            for c in &s.containers {
                out.extend(&c.relationships);
                for comp in &c.components {
                    out.extend(&comp.relationships);
                }
            }
        }
        for n in &self.deployment_nodes {
            collect_node_relationships(n, &mut out);
        }
        out
    }
}

fn collect_node_relationships<'a>(
    node: &'a PersistedDeploymentNode,
    out: &mut Vec<&'a PersistedRelationship>,
) {
    out.extend(&node.relationships);
    for child in &node.children {
        collect_node_relationships(child, out);
    }
    for instance in &node.container_instances {
        out.extend(&instance.relationships);
    }
}
