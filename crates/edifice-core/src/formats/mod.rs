//! # Persisted Form
//!
//! The flattened, id-referenced document a model is persisted as, plus
//! the binary encoding (header + postcard payload).
//!
//! Relationships are carried per element (as the element's outgoing
//! edges) and reference endpoints by id rather than embedding them; the
//! hydrator's two-pass resolution repairs this flattening back into a
//! live graph.

pub mod persistence;
pub mod workspace;

pub use persistence::{
    MAX_PERSISTENCE_PAYLOAD_SIZE, PersistenceHeader, model_from_bytes, model_to_bytes,
};
pub use workspace::{
    PersistedComponent, PersistedContainer, PersistedContainerInstance, PersistedDeploymentNode,
    PersistedPerson, PersistedRelationship, PersistedSoftwareSystem, PersistedWorkspace,
};
