//! # edifice-core
//!
//! The software-architecture model graph engine for Edifice - THE LOGIC.
//!
//! An in-memory store of typed elements (people, software systems,
//! containers, components, deployment nodes, container instances) and
//! directed relationships between them, with:
//! - collision-free identity assignment that survives hydration
//! - per-scope name uniqueness
//! - two-pass reconstruction from the flat persisted form
//! - implicit-relationship derivation across containment ancestors
//! - instance-level replication of the container dependency graph
//!
//! ## Architectural Constraints
//!
//! The core:
//! - Is pure and synchronous: no async, no network dependencies
//! - Is deterministic: `BTreeMap` everywhere, no iteration-order surprises
//! - Holds no locks; callers needing concurrency serialize externally

// =============================================================================
// MODULES
// =============================================================================

pub mod derive;
pub mod discovery;
pub mod element;
pub mod formats;
pub mod hydrate;
pub mod identity;
pub mod instances;
pub mod model;
pub mod primitives;
pub mod relationship;
pub mod storage;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{Id, InteractionStyle, ModelError};

// =============================================================================
// RE-EXPORTS: Model Graph
// =============================================================================

pub use discovery::{ComponentDiscovery, ComponentFinder};
pub use element::{Element, ElementKind};
pub use identity::IdGenerator;
pub use model::{Model, ModelStats};
pub use relationship::Relationship;
pub use storage::WorkspaceDb;

// =============================================================================
// RE-EXPORTS: Formats (from formats module)
// =============================================================================

pub use formats::{PersistedWorkspace, PersistenceHeader, model_from_bytes, model_to_bytes};
