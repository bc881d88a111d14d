//! # Workspace Storage
//!
//! Disk-backed workspace persistence. The redb backend stores the
//! encoded workspace document plus format metadata.

pub mod redb_workspace;

pub use redb_workspace::WorkspaceDb;
