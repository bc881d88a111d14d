//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use edifice_core::{
    Model, ModelError, PersistedWorkspace, WorkspaceDb, model_from_bytes, model_to_bytes,
};
use std::path::PathBuf;

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum file size for import (500 MB).
///
/// This prevents memory exhaustion from malicious or accidental large files.
const MAX_IMPORT_FILE_SIZE: u64 = 500 * 1024 * 1024;

/// Validate file size before reading.
fn validate_file_size(path: &PathBuf, max_size: u64) -> Result<(), ModelError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| ModelError::Io(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(ModelError::Io(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Validate an input file path.
///
/// Canonicalizes the path (resolving symlinks and "..") and ensures it
/// names a regular file, so a path like "../../../etc/shadow" cannot
/// slip through unnoticed.
fn validate_file_path(path: &std::path::Path) -> Result<PathBuf, ModelError> {
    let canonical = path
        .canonicalize()
        .map_err(|e| ModelError::Io(format!("Invalid file path '{}': {}", path.display(), e)))?;

    if !canonical.is_file() {
        return Err(ModelError::Io(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Validate an output file path: the parent directory must exist.
fn validate_output_path(path: &std::path::Path) -> Result<PathBuf, ModelError> {
    let parent = path.parent().unwrap_or(std::path::Path::new("."));

    let canonical_parent = parent.canonicalize().map_err(|e| {
        ModelError::Io(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    if !canonical_parent.is_dir() {
        return Err(ModelError::Io(format!(
            "Output directory '{}' is not a valid directory",
            parent.display()
        )));
    }

    let filename = path
        .file_name()
        .ok_or_else(|| ModelError::Io("Output path has no filename".to_string()))?;

    Ok(canonical_parent.join(filename))
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show workspace statistics.
pub fn cmd_status(db_path: &PathBuf, json_mode: bool) -> Result<(), ModelError> {
    let model = load_or_empty(db_path)?;
    let stats = model.stats();

    if json_mode {
        let output = serde_json::json!({
            "database": db_path.to_string_lossy(),
            "people": stats.people,
            "software_systems": stats.software_systems,
            "containers": stats.containers,
            "components": stats.components,
            "deployment_nodes": stats.deployment_nodes,
            "container_instances": stats.container_instances,
            "relationships": stats.relationships
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Edifice Workspace Status");
    println!("========================");
    println!("Database: {:?}", db_path);
    println!();
    println!("People:              {}", stats.people);
    println!("Software Systems:    {}", stats.software_systems);
    println!("Containers:          {}", stats.containers);
    println!("Components:          {}", stats.components);
    println!("Deployment Nodes:    {}", stats.deployment_nodes);
    println!("Container Instances: {}", stats.container_instances);
    println!("Relationships:       {}", stats.relationships);

    Ok(())
}

// =============================================================================
// DERIVE COMMAND
// =============================================================================

/// Run implicit-relationship derivation and persist the result.
pub fn cmd_derive(db_path: &PathBuf, json_mode: bool) -> Result<(), ModelError> {
    let mut db = WorkspaceDb::open(db_path)?;
    let mut model = db.load()?.unwrap_or_default();

    tracing::info!("Deriving implicit relationships in {:?}", db_path);
    let created = model.derive_implicit_relationships()?;
    db.save(&model)?;

    if json_mode {
        let output = serde_json::json!({
            "created": created.len(),
            "relationships": model.relationship_count()
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Derived {} implicit relationships", created.len());
    println!("Workspace now has {} relationships", model.relationship_count());

    Ok(())
}

// =============================================================================
// EXPORT COMMAND
// =============================================================================

/// Export the workspace to a file, as the binary persisted form or JSON.
pub fn cmd_export(
    db_path: &PathBuf,
    output: &std::path::Path,
    format: &str,
) -> Result<(), ModelError> {
    let validated_output = validate_output_path(output)?;
    let model = load_or_empty(db_path)?;

    let data = match format {
        "binary" => model_to_bytes(&model)?,
        "json" => serde_json::to_vec_pretty(&model.to_persisted())
            .map_err(|e| ModelError::Serialization(e.to_string()))?,
        _ => {
            return Err(ModelError::Serialization(format!(
                "Unknown format: {}. Use: binary, json",
                format
            )));
        }
    };

    std::fs::write(&validated_output, &data)
        .map_err(|e| ModelError::Io(format!("Write file: {}", e)))?;

    println!("Exported {} bytes to {:?}", data.len(), validated_output);

    Ok(())
}

// =============================================================================
// IMPORT COMMAND
// =============================================================================

/// Import a workspace file into the database, replacing its contents.
pub fn cmd_import(
    db_path: &PathBuf,
    input: &std::path::Path,
    format: &str,
) -> Result<(), ModelError> {
    let validated_path = validate_file_path(input)?;
    validate_file_size(&validated_path, MAX_IMPORT_FILE_SIZE)?;

    let data = std::fs::read(&validated_path)
        .map_err(|e| ModelError::Io(format!("Read file: {}", e)))?;

    let model = match format {
        "binary" => model_from_bytes(&data)?,
        "json" => {
            let document: PersistedWorkspace = serde_json::from_slice(&data)
                .map_err(|e| ModelError::Deserialization(e.to_string()))?;
            Model::hydrate(&document)?
        }
        _ => {
            return Err(ModelError::Deserialization(format!(
                "Unknown format: {}. Use: binary, json",
                format
            )));
        }
    };

    let mut db = WorkspaceDb::open(db_path)?;
    db.save(&model)?;

    println!(
        "Imported workspace: {} elements, {} relationships",
        model.element_count(),
        model.relationship_count()
    );

    Ok(())
}

// =============================================================================
// INIT COMMAND
// =============================================================================

/// Initialize a new empty workspace database.
pub fn cmd_init(db_path: &PathBuf, force: bool) -> Result<(), ModelError> {
    if db_path.exists() {
        if !force {
            return Err(ModelError::Io(
                "Database already exists. Use --force to overwrite.".to_string(),
            ));
        }
        std::fs::remove_file(db_path)
            .map_err(|e| ModelError::Io(format!("Remove existing database: {}", e)))?;
    }

    let mut db = WorkspaceDb::open(db_path)?;
    db.save(&Model::new())?;

    println!("Initialized new workspace database at {:?}", db_path);

    Ok(())
}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Open the database and load the stored workspace, or an empty model if
/// nothing has been saved yet.
fn load_or_empty(db_path: &PathBuf) -> Result<Model, ModelError> {
    let db = WorkspaceDb::open(db_path)?;
    Ok(db.load()?.unwrap_or_default())
}
