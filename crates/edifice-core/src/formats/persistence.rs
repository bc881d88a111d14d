//! # Persistence Format
//!
//! Binary serialization for Edifice workspaces.
//!
//! Format: Header (5 bytes) + postcard-serialized workspace document.
//! - 4 bytes: Magic ("EDFC")
//! - 1 byte: Version
//!
//! Pre-deserialization validation keeps corrupted or oversized data from
//! being parsed:
//! - Maximum payload size limit (`MAX_PERSISTENCE_PAYLOAD_SIZE`)
//! - Header validation before payload parsing

use crate::formats::workspace::PersistedWorkspace;
use crate::{Model, ModelError, primitives};

/// Maximum allowed payload size for the persistence format.
///
/// Validated BEFORE attempting deserialization, so corrupted length data
/// cannot trigger huge allocations.
pub const MAX_PERSISTENCE_PAYLOAD_SIZE: usize = 500 * 1024 * 1024; // 500 MB

/// Minimum valid file size (header only).
const MIN_FILE_SIZE: usize = 5;

// =============================================================================
// FILE HEADER
// =============================================================================

/// The persistence header precedes all workspace data.
#[derive(Debug, Clone, Copy)]
pub struct PersistenceHeader {
    pub magic: [u8; 4],
    pub version: u8,
}

impl PersistenceHeader {
    /// Create a new header with the current format version.
    #[must_use]
    pub fn new() -> Self {
        Self {
            magic: *primitives::MAGIC_BYTES,
            version: primitives::FORMAT_VERSION,
        }
    }

    /// Validate the header.
    pub fn validate(&self) -> Result<(), ModelError> {
        if &self.magic != primitives::MAGIC_BYTES {
            return Err(ModelError::Deserialization(
                "invalid magic bytes".to_string(),
            ));
        }
        if self.version != primitives::FORMAT_VERSION {
            return Err(ModelError::Deserialization(format!(
                "unsupported version: {} (expected {})",
                self.version,
                primitives::FORMAT_VERSION
            )));
        }
        Ok(())
    }

    /// Write the header to bytes.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 5] {
        let mut bytes = [0u8; 5];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4] = self.version;
        bytes
    }

    /// Read a header from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ModelError> {
        if bytes.len() < MIN_FILE_SIZE {
            return Err(ModelError::Deserialization("header too short".to_string()));
        }
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[0..4]);
        Ok(Self {
            magic,
            version: bytes[4],
        })
    }
}

impl Default for PersistenceHeader {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// SERIALIZATION FUNCTIONS
// =============================================================================

/// Serialize a model to bytes (header + payload).
///
/// This is a pure transformation - no file I/O.
pub fn model_to_bytes(model: &Model) -> Result<Vec<u8>, ModelError> {
    let header = PersistenceHeader::new();
    let document = model.to_persisted();

    let payload =
        postcard::to_stdvec(&document).map_err(|e| ModelError::Serialization(e.to_string()))?;

    let mut result = Vec::with_capacity(5 + payload.len());
    result.extend_from_slice(&header.to_bytes());
    result.extend_from_slice(&payload);

    Ok(result)
}

/// Deserialize and hydrate a model from bytes.
///
/// Size and header validation happen BEFORE any payload parsing; after
/// decoding, the document goes through the full two-pass hydration, so an
/// unresolved reference in the payload aborts with `UnresolvedReference`.
pub fn model_from_bytes(bytes: &[u8]) -> Result<Model, ModelError> {
    if bytes.len() < MIN_FILE_SIZE {
        return Err(ModelError::Deserialization(
            "data too short: minimum 5 bytes required".to_string(),
        ));
    }
    if bytes.len() > MAX_PERSISTENCE_PAYLOAD_SIZE {
        return Err(ModelError::Deserialization(format!(
            "data size {} bytes exceeds maximum allowed {} bytes",
            bytes.len(),
            MAX_PERSISTENCE_PAYLOAD_SIZE
        )));
    }

    let header = PersistenceHeader::from_bytes(bytes)?;
    header.validate()?;

    let payload = &bytes[5..];
    let document: PersistedWorkspace = postcard::from_bytes(payload).map_err(|e| {
        ModelError::Deserialization(format!("failed to deserialize workspace data: {}", e))
    })?;

    Model::hydrate(&document)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InteractionStyle;

    #[test]
    fn header_roundtrip() {
        let header = PersistenceHeader::new();
        let bytes = header.to_bytes();
        let restored = PersistenceHeader::from_bytes(&bytes).expect("parse header");

        assert_eq!(restored.magic, *primitives::MAGIC_BYTES);
        assert_eq!(restored.version, primitives::FORMAT_VERSION);
    }

    #[test]
    fn bytes_roundtrip_bit_exact() {
        let mut model = Model::new();
        let alice = model.add_person("Alice", "admin").expect("create");
        let shop = model.add_software_system("Shop", "").expect("create");
        model
            .add_relationship(&alice, &shop, "uses", "web", InteractionStyle::Synchronous)
            .expect("add");

        let bytes1 = model_to_bytes(&model).expect("first serialize");
        let restored = model_from_bytes(&bytes1).expect("deserialize");
        let bytes2 = model_to_bytes(&restored).expect("second serialize");

        assert_eq!(
            bytes1, bytes2,
            "save -> load -> save must produce identical bytes"
        );
    }

    #[test]
    fn invalid_magic_rejected() {
        let mut bytes = vec![0u8; 10];
        bytes[0..4].copy_from_slice(b"XXXX");

        let result = model_from_bytes(&bytes);
        assert!(result.is_err());
    }

    #[test]
    fn truncated_data_rejected() {
        assert!(model_from_bytes(b"ED").is_err());
    }
}
