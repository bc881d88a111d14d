//! # Innate Primitives
//!
//! Hardcoded runtime constants for the Edifice model engine.
//!
//! These values are compiled into the binary and are immutable at runtime.

/// Magic bytes for the Edifice binary persistence format header.
///
/// - File Header = Magic Bytes ("EDFC") + Version (u8) before payload.
pub const MAGIC_BYTES: &[u8; 4] = b"EDFC";

/// Current serialization format version.
///
/// Increment this when making breaking changes to the persisted form.
pub const FORMAT_VERSION: u8 = 1;

/// The deployment environment used when callers do not name one.
///
/// Top-level deployment nodes created with an empty environment string
/// land here, and their name-uniqueness scope is this environment.
pub const DEFAULT_ENVIRONMENT: &str = "Default";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magic_bytes_correct() {
        assert_eq!(MAGIC_BYTES, b"EDFC");
    }

    #[test]
    fn default_environment_is_named() {
        assert!(!DEFAULT_ENVIRONMENT.is_empty());
    }
}
