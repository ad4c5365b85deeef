//! Error types for contractkv
//!
//! Provides a unified error type for codec, container and snapshot operations.

use thiserror::Error;

/// Result type alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for contractkv operations
#[derive(Debug, Error)]
pub enum Error {
    // -------------------------------------------------------------------------
    // Cursor Errors
    // -------------------------------------------------------------------------
    #[error("Cursor out of bounds: requested {requested} bytes, {remaining} remaining")]
    OutOfBounds { requested: usize, remaining: usize },

    #[error("Seek out of range: position {position}, buffer length {len}")]
    SeekOutOfRange { position: usize, len: usize },

    // -------------------------------------------------------------------------
    // Format Errors
    // -------------------------------------------------------------------------
    #[error("Length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Varint overflow: more than {max_bytes} bytes or value exceeds 64 bits")]
    VarintOverflow { max_bytes: usize },

    #[error("Sequence of {len} zero-sized items exceeds the limit of {max}")]
    SequenceTooLong { len: usize, max: usize },

    #[error("Invalid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("Integer {value} does not fit in {type_name}")]
    IntegerOverflow { type_name: &'static str, value: i128 },

    #[error("Invalid char scalar value: 0x{0:08x}")]
    InvalidChar(u32),

    #[error("Invalid discriminant {value} for {type_name}")]
    InvalidDiscriminant { type_name: &'static str, value: u64 },

    #[error("Invalid hex string: {0}")]
    InvalidHex(String),

    // -------------------------------------------------------------------------
    // Container Errors
    // -------------------------------------------------------------------------
    #[error("List `{name}`: live slot {slot} (index {index}) missing from store")]
    MissingSlot {
        name: String,
        index: usize,
        slot: usize,
    },

    // -------------------------------------------------------------------------
    // Snapshot Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot corruption detected: {0}")]
    SnapshotCorruption(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<bincode::Error> for Error {
    fn from(err: bincode::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
