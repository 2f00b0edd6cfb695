//! Error types for the protocol layer.
//!
//! Everything that can go wrong turning a Rust value into a stored
//! document (or back) ends up here: serialization, parsing, and the file
//! I/O underneath [`JsonDocument`](crate::JsonDocument).

use std::path::PathBuf;

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: malformed JSON, missing fields, or the
    /// wrong shape for the expected type.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// Reading or writing a document file failed.
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ProtocolError {
    /// Returns `true` if the stored bytes could not be parsed.
    ///
    /// Callers use this to tell a corrupt document apart from a disk
    /// failure.
    pub fn is_decode(&self) -> bool {
        #[cfg(feature = "json")]
        {
            matches!(self, Self::Decode(_))
        }
        #[cfg(not(feature = "json"))]
        {
            false
        }
    }
}
