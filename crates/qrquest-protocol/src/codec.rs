//! Codec trait and implementations for serializing/deserializing documents.
//!
//! A "codec" (coder/decoder) converts between Rust types and raw bytes.
//! The storage layer doesn't care HOW records are serialized. It just
//! needs something that implements the [`Codec`] trait.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// A codec that can encode Rust types to bytes and decode bytes back.
///
/// ## Trait bounds explained
///
/// - `Send + Sync` → safe to share between threads (the document owner
///   tasks may run on any thread in Tokio's pool).
/// - `'static` → the codec owns everything it needs, so it can live
///   inside long-lived async tasks.
///
/// `DeserializeOwned` (vs plain `Deserialize`) means the decoded value
/// doesn't borrow from the input bytes, so the read buffer can be dropped
/// right after decoding.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed,
    /// incomplete, or don't match the expected type.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// The hints and results files are meant to be edited and inspected by
/// hand, so output is always pretty-printed (two-space indentation, UTF-8
/// text left unescaped).
///
/// ## Example
///
/// ```rust
/// use qrquest_protocol::{Codec, Hint, JsonCodec};
///
/// let codec = JsonCodec;
/// let hints = vec![Hint {
///     level: 0,
///     educational_text: "Die Brücke".into(),
///     text: "Look under the bridge".into(),
///     next_qr_code: "A".into(),
/// }];
///
/// let bytes = codec.encode(&hints).unwrap();
/// let decoded: Vec<Hint> = codec.decode(&bytes).unwrap();
/// assert_eq!(hints, decoded);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec_pretty(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
