//! Whole-file JSON documents.
//!
//! Both persisted artifacts (the hints file and the results file) are a
//! single JSON array that is read in full and rewritten in full. There is
//! no incremental append. Callers are expected to give each document a
//! single owner so reads and writes never race.

use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::{Serialize, de::DeserializeOwned};

use crate::{Codec, JsonCodec, ProtocolError};

/// A JSON file holding one value of type `T`.
///
/// `PhantomData<fn() -> T>` ties the document to its content type without
/// storing a `T`, and keeps the document `Send + Sync` regardless of `T`.
#[derive(Debug, Clone)]
pub struct JsonDocument<T> {
    path: PathBuf,
    codec: JsonCodec,
    _content: PhantomData<fn() -> T>,
}

impl<T> JsonDocument<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Creates a handle for the document at `path`. Nothing is read yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            codec: JsonCodec,
            _content: PhantomData,
        }
    }

    /// Returns the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and decodes the whole file.
    ///
    /// Returns `Ok(None)` if the file doesn't exist yet.
    ///
    /// # Errors
    /// - [`ProtocolError::Io`] if the file exists but can't be read
    /// - [`ProtocolError::Decode`] if the content isn't a valid `T`
    pub async fn load(&self) -> Result<Option<T>, ProtocolError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ProtocolError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        self.codec.decode(&bytes).map(Some)
    }

    /// Encodes `value` and replaces the whole file with it.
    ///
    /// # Errors
    /// - [`ProtocolError::Encode`] if `value` can't be serialized
    /// - [`ProtocolError::Io`] if the file can't be written
    pub async fn save(&self, value: &T) -> Result<(), ProtocolError> {
        let bytes = self.codec.encode(value)?;
        tokio::fs::write(&self.path, bytes)
            .await
            .map_err(|source| ProtocolError::Io {
                path: self.path.clone(),
                source,
            })?;
        tracing::debug!(path = %self.path.display(), "document saved");
        Ok(())
    }
}
