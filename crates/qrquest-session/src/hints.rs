//! Hint book actor: the single owner of the hints file.
//!
//! The hint sequence is read far more often than it's written (every scan
//! reads it, only the admin endpoint writes it). All access goes through
//! one Tokio task that owns the file, so a read can never observe a
//! half-written replacement.
//!
//! The file is re-read on every [`HintBook::load`], so hand edits to the
//! JSON show up without a restart.

use std::path::PathBuf;

use qrquest_protocol::{Hint, JsonDocument};
use tokio::sync::{mpsc, oneshot};

use crate::SessionError;

/// Default command channel size for the hint book actor.
const DEFAULT_CHANNEL_SIZE: usize = 64;

/// Commands sent to the hint book actor.
enum HintCommand {
    Load {
        reply: oneshot::Sender<Result<Vec<Hint>, SessionError>>,
    },
    ReplaceAll {
        hints: Vec<Hint>,
        reply: oneshot::Sender<Result<(), SessionError>>,
    },
}

/// Handle to the running hint book actor.
///
/// Cheap to clone. The actor stops when the last handle is dropped.
#[derive(Clone)]
pub struct HintBook {
    sender: mpsc::Sender<HintCommand>,
}

impl HintBook {
    /// Spawns the actor for the hints file at `path`.
    ///
    /// The file doesn't need to exist yet.
    pub fn spawn(path: impl Into<PathBuf>) -> Self {
        let (tx, rx) = mpsc::channel(DEFAULT_CHANNEL_SIZE);
        let actor = HintBookActor {
            document: JsonDocument::new(path),
            receiver: rx,
        };
        tokio::spawn(actor.run());
        Self { sender: tx }
    }

    /// Returns the whole hint sequence, in file order.
    ///
    /// A missing file is an empty sequence.
    ///
    /// # Errors
    /// - [`SessionError::MalformedStorage`] if the file isn't a valid
    ///   hint array
    /// - [`SessionError::Storage`] if the file can't be read
    pub async fn load(&self) -> Result<Vec<Hint>, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(HintCommand::Load { reply: reply_tx })
            .await
            .map_err(|_| SessionError::Unavailable)?;
        reply_rx.await.map_err(|_| SessionError::Unavailable)?
    }

    /// Replaces the whole hint sequence. No merging, and no check that the
    /// levels are contiguous.
    ///
    /// # Errors
    /// Returns [`SessionError::Storage`] if the file can't be written.
    pub async fn replace_all(&self, hints: Vec<Hint>) -> Result<(), SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(HintCommand::ReplaceAll {
                hints,
                reply: reply_tx,
            })
            .await
            .map_err(|_| SessionError::Unavailable)?;
        reply_rx.await.map_err(|_| SessionError::Unavailable)?
    }
}

struct HintBookActor {
    document: JsonDocument<Vec<Hint>>,
    receiver: mpsc::Receiver<HintCommand>,
}

impl HintBookActor {
    async fn run(mut self) {
        tracing::info!(path = %self.document.path().display(), "hint book started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                HintCommand::Load { reply } => {
                    let result = self.load().await;
                    let _ = reply.send(result);
                }
                HintCommand::ReplaceAll { hints, reply } => {
                    let result = self.replace_all(hints).await;
                    let _ = reply.send(result);
                }
            }
        }

        tracing::info!("hint book stopped");
    }

    async fn load(&self) -> Result<Vec<Hint>, SessionError> {
        match self.document.load().await {
            Ok(hints) => Ok(hints.unwrap_or_default()),
            Err(e) => {
                tracing::error!(error = %e, "failed to load hints");
                Err(e.into())
            }
        }
    }

    async fn replace_all(&self, hints: Vec<Hint>) -> Result<(), SessionError> {
        let count = hints.len();
        self.document.save(&hints).await?;
        tracing::info!(count, "hints replaced");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hint(level: u32, code: &str) -> Hint {
        Hint {
            level,
            educational_text: format!("e{level}"),
            text: format!("t{level}"),
            next_qr_code: code.to_string(),
        }
    }

    #[tokio::test]
    async fn test_load_missing_file_returns_empty() {
        let dir = tempfile::tempdir().unwrap();
        let book = HintBook::spawn(dir.path().join("hints.json"));

        assert!(book.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_replace_all_then_load_returns_new_sequence() {
        let dir = tempfile::tempdir().unwrap();
        let book = HintBook::spawn(dir.path().join("hints.json"));
        let hints = vec![hint(0, "A"), hint(1, "B")];

        book.replace_all(hints.clone()).await.unwrap();

        assert_eq!(book.load().await.unwrap(), hints);
    }

    #[tokio::test]
    async fn test_replace_all_overwrites_without_merge() {
        let dir = tempfile::tempdir().unwrap();
        let book = HintBook::spawn(dir.path().join("hints.json"));
        book.replace_all(vec![hint(0, "A"), hint(1, "B")]).await.unwrap();

        // Gaps in the level numbering are accepted as-is.
        book.replace_all(vec![hint(5, "Z")]).await.unwrap();

        assert_eq!(book.load().await.unwrap(), vec![hint(5, "Z")]);
    }

    #[tokio::test]
    async fn test_load_picks_up_external_edits() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hints.json");
        let book = HintBook::spawn(&path);
        assert!(book.load().await.unwrap().is_empty());

        tokio::fs::write(
            &path,
            r#"[{"level":0,"educational_text":"e0","text":"t0","next_qr_code":"A"}]"#,
        )
        .await
        .unwrap();

        assert_eq!(book.load().await.unwrap(), vec![hint(0, "A")]);
    }

    #[tokio::test]
    async fn test_load_malformed_file_returns_malformed_storage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hints.json");
        tokio::fs::write(&path, b"[{\"level\": 0,").await.unwrap();
        let book = HintBook::spawn(&path);

        let result = book.load().await;

        assert!(
            matches!(result, Err(SessionError::MalformedStorage(_))),
            "got {result:?}"
        );
    }

    #[tokio::test]
    async fn test_replace_all_unwritable_path_returns_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let book = HintBook::spawn(dir.path().join("missing").join("hints.json"));

        let result = book.replace_all(vec![hint(0, "A")]).await;

        assert!(matches!(result, Err(SessionError::Storage(_))));
    }
}
