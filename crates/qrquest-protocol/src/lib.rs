//! Shared types and storage format for qrquest.
//!
//! This crate defines the "vocabulary" every other crate speaks:
//!
//! - **Types** ([`PlayerId`], [`Hint`], [`QrCode`], [`Completion`],
//!   [`GameResult`]): the game records.
//! - **API bodies** ([`api`]): the JSON shapes of the HTTP surface.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how records become
//!   bytes and back.
//! - **Documents** ([`JsonDocument`]): whole-file JSON artifacts on disk.
//! - **Errors** ([`ProtocolError`]): what can go wrong along the way.
//!
//! # Architecture
//!
//! ```text
//! HTTP (qrquest) → Session / Leaderboard → Protocol (types, documents)
//! ```

pub mod api;
mod codec;
#[cfg(feature = "json")]
mod document;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
#[cfg(feature = "json")]
pub use document::JsonDocument;
pub use error::ProtocolError;
pub use types::{Completion, GameResult, Hint, PlayerId, QrCode};
