//! Player sessions and level progression for qrquest.
//!
//! This crate handles everything between "a player registers" and "a
//! player finishes":
//!
//! 1. **Session tracking**: who is playing and how much time they have
//!    left ([`SessionManager`], [`SessionStore`])
//! 2. **Progression**: validating scanned codes against the hint
//!    sequence and advancing levels ([`SessionManager::scan`])
//! 3. **Hint configuration**: the hints file and its single owner task
//!    ([`HintBook`])
//!
//! # How it fits in the stack
//!
//! ```text
//! HTTP layer (above)  ← turns scan outcomes into responses, forwards hand-offs
//!     ↕
//! Session layer (this crate)  ← player records, time budgets, levels
//!     ↕
//! Protocol layer (below)  ← PlayerId, Hint, Completion, JsonDocument
//! ```

mod clock;
mod error;
mod hints;
mod manager;
mod session;
mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::SessionError;
pub use hints::HintBook;
pub use manager::{PlayerStatus, Registration, ScanOutcome, SessionManager};
pub use session::{Player, SessionConfig, SessionState};
pub use store::{MemorySessionStore, SessionStore, Update};
