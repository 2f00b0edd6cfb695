//! Where player records live.
//!
//! [`SessionStore`] is the contract between the session manager and its
//! storage. Every mutation of a single player goes through
//! [`SessionStore::update`], which runs the caller's closure while the
//! store holds the record exclusively. The closure sees the record, checks
//! it (time left, expected code), and mutates or evicts it in one step, so
//! two scans for the same player can't interleave between the check and
//! the write.
//!
//! [`MemorySessionStore`] is the in-process implementation. A store shared
//! by several server instances would implement the same trait.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use qrquest_protocol::PlayerId;

use crate::{Player, SessionError};

/// What to do with a record after [`SessionStore::update`] looked at it.
#[derive(Debug)]
pub enum Update<R> {
    /// Keep the (possibly modified) record.
    Keep(R),
    /// Delete the record.
    Evict(R),
}

/// Storage for player records.
///
/// Methods are synchronous on purpose: the closure passed to `update` runs
/// under the store's lock, and nothing in it may wait on I/O.
pub trait SessionStore: Send + Sync + 'static {
    /// Returns a copy of the record, if present.
    fn get(&self, id: &PlayerId) -> Option<Player>;

    /// Inserts a new record.
    ///
    /// The uniqueness checks and the insert are one atomic step.
    ///
    /// # Errors
    /// - [`SessionError::DuplicateId`] if the id is taken
    /// - [`SessionError::DuplicatePlayer`] if a stored record has the same
    ///   name and family name
    fn insert(&self, player: Player) -> Result<(), SessionError>;

    /// Deletes a record, returning it if it existed.
    fn remove(&self, id: &PlayerId) -> Option<Player>;

    /// Runs `f` on the record with exclusive access and applies its
    /// decision. Returns `None` if there is no such record.
    fn update<R, F>(&self, id: &PlayerId, f: F) -> Option<R>
    where
        F: FnOnce(&mut Player) -> Update<R>;

    /// Deletes every record for which `keep` returns `false` and returns
    /// copies of the ones that remain.
    fn retain<F>(&self, keep: F) -> Vec<Player>
    where
        F: FnMut(&Player) -> bool;

    /// Number of stored records.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-local [`SessionStore`] backed by a `HashMap` behind a mutex.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    players: Mutex<HashMap<PlayerId, Player>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A panic while holding the lock can't leave a record half-written
    /// (closures mutate plain fields), so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, HashMap<PlayerId, Player>> {
        self.players.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, id: &PlayerId) -> Option<Player> {
        self.lock().get(id).cloned()
    }

    fn insert(&self, player: Player) -> Result<(), SessionError> {
        let mut players = self.lock();

        if players.contains_key(&player.id) {
            return Err(SessionError::DuplicateId(player.id));
        }
        if players
            .values()
            .any(|p| p.has_name(&player.name, &player.family_name))
        {
            return Err(SessionError::DuplicatePlayer {
                name: player.name,
                family_name: player.family_name,
            });
        }

        players.insert(player.id.clone(), player);
        Ok(())
    }

    fn remove(&self, id: &PlayerId) -> Option<Player> {
        self.lock().remove(id)
    }

    fn update<R, F>(&self, id: &PlayerId, f: F) -> Option<R>
    where
        F: FnOnce(&mut Player) -> Update<R>,
    {
        let mut players = self.lock();
        let player = players.get_mut(id)?;
        match f(player) {
            Update::Keep(r) => Some(r),
            Update::Evict(r) => {
                players.remove(id);
                Some(r)
            }
        }
    }

    fn retain<F>(&self, mut keep: F) -> Vec<Player>
    where
        F: FnMut(&Player) -> bool,
    {
        let mut players = self.lock();
        players.retain(|_, p| keep(p));
        players.values().cloned().collect()
    }

    fn len(&self) -> usize {
        self.lock().len()
    }
}
