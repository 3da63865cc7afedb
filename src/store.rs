//! Authoritative table of live sessions.

use crate::session::{MultiGame, Session, SingleGame, UserId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, instrument, warn};

/// Shared, concurrently-accessed table of live sessions.
///
/// Sessions are keyed by the initiating player's identity. A single mutex
/// guards the whole table; [`SessionStore::lock`] hands out a guard so
/// every validate/mutate/delete sequence for an event runs as one
/// critical section. Two events on the same session serialize; the bot's
/// synchronous reply completes before the guard drops.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<UserId, Session>>>,
}

impl SessionStore {
    /// Creates an empty store.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating session store");
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Locks the table for one event's read-modify-write sequence.
    pub fn lock(&self) -> StoreGuard<'_> {
        StoreGuard {
            sessions: self.sessions.lock().unwrap(),
        }
    }
}

/// Exclusive access to the session table for the duration of one event.
#[derive(Debug)]
pub struct StoreGuard<'a> {
    sessions: MutexGuard<'a, HashMap<UserId, Session>>,
}

impl StoreGuard<'_> {
    /// Returns the session stored under `key`.
    pub fn get(&self, key: UserId) -> Option<&Session> {
        self.sessions.get(&key)
    }

    /// Returns the session stored under `key` for mutation.
    pub fn get_mut(&mut self, key: UserId) -> Option<&mut Session> {
        self.sessions.get_mut(&key)
    }

    /// Returns the single-player game keyed by `key`, if any.
    pub fn single_mut(&mut self, key: UserId) -> Option<&mut SingleGame> {
        match self.sessions.get_mut(&key) {
            Some(Session::Single(game)) => Some(game),
            _ => None,
        }
    }

    /// Finds the key of the multiplayer session `participant` is in.
    ///
    /// A participant identity appears in at most one active multiplayer
    /// session, so the first hit is the only one.
    pub fn multi_key_of(&self, participant: UserId) -> Option<UserId> {
        self.sessions.iter().find_map(|(&key, session)| match session {
            Session::Multi(game) if game.involves(participant) => Some(key),
            _ => None,
        })
    }

    /// Returns the multiplayer game `participant` is in, with its key.
    pub fn multi_of(&mut self, participant: UserId) -> Option<(UserId, &mut MultiGame)> {
        let key = self.multi_key_of(participant)?;
        match self.sessions.get_mut(&key) {
            Some(Session::Multi(game)) => Some((key, game)),
            _ => None,
        }
    }

    /// Inserts or replaces the session under `key`.
    pub fn insert(&mut self, key: UserId, session: Session) {
        if self.sessions.insert(key, session).is_some() {
            warn!(key, "Replaced an existing session");
        } else {
            debug!(key, "Session inserted");
        }
    }

    /// Removes the session under `key`.
    pub fn remove(&mut self, key: UserId) -> Option<Session> {
        let removed = self.sessions.remove(&key);
        if removed.is_some() {
            info!(key, "Session removed");
        }
        removed
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Checks whether the store holds no sessions.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
