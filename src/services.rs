//! External collaborator seams: profiles, leaderboard, rate limiting.
//!
//! The engine talks to its surroundings through these traits. The
//! in-memory implementations cover tests and standalone use; a deployment
//! backs them with its own persistence.

use crate::session::UserId;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};

/// Looks up whether an identity has a known profile.
///
/// Absence is a rejection of the requested action, not a fatal error.
pub trait ProfileDirectory: Send + Sync {
    /// Returns the display name registered for `id`, if any.
    fn display_name(&self, id: UserId) -> Option<String>;
}

/// Receives leaderboard credit events emitted on wins.
pub trait ScoreSink: Send + Sync {
    /// Credits `points` to `id`, displayed as `name`.
    fn credit(&self, id: UserId, name: &str, points: u32);
}

/// Decides whether an inbound action from `id` may proceed.
///
/// The engine functions correctly when the limiter always allows.
pub trait RateLimiter: Send + Sync {
    /// Returns whether the action is allowed at `now`.
    fn allow(&self, id: UserId, now: Instant) -> bool;
}

/// Rate limiter that allows everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl RateLimiter for AllowAll {
    fn allow(&self, _id: UserId, _now: Instant) -> bool {
        true
    }
}

/// In-memory profile registry.
#[derive(Debug, Default)]
pub struct MemoryProfiles {
    names: Mutex<HashMap<UserId, String>>,
}

impl MemoryProfiles {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers or refreshes a profile.
    #[instrument(skip(self))]
    pub fn register(&self, id: UserId, name: impl Into<String> + std::fmt::Debug) {
        self.names.lock().unwrap().insert(id, name.into());
        debug!(id, "Profile registered");
    }
}

impl ProfileDirectory for MemoryProfiles {
    fn display_name(&self, id: UserId) -> Option<String> {
        self.names.lock().unwrap().get(&id).cloned()
    }
}

/// In-memory leaderboard accumulating points per identity.
#[derive(Debug, Default)]
pub struct MemoryLeaderboard {
    scores: Mutex<HashMap<UserId, (String, u32)>>,
}

impl MemoryLeaderboard {
    /// Creates an empty leaderboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the score credited to `id`, zero when never credited.
    pub fn score_of(&self, id: UserId) -> u32 {
        self.scores
            .lock()
            .unwrap()
            .get(&id)
            .map(|(_, score)| *score)
            .unwrap_or(0)
    }

    /// Returns the top `n` entries as name/score pairs, best first.
    pub fn top(&self, n: usize) -> Vec<(String, u32)> {
        let scores = self.scores.lock().unwrap();
        let mut entries: Vec<_> = scores
            .values()
            .map(|(name, score)| (name.clone(), *score))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries.truncate(n);
        entries
    }
}

impl ScoreSink for MemoryLeaderboard {
    fn credit(&self, id: UserId, name: &str, points: u32) {
        let mut scores = self.scores.lock().unwrap();
        let entry = scores.entry(id).or_insert_with(|| (name.to_string(), 0));
        entry.0 = name.to_string();
        entry.1 += points;
        info!(id, points, total = entry.1, "Leaderboard credit");
    }
}

/// Actions allowed within one burst window before blocking kicks in.
const BURST_LIMIT: u32 = 2;

/// Length of the burst window.
const WINDOW: Duration = Duration::from_secs(1);

/// How long an offender stays blocked.
const BLOCK: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy)]
struct Track {
    count: u32,
    window_start: Instant,
    blocked_until: Option<Instant>,
}

/// Sliding-window rate limiter: more than two actions within a second
/// blocks the identity for thirty seconds.
#[derive(Debug, Default)]
pub struct WindowLimiter {
    tracks: Mutex<HashMap<UserId, Track>>,
}

impl WindowLimiter {
    /// Creates an empty limiter.
    pub fn new() -> Self {
        Self::default()
    }
}

impl RateLimiter for WindowLimiter {
    fn allow(&self, id: UserId, now: Instant) -> bool {
        let mut tracks = self.tracks.lock().unwrap();
        let track = tracks.entry(id).or_insert(Track {
            count: 0,
            window_start: now,
            blocked_until: None,
        });

        if let Some(until) = track.blocked_until {
            if now < until {
                debug!(id, "Action blocked by rate limiter");
                return false;
            }
            track.blocked_until = None;
        }

        if now.saturating_duration_since(track.window_start) > WINDOW {
            track.count = 0;
            track.window_start = now;
        }

        track.count += 1;
        if track.count > BURST_LIMIT {
            track.blocked_until = Some(now + BLOCK);
            debug!(id, "Burst limit exceeded, blocking");
            return false;
        }
        true
    }
}
