//! Live game sessions for single and multiplayer modes.

use crate::ai::Difficulty;
use crate::board::{Board, Side};
use std::collections::BTreeSet;
use std::time::Instant;
use tracing::{debug, info};

/// Unique identifier for a player.
pub type UserId = i64;

/// Opaque handle to the chat message a session renders into.
pub type MessageRef = String;

/// Seconds each multiplayer participant has to move.
pub const TURN_SECONDS: u64 = 10;

/// Leaderboard points for winning a multiplayer game.
pub const MULTI_WIN_REWARD: u32 = 2;

/// A participant identity/display-name pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    /// Player's unique ID.
    pub id: UserId,
    /// Player's display name.
    pub name: String,
}

/// A single-player game against the bot.
///
/// The human plays [`Side::Blue`], the bot [`Side::Red`]. The bot replies
/// synchronously inside the human's move handling, so `turn` is only ever
/// observed as `Blue` between events.
#[derive(Debug, Clone)]
pub struct SingleGame {
    /// The board.
    pub board: Board,
    /// Whose move is next.
    pub turn: Side,
    /// Bot difficulty tier.
    pub difficulty: Difficulty,
    /// The human player.
    pub player: Participant,
    /// Where to render the board.
    pub location: MessageRef,
    /// Whether a surrender confirmation prompt is outstanding.
    pub confirming_surrender: bool,
}

impl SingleGame {
    /// Creates a fresh game with the human to move.
    pub fn new(player: Participant, difficulty: Difficulty, location: MessageRef) -> Self {
        info!(player_id = player.id, %difficulty, "Creating single-player session");
        Self {
            board: Board::new(),
            turn: Side::Blue,
            difficulty,
            player,
            location,
            confirming_surrender: false,
        }
    }
}

/// Lifecycle phase of a multiplayer session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiPhase {
    /// Game in progress.
    Playing,
    /// Game over; waiting on rematch votes.
    RematchPending,
}

/// A two-player game.
#[derive(Debug, Clone)]
pub struct MultiGame {
    /// The board.
    pub board: Board,
    /// Whose move is next.
    pub turn: Side,
    /// Player one (blue, moves first) and player two (red).
    pub players: [Participant; 2],
    /// Where to render the board.
    pub location: MessageRef,
    /// When the current turn started.
    pub last_move: Instant,
    /// Lifecycle phase.
    pub phase: MultiPhase,
    /// Identities that have voted for a rematch.
    pub rematch_votes: BTreeSet<UserId>,
}

impl MultiGame {
    /// Creates a fresh game with player one to move and the timer reset.
    pub fn new(
        player1: Participant,
        player2: Participant,
        location: MessageRef,
        now: Instant,
    ) -> Self {
        info!(
            player1_id = player1.id,
            player2_id = player2.id,
            "Creating multiplayer session"
        );
        Self {
            board: Board::new(),
            turn: Side::Blue,
            players: [player1, player2],
            location,
            last_move: now,
            phase: MultiPhase::Playing,
            rematch_votes: BTreeSet::new(),
        }
    }

    /// Returns the side `id` plays, if they are in this session.
    pub fn side_of(&self, id: UserId) -> Option<Side> {
        if self.players[0].id == id {
            Some(Side::Blue)
        } else if self.players[1].id == id {
            Some(Side::Red)
        } else {
            None
        }
    }

    /// Checks whether `id` participates in this session.
    pub fn involves(&self, id: UserId) -> bool {
        self.side_of(id).is_some()
    }

    /// Returns the participant playing `side`.
    pub fn player_on(&self, side: Side) -> &Participant {
        match side {
            Side::Blue => &self.players[0],
            Side::Red => &self.players[1],
        }
    }

    /// Seconds left in the current turn, floored at zero.
    pub fn time_remaining(&self, now: Instant) -> u64 {
        let elapsed = now.saturating_duration_since(self.last_move).as_secs();
        TURN_SECONDS.saturating_sub(elapsed)
    }

    /// Flips the turn and resets the timer if the current turn expired.
    ///
    /// Read-and-reset is a single step on `&mut self`, so under the store
    /// lock concurrent renders cannot double-flip on one expiry. Returns
    /// whether a flip happened.
    pub fn expire_turn(&mut self, now: Instant) -> bool {
        if self.phase != MultiPhase::Playing || self.time_remaining(now) > 0 {
            return false;
        }
        self.turn = self.turn.opponent();
        self.last_move = now;
        debug!(turn = ?self.turn, "Turn expired, flipped to other player");
        true
    }

    /// Records a rematch vote; repeated votes by the same identity are
    /// no-ops. Returns true once both participants have voted.
    pub fn vote_rematch(&mut self, id: UserId) -> bool {
        self.rematch_votes.insert(id);
        self.players
            .iter()
            .all(|p| self.rematch_votes.contains(&p.id))
    }
}

/// A live session in the store.
#[derive(Debug, Clone)]
pub enum Session {
    /// Single-player game against the bot.
    Single(SingleGame),
    /// Two-player game.
    Multi(MultiGame),
}

impl Session {
    /// Checks whether `id` participates in this session.
    pub fn involves(&self, id: UserId) -> bool {
        match self {
            Session::Single(game) => game.player.id == id,
            Session::Multi(game) => game.involves(id),
        }
    }
}
