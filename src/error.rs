//! User-visible rejection taxonomy.

use crate::board::ColumnFull;
use derive_more::{Display, Error};

/// Expected, locally handled rejection of an inbound action.
///
/// Every variant is a legal-to-receive request the session state machine
/// refuses; the `Display` text is the message shown to the acting user.
/// None of these corrupt session state or propagate as fatal errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum EngineError {
    /// Column index outside 0–6: a caller contract violation rejected at
    /// the boundary.
    #[display("that column doesn't exist")]
    InvalidColumn,
    /// The targeted column has no empty cell.
    #[display("that column is full, pick another one")]
    ColumnFull,
    /// The acting identity is not the side whose move is next.
    #[display("it's not your turn yet, hang on")]
    NotYourTurn,
    /// The actor has no session matching the requested action.
    #[display("no game in progress, start a new one")]
    NoActiveSession,
    /// A multiplayer join or move by an identity with no known profile.
    #[display("you're not registered yet, start the bot first")]
    UnknownParticipant,
    /// The invitation initiator tried to join their own invitation.
    #[display("you can't play against yourself")]
    SelfJoinRejected,
}

impl From<ColumnFull> for EngineError {
    fn from(_: ColumnFull) -> Self {
        EngineError::ColumnFull
    }
}
