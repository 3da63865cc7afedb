//! Four in a Row - rules and decision engine for a chat-based game
//!
//! This library is the game core behind a chat bot: a 7×7 Connect Four
//! played single-player against an automated opponent or between two
//! users. The chat transport, persistence, and process bootstrap live
//! outside and talk to the engine through small contracts.
//!
//! # Architecture
//!
//! - **Board**: grid state, gravity drops, win/draw queries
//! - **AI**: difficulty-tiered move selection, depth-limited minimax
//! - **Session**: live single/multi games with turn timers and rematch votes
//! - **Store**: the shared session table, one critical section per event
//! - **Engine**: per-event orchestration, synchronous bot replies
//! - **Render**: board/menu render requests for the transport to apply
//! - **Services**: profile, leaderboard, and rate-limit collaborator seams
//!
//! # Example
//!
//! ```
//! use four_in_a_row::{
//!     Action, ActionEvent, Difficulty, GameEngine, MemoryLeaderboard, MemoryProfiles,
//! };
//! use std::sync::Arc;
//! use std::time::Instant;
//!
//! let engine = GameEngine::new(
//!     Arc::new(MemoryProfiles::new()),
//!     Arc::new(MemoryLeaderboard::new()),
//! );
//! let reply = engine
//!     .handle(
//!         ActionEvent {
//!             actor: 1,
//!             actor_name: "Alice".to_string(),
//!             action: Action::StartSingle(Difficulty::Easy),
//!             location: "msg-1".to_string(),
//!         },
//!         Instant::now(),
//!     )
//!     .unwrap();
//! assert_eq!(reply.renders.len(), 1);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod ai;
mod board;
mod engine;
mod error;
mod render;
mod services;
mod session;
mod store;

// Crate-level exports - board model
pub use board::{Board, COLS, Cell, ColumnFull, ROWS, Side, WIN_LEN};

// Crate-level exports - automated opponent
pub use ai::{Difficulty, select_move};

// Crate-level exports - sessions
pub use session::{
    MULTI_WIN_REWARD, MessageRef, MultiGame, MultiPhase, Participant, Session, SingleGame,
    TURN_SECONDS, UserId,
};

// Crate-level exports - session store
pub use store::{SessionStore, StoreGuard};

// Crate-level exports - orchestration
pub use engine::{Action, ActionEvent, GameEngine, Reply};

// Crate-level exports - rendering
pub use render::{ActionButton, RenderRequest, board_rows};

// Crate-level exports - collaborator seams
pub use services::{
    AllowAll, MemoryLeaderboard, MemoryProfiles, ProfileDirectory, RateLimiter, ScoreSink,
    WindowLimiter,
};

// Crate-level exports - error taxonomy
pub use error::EngineError;
