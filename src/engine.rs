//! Per-event game orchestration.
//!
//! [`GameEngine::handle`] is the entry point the chat transport calls for
//! every inbound user action. It validates the action against the
//! session's state machine, applies it, invokes the automated opponent
//! when applicable, and reports the resulting renders to the caller. The
//! whole sequence for one event, bot reply included, runs inside one
//! store critical section.

use crate::ai::{self, Difficulty};
use crate::board::{COLS, Side};
use crate::error::EngineError;
use crate::render::{self, RenderRequest};
use crate::session::{
    MULTI_WIN_REWARD, MessageRef, MultiGame, MultiPhase, Participant, Session, SingleGame,
    TURN_SECONDS, UserId,
};
use crate::services::{AllowAll, ProfileDirectory, RateLimiter, ScoreSink};
use crate::store::{SessionStore, StoreGuard};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument, warn};

/// A user action dispatched by the chat transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Start a single-player game at the given difficulty.
    StartSingle(Difficulty),
    /// Drop a piece in the given column of the actor's single game.
    MoveSingle(usize),
    /// Ask to surrender the actor's single game.
    SurrenderSingle,
    /// Answer the surrender confirmation prompt.
    ConfirmSurrender(bool),
    /// Accept the invitation issued by the given initiator.
    JoinMulti(UserId),
    /// Drop a piece in the given column of the actor's multiplayer game.
    MoveMulti(usize),
    /// Surrender the actor's multiplayer game.
    SurrenderMulti,
    /// Vote for a rematch of the actor's finished multiplayer game.
    RequestRematch,
    /// Open the difficulty menu.
    NewGame,
    /// Return to the main menu.
    MainMenu,
}

/// One inbound action event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionEvent {
    /// Acting identity.
    pub actor: UserId,
    /// Acting identity's display name as the transport saw it.
    pub actor_name: String,
    /// The requested action.
    pub action: Action,
    /// Handle for correlating renders with the originating message.
    pub location: MessageRef,
}

/// What the transport should do after an accepted action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    /// Board/menu renders to apply, in order. The single-player move
    /// handler yields two: the board after the human's move and the board
    /// after the bot's synchronous reply.
    pub renders: Vec<RenderRequest>,
    /// Short message shown only to the acting user.
    pub notice: Option<String>,
}

impl Reply {
    /// Reply carrying one render.
    pub fn render(render: RenderRequest) -> Self {
        Self {
            renders: vec![render],
            notice: None,
        }
    }

    /// Reply carrying several renders.
    pub fn renders(renders: Vec<RenderRequest>) -> Self {
        Self {
            renders,
            notice: None,
        }
    }

    /// Reply carrying only a notice.
    pub fn notice(text: impl Into<String>) -> Self {
        Self {
            renders: Vec::new(),
            notice: Some(text.into()),
        }
    }

    /// Attaches a notice to this reply.
    pub fn with_notice(mut self, text: impl Into<String>) -> Self {
        self.notice = Some(text.into());
        self
    }
}

/// The rules-and-decision engine.
///
/// Holds the session store and the external collaborator seams. Cheap to
/// clone; clones share the same store and collaborators.
#[derive(Clone)]
pub struct GameEngine {
    store: SessionStore,
    profiles: Arc<dyn ProfileDirectory>,
    scores: Arc<dyn ScoreSink>,
    limiter: Arc<dyn RateLimiter>,
}

impl GameEngine {
    /// Creates an engine with no rate limiting.
    pub fn new(profiles: Arc<dyn ProfileDirectory>, scores: Arc<dyn ScoreSink>) -> Self {
        Self {
            store: SessionStore::new(),
            profiles,
            scores,
            limiter: Arc::new(AllowAll),
        }
    }

    /// Replaces the rate limiter collaborator.
    pub fn with_limiter(mut self, limiter: Arc<dyn RateLimiter>) -> Self {
        self.limiter = limiter;
        self
    }

    /// Returns the session store, mainly for inspection in tests.
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Handles one inbound action event.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] for every expected rejection; the
    /// session state is unchanged in that case.
    #[instrument(skip(self, event), fields(actor = event.actor, action = ?event.action))]
    pub fn handle(&self, event: ActionEvent, now: Instant) -> Result<Reply, EngineError> {
        if !self.limiter.allow(event.actor, now) {
            warn!(actor = event.actor, "Action dropped by rate limiter");
            return Ok(Reply::notice(
                "You're sending too many actions, slow down for a moment. 😕",
            ));
        }

        match &event.action {
            Action::StartSingle(difficulty) => self.start_single(&event, *difficulty),
            Action::MoveSingle(col) => self.move_single(&event, *col),
            Action::SurrenderSingle => self.surrender_single(&event),
            Action::ConfirmSurrender(accept) => self.confirm_surrender(&event, *accept),
            Action::JoinMulti(initiator) => self.join_multi(&event, *initiator, now),
            Action::MoveMulti(col) => self.move_multi(&event, *col, now),
            Action::SurrenderMulti => self.surrender_multi(&event),
            Action::RequestRematch => self.request_rematch(&event, now),
            Action::NewGame => self.menu(&event, render::difficulty_menu(event.location.clone())),
            Action::MainMenu => self.menu(&event, render::main_menu(event.location.clone())),
        }
    }

    /// Timer query for a multiplayer session: computes the remaining turn
    /// time, performing the lazy turn flip on expiry, and re-renders.
    ///
    /// Flip and timestamp reset happen atomically under the store lock,
    /// so concurrent stale renders flip at most once per expiry.
    #[instrument(skip(self))]
    pub fn refresh_multi(&self, participant: UserId, now: Instant) -> Result<Reply, EngineError> {
        let mut sessions = self.store.lock();
        let (_, game) = sessions
            .multi_of(participant)
            .ok_or(EngineError::NoActiveSession)?;
        if game.phase != MultiPhase::Playing {
            return Err(EngineError::NoActiveSession);
        }
        game.expire_turn(now);
        let remaining = game.time_remaining(now);
        Ok(Reply::render(render::multi_board(game, remaining)))
    }

    /// Render query for a single-player session.
    #[instrument(skip(self))]
    pub fn refresh_single(&self, actor: UserId) -> Result<Reply, EngineError> {
        let mut sessions = self.store.lock();
        let game = sessions
            .single_mut(actor)
            .ok_or(EngineError::NoActiveSession)?;
        if game.confirming_surrender {
            return Ok(Reply::render(render::single_confirm_surrender(game)));
        }
        Ok(Reply::render(render::single_board(game)))
    }

    fn start_single(
        &self,
        event: &ActionEvent,
        difficulty: Difficulty,
    ) -> Result<Reply, EngineError> {
        let mut sessions = self.store.lock();
        abandon_pending_rematch(&mut sessions, event.actor);
        let player = Participant {
            id: event.actor,
            name: event.actor_name.clone(),
        };
        let game = SingleGame::new(player, difficulty, event.location.clone());
        let request = render::single_board(&game);
        sessions.insert(event.actor, Session::Single(game));
        Ok(Reply::render(request))
    }

    fn move_single(&self, event: &ActionEvent, col: usize) -> Result<Reply, EngineError> {
        if col >= COLS {
            return Err(EngineError::InvalidColumn);
        }
        let mut sessions = self.store.lock();
        let game = sessions
            .single_mut(event.actor)
            .ok_or(EngineError::NoActiveSession)?;
        if game.turn != Side::Blue {
            return Err(EngineError::NotYourTurn);
        }
        // A move while the surrender prompt is up counts as playing on.
        game.confirming_surrender = false;
        game.board.drop(col, Side::Blue)?;

        let mut renders = Vec::new();

        if game.board.has_four_in_a_row(Side::Blue) {
            let points = game.difficulty.reward();
            let location = game.location.clone();
            let (id, name) = (game.player.id, game.player.name.clone());
            info!(id, points, "Human won single game");
            self.scores.credit(id, &name, points);
            sessions.remove(event.actor);
            renders.push(render::single_over(
                location,
                format!("You win! 🎉 You earned {points} points!"),
            ));
            return Ok(Reply::renders(renders));
        }
        if game.board.is_full() {
            let location = game.location.clone();
            sessions.remove(event.actor);
            renders.push(render::single_over(
                location,
                "The game ends in a draw! 🤝".to_string(),
            ));
            return Ok(Reply::renders(renders));
        }

        // The bot replies synchronously within this critical section; no
        // separate bot-turn event exists.
        game.turn = Side::Red;
        renders.push(render::single_board(game));

        match ai::select_move(&game.board, game.difficulty) {
            Some(bot_col) => {
                game.board
                    .drop(bot_col, Side::Red)
                    .expect("bot selects a playable column");
                game.turn = Side::Blue;
                if game.board.has_four_in_a_row(Side::Red) {
                    let location = game.location.clone();
                    info!(actor = event.actor, "Bot won single game");
                    sessions.remove(event.actor);
                    renders.push(render::single_over(
                        location,
                        "The bot wins! 😢".to_string(),
                    ));
                } else if game.board.is_full() {
                    let location = game.location.clone();
                    sessions.remove(event.actor);
                    renders.push(render::single_over(
                        location,
                        "The game ends in a draw! 🤝".to_string(),
                    ));
                } else {
                    renders.push(render::single_board(game));
                }
            }
            None => {
                // Unreachable after the draw check above; guarded anyway.
                let location = game.location.clone();
                sessions.remove(event.actor);
                renders.push(render::single_over(
                    location,
                    "The game ends in a draw! 🤝".to_string(),
                ));
            }
        }
        Ok(Reply::renders(renders))
    }

    fn surrender_single(&self, event: &ActionEvent) -> Result<Reply, EngineError> {
        let mut sessions = self.store.lock();
        let game = sessions
            .single_mut(event.actor)
            .ok_or(EngineError::NoActiveSession)?;
        if game.turn != Side::Blue {
            return Err(EngineError::NotYourTurn);
        }
        game.confirming_surrender = true;
        Ok(Reply::render(render::single_confirm_surrender(game)))
    }

    fn confirm_surrender(&self, event: &ActionEvent, accept: bool) -> Result<Reply, EngineError> {
        let mut sessions = self.store.lock();
        let game = sessions
            .single_mut(event.actor)
            .ok_or(EngineError::NoActiveSession)?;
        if accept && game.confirming_surrender {
            let location = game.location.clone();
            info!(actor = event.actor, "Single game surrendered");
            sessions.remove(event.actor);
            return Ok(Reply::render(render::single_over(
                location,
                "You surrendered! 🏳️".to_string(),
            )));
        }
        game.confirming_surrender = false;
        Ok(Reply::render(render::single_board(game)))
    }

    fn join_multi(
        &self,
        event: &ActionEvent,
        initiator: UserId,
        now: Instant,
    ) -> Result<Reply, EngineError> {
        if event.actor == initiator {
            return Err(EngineError::SelfJoinRejected);
        }
        let initiator_name = self
            .profiles
            .display_name(initiator)
            .ok_or(EngineError::UnknownParticipant)?;
        let joiner_name = self
            .profiles
            .display_name(event.actor)
            .ok_or(EngineError::UnknownParticipant)?;

        let mut sessions = self.store.lock();
        if sessions.get(initiator).is_some() {
            return Ok(Reply::notice("That game has already started."));
        }
        if sessions.multi_key_of(event.actor).is_some() {
            return Ok(Reply::notice("Finish your current game first."));
        }

        let game = MultiGame::new(
            Participant {
                id: initiator,
                name: initiator_name,
            },
            Participant {
                id: event.actor,
                name: joiner_name,
            },
            event.location.clone(),
            now,
        );
        let request = render::multi_board(&game, TURN_SECONDS);
        sessions.insert(initiator, Session::Multi(game));
        Ok(Reply::render(request).with_notice("Game on! 🎮"))
    }

    fn move_multi(&self, event: &ActionEvent, col: usize, now: Instant) -> Result<Reply, EngineError> {
        if col >= COLS {
            return Err(EngineError::InvalidColumn);
        }
        let mut sessions = self.store.lock();
        let (_, game) = sessions
            .multi_of(event.actor)
            .ok_or(EngineError::NoActiveSession)?;
        if game.phase != MultiPhase::Playing {
            return Err(EngineError::NoActiveSession);
        }
        let side = game
            .side_of(event.actor)
            .expect("participant lookup matched this session");
        if game.turn != side {
            return Err(EngineError::NotYourTurn);
        }
        game.board.drop(col, side)?;

        if game.board.has_four_in_a_row(side) {
            let winner = game.player_on(side).clone();
            info!(winner = winner.id, "Multiplayer game won");
            self.scores.credit(winner.id, &winner.name, MULTI_WIN_REWARD);
            game.phase = MultiPhase::RematchPending;
            return Ok(Reply::render(render::multi_over(
                game,
                format!("🎉 {} wins!", winner.name),
            )));
        }
        if game.board.is_full() {
            game.phase = MultiPhase::RematchPending;
            return Ok(Reply::render(render::multi_over(
                game,
                "The game ends in a draw! 🤝".to_string(),
            )));
        }

        game.turn = side.opponent();
        game.last_move = now;
        Ok(Reply::render(render::multi_board(game, TURN_SECONDS)))
    }

    fn surrender_multi(&self, event: &ActionEvent) -> Result<Reply, EngineError> {
        let mut sessions = self.store.lock();
        let (_, game) = sessions
            .multi_of(event.actor)
            .ok_or(EngineError::NoActiveSession)?;
        if game.phase != MultiPhase::Playing {
            return Err(EngineError::NoActiveSession);
        }
        let side = game
            .side_of(event.actor)
            .expect("participant lookup matched this session");
        let quitter = game.player_on(side).name.clone();
        let winner = game.player_on(side.opponent()).name.clone();
        info!(actor = event.actor, "Multiplayer game surrendered");
        game.phase = MultiPhase::RematchPending;
        Ok(Reply::render(render::multi_over(
            game,
            format!("🏳️ {quitter} surrendered!\nWinner: {winner} 🎉"),
        )))
    }

    fn request_rematch(&self, event: &ActionEvent, now: Instant) -> Result<Reply, EngineError> {
        let mut sessions = self.store.lock();
        let (key, game) = sessions
            .multi_of(event.actor)
            .ok_or(EngineError::NoActiveSession)?;
        if game.phase != MultiPhase::RematchPending {
            return Err(EngineError::NoActiveSession);
        }
        if game.vote_rematch(event.actor) {
            let fresh = MultiGame::new(
                game.players[0].clone(),
                game.players[1].clone(),
                game.location.clone(),
                now,
            );
            let request = render::multi_board(&fresh, TURN_SECONDS);
            info!(key, "Rematch agreed, starting fresh game");
            sessions.insert(key, Session::Multi(fresh));
            return Ok(Reply::render(request));
        }
        Ok(Reply::notice("Waiting for your opponent to accept! ⏳"))
    }

    fn menu(&self, event: &ActionEvent, request: RenderRequest) -> Result<Reply, EngineError> {
        let mut sessions = self.store.lock();
        abandon_pending_rematch(&mut sessions, event.actor);
        Ok(Reply::render(request))
    }
}

impl std::fmt::Debug for GameEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameEngine")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

/// Drops a finished multiplayer session `actor` walked away from.
fn abandon_pending_rematch(sessions: &mut StoreGuard<'_>, actor: UserId) {
    let Some(key) = sessions.multi_key_of(actor) else {
        return;
    };
    let pending = matches!(
        sessions.get(key),
        Some(Session::Multi(game)) if game.phase == MultiPhase::RematchPending
    );
    if pending {
        info!(key, actor, "Abandoning finished session");
        sessions.remove(key);
    }
}
