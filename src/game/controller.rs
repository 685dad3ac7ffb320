//! Session Controller
//!
//! Owns at most one [`Session`] and drives it through
//! `None -> Running -> Completed -> None` (collect) or `Running -> None`
//! (cancel). Collection moves a [`Settlement`] into a ledger exactly once.
//!
//! Events queue up until [`SessionController::take_events`] drains them.
//! Callers driving the controller directly must drain after each call;
//! [`crate::runtime::SessionDriver`] does so on every operation.

use tracing::{debug, info, warn};

use crate::game::catalog::{CatalogError, Game, GameId};
use crate::game::events::SessionEvent;
use crate::game::state::{Session, SessionId, SessionPhase};
use crate::game::tick::{tick, TickConfig, TickResult};
use crate::ledger::{LedgerError, LedgerStore, SettlementReceipt};

/// A completed session's reward, ready to be credited.
///
/// Not `Clone`: presenting it to a ledger consumes it.
#[must_use = "a settlement must be applied to a ledger or the reward is lost"]
#[derive(Debug, PartialEq, Eq)]
pub struct Settlement {
    session_id: SessionId,
    game_id: GameId,
    amount: u64,
    tick: u64,
}

impl Settlement {
    fn for_session(session: &Session) -> Self {
        Self {
            session_id: session.id,
            game_id: session.game().id.clone(),
            amount: session.game().reward,
            tick: session.ticks(),
        }
    }

    /// Settled session.
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Source game.
    pub fn game_id(&self) -> &GameId {
        &self.game_id
    }

    /// Reward to credit.
    pub fn amount(&self) -> u64 {
        self.amount
    }

    /// Tick at which the session completed.
    pub fn tick(&self) -> u64 {
        self.tick
    }
}

/// What `start` did to the previous session, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartOutcome {
    /// The new session.
    pub session_id: SessionId,
    /// Session discarded without settlement to make room.
    pub replaced: Option<SessionId>,
}

/// Session usage errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// No session is active.
    #[error("No active session")]
    NoActiveSession,

    /// The session already completed.
    #[error("Session is not running")]
    NotRunning,

    /// The session has not completed yet.
    #[error("Session not completed")]
    NotCompleted,

    /// A tick armed for a session that no longer exists.
    #[error("Stale tick for session {0}")]
    StaleTick(SessionId),

    /// The game cannot be played.
    #[error("Invalid game: {0}")]
    InvalidGame(#[from] CatalogError),
}

/// Errors from collecting straight into a ledger.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettlementError {
    /// Collection was not allowed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The ledger refused the credit; the session is kept.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Single-session controller.
#[derive(Debug, Default)]
pub struct SessionController {
    config: TickConfig,
    session: Option<Session>,
    /// Pending events, drained by `take_events`.
    events: Vec<SessionEvent>,
}

impl SessionController {
    /// Create an idle controller.
    pub fn new(config: TickConfig) -> Self {
        Self {
            config,
            session: None,
            events: Vec::new(),
        }
    }

    /// Tick cadence sessions are armed with.
    pub fn tick_config(&self) -> TickConfig {
        self.config
    }

    /// Arm a new session for `game`.
    ///
    /// An existing session, running or completed, is discarded without
    /// settlement.
    pub fn start(&mut self, game: Game) -> Result<StartOutcome, SessionError> {
        let session = Session::new(game, &self.config)?;
        let new_id = session.id;

        let replaced = self.session.take().map(|old| {
            warn!(
                "Session {} ({}) replaced before collection, forfeiting {}",
                old.id.short(),
                old.game().id,
                old.game().reward
            );
            self.events.push(SessionEvent::replaced(
                old.id,
                old.ticks(),
                old.game().id.clone(),
                new_id,
                old.game().reward,
            ));
            old.id
        });

        info!(
            "Session {} started: {} ({}s, reward {})",
            new_id.short(),
            session.game().id,
            session.game().duration_secs,
            session.game().reward
        );
        self.events.push(SessionEvent::started(
            new_id,
            session.game().id.clone(),
            session.game().duration_secs,
            session.game().reward,
        ));
        self.session = Some(session);

        Ok(StartOutcome {
            session_id: new_id,
            replaced,
        })
    }

    /// Deliver one tick to the active session.
    pub fn tick(&mut self) -> Result<TickResult, SessionError> {
        let session = self.session.as_mut().ok_or(SessionError::NoActiveSession)?;
        let result = tick(session)?;

        #[cfg(feature = "debug-tracing")]
        tracing::trace!("Session {} tick {}: {:.1}%", session.id.short(), result.tick, result.progress);

        self.events
            .push(SessionEvent::progressed(session.id, result.tick, result.progress));

        if result.completed {
            info!("Session {} completed after {} ticks", session.id.short(), result.tick);
            self.events.push(SessionEvent::completed(
                session.id,
                result.tick,
                session.game().id.clone(),
                session.game().reward,
            ));
        }

        Ok(result)
    }

    /// Deliver a tick armed for `id`; rejects ticks for discarded sessions.
    pub fn tick_session(&mut self, id: SessionId) -> Result<TickResult, SessionError> {
        match &self.session {
            Some(session) if session.id == id => self.tick(),
            _ => Err(SessionError::StaleTick(id)),
        }
    }

    /// Discard a running session without settlement.
    ///
    /// Returns the discarded id, or `None` when idle.
    pub fn cancel(&mut self) -> Result<Option<SessionId>, SessionError> {
        match self.session.as_ref().map(Session::phase) {
            None => Ok(None),
            Some(SessionPhase::Completed) => Err(SessionError::NotRunning),
            Some(SessionPhase::Running) => {
                let session = self.session.take().ok_or(SessionError::NoActiveSession)?;
                info!(
                    "Session {} cancelled at {:.1}%",
                    session.id.short(),
                    session.progress()
                );
                self.events.push(SessionEvent::cancelled(
                    session.id,
                    session.ticks(),
                    session.game().id.clone(),
                    session.progress(),
                ));
                Ok(Some(session.id))
            }
        }
    }

    /// Collect the completed session's reward into `ledger`.
    ///
    /// Credit and discard happen as one unit. If the ledger refuses the
    /// credit the session stays completed and can be collected again.
    pub fn collect_into<L: LedgerStore>(
        &mut self,
        ledger: &mut L,
    ) -> Result<SettlementReceipt, SettlementError> {
        let settlement = Settlement::for_session(self.completed_session()?);
        let tick = settlement.tick;
        let receipt = ledger.settle(settlement)?;
        self.session = None;
        debug!("Session {} collected", receipt.session_id.short());

        self.events.push(SessionEvent::settled(
            receipt.session_id,
            tick,
            receipt.game_id.clone(),
            receipt.amount,
            receipt.transaction_id,
        ));
        Ok(receipt)
    }

    fn completed_session(&self) -> Result<&Session, SessionError> {
        let session = self.session.as_ref().ok_or(SessionError::NoActiveSession)?;
        if session.phase() != SessionPhase::Completed {
            return Err(SessionError::NotCompleted);
        }
        Ok(session)
    }

    /// Active session, if any.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// True while a session exists.
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Phase of the active session.
    pub fn phase(&self) -> Option<SessionPhase> {
        self.session.as_ref().map(Session::phase)
    }

    /// Progress of the active session, in percent.
    pub fn progress(&self) -> Option<f64> {
        self.session.as_ref().map(Session::progress)
    }

    /// Game of the active session.
    pub fn active_game(&self) -> Option<&Game> {
        self.session.as_ref().map(Session::game)
    }

    /// Drain pending events.
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }
}
