//! Session Events
//!
//! Events emitted by the session controller for display collaborators and logs.

use serde::{Deserialize, Serialize};

use crate::game::catalog::GameId;
use crate::game::state::SessionId;

/// Session event data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEventData {
    /// A session was armed for a game.
    Started {
        game_id: GameId,
        duration_secs: u32,
        reward: u64,
    },

    /// Progress advanced.
    Progressed {
        progress: f64,
    },

    /// Progress reached 100; the reward is ready to collect.
    Completed {
        game_id: GameId,
        reward: u64,
    },

    /// Running session discarded by the caller.
    Cancelled {
        game_id: GameId,
        progress: f64,
    },

    /// Session discarded because another game was started.
    Replaced {
        game_id: GameId,
        replaced_by: SessionId,
        forfeited_reward: u64,
    },

    /// Reward credited to the ledger.
    Settled {
        game_id: GameId,
        amount: u64,
        transaction_id: uuid::Uuid,
    },
}

/// A session event with the tick at which it occurred.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionEvent {
    /// Session the event belongs to.
    pub session_id: SessionId,

    /// Ticks delivered to the session when the event fired.
    pub tick: u64,

    /// Event data.
    pub data: SessionEventData,
}

impl SessionEvent {
    /// Create a new event.
    pub fn new(session_id: SessionId, tick: u64, data: SessionEventData) -> Self {
        Self {
            session_id,
            tick,
            data,
        }
    }

    /// Create session started event.
    pub fn started(session_id: SessionId, game_id: GameId, duration_secs: u32, reward: u64) -> Self {
        Self::new(
            session_id,
            0,
            SessionEventData::Started {
                game_id,
                duration_secs,
                reward,
            },
        )
    }

    /// Create progress event.
    pub fn progressed(session_id: SessionId, tick: u64, progress: f64) -> Self {
        Self::new(session_id, tick, SessionEventData::Progressed { progress })
    }

    /// Create session completed event.
    pub fn completed(session_id: SessionId, tick: u64, game_id: GameId, reward: u64) -> Self {
        Self::new(session_id, tick, SessionEventData::Completed { game_id, reward })
    }

    /// Create session cancelled event.
    pub fn cancelled(session_id: SessionId, tick: u64, game_id: GameId, progress: f64) -> Self {
        Self::new(session_id, tick, SessionEventData::Cancelled { game_id, progress })
    }

    /// Create session replaced event.
    pub fn replaced(
        session_id: SessionId,
        tick: u64,
        game_id: GameId,
        replaced_by: SessionId,
        forfeited_reward: u64,
    ) -> Self {
        Self::new(
            session_id,
            tick,
            SessionEventData::Replaced {
                game_id,
                replaced_by,
                forfeited_reward,
            },
        )
    }

    /// Create reward settled event.
    pub fn settled(
        session_id: SessionId,
        tick: u64,
        game_id: GameId,
        amount: u64,
        transaction_id: uuid::Uuid,
    ) -> Self {
        Self::new(
            session_id,
            tick,
            SessionEventData::Settled {
                game_id,
                amount,
                transaction_id,
            },
        )
    }

    /// True for events that end a session's lifetime.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.data,
            SessionEventData::Cancelled { .. }
                | SessionEventData::Replaced { .. }
                | SessionEventData::Settled { .. }
        )
    }
}
