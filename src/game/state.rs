//! Session State Definitions
//!
//! The mutable state of a single play-through.
//! Progress is derived from an integer tick count so completion lands on an
//! exact tick with no accumulated floating-point error.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::catalog::{CatalogError, Game};
use crate::game::tick::TickConfig;

// =============================================================================
// SESSION ID
// =============================================================================

/// Unique session identifier (UUID v4).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub uuid::Uuid);

impl SessionId {
    /// Generate a fresh random id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Short prefix for log lines.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// PHASE
// =============================================================================

/// Session phase. `Completed` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Progress is advancing.
    Running,
    /// Progress reached 100; waiting for collection.
    Completed,
}

// =============================================================================
// SESSION
// =============================================================================

/// One in-progress or just-finished play-through.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    /// Unique identifier.
    pub id: SessionId,
    /// The game being played (read-only for the session's lifetime).
    game: Game,
    /// Ticks delivered so far.
    pub(crate) ticks: u64,
    /// Tick interval the session was armed with.
    tick_interval_ms: u64,
    /// Current phase.
    pub(crate) phase: SessionPhase,
}

impl Session {
    /// Create a running session at 0% progress.
    pub fn new(game: Game, config: &TickConfig) -> Result<Self, CatalogError> {
        game.validate()?;
        Ok(Self {
            id: SessionId::generate(),
            game,
            ticks: 0,
            tick_interval_ms: config.interval_ms(),
            phase: SessionPhase::Running,
        })
    }

    /// The game bound to this session.
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Current phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Ticks delivered so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Total play time in milliseconds.
    pub fn duration_ms(&self) -> u64 {
        u64::from(self.game.duration_secs) * 1000
    }

    /// Simulated elapsed time in milliseconds.
    pub fn elapsed_ms(&self) -> u64 {
        self.ticks.saturating_mul(self.tick_interval_ms)
    }

    /// Number of ticks needed to fill the bar.
    pub fn total_steps(&self) -> u64 {
        self.duration_ms().div_ceil(self.tick_interval_ms.max(1)).max(1)
    }

    /// True once the simulated elapsed time covers the game duration.
    pub(crate) fn elapsed_covers_duration(&self) -> bool {
        self.elapsed_ms() >= self.duration_ms()
    }

    /// Progress in percent, clamped to `[0, 100]`.
    pub fn progress(&self) -> f64 {
        if self.phase == SessionPhase::Completed {
            return 100.0;
        }
        let pct = self.elapsed_ms() as f64 * 100.0 / self.duration_ms() as f64;
        pct.min(100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::catalog::Catalog;
    use std::time::Duration;

    fn five_second_game() -> Game {
        let mut game = Catalog::builtin().games()[0].clone();
        game.duration_secs = 5;
        game
    }

    #[test]
    fn test_new_session_starts_at_zero() {
        let session = Session::new(five_second_game(), &TickConfig::default()).unwrap();
        assert_eq!(session.phase(), SessionPhase::Running);
        assert_eq!(session.progress(), 0.0);
        assert_eq!(session.total_steps(), 50);
    }

    #[test]
    fn test_uneven_interval_rounds_steps_up() {
        let config = TickConfig::new(Duration::from_millis(300));
        let session = Session::new(five_second_game(), &config).unwrap();
        // 5000 / 300 = 16.67, the bar fills on the 17th tick
        assert_eq!(session.total_steps(), 17);
    }

    #[test]
    fn test_session_ids_unique() {
        let a = Session::new(five_second_game(), &TickConfig::default()).unwrap();
        let b = Session::new(five_second_game(), &TickConfig::default()).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(a.id.short().len(), 8);
    }

    #[test]
    fn test_zero_duration_rejected() {
        let mut game = five_second_game();
        game.duration_secs = 0;
        assert!(Session::new(game, &TickConfig::default()).is_err());
    }

    #[test]
    fn test_step_count_beyond_u32() {
        let mut game = five_second_game();
        game.duration_secs = 5_000_000;
        let config = TickConfig::new(Duration::from_millis(1));
        let mut session = Session::new(game, &config).unwrap();
        assert_eq!(session.total_steps(), 5_000_000_000);

        session.ticks = session.total_steps() - 1;
        assert_eq!(session.phase(), SessionPhase::Running);
        assert!(session.progress() < 100.0);
        session.ticks += 1;
        assert!(session.elapsed_covers_duration());
    }
}
