//! Session Tick
//!
//! One fixed-interval progress update. The fill is linear over exactly the
//! game's duration and independent of the reward.

use std::time::Duration;

use crate::game::controller::SessionError;
use crate::game::state::{Session, SessionPhase};
use crate::TICK_INTERVAL_MS;

/// Tick cadence configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickConfig {
    /// Wall-clock time between ticks.
    pub interval: Duration,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(TICK_INTERVAL_MS),
        }
    }
}

impl TickConfig {
    /// Create with a custom interval (clamped to at least 1ms).
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
        }
    }

    /// Interval in whole milliseconds.
    pub fn interval_ms(&self) -> u64 {
        (self.interval.as_millis() as u64).max(1)
    }
}

/// Result of a tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickResult {
    /// Ticks delivered to the session including this one.
    pub tick: u64,
    /// Progress after this tick, in percent.
    pub progress: f64,
    /// Whether this tick completed the session.
    pub completed: bool,
}

/// Advance a running session by one tick.
///
/// Returns [`SessionError::NotRunning`] when the session already completed;
/// the caller's tick source should have halted by then.
pub fn tick(session: &mut Session) -> Result<TickResult, SessionError> {
    if session.phase != SessionPhase::Running {
        return Err(SessionError::NotRunning);
    }

    session.ticks += 1;

    let completed = session.elapsed_covers_duration();
    if completed {
        session.phase = SessionPhase::Completed;
    }

    Ok(TickResult {
        tick: session.ticks,
        progress: session.progress(),
        completed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::catalog::Catalog;
    use proptest::prelude::*;

    fn session_with_duration(secs: u32, interval_ms: u64) -> Session {
        let mut game = Catalog::builtin().games()[0].clone();
        game.duration_secs = secs;
        Session::new(game, &TickConfig::new(Duration::from_millis(interval_ms))).unwrap()
    }

    #[test]
    fn test_fifty_ticks_complete_five_seconds() {
        let mut session = session_with_duration(5, 100);

        for i in 1..50 {
            let result = tick(&mut session).unwrap();
            assert!(!result.completed, "completed early at tick {i}");
            assert!((result.progress - i as f64 * 2.0).abs() < 1e-9);
        }

        let last = tick(&mut session).unwrap();
        assert!(last.completed);
        assert_eq!(last.progress, 100.0);
        assert_eq!(session.phase(), SessionPhase::Completed);
    }

    #[test]
    fn test_tick_after_completion_rejected() {
        let mut session = session_with_duration(1, 100);
        for _ in 0..10 {
            tick(&mut session).unwrap();
        }
        assert!(matches!(tick(&mut session), Err(SessionError::NotRunning)));
        assert_eq!(session.ticks(), 10);
        assert_eq!(session.progress(), 100.0);
    }

    #[test]
    fn test_ten_ticks_is_twenty_percent() {
        let mut session = session_with_duration(5, 100);
        for _ in 0..10 {
            tick(&mut session).unwrap();
        }
        assert!((session.progress() - 20.0).abs() < 1e-9);
        assert_eq!(session.phase(), SessionPhase::Running);
    }

    proptest! {
        #[test]
        fn prop_progress_monotonic_and_exact(secs in 1u32..60, interval_ms in 10u64..1000) {
            let mut session = session_with_duration(secs, interval_ms);
            let steps = session.total_steps();
            let mut last = 0.0;

            for i in 1..=steps {
                let result = tick(&mut session).unwrap();
                prop_assert!(result.progress >= last);
                prop_assert!(result.progress <= 100.0);
                prop_assert_eq!(result.completed, i == steps);
                last = result.progress;
            }

            prop_assert_eq!(session.phase(), SessionPhase::Completed);
            prop_assert_eq!(session.progress(), 100.0);
            prop_assert!(tick(&mut session).is_err());
        }
    }

    #[test]
    fn test_long_session_completes_past_u32_ticks() {
        let mut session = session_with_duration(5_000_000, 1);
        session.ticks = u64::from(u32::MAX) - 1;

        let result = tick(&mut session).unwrap();
        assert_eq!(result.tick, u64::from(u32::MAX));
        assert!(!result.completed);

        session.ticks = 5_000_000_000 - 1;
        let last = tick(&mut session).unwrap();
        assert_eq!(last.tick, 5_000_000_000);
        assert!(last.completed);
        assert_eq!(session.phase(), SessionPhase::Completed);
        assert_eq!(session.progress(), 100.0);
    }
}
