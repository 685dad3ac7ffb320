//! Session Driver
//!
//! Runs the session controller on the wall clock. The driver owns the tick
//! task for the active session and tears it down on completion, cancel,
//! replacement, collection and drop.

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, instrument, warn};

use crate::game::catalog::Game;
use crate::game::controller::{SessionController, SessionError, SettlementError, StartOutcome};
use crate::game::events::SessionEvent;
use crate::game::state::{SessionId, SessionPhase};
use crate::game::tick::TickConfig;
use crate::ledger::{LedgerStore, SettlementReceipt};
use crate::runtime::scheduler::{TickFlow, TickTask};

/// Capacity of the event broadcast channel.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Read-only view of the active session for display collaborators.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionView {
    /// Session id.
    pub session_id: SessionId,
    /// Game being played.
    pub game: Game,
    /// Progress in percent.
    pub progress: f64,
    /// Current phase.
    pub phase: SessionPhase,
}

/// Drives one session at a time on a tokio runtime.
pub struct SessionDriver {
    controller: Arc<RwLock<SessionController>>,
    ticker: Option<TickTask>,
    events_tx: broadcast::Sender<SessionEvent>,
}

impl SessionDriver {
    /// Create an idle driver.
    pub fn new(config: TickConfig) -> Self {
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Self {
            controller: Arc::new(RwLock::new(SessionController::new(config))),
            ticker: None,
            events_tx,
        }
    }

    /// Subscribe to session events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events_tx.subscribe()
    }

    /// Shared handle to the controller, for read-only display.
    pub fn controller(&self) -> Arc<RwLock<SessionController>> {
        Arc::clone(&self.controller)
    }

    /// Start `game`, replacing any active session, and arm its tick task.
    #[instrument(skip(self, game), fields(game_id = %game.id))]
    pub async fn start(&mut self, game: Game) -> Result<StartOutcome, SessionError> {
        game.validate()?;

        let controller = Arc::clone(&self.controller);
        let mut guard = controller.write().await;

        // Old loop goes first so it cannot tick the replacement.
        self.stop_ticker();

        let outcome = guard.start(game)?;
        let period = guard.tick_config().interval;
        self.publish(guard.take_events());
        drop(guard);

        self.ticker = Some(self.arm(outcome.session_id, period));
        Ok(outcome)
    }

    /// Cancel the running session, if any.
    #[instrument(skip(self))]
    pub async fn cancel(&mut self) -> Result<Option<SessionId>, SessionError> {
        let controller = Arc::clone(&self.controller);
        let mut guard = controller.write().await;

        let cancelled = guard.cancel()?;
        if cancelled.is_some() {
            self.stop_ticker();
        }
        self.publish(guard.take_events());
        Ok(cancelled)
    }

    /// Collect and credit `ledger` as one unit.
    #[instrument(skip(self, ledger))]
    pub async fn collect_into<L: LedgerStore>(
        &mut self,
        ledger: &mut L,
    ) -> Result<SettlementReceipt, SettlementError> {
        let controller = Arc::clone(&self.controller);
        let mut guard = controller.write().await;

        let receipt = guard.collect_into(ledger)?;
        self.stop_ticker();
        self.publish(guard.take_events());
        Ok(receipt)
    }

    /// Snapshot of the active session.
    pub async fn view(&self) -> Option<SessionView> {
        let controller = self.controller.read().await;
        controller.session().map(|s| SessionView {
            session_id: s.id,
            game: s.game().clone(),
            progress: s.progress(),
            phase: s.phase(),
        })
    }

    /// Phase of the active session.
    pub async fn phase(&self) -> Option<SessionPhase> {
        self.controller.read().await.phase()
    }

    /// Progress of the active session, in percent.
    pub async fn progress(&self) -> Option<f64> {
        self.controller.read().await.progress()
    }

    /// True while a tick loop is alive.
    pub fn is_ticking(&self) -> bool {
        self.ticker.as_ref().is_some_and(|t| !t.is_finished())
    }

    fn arm(&self, session_id: SessionId, period: std::time::Duration) -> TickTask {
        let controller = Arc::clone(&self.controller);
        let events_tx = self.events_tx.clone();

        TickTask::spawn(period, move || {
            let controller = Arc::clone(&controller);
            let events_tx = events_tx.clone();
            async move {
                let mut controller = controller.write().await;
                let flow = match controller.tick_session(session_id) {
                    Ok(result) if result.completed => TickFlow::Stop,
                    Ok(_) => TickFlow::Continue,
                    Err(e) => {
                        debug!("Tick loop for {} stopping: {}", session_id.short(), e);
                        TickFlow::Stop
                    }
                };
                for event in controller.take_events() {
                    let _ = events_tx.send(event);
                }
                flow
            }
        })
    }

    fn stop_ticker(&mut self) {
        if let Some(mut ticker) = self.ticker.take() {
            ticker.cancel();
        }
    }

    fn publish(&self, events: Vec<SessionEvent>) {
        for event in events {
            let _ = self.events_tx.send(event);
        }
    }
}

/// Next event from a subscription, skipping over any it fell behind on.
///
/// Returns `None` once the driver is gone.
pub async fn next_event(events: &mut broadcast::Receiver<SessionEvent>) -> Option<SessionEvent> {
    loop {
        match events.recv().await {
            Ok(event) => return Some(event),
            Err(RecvError::Lagged(skipped)) => {
                warn!("Event subscriber lagged, skipped {} events", skipped);
            }
            Err(RecvError::Closed) => return None,
        }
    }
}

impl Default for SessionDriver {
    fn default() -> Self {
        Self::new(TickConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::game::catalog::Catalog;
    use crate::game::events::SessionEventData;
    use crate::ledger::{RewardLedger, UserStats};

    fn game(duration_secs: u32, reward: u64) -> Game {
        let mut game = Catalog::builtin().games()[0].clone();
        game.duration_secs = duration_secs;
        game.reward = reward;
        game
    }

    async fn sleep_ms(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_completes_after_duration() {
        let mut driver = SessionDriver::default();
        driver.start(game(5, 100)).await.unwrap();

        sleep_ms(4_950).await;
        assert_eq!(driver.phase().await, Some(SessionPhase::Running));
        assert!(driver.is_ticking());

        sleep_ms(100).await;
        assert_eq!(driver.phase().await, Some(SessionPhase::Completed));
        assert_eq!(driver.progress().await, Some(100.0));
        assert!(!driver.is_ticking());
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_ticks_after_completion() {
        let mut driver = SessionDriver::default();
        driver.start(game(1, 10)).await.unwrap();

        sleep_ms(5_000).await;
        let view = driver.view().await.unwrap();
        assert_eq!(view.phase, SessionPhase::Completed);

        let controller = driver.controller();
        assert_eq!(controller.read().await.session().unwrap().ticks(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_collect_settles_once() {
        let mut driver = SessionDriver::default();
        let mut ledger = RewardLedger::new(UserStats::demo());

        driver.start(game(5, 100)).await.unwrap();
        sleep_ms(5_050).await;

        let receipt = driver.collect_into(&mut ledger).await.unwrap();
        assert_eq!(receipt.amount, 100);
        assert_eq!(ledger.stats().balance, 93_600);
        assert!(driver.view().await.is_none());

        assert!(driver.collect_into(&mut ledger).await.is_err());
        assert_eq!(ledger.stats().balance, 93_600);
    }

    #[tokio::test(start_paused = true)]
    async fn test_early_collect_rejected() {
        let mut driver = SessionDriver::default();
        let mut ledger = RewardLedger::new(UserStats::demo());

        driver.start(game(5, 100)).await.unwrap();
        sleep_ms(1_050).await;

        let err = driver.collect_into(&mut ledger).await.unwrap_err();
        assert_eq!(err, SettlementError::Session(SessionError::NotCompleted));
        assert_eq!(ledger.stats(), UserStats::demo());
        assert!(driver.is_ticking());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_ticking() {
        let mut driver = SessionDriver::default();
        driver.start(game(5, 100)).await.unwrap();
        sleep_ms(1_000).await;

        assert!(driver.cancel().await.unwrap().is_some());
        assert!(!driver.is_ticking());

        sleep_ms(10_000).await;
        assert!(driver.view().await.is_none());
        assert_eq!(driver.cancel().await, Ok(None));
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_rearms_ticker() {
        let mut driver = SessionDriver::default();
        let first = driver.start(game(1, 10)).await.unwrap();
        sleep_ms(500).await;

        let second = driver.start(game(1, 20)).await.unwrap();
        assert_eq!(second.replaced, Some(first.session_id));

        sleep_ms(450).await;
        let progress = driver.progress().await.unwrap();
        assert!((progress - 40.0).abs() < 1e-9, "progress was {progress}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_aborts_tick_task() {
        let mut driver = SessionDriver::default();
        driver.start(game(5, 10)).await.unwrap();
        let controller = driver.controller();

        sleep_ms(1_050).await;
        drop(driver);
        let ticks = controller.read().await.session().unwrap().ticks();

        sleep_ms(2_000).await;
        assert_eq!(controller.read().await.session().unwrap().ticks(), ticks);
    }

    #[tokio::test(start_paused = true)]
    async fn test_events_broadcast() {
        let mut driver = SessionDriver::default();
        let mut rx = driver.subscribe();

        driver.start(game(1, 10)).await.unwrap();
        sleep_ms(1_050).await;

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }

        assert!(matches!(events[0].data, SessionEventData::Started { .. }));
        assert!(matches!(events.last().unwrap().data, SessionEventData::Completed { reward: 10, .. }));
        assert_eq!(events.len(), 12);
    }

    #[tokio::test(start_paused = true)]
    async fn test_lagging_subscriber_still_sees_completion() {
        let mut driver = SessionDriver::default();
        let mut events = driver.subscribe();
        driver.start(game(30, 10)).await.unwrap();

        // 300 progress events overflow the channel before anyone reads.
        sleep_ms(30_100).await;
        assert_eq!(driver.phase().await, Some(SessionPhase::Completed));

        let mut completed = false;
        while let Some(event) = next_event(&mut events).await {
            if matches!(event.data, SessionEventData::Completed { reward: 10, .. }) {
                completed = true;
                break;
            }
        }
        assert!(completed);
    }

    #[tokio::test]
    async fn test_next_event_ends_when_driver_dropped() {
        let driver = SessionDriver::default();
        let mut events = driver.subscribe();
        drop(driver);
        assert!(next_event(&mut events).await.is_none());
    }
}
