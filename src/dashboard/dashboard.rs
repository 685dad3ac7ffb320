//! Dashboard
//!
//! Explicit owner of the session store and the ledger store, injected into
//! whatever presentation layer renders them. Collecting a reward goes
//! through here so session discard and ledger credit happen together.

use std::collections::BTreeMap;

use thiserror::Error;
use tokio::sync::broadcast;
use tracing::info;

use crate::config::{AppConfig, ConfigError};
use crate::dashboard::display::{format_amount, stat_cards, ChartPoint, StatCard};
use crate::dashboard::panel::ConfigPanel;
use crate::dashboard::profile::UserProfile;
use crate::game::catalog::{Catalog, CatalogError, Game, GameId, ALL_CATEGORY};
use crate::game::controller::{SessionError, SettlementError, StartOutcome};
use crate::game::events::SessionEvent;
use crate::game::state::SessionId;
use crate::ledger::{
    LedgerError, LedgerStore, RewardLedger, SettlementReceipt, Transaction, TransactionKind,
    UserStats, WithdrawalProvider,
};
use crate::runtime::driver::{SessionDriver, SessionView};

/// Dashboard errors.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Configuration problem.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Catalog lookup failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Session usage error.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Collection failed.
    #[error(transparent)]
    Settlement(#[from] SettlementError),

    /// Ledger refused the operation.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// The rewards dashboard.
pub struct Dashboard {
    catalog: Catalog,
    driver: SessionDriver,
    ledger: RewardLedger,
    profile: UserProfile,
    panel: ConfigPanel,
    currency: String,
    weekly_earnings: Vec<ChartPoint>,
    selected_category: String,
}

impl Dashboard {
    /// Build from configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, DashboardError> {
        config.validate()?;
        let catalog = config.catalog()?;

        info!(
            "Dashboard ready: {} games, tick {}ms, currency {}",
            catalog.len(),
            config.tick_interval_ms,
            config.currency
        );

        Ok(Self {
            catalog,
            driver: SessionDriver::new(config.tick_config()),
            ledger: RewardLedger::new(config.initial_stats)
                .with_min_withdrawal(config.min_withdrawal),
            profile: config.profile.clone(),
            panel: ConfigPanel::new(config.server.clone(), config.save_latency()),
            currency: config.currency.clone(),
            weekly_earnings: config.weekly_earnings.clone(),
            selected_category: ALL_CATEGORY.to_string(),
        })
    }

    // -------------------------------------------------------------------------
    // Catalog
    // -------------------------------------------------------------------------

    /// The game catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Category filter labels.
    pub fn categories(&self) -> Vec<String> {
        self.catalog.categories()
    }

    /// Change the category filter.
    pub fn select_category(&mut self, category: impl Into<String>) {
        self.selected_category = category.into();
    }

    /// Active category filter.
    pub fn selected_category(&self) -> &str {
        &self.selected_category
    }

    /// Games under the active filter.
    pub fn visible_games(&self) -> Vec<&Game> {
        self.catalog.in_category(&self.selected_category).collect()
    }

    // -------------------------------------------------------------------------
    // Sessions
    // -------------------------------------------------------------------------

    /// Start playing a catalog game.
    pub async fn play(&mut self, game_id: &GameId) -> Result<StartOutcome, DashboardError> {
        let game = self.catalog.get(game_id)?.clone();
        Ok(self.driver.start(game).await?)
    }

    /// Close the running game without reward.
    pub async fn cancel_game(&mut self) -> Result<Option<SessionId>, DashboardError> {
        Ok(self.driver.cancel().await?)
    }

    /// Collect the completed game's reward into the ledger.
    pub async fn collect(&mut self) -> Result<SettlementReceipt, DashboardError> {
        Ok(self.driver.collect_into(&mut self.ledger).await?)
    }

    /// The session in progress, if any.
    pub async fn active_session(&self) -> Option<SessionView> {
        self.driver.view().await
    }

    /// Subscribe to session events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.driver.subscribe()
    }

    // -------------------------------------------------------------------------
    // Wallet
    // -------------------------------------------------------------------------

    /// Current aggregates.
    pub fn stats(&self) -> UserStats {
        self.ledger.stats()
    }

    /// Headline stat cards.
    pub fn stat_cards(&self) -> Vec<StatCard> {
        stat_cards(&self.ledger.stats(), &self.currency)
    }

    /// Display currency.
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Format an amount in the configured currency.
    pub fn format_amount(&self, amount: u64) -> String {
        format_amount(amount, &self.currency)
    }

    /// Submit a withdrawal request; returns its transaction id.
    pub fn request_withdrawal(
        &mut self,
        amount: u64,
        provider: WithdrawalProvider,
    ) -> Result<uuid::Uuid, DashboardError> {
        Ok(self.ledger.request_withdrawal(amount, provider)?.id)
    }

    /// Sum of pending withdrawal requests.
    pub fn pending_withdrawals(&self) -> u64 {
        self.ledger.pending_withdrawals()
    }

    /// Transaction history, newest first.
    pub fn history(&self) -> impl Iterator<Item = &Transaction> {
        self.ledger.transactions()
    }

    /// Settled rewards grouped by game category, in catalog order.
    pub fn earnings_by_category(&self) -> Vec<ChartPoint> {
        let mut totals: BTreeMap<String, u64> = BTreeMap::new();
        for tx in self.ledger.transactions() {
            if tx.kind != TransactionKind::GameReward {
                continue;
            }
            let category = tx
                .game_id
                .as_ref()
                .and_then(|id| self.catalog.get(id).ok())
                .map(|g| g.category.clone())
                .unwrap_or_else(|| "Other".to_string());
            *totals.entry(category).or_default() += tx.amount;
        }

        let mut points: Vec<ChartPoint> = self
            .catalog
            .categories()
            .into_iter()
            .filter_map(|c| totals.remove(&c).map(|amount| ChartPoint::new(c, amount)))
            .collect();
        points.extend(totals.into_iter().map(|(c, amount)| ChartPoint::new(c, amount)));
        points
    }

    /// Weekly revenue series.
    pub fn weekly_earnings(&self) -> &[ChartPoint] {
        &self.weekly_earnings
    }

    // -------------------------------------------------------------------------
    // Profile & configuration
    // -------------------------------------------------------------------------

    /// User profile.
    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// Mock server configuration panel.
    pub fn panel(&self) -> &ConfigPanel {
        &self.panel
    }

    /// Mutable access to the configuration panel.
    pub fn panel_mut(&mut self) -> &mut ConfigPanel {
        &mut self.panel
    }
}
