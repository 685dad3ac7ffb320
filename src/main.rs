//! Reward Arcade
//!
//! Demo driver: plays the shortest catalog game on the wall clock, collects
//! the reward and prints the dashboard.
//!
//! Usage: `reward-arcade [config.toml]`

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use reward_arcade::{
    dashboard::display::format_signed,
    game::SessionEventData,
    ledger::WithdrawalProvider,
    runtime::next_event,
    AppConfig, Dashboard, VERSION,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Reward Arcade v{}", VERSION);

    let config = match std::env::args().nth(1) {
        Some(path) => AppConfig::load(&path).with_context(|| format!("loading {path}"))?,
        None => AppConfig::default(),
    }
    .with_env_overrides()?;

    info!("Tick interval: {} ms", config.tick_interval_ms);

    let mut dashboard = Dashboard::from_config(&config)?;
    demo_session(&mut dashboard).await?;

    Ok(())
}

/// Play, collect, then show the wallet.
async fn demo_session(dashboard: &mut Dashboard) -> anyhow::Result<()> {
    info!("=== Catalog ===");
    for category in dashboard.categories() {
        dashboard.select_category(category.clone());
        info!("{}: {} games", category, dashboard.visible_games().len());
    }

    let game = dashboard
        .catalog()
        .games()
        .iter()
        .min_by_key(|g| g.duration_secs)
        .cloned()
        .context("catalog is empty")?;

    info!("=== Playing {} ({}s) ===", game.title, game.duration_secs);
    let mut events = dashboard.subscribe();
    dashboard.play(&game.id).await?;

    let mut last_reported = 0.0;
    loop {
        let event = next_event(&mut events)
            .await
            .context("session event channel closed")?;
        match event.data {
            SessionEventData::Progressed { progress } if progress - last_reported >= 25.0 => {
                info!("Progress {:.0}%", progress);
                last_reported = progress;
            }
            SessionEventData::Completed { reward, .. } => {
                info!("Completed! +{}", dashboard.format_amount(reward));
                break;
            }
            SessionEventData::Cancelled { .. } | SessionEventData::Replaced { .. } => {
                warn!("Session ended without reward");
                return Ok(());
            }
            _ => {}
        }
    }

    let receipt = dashboard.collect().await?;
    info!("Collected {} (transaction {})", dashboard.format_amount(receipt.amount), receipt.transaction_id);

    info!("=== Wallet ===");
    for card in dashboard.stat_cards() {
        match card.trend {
            Some(trend) => info!("{}: {} ({})", card.label, card.value, trend),
            None => info!("{}: {}", card.label, card.value),
        }
    }

    match dashboard.request_withdrawal(5_000, WithdrawalProvider::Orange) {
        Ok(id) => info!("Withdrawal request {} pending", id),
        Err(e) => warn!("Withdrawal refused: {}", e),
    }

    for tx in dashboard.history() {
        info!(
            "{} {} [{:?}]",
            tx.label(),
            format_signed(tx.amount, tx.is_outgoing(), dashboard.currency()),
            tx.status
        );
    }

    info!("=== Server configuration ===");
    dashboard.panel().save().await?;
    info!("Connected: {}", dashboard.panel().is_connected());

    info!("Snapshot: {}", serde_json::to_string(&dashboard.stats())?);
    Ok(())
}
