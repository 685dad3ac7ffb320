//! # Reward Arcade
//!
//! Timed game sessions and exactly-once reward settlement for the Reward
//! Arcade dashboard.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       REWARD ARCADE                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  game/           - Session simulation (synchronous)          │
//! │  ├── catalog.rs  - Playable games, category grouping         │
//! │  ├── state.rs    - Session state and phase                   │
//! │  ├── tick.rs     - Fixed-interval progress update            │
//! │  ├── controller.rs - Single-session lifecycle, settlement    │
//! │  └── events.rs   - Session events                            │
//! │                                                              │
//! │  ledger/         - Reward ledger                             │
//! │  ├── stats.rs    - Aggregate balances                        │
//! │  ├── transaction.rs - History entries                        │
//! │  └── ledger.rs   - Ledger store and settlement rule          │
//! │                                                              │
//! │  runtime/        - Wall-clock scheduling (tokio)             │
//! │  ├── scheduler.rs - Cancellable tick task                    │
//! │  └── driver.rs   - Session driver                            │
//! │                                                              │
//! │  dashboard/      - View-model collaborators                  │
//! │  config.rs       - Configuration (TOML + env)                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Settlement Guarantee
//!
//! At most one session exists at a time. A completed session yields one
//! [`Settlement`], which is moved into the ledger; the session is discarded
//! in the same step. Cancelled or replaced sessions never settle, and their
//! tick tasks are aborted before anything else happens.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod dashboard;
pub mod game;
pub mod ledger;
pub mod runtime;

// Re-export commonly used types
pub use config::{AppConfig, ConfigError};
pub use dashboard::{Dashboard, DashboardError};
pub use game::{
    Catalog, Game, GameId, SessionController, SessionError, SessionEvent, SessionId,
    SessionPhase, Settlement, TickConfig,
};
pub use ledger::{LedgerError, LedgerStore, RewardLedger, UserStats};
pub use runtime::SessionDriver;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Tick interval (milliseconds)
pub const TICK_INTERVAL_MS: u64 = 100;

/// Currency of record
pub const DEFAULT_CURRENCY: &str = "FCFA";
