//! Game Session Module
//!
//! The timed session simulation. Synchronous and free of wall-clock reads;
//! time only enters through delivered ticks.
//!
//! ## Module Structure
//!
//! - `catalog`: Playable games and category grouping
//! - `state`: Session state and phase
//! - `tick`: Fixed-interval progress update
//! - `controller`: Single-session lifecycle and settlement hand-off
//! - `events`: Session events for display and logs

pub mod catalog;
pub mod state;
pub mod tick;
pub mod controller;
pub mod events;

// Re-export key types
pub use catalog::{Catalog, CatalogError, Difficulty, Game, GameId, ALL_CATEGORY};
pub use state::{Session, SessionId, SessionPhase};
pub use tick::{TickConfig, TickResult};
pub use controller::{SessionController, SessionError, Settlement, SettlementError, StartOutcome};
pub use events::{SessionEvent, SessionEventData};
