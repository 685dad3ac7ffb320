//! Runtime Layer
//!
//! Wall-clock scheduling on tokio. This layer is non-deterministic; all
//! session logic runs through `game/`.

pub mod scheduler;
pub mod driver;

pub use scheduler::{TickFlow, TickTask};
pub use driver::{next_event, SessionDriver, SessionView};
