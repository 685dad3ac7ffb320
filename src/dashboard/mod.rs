//! Dashboard Layer
//!
//! View-model collaborators around the session and ledger stores.
//!
//! ## Module Structure
//!
//! - `dashboard`: Owner of the session and ledger stores
//! - `display`: Amount formatting, stat cards, chart points
//! - `panel`: Mock server configuration panel
//! - `profile`: User profile

#[allow(clippy::module_inception)]
pub mod dashboard;
pub mod display;
pub mod panel;
pub mod profile;

pub use dashboard::{Dashboard, DashboardError};
pub use display::{format_amount, ChartPoint, StatCard};
pub use panel::{ConfigPanel, PanelError, ServerSettings};
pub use profile::UserProfile;
