//! Mock Server Configuration Panel
//!
//! Nothing here talks to a server. `save` only simulates latency; while it
//! is in flight the save control is disabled and a second save is refused.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::dashboard::display::mask_secret;

/// Editable mock settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Hosting region label.
    pub region: String,
    /// Optional outbound proxy.
    pub proxy_ip: String,
    /// Encrypted transport toggle.
    pub secure_mode: bool,
    /// API key (masked for display).
    pub api_key: String,
    /// Two-factor toggle.
    pub two_factor: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            region: "Europe (Paris)".to_string(),
            proxy_ip: String::new(),
            secure_mode: true,
            api_key: String::new(),
            two_factor: true,
        }
    }
}

/// Panel errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PanelError {
    /// A save is already running.
    #[error("Save already in flight")]
    SaveInFlight,
}

/// Clears the saving flag on every exit path, including a dropped future.
struct SavingGuard<'a>(&'a AtomicBool);

impl Drop for SavingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// The configuration panel's state.
#[derive(Debug)]
pub struct ConfigPanel {
    settings: ServerSettings,
    latency: Duration,
    saving: AtomicBool,
    connected: AtomicBool,
}

impl ConfigPanel {
    /// Create a panel with simulated save latency.
    pub fn new(settings: ServerSettings, latency: Duration) -> Self {
        Self {
            settings,
            latency,
            saving: AtomicBool::new(false),
            connected: AtomicBool::new(false),
        }
    }

    /// Current settings.
    pub fn settings(&self) -> &ServerSettings {
        &self.settings
    }

    /// Change the region label.
    pub fn set_region(&mut self, region: impl Into<String>) {
        self.settings.region = region.into();
    }

    /// Change the proxy address.
    pub fn set_proxy_ip(&mut self, proxy_ip: impl Into<String>) {
        self.settings.proxy_ip = proxy_ip.into();
    }

    /// Replace the API key.
    pub fn set_api_key(&mut self, api_key: impl Into<String>) {
        self.settings.api_key = api_key.into();
    }

    /// Flip secure mode; returns the new value.
    pub fn toggle_secure_mode(&mut self) -> bool {
        self.settings.secure_mode = !self.settings.secure_mode;
        self.settings.secure_mode
    }

    /// Flip two-factor; returns the new value.
    pub fn toggle_two_factor(&mut self) -> bool {
        self.settings.two_factor = !self.settings.two_factor;
        self.settings.two_factor
    }

    /// API key as shown when hidden.
    pub fn masked_api_key(&self) -> String {
        mask_secret(&self.settings.api_key)
    }

    /// True while a save is in flight (save control disabled).
    pub fn is_saving(&self) -> bool {
        self.saving.load(Ordering::SeqCst)
    }

    /// True after the first successful save.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Simulate saving and connecting.
    pub async fn save(&self) -> Result<(), PanelError> {
        if self
            .saving
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(PanelError::SaveInFlight);
        }
        let _guard = SavingGuard(&self.saving);

        info!("Saving server configuration (region {})", self.settings.region);
        tokio::time::sleep(self.latency).await;

        self.connected.store(true, Ordering::SeqCst);
        info!("Server configuration saved");
        Ok(())
    }
}

impl Default for ConfigPanel {
    fn default() -> Self {
        Self::new(ServerSettings::default(), Duration::from_millis(1_500))
    }
}
