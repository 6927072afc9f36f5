//! Engine configuration types
//!
//! Everything here has a sensible default for a Raymarine EV-1 course computer;
//! the host normally only supplies `device_id`, if anything.

use crate::types::AutopilotState;
use serde::{Deserialize, Serialize};

/// Default text matched against `n2k.hardwareVersion` during discovery
pub const DEFAULT_SEARCH_TEXT: &str = "Raymarine EV-1 Course Computer";

/// Manufacturer code carried by alarms we translate
pub const DEFAULT_MANUFACTURER: &str = "Raymarine";

/// Autopilot address used until a device is configured or discovered
pub const FALLBACK_DEVICE_ID: &str = "204";

/// Configuration for the autopilot engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutopilotConfig {
    /// Explicit autopilot bus id (overridden once discovery succeeds)
    #[serde(default)]
    pub device_id: Option<String>,

    /// Prefix of the hardware version text identifying the autopilot
    #[serde(default = "default_search_text")]
    pub search_text: String,

    /// Manufacturer code required on alarm PGNs
    #[serde(default = "default_manufacturer")]
    pub manufacturer: String,

    /// Our own source address on outbound frames
    #[serde(default = "default_source_address")]
    pub source_address: u8,

    /// Device id used when nothing is configured or discovered
    #[serde(default = "default_fallback_device_id")]
    pub fallback_device_id: String,

    /// State requested by `engage()`
    #[serde(default = "default_engaged_state")]
    pub engaged_state: AutopilotState,

    /// State requested by `disengage()`
    #[serde(default = "default_disengaged_state")]
    pub disengaged_state: AutopilotState,
}

fn default_search_text() -> String {
    DEFAULT_SEARCH_TEXT.to_string()
}

fn default_manufacturer() -> String {
    DEFAULT_MANUFACTURER.to_string()
}

fn default_source_address() -> u8 {
    1
}

fn default_fallback_device_id() -> String {
    FALLBACK_DEVICE_ID.to_string()
}

fn default_engaged_state() -> AutopilotState {
    AutopilotState::Auto
}

fn default_disengaged_state() -> AutopilotState {
    AutopilotState::Standby
}

impl Default for AutopilotConfig {
    fn default() -> Self {
        Self {
            device_id: None,
            search_text: default_search_text(),
            manufacturer: default_manufacturer(),
            source_address: default_source_address(),
            fallback_device_id: default_fallback_device_id(),
            engaged_state: default_engaged_state(),
            disengaged_state: default_disengaged_state(),
        }
    }
}

impl AutopilotConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the configured device id
    pub fn with_device_id(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }

    /// Builder method: set the discovery search text
    pub fn with_search_text(mut self, text: impl Into<String>) -> Self {
        self.search_text = text.into();
        self
    }

    /// Builder method: set the alarm manufacturer code
    pub fn with_manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = manufacturer.into();
        self
    }

    /// Builder method: set our source address
    pub fn with_source_address(mut self, address: u8) -> Self {
        self.source_address = address;
        self
    }

    /// Builder method: set the states used by engage/disengage
    pub fn with_default_states(
        mut self,
        engaged: AutopilotState,
        disengaged: AutopilotState,
    ) -> Self {
        self.engaged_state = engaged;
        self.disengaged_state = disengaged;
        self
    }

    /// Device id to filter on before discovery
    pub fn initial_device_id(&self) -> &str {
        self.device_id
            .as_deref()
            .unwrap_or(&self.fallback_device_id)
    }
}
