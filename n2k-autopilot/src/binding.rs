//! Autopilot device discovery and binding
//!
//! The engine reads and commands exactly one device on a shared bus. Until a
//! device is discovered the configured id (or the fallback id) is used as a
//! best-effort filter. Discovery scans a Signal K style source directory for a
//! device whose hardware version starts with the configured search text.
//!
//! # Scan order
//!
//! Providers and device ids are visited in lexicographic order and the first
//! match wins, so a directory with several matching devices always binds the
//! same one. Once bound, the engine never re-scans for the lifetime of the
//! process, even if the device disappears from the bus.

use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Provider name → entries (device id → metadata, plus provider attributes)
pub type SourceDirectory = BTreeMap<String, ProviderEntry>;

/// One top-level entry of the source directory
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ProviderEntry {
    /// A provider with its devices
    Devices(BTreeMap<String, SourceEntry>),
    /// Anything else (labels, type strings, ...)
    Other(IgnoredAny),
}

/// One entry under a provider
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SourceEntry {
    Device(DeviceInfo),
    Other(IgnoredAny),
}

/// Metadata known about a bus device
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct DeviceInfo {
    #[serde(default)]
    pub n2k: Option<N2kDeviceInfo>,
}

/// NMEA2000 product information from address claim / product info PGNs
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct N2kDeviceInfo {
    #[serde(default)]
    pub hardware_version: Option<String>,
    #[serde(default)]
    pub manufacturer_name: Option<String>,
    #[serde(default)]
    pub model_id: Option<String>,
}

impl DeviceInfo {
    /// Device metadata carrying only a hardware version
    pub fn with_hardware_version(version: impl Into<String>) -> Self {
        Self {
            n2k: Some(N2kDeviceInfo {
                hardware_version: Some(version.into()),
                ..Default::default()
            }),
        }
    }

    fn hardware_version(&self) -> Option<&str> {
        self.n2k.as_ref()?.hardware_version.as_deref()
    }
}

/// Outcome of a binding resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceResolution {
    pub device_id: String,
    pub discovered: bool,
    pub description: String,
}

/// Which device this engine instance is bound to
#[derive(Debug, Clone)]
pub struct DeviceBinding {
    device_id: String,
    discovered: bool,
    search_text: String,
}

impl DeviceBinding {
    /// Start undiscovered, filtering on `initial_id`
    pub fn new(initial_id: impl Into<String>, search_text: impl Into<String>) -> Self {
        Self {
            device_id: initial_id.into(),
            discovered: false,
            search_text: search_text.into(),
        }
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn is_discovered(&self) -> bool {
        self.discovered
    }

    /// Human-readable discovery outcome
    pub fn description(&self) -> String {
        if self.discovered {
            format!("Discovered autopilot device with id {}", self.device_id)
        } else {
            "No device found!".to_string()
        }
    }

    /// Find the first device in the directory matching the search text
    pub fn scan(&self, directory: &SourceDirectory) -> Option<String> {
        directory
            .values()
            .filter_map(|provider| match provider {
                ProviderEntry::Devices(devices) => Some(devices),
                ProviderEntry::Other(_) => None,
            })
            .flat_map(|devices| devices.iter())
            .find_map(|(id, entry)| match entry {
                SourceEntry::Device(info)
                    if info
                        .hardware_version()
                        .is_some_and(|hw| hw.starts_with(&self.search_text)) =>
                {
                    Some(id.clone())
                }
                _ => None,
            })
    }

    /// Resolve the bound device, scanning the directory if not yet discovered
    pub fn resolve(&mut self, directory: Option<&SourceDirectory>) -> DeviceResolution {
        log::debug!("Resolving autopilot device (current id {})", self.device_id);

        if !self.discovered {
            let found = directory.and_then(|d| self.scan(d));
            if let Some(id) = found {
                self.device_id = id;
                self.discovered = true;
                log::info!("{}", self.description());
            }
        }

        DeviceResolution {
            device_id: self.device_id.clone(),
            discovered: self.discovered,
            description: self.description(),
        }
    }
}

/// Convenience wrapper: resolve a fresh binding in one call
pub fn resolve_device_id(
    configured_id: &str,
    search_text: &str,
    directory: Option<&SourceDirectory>,
) -> DeviceResolution {
    DeviceBinding::new(configured_id, search_text).resolve(directory)
}
