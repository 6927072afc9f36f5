//! Command dispatch and the engine instance
//!
//! [`AutopilotEngine`] owns everything the translator needs: configuration,
//! the device binding, the state tracker and the transport sink. Host commands
//! are validated against the current snapshot, encoded by the frame codec and
//! handed to the sink. Nothing waits for the bus to acknowledge a command; the
//! snapshot changes only when the device echoes its new status.

use crate::binding::{DeviceBinding, DeviceResolution, SourceDirectory};
use crate::codec::{self, parse_address, N2kFrame, BROADCAST_ADDRESS};
use crate::config::AutopilotConfig;
use crate::tracker::StateTracker;
use crate::types::{
    AutopilotError, AutopilotState, BusEvent, Notification, Result, StatusSnapshot, Target,
};
use chrono::Utc;
use serde::Serialize;

/// Transport boundary for outbound frames (fire-and-forget)
pub trait FrameSink {
    fn send(&mut self, frame: N2kFrame);
}

impl FrameSink for Vec<N2kFrame> {
    fn send(&mut self, frame: N2kFrame) {
        self.push(frame);
    }
}

/// Advertised state with its engaged flag
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateOption {
    pub name: AutopilotState,
    pub engaged: bool,
}

/// Snapshot merged with capability metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AutopilotStatus {
    pub states: Vec<StateOption>,
    pub modes: Vec<String>,
    #[serde(flatten)]
    pub snapshot: StatusSnapshot,
}

/// Configuration UI descriptor for the device id setting
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceProperties {
    pub device_id: PropertySchema,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub title: &'static str,
    pub description: String,
    pub default: String,
}

/// Which tack/gybe/dodge direction was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnDirection {
    Port,
    Starboard,
}

/// The protocol-translation engine for one autopilot device
pub struct AutopilotEngine<S: FrameSink> {
    config: AutopilotConfig,
    binding: DeviceBinding,
    tracker: StateTracker,
    sink: S,
}

impl<S: FrameSink> AutopilotEngine<S> {
    /// Create an engine; the snapshot starts empty
    pub fn new(config: AutopilotConfig, sink: S) -> Self {
        let binding = DeviceBinding::new(config.initial_device_id(), config.search_text.clone());
        let tracker = StateTracker::new(config.manufacturer.clone());
        log::info!("Autopilot engine started (device id {})", binding.device_id());

        Self {
            config,
            binding,
            tracker,
            sink,
        }
    }

    pub fn config(&self) -> &AutopilotConfig {
        &self.config
    }

    pub fn device_id(&self) -> &str {
        self.binding.device_id()
    }

    pub fn snapshot(&self) -> &StatusSnapshot {
        self.tracker.snapshot()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Feed one inbound bus event
    pub fn handle_event(&mut self, event: &BusEvent) -> Vec<Notification> {
        self.tracker.handle_event(event, self.binding.device_id())
    }

    /// Resolve the device binding against a source directory
    pub fn resolve_device(&mut self, directory: Option<&SourceDirectory>) -> DeviceResolution {
        self.binding.resolve(directory)
    }

    /// Device property descriptor, running discovery first
    pub fn properties(&mut self, directory: Option<&SourceDirectory>) -> DeviceProperties {
        let resolution = self.resolve_device(directory);
        DeviceProperties {
            device_id: PropertySchema {
                kind: "string",
                title: "Autopilot NMEA2000 id.",
                description: resolution.description,
                default: resolution.device_id,
            },
        }
    }

    /// Current status with the static capability lists
    pub fn status(&self) -> AutopilotStatus {
        AutopilotStatus {
            states: AutopilotState::ALL
                .into_iter()
                .map(|state| StateOption {
                    name: state,
                    engaged: state.is_engaged(),
                })
                .collect(),
            modes: Vec::new(),
            snapshot: self.tracker.snapshot().clone(),
        }
    }

    /// Request a state change
    ///
    /// Returns whether the requested state is an engaged one. The snapshot
    /// only reflects the change once the device reports it.
    pub fn set_state(&mut self, name: &str) -> Result<bool> {
        let state = AutopilotState::from_name(name)
            .ok_or_else(|| AutopilotError::InvalidState(name.to_string()))?;

        let frame = codec::state_frame(
            state,
            Utc::now(),
            self.config.source_address,
            parse_address(self.binding.device_id())?,
        );
        self.submit(frame);
        Ok(state.is_engaged())
    }

    pub fn engage(&mut self) -> Result<bool> {
        let state = self.config.engaged_state;
        self.set_state(state.name())
    }

    pub fn disengage(&mut self) -> Result<bool> {
        let state = self.config.disengaged_state;
        self.set_state(state.name())
    }

    /// Command a new target heading in radians
    pub fn set_target(&mut self, radians: f64) -> Result<()> {
        self.require_engaged()?;

        let frame = codec::encode_heading_frame(
            radians,
            Utc::now(),
            &self.config.source_address.to_string(),
            self.binding.device_id(),
        )?;
        self.submit(frame);
        Ok(())
    }

    /// Nudge the target by ±1 or ±10 degrees
    pub fn adjust_target(&mut self, delta: f64) -> Result<()> {
        self.require_engaged()?;

        let frame = codec::encode_adjust_frame(
            delta,
            Utc::now(),
            &self.config.source_address.to_string(),
            &BROADCAST_ADDRESS.to_string(),
        )?;
        self.submit(frame);
        Ok(())
    }

    pub fn mode(&self) -> Option<&str> {
        self.tracker.snapshot().mode.as_deref()
    }

    pub fn target(&self) -> Option<Target> {
        self.tracker.snapshot().target
    }

    pub fn set_mode(&mut self, _mode: &str) -> Result<()> {
        Err(AutopilotError::NotImplemented("setMode"))
    }

    pub fn tack(&mut self, _direction: TurnDirection) -> Result<()> {
        Err(AutopilotError::NotImplemented("tack"))
    }

    pub fn gybe(&mut self, _direction: TurnDirection) -> Result<()> {
        Err(AutopilotError::NotImplemented("gybe"))
    }

    pub fn dodge(&mut self, _direction: TurnDirection) -> Result<()> {
        Err(AutopilotError::NotImplemented("dodge"))
    }

    fn require_engaged(&self) -> Result<()> {
        let snapshot = self.tracker.snapshot();
        if snapshot.is_engaged() {
            Ok(())
        } else {
            Err(AutopilotError::UnsupportedInState(snapshot.state_name().to_string()))
        }
    }

    fn submit(&mut self, frame: N2kFrame) {
        log::debug!("Sending frame -> {}", frame);
        self.sink.send(frame);
    }
}
