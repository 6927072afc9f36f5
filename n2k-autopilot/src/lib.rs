//! NMEA2000 Autopilot Translation Library
//!
//! Translates between a Raymarine-style NMEA2000 autopilot and a normalized
//! autopilot control/status model.
//!
//! # Architecture
//!
//! - Decodes selected, already field-decoded PGNs into a status snapshot
//!   (state, engaged flag, target) and alarm notifications
//! - Encodes host commands (state changes, target set/adjust) into outbound
//!   frames in the `timestamp,prio,pgn,src,dst,len,data...` text form
//! - Binds to one physical autopilot on a shared bus via hardware-version
//!   discovery, with manual override
//!
//! The library does NOT:
//! - Talk to the bus (frames go to a [`FrameSink`])
//! - Decode raw CAN bytes into named fields
//! - Persist anything; the snapshot is rebuilt from the live stream
//!
//! # Example Usage
//!
//! ```no_run
//! use n2k_autopilot::{AutopilotConfig, AutopilotEngine, BusEvent, N2kFrame};
//!
//! let config = AutopilotConfig::new().with_device_id("204");
//! let mut engine = AutopilotEngine::new(config, Vec::<N2kFrame>::new());
//!
//! // Autopilot reports it is steering a compass course
//! let event = BusEvent::new(65379, "204")
//!     .with_field("Pilot Mode", 64i64)
//!     .with_field("Sub Mode", 0i64);
//! for update in engine.handle_event(&event) {
//!     println!("{}", update);
//! }
//!
//! // Ten degrees to starboard
//! engine.adjust_target(10.0).unwrap();
//! for frame in engine.sink() {
//!     println!("{}", frame);
//! }
//! ```

// Public modules
pub mod binding;
pub mod codec;
pub mod config;
pub mod dispatcher;
pub mod provider;
pub mod tracker;
pub mod types;

// Re-export main types for convenience
pub use binding::{resolve_device_id, DeviceBinding, DeviceInfo, DeviceResolution, SourceDirectory};
pub use codec::{AdjustStep, N2kFrame};
pub use config::AutopilotConfig;
pub use dispatcher::{
    AutopilotEngine, AutopilotStatus, DeviceProperties, FrameSink, StateOption, TurnDirection,
};
pub use provider::AutopilotProvider;
pub use tracker::{StateTracker, TrackedPgn};
pub use types::{
    AlarmMethod, AlarmNotification, AlarmSeverity, AutopilotError, AutopilotState, BusEvent,
    FieldValue, Notification, Result, StatusSnapshot, Target, Timestamp,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_basics() {
        // Smoke test: a fresh engine knows nothing yet
        let engine = AutopilotEngine::new(AutopilotConfig::new(), Vec::<N2kFrame>::new());
        assert_eq!(engine.snapshot(), &StatusSnapshot::new());
        assert_eq!(engine.device_id(), "204");
    }
}
