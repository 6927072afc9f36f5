//! Core types for the autopilot translation engine
//!
//! This module defines the inbound bus events the engine consumes, the status
//! snapshot it maintains, the notifications it emits to the host and the error
//! taxonomy shared by every operation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Timestamp type used throughout the engine
pub type Timestamp = DateTime<Utc>;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, AutopilotError>;

/// Errors surfaced to the host by commands and frame builders
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AutopilotError {
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Invalid adjustment: {0}")]
    InvalidAdjustment(f64),

    #[error("Autopilot current state ({0}) does not support this operation!")]
    UnsupportedInState(String),

    #[error("Not implemented: {0}")]
    NotImplemented(&'static str),

    #[error("No frame template for state: {0}")]
    UnknownState(String),

    #[error("Target {0} rad does not fit the 16-bit heading field")]
    TargetOutOfRange(f64),

    #[error("Invalid bus address: {0}")]
    InvalidAddress(String),

    #[error("Device {requested} is not the bound autopilot ({bound})")]
    DeviceMismatch { requested: String, bound: String },
}

/// The four canonical autopilot states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutopilotState {
    Auto,
    Wind,
    Route,
    Standby,
}

impl AutopilotState {
    /// All states in the order they are advertised to the host
    pub const ALL: [AutopilotState; 4] = [
        AutopilotState::Auto,
        AutopilotState::Wind,
        AutopilotState::Route,
        AutopilotState::Standby,
    ];

    /// Whether the autopilot is actively steering in this state
    pub fn is_engaged(self) -> bool {
        match self {
            AutopilotState::Auto | AutopilotState::Wind | AutopilotState::Route => true,
            AutopilotState::Standby => false,
        }
    }

    /// Parse a host-facing state name ("auto", "wind", "route", "standby")
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|state| state.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            AutopilotState::Auto => "auto",
            AutopilotState::Wind => "wind",
            AutopilotState::Route => "route",
            AutopilotState::Standby => "standby",
        }
    }
}

impl fmt::Display for AutopilotState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Commanded target the autopilot is steering toward
///
/// Serializes as the bare angle in radians, which is what the host expects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Target {
    /// Wind-relative angle in radians, normalized to (-π, π]
    WindAngle(f64),
    /// Heading (true, or magnetic when true is absent) in radians, [0, 2π)
    Heading(f64),
}

impl Target {
    /// The target angle in radians regardless of its reference
    pub fn radians(&self) -> f64 {
        match self {
            Target::WindAngle(v) | Target::Heading(v) => *v,
        }
    }
}

impl Serialize for Target {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.radians())
    }
}

/// Current autopilot status, reconstructed from the live bus stream
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    /// Current state (`None` until the bus reports one)
    pub state: Option<AutopilotState>,
    /// Reserved; no PGN in scope populates it
    pub mode: Option<String>,
    /// Derived from `state`, never written on its own
    pub engaged: Option<bool>,
    /// Last reported target
    pub target: Option<Target>,
}

impl StatusSnapshot {
    /// Create an empty snapshot (all fields unknown)
    pub fn new() -> Self {
        Self::default()
    }

    /// Update state and engaged together
    pub fn set_state(&mut self, state: AutopilotState) {
        self.state = Some(state);
        self.engaged = Some(state.is_engaged());
    }

    /// True when the tracked state is one of the engaged states
    pub fn is_engaged(&self) -> bool {
        self.state.map(AutopilotState::is_engaged).unwrap_or(false)
    }

    /// Host-facing name of the current state ("unknown" before the first report)
    pub fn state_name(&self) -> &'static str {
        self.state.map(AutopilotState::name).unwrap_or("unknown")
    }
}

/// A single field value as produced by the upstream PGN decoder
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// JSON `null` or an explicitly missing value
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    /// Numeric interpretation of the value; numeric text is parsed
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(v) => Some(*v as f64),
            FieldValue::Float(v) => Some(*v),
            FieldValue::Text(s) => s.trim().parse().ok(),
            FieldValue::Boolean(_) | FieldValue::Null => None,
        }
    }

    /// Integer interpretation; fractional values are rejected
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(v) => Some(*v),
            other => other
                .as_f64()
                .filter(|v| v.fract() == 0.0 && v.is_finite())
                .map(|v| v as i64),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => write!(f, "null"),
            FieldValue::Boolean(v) => write!(f, "{}", v),
            FieldValue::Integer(v) => write!(f, "{}", v),
            FieldValue::Float(v) => write!(f, "{}", v),
            FieldValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

/// A field-decoded PGN message received from the bus
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BusEvent {
    /// Parameter group number
    pub pgn: u32,
    /// Source address of the sending device
    #[serde(deserialize_with = "deserialize_source")]
    pub src: String,
    /// Named fields, as decoded upstream
    #[serde(default)]
    pub fields: HashMap<String, FieldValue>,
}

impl BusEvent {
    /// Create an event with no fields
    pub fn new(pgn: u32, src: impl Into<String>) -> Self {
        Self {
            pgn,
            src: src.into(),
            fields: HashMap::new(),
        }
    }

    /// Builder method: add a field
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Look up a field, treating `null` as absent
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name).filter(|v| !v.is_null())
    }

    /// Look up a numeric field
    pub fn number(&self, name: &str) -> Option<f64> {
        self.field(name).and_then(FieldValue::as_f64)
    }
}

/// Decoders emit the source address as a number, Signal K keeps it as text
fn deserialize_source<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Source {
        Number(u64),
        Text(String),
    }

    Ok(match Source::deserialize(deserializer)? {
        Source::Number(n) => n.to_string(),
        Source::Text(s) => s,
    })
}

/// How an alarm should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlarmMethod {
    Visual,
    Sound,
}

/// Alarm severity reported to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlarmSeverity {
    Normal,
    Alarm,
    Alert,
}

/// An autopilot alarm raised from PGN 65288
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlarmNotification {
    /// Normalized alarm name (e.g. "waypointArrival")
    pub message: String,
    pub method: Vec<AlarmMethod>,
    pub state: AlarmSeverity,
}

/// Normalized output of the state tracker
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Notification {
    /// Target changed (or became unknown)
    Target { value: Option<Target> },
    /// State changed
    State { value: AutopilotState },
    /// Engaged flag changed, always emitted right after `State`
    Engaged { value: bool },
    /// Alarm raised or cleared
    Alarm(AlarmNotification),
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::Target { value: Some(t) } => write!(f, "target = {:.4} rad", t.radians()),
            Notification::Target { value: None } => write!(f, "target = null"),
            Notification::State { value } => write!(f, "state = {}", value),
            Notification::Engaged { value } => write!(f, "engaged = {}", value),
            Notification::Alarm(alarm) => write!(
                f,
                "alarm {} ({:?}, {:?})",
                alarm.message, alarm.state, alarm.method
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engaged_table() {
        assert!(AutopilotState::Auto.is_engaged());
        assert!(AutopilotState::Wind.is_engaged());
        assert!(AutopilotState::Route.is_engaged());
        assert!(!AutopilotState::Standby.is_engaged());
    }

    #[test]
    fn test_state_names() {
        for state in AutopilotState::ALL {
            assert_eq!(AutopilotState::from_name(state.name()), Some(state));
        }
        assert_eq!(AutopilotState::from_name("track"), None);
        assert_eq!(AutopilotState::from_name("Auto"), None);
    }

    #[test]
    fn test_snapshot_state_and_engaged_move_together() {
        let mut snapshot = StatusSnapshot::new();
        assert_eq!(snapshot.state_name(), "unknown");
        assert!(!snapshot.is_engaged());

        snapshot.set_state(AutopilotState::Wind);
        assert_eq!(snapshot.engaged, Some(true));

        snapshot.set_state(AutopilotState::Standby);
        assert_eq!(snapshot.engaged, Some(false));
    }

    #[test]
    fn test_field_value_conversions() {
        assert_eq!(FieldValue::Integer(64).as_f64(), Some(64.0));
        assert_eq!(FieldValue::Text("1.5".into()).as_f64(), Some(1.5));
        assert_eq!(FieldValue::Text("Raymarine".into()).as_f64(), None);
        assert_eq!(FieldValue::Float(129.0).as_i64(), Some(129));
        assert_eq!(FieldValue::Float(1.25).as_i64(), None);
        assert_eq!(FieldValue::Null.as_f64(), None);
    }

    #[test]
    fn test_bus_event_from_json() {
        let event: BusEvent = serde_json::from_str(
            r#"{"pgn":65379,"src":204,"fields":{"Pilot Mode":64,"Sub Mode":0,"Spare":null}}"#,
        )
        .unwrap();

        assert_eq!(event.src, "204");
        assert_eq!(event.number("Pilot Mode"), Some(64.0));
        assert!(event.field("Spare").is_none());
        assert!(event.field("Missing").is_none());
    }
}
