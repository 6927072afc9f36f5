//! Normalization of decoded PGN fields
//!
//! Turns raw values from the upstream decoder into the typed values the state
//! tracker stores: wind angles, autopilot states and alarm names.

use crate::types::{AlarmSeverity, AutopilotState, FieldValue};
use std::f64::consts::PI;

/// Alarm ids that escalate from `alarm` to `alert`, with their normalized names
const KNOWN_ALARMS: [(&str, &str); 3] = [
    ("WP Arrival", "waypointArrival"),
    ("Pilot Way Point Advance", "waypointAdvance"),
    ("Pilot Route Complete", "routeComplete"),
];

/// Alarm status text that also requests an audible alarm
pub const STATUS_MET_NOT_SILENCED: &str = "Alarm condition met and not silenced";

/// Alarm status text for a cleared alarm
pub const STATUS_NOT_MET: &str = "Alarm condition not met";

/// Remap a wind angle from [0, 2π) to (-π, π]
pub fn wind_angle(radians: f64) -> f64 {
    if radians > PI {
        radians - 2.0 * PI
    } else {
        radians
    }
}

/// Map PGN 65379 pilot mode / sub mode codes to a state
///
/// Returns `None` only when both codes are missing; any other unrecognized
/// combination reads as standby.
pub fn pilot_state(mode: Option<i64>, sub_mode: Option<i64>) -> Option<AutopilotState> {
    if mode.is_none() && sub_mode.is_none() {
        return None;
    }

    let state = match (mode, sub_mode) {
        (Some(0), Some(0)) => AutopilotState::Standby,
        (Some(0), Some(1)) => AutopilotState::Wind,
        (Some(128 | 129), Some(1)) => AutopilotState::Route,
        (Some(64), Some(0)) => AutopilotState::Auto,
        _ => AutopilotState::Standby,
    };
    Some(state)
}

/// Severity for an alarm status text and id
///
/// Only textual ids on the known list escalate to `Alert`.
pub fn alarm_severity(status: &str, alarm_id: Option<&FieldValue>) -> AlarmSeverity {
    if status == STATUS_NOT_MET {
        return AlarmSeverity::Normal;
    }

    let escalates = alarm_id
        .and_then(FieldValue::as_str)
        .map(|id| KNOWN_ALARMS.iter().any(|(name, _)| *name == id))
        .unwrap_or(false);

    if escalates {
        AlarmSeverity::Alert
    } else {
        AlarmSeverity::Alarm
    }
}

/// Normalize an alarm id into the name reported to the host
///
/// An empty result means the alarm cannot be named and must be dropped.
pub fn normalise_alarm_id(alarm_id: Option<&FieldValue>) -> String {
    match alarm_id {
        None | Some(FieldValue::Null) => String::new(),
        Some(FieldValue::Text(id)) if id.is_empty() => String::new(),
        Some(FieldValue::Text(id)) => KNOWN_ALARMS
            .iter()
            .find(|(name, _)| *name == id.as_str())
            .map(|(_, normalised)| normalised.to_string())
            .unwrap_or_else(|| format!("Unknown Alarm {}", id)),
        Some(other) => format!("Unknown Alarm {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wind_angle_remap() {
        assert_eq!(wind_angle(0.0), 0.0);
        assert_eq!(wind_angle(1.0), 1.0);
        assert_eq!(wind_angle(PI), PI);

        let remapped = wind_angle(3.0 * PI / 2.0);
        assert!((remapped + PI / 2.0).abs() < 1e-12);

        for i in 0..629 {
            let theta = i as f64 * 0.01;
            let r = wind_angle(theta);
            assert!(r > -PI && r <= PI, "theta {} -> {}", theta, r);
        }
    }

    #[test]
    fn test_pilot_state_table() {
        assert_eq!(pilot_state(Some(0), Some(0)), Some(AutopilotState::Standby));
        assert_eq!(pilot_state(Some(0), Some(1)), Some(AutopilotState::Wind));
        assert_eq!(pilot_state(Some(128), Some(1)), Some(AutopilotState::Route));
        assert_eq!(pilot_state(Some(129), Some(1)), Some(AutopilotState::Route));
        assert_eq!(pilot_state(Some(64), Some(0)), Some(AutopilotState::Auto));
    }

    #[test]
    fn test_pilot_state_falls_back_to_standby() {
        for (mode, sub) in [
            (Some(64), Some(1)),
            (Some(128), Some(0)),
            (Some(-1), Some(0)),
            (Some(0), Some(-1)),
            (Some(1000), Some(1)),
            (Some(64), None),
            (None, Some(1)),
        ] {
            assert_eq!(
                pilot_state(mode, sub),
                Some(AutopilotState::Standby),
                "{:?}/{:?}",
                mode,
                sub
            );
        }
        assert_eq!(pilot_state(None, None), None);
    }

    #[test]
    fn test_alarm_normalisation() {
        let cases = [
            ("WP Arrival", "waypointArrival"),
            ("Pilot Way Point Advance", "waypointAdvance"),
            ("Pilot Route Complete", "routeComplete"),
            ("Off Course", "Unknown Alarm Off Course"),
        ];
        for (id, expected) in cases {
            let value = FieldValue::from(id);
            assert_eq!(normalise_alarm_id(Some(&value)), expected);
            // Same input, same output
            assert_eq!(normalise_alarm_id(Some(&value)), expected);
        }

        assert_eq!(normalise_alarm_id(Some(&FieldValue::Integer(42))), "Unknown Alarm 42");
        assert_eq!(normalise_alarm_id(Some(&FieldValue::Text(String::new()))), "");
        assert_eq!(normalise_alarm_id(None), "");
    }

    #[test]
    fn test_alarm_severity() {
        let arrival = FieldValue::from("WP Arrival");
        let other = FieldValue::from("Off Course");
        let numeric = FieldValue::Integer(7);

        assert_eq!(alarm_severity(STATUS_NOT_MET, Some(&arrival)), AlarmSeverity::Normal);
        assert_eq!(alarm_severity(STATUS_MET_NOT_SILENCED, Some(&arrival)), AlarmSeverity::Alert);
        assert_eq!(alarm_severity(STATUS_MET_NOT_SILENCED, Some(&other)), AlarmSeverity::Alarm);
        assert_eq!(
            alarm_severity("Alarm condition met and silenced", Some(&numeric)),
            AlarmSeverity::Alarm
        );
    }
}
