//! Autopilot status tracking
//!
//! Consumes field-decoded bus events and maintains the single status snapshot.
//! Only the PGNs listed in [`TrackedPgn`] coming from the bound device are
//! considered; everything else is dropped without touching the snapshot.
//!
//! | PGN | Effect |
//! |---|---|
//! | 65345 | wind-relative target |
//! | 65360 | heading target (true, else magnetic) |
//! | 65379 | state + engaged |
//! | 65288 | alarms |
//! | 127237 | observed, not translated |

use crate::codec::fields;
use crate::types::{AlarmMethod, AlarmNotification, BusEvent, Notification, StatusSnapshot, Target};

/// PGNs the tracker listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackedPgn {
    /// Seatalk pilot wind datum
    WindDatum,
    /// Seatalk pilot heading
    PilotHeading,
    /// Seatalk pilot mode
    PilotMode,
    /// Seatalk alarm
    Alarm,
    /// Heading/track control
    HeadingTrackControl,
}

impl TrackedPgn {
    pub fn from_pgn(pgn: u32) -> Option<Self> {
        match pgn {
            65345 => Some(TrackedPgn::WindDatum),
            65360 => Some(TrackedPgn::PilotHeading),
            65379 => Some(TrackedPgn::PilotMode),
            65288 => Some(TrackedPgn::Alarm),
            127237 => Some(TrackedPgn::HeadingTrackControl),
            _ => None,
        }
    }

    pub fn pgn(self) -> u32 {
        match self {
            TrackedPgn::WindDatum => 65345,
            TrackedPgn::PilotHeading => 65360,
            TrackedPgn::PilotMode => 65379,
            TrackedPgn::Alarm => 65288,
            TrackedPgn::HeadingTrackControl => 127237,
        }
    }
}

/// Owner of the status snapshot
#[derive(Debug, Clone)]
pub struct StateTracker {
    snapshot: StatusSnapshot,
    manufacturer: String,
}

impl StateTracker {
    /// Create a tracker accepting alarms tagged with `manufacturer`
    pub fn new(manufacturer: impl Into<String>) -> Self {
        Self {
            snapshot: StatusSnapshot::new(),
            manufacturer: manufacturer.into(),
        }
    }

    pub fn snapshot(&self) -> &StatusSnapshot {
        &self.snapshot
    }

    /// Apply one bus event, returning the notifications it produced
    pub fn handle_event(&mut self, event: &BusEvent, bound_device_id: &str) -> Vec<Notification> {
        let Some(pgn) = TrackedPgn::from_pgn(event.pgn) else {
            return Vec::new();
        };
        if event.src != bound_device_id {
            log::trace!(
                "Ignoring PGN {} from {} (bound to {})",
                event.pgn,
                event.src,
                bound_device_id
            );
            return Vec::new();
        }

        match pgn {
            TrackedPgn::WindDatum => self.handle_wind_datum(event),
            TrackedPgn::PilotHeading => self.handle_pilot_heading(event),
            TrackedPgn::PilotMode => self.handle_pilot_mode(event),
            TrackedPgn::Alarm => self.handle_alarm(event).into_iter().collect(),
            TrackedPgn::HeadingTrackControl => {
                log::trace!("PGN {} from {} not translated", pgn.pgn(), event.src);
                Vec::new()
            }
        }
    }

    fn handle_wind_datum(&mut self, event: &BusEvent) -> Vec<Notification> {
        let target = event
            .number("Wind Datum")
            .map(|angle| Target::WindAngle(fields::wind_angle(angle)));

        self.snapshot.target = target;
        vec![Notification::Target { value: target }]
    }

    fn handle_pilot_heading(&mut self, event: &BusEvent) -> Vec<Notification> {
        let target = event
            .number("Target Heading True")
            .or_else(|| event.number("Target Heading Magnetic"))
            .map(Target::Heading);

        self.snapshot.target = target;
        vec![Notification::Target { value: target }]
    }

    fn handle_pilot_mode(&mut self, event: &BusEvent) -> Vec<Notification> {
        let mode = event.field("Pilot Mode").and_then(|v| v.as_i64());
        let sub_mode = event.field("Sub Mode").and_then(|v| v.as_i64());

        let Some(state) = fields::pilot_state(mode, sub_mode) else {
            log::debug!("PGN 65379 without pilot mode fields, ignored");
            return Vec::new();
        };

        self.snapshot.set_state(state);
        vec![
            Notification::State { value: state },
            Notification::Engaged {
                value: state.is_engaged(),
            },
        ]
    }

    fn handle_alarm(&mut self, event: &BusEvent) -> Option<Notification> {
        let manufacturer = event.field("Manufacturer Code").and_then(|v| v.as_str());
        if manufacturer != Some(self.manufacturer.as_str()) {
            log::trace!("Alarm from manufacturer {:?} ignored", manufacturer);
            return None;
        }

        let Some(status) = event.field("Alarm Status").and_then(|v| v.as_str()) else {
            log::debug!("Alarm without status ignored");
            return None;
        };

        let mut method = vec![AlarmMethod::Visual];
        if status == fields::STATUS_MET_NOT_SILENCED {
            method.push(AlarmMethod::Sound);
        }

        let alarm_id = event.field("Alarm ID");
        let severity = fields::alarm_severity(status, alarm_id);
        let message = fields::normalise_alarm_id(alarm_id);
        if message.is_empty() {
            log::debug!("Alarm id {:?} could not be normalised, dropped", alarm_id);
            return None;
        }

        log::debug!(
            "Alarm {} (group {:?}): {:?}",
            message,
            event.field("Alarm Group"),
            severity
        );

        Some(Notification::Alarm(AlarmNotification {
            message,
            method,
            state: severity,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AlarmSeverity, AutopilotState, FieldValue};
    use std::f64::consts::PI;

    const DEVICE: &str = "204";

    fn mode_event(mode: i64, sub_mode: i64) -> BusEvent {
        BusEvent::new(65379, DEVICE)
            .with_field("Pilot Mode", mode)
            .with_field("Sub Mode", sub_mode)
    }

    fn alarm_event(status: &str, id: FieldValue) -> BusEvent {
        BusEvent::new(65288, DEVICE)
            .with_field("Manufacturer Code", "Raymarine")
            .with_field("Alarm Group", "Autopilot")
            .with_field("Alarm Status", status)
            .with_field("Alarm ID", id)
    }

    #[test]
    fn test_pilot_mode_updates_state_and_engaged() {
        let mut tracker = StateTracker::new("Raymarine");

        let out = tracker.handle_event(&mode_event(64, 0), DEVICE);
        assert_eq!(
            out,
            vec![
                Notification::State { value: AutopilotState::Auto },
                Notification::Engaged { value: true },
            ]
        );
        assert_eq!(tracker.snapshot().state, Some(AutopilotState::Auto));
        assert_eq!(tracker.snapshot().engaged, Some(true));

        tracker.handle_event(&mode_event(0, 0), DEVICE);
        assert_eq!(tracker.snapshot().state, Some(AutopilotState::Standby));
        assert_eq!(tracker.snapshot().engaged, Some(false));

        tracker.handle_event(&mode_event(129, 1), DEVICE);
        assert_eq!(tracker.snapshot().state, Some(AutopilotState::Route));

        tracker.handle_event(&mode_event(-3, 9), DEVICE);
        assert_eq!(tracker.snapshot().state, Some(AutopilotState::Standby));
    }

    #[test]
    fn test_pilot_mode_without_fields_is_ignored() {
        let mut tracker = StateTracker::new("Raymarine");
        let out = tracker.handle_event(&BusEvent::new(65379, DEVICE), DEVICE);
        assert!(out.is_empty());
        assert_eq!(tracker.snapshot().state, None);
    }

    #[test]
    fn test_wind_datum_remapped() {
        let mut tracker = StateTracker::new("Raymarine");
        let event = BusEvent::new(65345, DEVICE).with_field("Wind Datum", 3.0 * PI / 2.0);

        tracker.handle_event(&event, DEVICE);
        match tracker.snapshot().target {
            Some(Target::WindAngle(v)) => assert!((v + PI / 2.0).abs() < 1e-12),
            other => panic!("unexpected target {:?}", other),
        }
    }

    #[test]
    fn test_heading_prefers_true() {
        let mut tracker = StateTracker::new("Raymarine");

        let both = BusEvent::new(65360, DEVICE)
            .with_field("Target Heading True", 1.0)
            .with_field("Target Heading Magnetic", 1.2);
        tracker.handle_event(&both, DEVICE);
        assert_eq!(tracker.snapshot().target, Some(Target::Heading(1.0)));

        let magnetic = BusEvent::new(65360, DEVICE).with_field("Target Heading Magnetic", 1.2);
        tracker.handle_event(&magnetic, DEVICE);
        assert_eq!(tracker.snapshot().target, Some(Target::Heading(1.2)));

        let out = tracker.handle_event(&BusEvent::new(65360, DEVICE), DEVICE);
        assert_eq!(out, vec![Notification::Target { value: None }]);
        assert_eq!(tracker.snapshot().target, None);
    }

    #[test]
    fn test_other_sources_never_mutate() {
        let mut tracker = StateTracker::new("Raymarine");
        let events = [
            mode_event(64, 0),
            BusEvent::new(65345, DEVICE).with_field("Wind Datum", 1.0),
            BusEvent::new(65360, DEVICE).with_field("Target Heading True", 1.0),
            alarm_event(fields::STATUS_MET_NOT_SILENCED, "WP Arrival".into()),
            BusEvent::new(127237, DEVICE),
        ];

        for mut event in events {
            event.src = "115".to_string();
            assert!(tracker.handle_event(&event, DEVICE).is_empty());
        }
        assert_eq!(tracker.snapshot(), &StatusSnapshot::new());
    }

    #[test]
    fn test_tracked_pgn_numbers() {
        for pgn in [65345, 65360, 65379, 65288, 127237] {
            assert_eq!(TrackedPgn::from_pgn(pgn).map(TrackedPgn::pgn), Some(pgn));
        }
        assert_eq!(TrackedPgn::from_pgn(126208), None);
    }

    #[test]
    fn test_untracked_pgn_and_reserved_pgn() {
        let mut tracker = StateTracker::new("Raymarine");
        assert!(tracker.handle_event(&BusEvent::new(130306, DEVICE), DEVICE).is_empty());
        assert!(tracker.handle_event(&BusEvent::new(127237, DEVICE), DEVICE).is_empty());
        assert_eq!(tracker.snapshot(), &StatusSnapshot::new());
    }

    #[test]
    fn test_known_alarm_escalates_to_alert() {
        let mut tracker = StateTracker::new("Raymarine");
        let out = tracker.handle_event(
            &alarm_event(fields::STATUS_MET_NOT_SILENCED, "WP Arrival".into()),
            DEVICE,
        );

        assert_eq!(
            out,
            vec![Notification::Alarm(AlarmNotification {
                message: "waypointArrival".to_string(),
                method: vec![AlarmMethod::Visual, AlarmMethod::Sound],
                state: AlarmSeverity::Alert,
            })]
        );
    }

    #[test]
    fn test_cleared_and_unknown_alarms() {
        let mut tracker = StateTracker::new("Raymarine");

        let out = tracker.handle_event(
            &alarm_event(fields::STATUS_NOT_MET, "Pilot Route Complete".into()),
            DEVICE,
        );
        match &out[..] {
            [Notification::Alarm(alarm)] => {
                assert_eq!(alarm.message, "routeComplete");
                assert_eq!(alarm.state, AlarmSeverity::Normal);
                assert_eq!(alarm.method, vec![AlarmMethod::Visual]);
            }
            other => panic!("unexpected {:?}", other),
        }

        let out = tracker.handle_event(
            &alarm_event("Alarm condition met and silenced", FieldValue::Integer(31)),
            DEVICE,
        );
        match &out[..] {
            [Notification::Alarm(alarm)] => {
                assert_eq!(alarm.message, "Unknown Alarm 31");
                assert_eq!(alarm.state, AlarmSeverity::Alarm);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_alarm_filters() {
        let mut tracker = StateTracker::new("Raymarine");

        let other_vendor = alarm_event(fields::STATUS_MET_NOT_SILENCED, "WP Arrival".into())
            .with_field("Manufacturer Code", "Garmin");
        assert!(tracker.handle_event(&other_vendor, DEVICE).is_empty());

        let no_status = BusEvent::new(65288, DEVICE)
            .with_field("Manufacturer Code", "Raymarine")
            .with_field("Alarm ID", "WP Arrival");
        assert!(tracker.handle_event(&no_status, DEVICE).is_empty());

        let empty_id = alarm_event(fields::STATUS_MET_NOT_SILENCED, "".into());
        assert!(tracker.handle_event(&empty_id, DEVICE).is_empty());
    }
}
