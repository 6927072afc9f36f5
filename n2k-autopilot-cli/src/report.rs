//! Console output for replay results, frames and status

use anyhow::Result;
use n2k_autopilot::{AutopilotStatus, DeviceProperties, N2kFrame, Notification};
use std::io::Write;

/// Print notifications, one per line
pub fn write_notifications<W: Write>(out: &mut W, notifications: &[Notification]) -> Result<()> {
    if notifications.is_empty() {
        writeln!(out, "No autopilot updates received")?;
        return Ok(());
    }

    writeln!(out, "Autopilot updates ({}):", notifications.len())?;
    for notification in notifications {
        writeln!(out, "  {}", notification)?;
    }
    Ok(())
}

/// Print outbound frames in transport form
pub fn write_frames<W: Write>(out: &mut W, frames: &[N2kFrame]) -> Result<()> {
    for frame in frames {
        writeln!(out, "{}", frame)?;
    }
    Ok(())
}

/// Print the status, either as JSON or as a short summary
pub fn write_status<W: Write>(out: &mut W, status: &AutopilotStatus, json: bool) -> Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(status)?)?;
        return Ok(());
    }

    let snapshot = &status.snapshot;
    writeln!(out, "Status:")?;
    writeln!(out, "  State:   {}", snapshot.state_name())?;
    writeln!(
        out,
        "  Engaged: {}",
        snapshot.engaged.map(|e| e.to_string()).unwrap_or_else(|| "unknown".into())
    )?;
    match snapshot.target {
        Some(target) => writeln!(
            out,
            "  Target:  {:.4} rad ({:.1}°)",
            target.radians(),
            target.radians().to_degrees()
        )?,
        None => writeln!(out, "  Target:  none")?,
    }
    Ok(())
}

/// Print the configuration UI descriptor as JSON
pub fn write_properties<W: Write>(out: &mut W, properties: &DeviceProperties) -> Result<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(properties)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use n2k_autopilot::{AutopilotConfig, AutopilotEngine, AutopilotState, BusEvent};

    #[test]
    fn test_status_summary() {
        let mut engine = AutopilotEngine::new(AutopilotConfig::new(), Vec::<N2kFrame>::new());
        engine.handle_event(
            &BusEvent::new(65379, "204")
                .with_field("Pilot Mode", 0i64)
                .with_field("Sub Mode", 0i64),
        );

        let mut out = Vec::new();
        write_status(&mut out, &engine.status(), false).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("State:   standby"));
        assert!(text.contains("Engaged: false"));
        assert!(text.contains("Target:  none"));
    }

    #[test]
    fn test_notifications_listing() {
        let mut out = Vec::new();
        write_notifications(
            &mut out,
            &[Notification::State { value: AutopilotState::Route }],
        )
        .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Autopilot updates (1):\n  state = route\n"
        );
    }
}
