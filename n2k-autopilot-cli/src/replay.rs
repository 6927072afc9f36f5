//! Replay of captured bus events through the engine
//!
//! Input is one decoded event per line (`{"pgn":..,"src":..,"fields":{..}}`).
//! Blank lines and lines starting with `#` are skipped; malformed lines are
//! logged and skipped, the same way the engine tolerates a noisy bus.

use anyhow::{Context, Result};
use n2k_autopilot::{AutopilotEngine, BusEvent, FrameSink, Notification};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Counters for one replay run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReplayStats {
    pub lines: usize,
    pub events: usize,
    pub malformed: usize,
}

/// Feed every event from `reader` to the engine
pub fn replay_reader<R: BufRead, S: FrameSink>(
    reader: R,
    engine: &mut AutopilotEngine<S>,
) -> Result<(Vec<Notification>, ReplayStats)> {
    let mut notifications = Vec::new();
    let mut stats = ReplayStats::default();

    for (index, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read event line {}", index + 1))?;
        stats.lines += 1;

        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        match serde_json::from_str::<BusEvent>(trimmed) {
            Ok(event) => {
                stats.events += 1;
                notifications.extend(engine.handle_event(&event));
            }
            Err(e) => {
                stats.malformed += 1;
                log::warn!("Skipping malformed event on line {}: {}", index + 1, e);
            }
        }
    }

    log::info!(
        "Replayed {} events ({} malformed lines skipped)",
        stats.events,
        stats.malformed
    );
    Ok((notifications, stats))
}

/// Replay an events file
pub fn replay_file<S: FrameSink>(
    path: &Path,
    engine: &mut AutopilotEngine<S>,
) -> Result<(Vec<Notification>, ReplayStats)> {
    let file = File::open(path).with_context(|| format!("Failed to open events file: {:?}", path))?;
    replay_reader(BufReader::new(file), engine)
}
