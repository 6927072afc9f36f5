//! NMEA2000 Autopilot CLI Application
//!
//! Command-line front end for the n2k-autopilot library:
//! - Discovers the autopilot in a source directory snapshot
//! - Replays captured, field-decoded bus events and prints status updates
//! - Encodes a host command and prints the outbound frames

use anyhow::Result;
use clap::Parser;
use n2k_autopilot::{AutopilotEngine, N2kFrame};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

mod config;
mod replay;
mod report;

/// N2K Autopilot - Translate autopilot status and commands
#[derive(Parser, Debug)]
#[command(name = "n2k-autopilot-cli")]
#[command(about = "Replay NMEA2000 autopilot traffic and encode commands", long_about = None)]
#[command(version)]
struct Args {
    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Autopilot bus id (overrides the configuration)
    #[arg(short, long, value_name = "ID")]
    device_id: Option<String>,

    /// Source directory snapshot (JSON) used for discovery
    #[arg(short, long, value_name = "FILE")]
    sources: Option<PathBuf>,

    /// Decoded bus events to replay (JSON lines, `-` for none)
    #[arg(short, long, value_name = "FILE")]
    events: Option<PathBuf>,

    /// Request a state change (auto, wind, route, standby)
    #[arg(long, value_name = "STATE")]
    state: Option<String>,

    /// Set the target heading in radians
    #[arg(long, value_name = "RADIANS", allow_hyphen_values = true)]
    target: Option<f64>,

    /// Adjust the target by +1, -1, +10 or -10 degrees
    #[arg(long, value_name = "DELTA", allow_hyphen_values = true)]
    adjust: Option<f64>,

    /// Engage the autopilot in its default engaged state
    #[arg(long, conflicts_with = "disengage")]
    engage: bool,

    /// Put the autopilot in standby
    #[arg(long)]
    disengage: bool,

    /// Print the device property descriptor
    #[arg(long)]
    properties: bool,

    /// Print the final status as JSON
    #[arg(long)]
    json: bool,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("N2K Autopilot CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using autopilot library v{}", n2k_autopilot::VERSION);

    let stdout = io::stdout();
    run(&args, &mut stdout.lock())
}

/// Discovery, replay and command execution, writing results to `out`
fn run<W: Write>(args: &Args, out: &mut W) -> Result<()> {
    let mut app_config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => config::AppConfig::default(),
    };
    if let Some(id) = &args.device_id {
        app_config.autopilot.device_id = Some(id.clone());
    }

    let mut engine = AutopilotEngine::new(app_config.autopilot.clone(), Vec::<N2kFrame>::new());

    // Discovery
    let sources = match args.sources.as_ref().or(app_config.input.sources.as_ref()) {
        Some(path) => Some(config::load_sources(path)?),
        None => None,
    };
    let properties = engine.properties(sources.as_ref());
    log::info!("{}", properties.device_id.description);
    if args.properties {
        report::write_properties(out, &properties)?;
    }

    // Replay
    let events = args.events.as_ref().or(app_config.input.events.as_ref());
    if let Some(path) = events.filter(|p| !is_no_input(p)) {
        let (notifications, stats) = replay::replay_file(path, &mut engine)?;
        log::debug!("Replay stats: {:?}", stats);
        report::write_notifications(out, &notifications)?;
    }

    // Command
    run_command(args, &mut engine)?;
    report::write_frames(out, engine.sink())?;

    report::write_status(out, &engine.status(), args.json)?;
    Ok(())
}

/// `-` stands for "no input file"
fn is_no_input(path: &Path) -> bool {
    path.as_os_str() == "-"
}

/// Execute the command requested on the command line, if any
fn run_command(args: &Args, engine: &mut AutopilotEngine<Vec<N2kFrame>>) -> Result<()> {
    if let Some(state) = &args.state {
        let engaged = engine.set_state(state)?;
        log::info!("Requested state {} (engaged: {})", state, engaged);
    }
    if args.engage {
        engine.engage()?;
    }
    if args.disengage {
        engine.disengage()?;
    }
    if let Some(target) = args.target {
        engine.set_target(target)?;
    }
    if let Some(delta) = args.adjust {
        engine.adjust_target(delta)?;
    }
    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
