//! Forwarding window simulator CLI.
//!
//! This binary replays recorded instruction traces. It performs:
//! 1. **Trace run:** Replay a JSON Lines trace (file or stdin) and write the forwarding report.
//! 2. **Config dump:** Print the effective configuration of a profile as JSON.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter};
use std::path::Path;
use std::process;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use robscan_core::config::{Config, Profile};
use robscan_core::sim::{TraceReader, replay};
use robscan_core::window::ForwardingSimulator;

#[derive(Parser, Debug)]
#[command(
    name = "robscan",
    author,
    version,
    about = "Reorder-window forwarding potential estimator",
    long_about = "Replay a dynamic instruction trace through a bounded in-flight window and estimate how many results could be forwarded straight to a nearby consumer.\n\nTraces are JSON Lines, one instruction per line.\n\nExamples:\n  robscan run --trace app.jsonl\n  robscan run --trace - --profile compact --baseline < app.jsonl\n  robscan run --trace app.jsonl --config '{\"window\": {\"capacity\": 128}}'\n  robscan config --profile compact"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a trace and write the forwarding report.
    Run {
        /// Trace file, or `-` for stdin.
        #[arg(short, long)]
        trace: String,

        /// Report path (defaults to `general.output`).
        #[arg(short, long)]
        output: Option<String>,

        /// Configuration preset.
        #[arg(long, default_value = "full")]
        profile: Profile,

        /// JSON overlay applied to the profile: inline JSON or a path to a JSON file.
        #[arg(long)]
        config: Option<String>,

        /// Window capacity override.
        #[arg(long)]
        capacity: Option<usize>,

        /// Count only forwards that need no reordering.
        #[arg(long)]
        baseline: bool,

        /// Do not print the statistics block.
        #[arg(short, long)]
        quiet: bool,
    },

    /// Print the effective configuration as JSON.
    Config {
        /// Configuration preset.
        #[arg(long, default_value = "full")]
        profile: Profile,

        /// JSON overlay applied to the profile: inline JSON or a path to a JSON file.
        #[arg(long)]
        config: Option<String>,
    },
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            trace,
            output,
            profile,
            config,
            capacity,
            baseline,
            quiet,
        } => {
            let mut config = resolve_config(profile, config.as_deref());
            if let Some(capacity) = capacity {
                config.window.capacity = capacity;
            }
            if baseline {
                config.policy.baseline = true;
            }
            if let Some(output) = output {
                config.general.output = output;
            }
            cmd_run(config, &trace, quiet);
        }
        Commands::Config { profile, config } => {
            let config = resolve_config(profile, config.as_deref());
            match serde_json::to_string_pretty(&config) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("Error: could not serialize configuration: {e}");
                    process::exit(1);
                }
            }
        }
    }
}

/// Installs the stderr log subscriber; `RUST_LOG` selects the level, default `warn`.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Builds the configuration from a profile and an optional overlay.
///
/// The overlay is read from disk when it names an existing file and is treated
/// as inline JSON otherwise. Exits with code 1 on invalid input.
fn resolve_config(profile: Profile, overlay: Option<&str>) -> Config {
    let base = Config::for_profile(profile);
    let Some(overlay) = overlay else {
        return base;
    };
    let json = if Path::new(overlay).is_file() {
        fs::read_to_string(overlay).unwrap_or_else(|e| {
            eprintln!("Error reading config {overlay}: {e}");
            process::exit(1);
        })
    } else {
        overlay.to_string()
    };
    base.overlay(&json).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        process::exit(1);
    })
}

/// Replays `trace` through a fresh simulator and writes the report.
///
/// Exits with code 1 on configuration, trace or report errors.
fn cmd_run(config: Config, trace: &str, quiet: bool) {
    let output = config.general.output.clone();
    let include_potential = config.general.report_potential;
    let mut sim = ForwardingSimulator::new(config).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        process::exit(1);
    });

    let input: Box<dyn BufRead> = if trace == "-" {
        Box::new(io::stdin().lock())
    } else {
        match File::open(trace) {
            Ok(file) => Box::new(BufReader::new(file)),
            Err(e) => {
                eprintln!("Error opening trace {trace}: {e}");
                process::exit(1);
            }
        }
    };

    if let Err(e) = replay(&mut sim, TraceReader::new(input)) {
        eprintln!("Error: {e}");
        process::exit(1);
    }

    let counters = sim.counters();
    info!(
        instructions = counters.instructions,
        forwards = counters.forwards,
        output = %output,
        "run complete"
    );

    let written = File::create(&output)
        .and_then(|file| counters.write_report(BufWriter::new(file), include_potential));
    if let Err(e) = written {
        eprintln!("Error writing report {output}: {e}");
        process::exit(1);
    }

    if !quiet {
        counters.print();
    }
}
