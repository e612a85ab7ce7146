//! Satiety replay driver
//!
//! Replays scripted scenarios or seeded soak runs through the engine and
//! writes one JSON line per depletion tick.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use satiety_core::{
    default_config_toml, soak, EngineConfig, ReportError, ReportWriter, Scenario, SoakOptions,
    SoakSummary, TickReport,
};

/// Command line arguments for the replay driver
#[derive(Parser, Debug)]
#[command(name = "satiety_replay")]
#[command(about = "Replay depletion scenarios through the satiety engine")]
struct Args {
    /// Engine config file; written with defaults if missing
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a TOML scenario
    Replay {
        /// Scenario file
        scenario: PathBuf,

        /// Write tick reports here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Run a seeded random workload
    Soak {
        /// Random seed for reproducibility
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Number of agents
        #[arg(long, default_value_t = 4)]
        agents: u64,

        /// Simulated duration in milliseconds
        #[arg(long, default_value_t = 60_000)]
        duration_ms: i64,

        /// Depletion tick interval in milliseconds
        #[arg(long, default_value_t = 1_000)]
        tick_interval_ms: i64,

        /// Write tick reports here; only the summary is printed otherwise
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Print the default config file
    DefaultConfig,
}

fn load_config(path: Option<&PathBuf>) -> EngineConfig {
    match path {
        Some(path) => EngineConfig::load_or_create(path),
        None => EngineConfig::default(),
    }
}

fn write_reports(reports: &[TickReport], output: Option<&PathBuf>) -> Result<u64, ReportError> {
    let mut writer = match output {
        Some(path) => ReportWriter::create(path)?,
        None => ReportWriter::from_writer(std::io::stdout()),
    };
    writer.write_all(reports)?;
    writer.flush()?;
    Ok(writer.line_count())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match args.command {
        Command::DefaultConfig => {
            print!("{}", default_config_toml());
            ExitCode::SUCCESS
        }

        Command::Replay { scenario, output } => {
            let config = load_config(args.config.as_ref());
            let scenario = match Scenario::from_file(&scenario) {
                Ok(scenario) => scenario,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return ExitCode::FAILURE;
                }
            };

            let reports = scenario.run(config);
            match write_reports(&reports, output.as_ref()) {
                Ok(lines) => {
                    tracing::info!("wrote {} tick reports", lines);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    ExitCode::FAILURE
                }
            }
        }

        Command::Soak {
            seed,
            agents,
            duration_ms,
            tick_interval_ms,
            output,
        } => {
            let config = load_config(args.config.as_ref());
            let options = SoakOptions {
                seed,
                agents,
                duration_ms,
                tick_interval_ms,
                ..SoakOptions::default()
            };
            let reports = soak::run(&options, config);

            if let Some(path) = output.as_ref() {
                if let Err(e) = write_reports(&reports, Some(path)) {
                    eprintln!("Error: {}", e);
                    return ExitCode::FAILURE;
                }
            }

            let summary = SoakSummary::from_reports(&reports);
            println!("Soak run");
            println!("========");
            println!("Seed: {}", seed);
            println!("Agents: {}", agents);
            println!("Ticks: {}", summary.ticks);
            println!("Pass-through ticks: {}", summary.passthrough_ticks);
            for (action, count) in &summary.actions {
                println!("  {:<18} {}", action.as_str(), count);
            }
            ExitCode::SUCCESS
        }
    }
}
