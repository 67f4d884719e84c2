//! Explorer Control - runs gauntlet exploration cycles from the terminal.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use explorer_common::logging::init_logging;
use explorer_common::ExplorerConfig;
use std::path::PathBuf;

// Version is embedded at build time
const VERSION: &str = env!("EXPLORER_VERSION");

#[derive(Parser, Debug)]
#[command(name = "explorerctl")]
#[command(about = "Edge Explorer - evolve ideas through a gauntlet of perturbations", long_about = None)]
#[command(version = VERSION)]
struct Cli {
    /// Config file (default: $XDG_CONFIG_HOME/edge-explorer/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one exploration cycle and save its transcript
    Run {
        /// Cycle number recorded in the transcript and file name
        cycle: u64,

        /// Claimed fact to explore (default: ask the model for one)
        #[arg(long)]
        topic: Option<String>,

        /// Seed for perturbation sampling, for reproducible runs
        #[arg(long)]
        seed: Option<u64>,

        /// Fixed number of gauntlet iterations
        #[arg(long)]
        iterations: Option<usize>,

        /// Commit the synthesis to the configured repository
        #[arg(long)]
        publish: bool,

        /// Also write the run record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Ask the model for a fresh topic and print it
    Topic,

    /// Summarize an existing transcript
    Synthesize {
        /// Transcript file
        file: PathBuf,

        /// Cycle number for the commit title
        cycle: u64,

        /// Commit the synthesis to the configured repository
        #[arg(long)]
        publish: bool,
    },

    /// List the perturbation catalog
    Lenses,

    /// Show the effective configuration
    Config {
        /// Write a default config file if none exists
        #[arg(long)]
        init: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // The file --init is about to create must not be required to exist
    if let Commands::Config { init: true } = cli.command {
        init_logging("info", cli.verbose)?;
        return commands::init_config(cli.config.as_deref());
    }

    let config = ExplorerConfig::load(cli.config.as_deref())?;
    init_logging(&config.log.level, cli.verbose)?;

    match cli.command {
        Commands::Run {
            cycle,
            topic,
            seed,
            iterations,
            publish,
            json,
        } => commands::run(
            &config,
            commands::RunOptions {
                cycle,
                topic,
                seed,
                iterations,
                publish,
                json,
            },
        ),
        Commands::Topic => commands::topic(&config),
        Commands::Synthesize {
            file,
            cycle,
            publish,
        } => commands::synthesize(&config, &file, cycle, publish),
        Commands::Lenses => commands::lenses(&config),
        Commands::Config { .. } => commands::show_config(&config),
    }
}
