//! CLI entry point for acctsync.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use acctdiff_sync::config::Config;
use acctdiff_sync::error::Error;
use acctdiff_sync::workflow::{self, InputFiles, ReviewOptions};

#[derive(Parser)]
#[command(name = "acctsync")]
#[command(about = "Bank account sync: diff known accounts against a provider's")]
#[command(version)]
struct Cli {
    /// Path to the config file [default: acctsync.toml, if present]
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify provider accounts against known accounts
    Diff {
        /// Path to known.json
        known: PathBuf,
        /// Path to provider.json
        provider: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the sync plan, one action per account
    Plan {
        /// Path to known.json
        known: PathBuf,
        /// Path to provider.json
        provider: PathBuf,
    },

    /// Decide on duplicate candidates and print the resolved plan
    Review {
        /// Path to known.json
        known: PathBuf,
        /// Path to provider.json
        provider: PathBuf,

        /// Merge every candidate without prompting
        #[arg(long)]
        yes: bool,

        /// Write the resolved plan to this file
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let cli = Cli::parse();

    let config = match Config::load_or_default(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {e}");
            process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Diff {
            known,
            provider,
            json,
        } => workflow::run_diff(&config, &InputFiles { known, provider }, json),
        Command::Plan { known, provider } => {
            workflow::run_plan(&config, &InputFiles { known, provider })
        }
        Command::Review {
            known,
            provider,
            yes,
            output,
        } => workflow::run_review(
            &config,
            &InputFiles { known, provider },
            &ReviewOptions { yes, output },
        ),
    };

    if let Err(e) = result {
        match &e {
            Error::Aborted(msg) => {
                eprintln!("{msg}");
                process::exit(0);
            }
            _ => {
                eprintln!("Error: {e}");
                process::exit(1);
            }
        }
    }
}
