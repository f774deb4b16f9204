//! CLI for exercising the redeliver policy.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use redeliver_core::config;
use std::path::PathBuf;

use commands::{run_config, run_simulate, run_uuid, FailureKind, SimulateArgs};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "redeliver")]
#[command(about = "Differentiated consumer redelivery policy", long_about = None)]
pub struct Cli {
    /// Read configuration from this file instead of the XDG config path.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Feed a sequence of failures to the policy on one exchange and print each decision.
    Simulate {
        /// Failure kinds in order, e.g. `connect connect other`.
        #[arg(required = true, value_enum)]
        kinds: Vec<FailureKind>,
        /// Override the connectivity ceiling from config.
        #[arg(long, value_name = "N")]
        connect_max: Option<u32>,
        /// Override the other-failure ceiling from config.
        #[arg(long, value_name = "N")]
        other_max: Option<u32>,
        /// Transaction id header to attach for log correlation.
        #[arg(long)]
        transaction_id: Option<String>,
    },

    /// Print random UUIDs.
    Uuid {
        /// How many to print.
        #[arg(long, short = 'n', default_value = "1", value_name = "N")]
        count: usize,
    },

    /// Print the effective configuration as TOML.
    Config,
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = match &cli.config {
            Some(path) => config::load_from(path)?,
            None => config::load_or_init()?,
        };
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Simulate {
                kinds,
                connect_max,
                other_max,
                transaction_id,
            } => {
                let args = SimulateArgs {
                    connect_max,
                    other_max,
                    transaction_id,
                };
                run_simulate(&cfg, &kinds, &args)?
            }
            CliCommand::Uuid { count } => run_uuid(count),
            CliCommand::Config => run_config(&cfg)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
