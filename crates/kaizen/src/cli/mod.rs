//! Command-line interface for kaizen.
//!
//! This module provides the CLI structure for the `kaizen` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AnalysisStatusArg, ConfigCommand, InitiativeCommand, InitiativeFields, InitiativeListCommand,
    InitiativeStatusArg, OutputFormat, RcaCommand, RcaFields, RcaListCommand, ResetCommand,
    ResetTarget, StatusCommand,
};

/// kaizen - Track continuous-improvement work on the shop floor
///
/// Keeps Kaizen initiatives and 5-Why root cause analyses in a local
/// database, with filtering, dashboard rollups and CSV export.
#[derive(Debug, Parser)]
#[command(name = "kaizen")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage Kaizen initiatives
    #[command(subcommand)]
    Initiative(InitiativeCommand),

    /// Manage 5-Why root cause analyses
    #[command(subcommand)]
    Rca(RcaCommand),

    /// Delete every record of one kind
    Reset(ResetCommand),

    /// Show database status
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        crate::logging::Verbosity::from_flags(self.quiet, self.verbose)
    }
}
