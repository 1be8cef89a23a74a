//! Argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

#[derive(Debug, Parser)]
#[command(
    name = "formrule",
    version,
    about = "Validate JSON documents against declarative field rules"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG` wins.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Settings file (default: ./formrule.toml when present).
    #[arg(long, value_name = "PATH", global = true, env = "FORMRULE_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate a data document against a form schema.
    Check(CheckArgs),

    /// List the built-in rules and their message templates.
    Rules,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Form schema (.json, .toml, .yaml or .yml).
    #[arg(long, value_name = "FILE")]
    pub schema: Option<PathBuf>,

    /// Data document (.json, .toml, .yaml or .yml).
    #[arg(long, value_name = "FILE")]
    pub data: PathBuf,

    /// Report format.
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One `field: message` line per error.
    #[default]
    Text,
    /// `{"passes": bool, "errors": {field: [messages]}}`.
    Json,
}
