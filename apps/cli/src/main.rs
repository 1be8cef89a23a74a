//! formrule: validate documents against declarative field rules.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod check;
mod cli;
mod config;

use crate::cli::{Cli, Command};
use crate::config::Settings;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut stdout = io::stdout().lock();

    match cli.command {
        Command::Check(args) => {
            let settings = Settings::load(cli.config.as_deref())?;
            let Some(schema) = args.schema.or(settings.schema) else {
                anyhow::bail!("no schema given: pass --schema or set `schema` in the settings");
            };
            let format = args.format.unwrap_or(settings.format);

            let report = check::run(&schema, &args.data)?;
            report.write(format, &mut stdout)?;
            Ok(if report.passes {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            })
        }
        Command::Rules => {
            check::list_rules(&mut stdout)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// `RUST_LOG` when set, otherwise `warn` raised one level per `-v`.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
