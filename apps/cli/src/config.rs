//! Layered defaults for the CLI.
//!
//! Precedence, lowest first: built-in defaults, the settings file, then
//! `FORMRULE_*` environment variables. Command-line flags are applied on top
//! by the caller.

use std::path::{Path, PathBuf};

use anyhow::Context;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use crate::cli::OutputFormat;

/// Settings file looked up in the working directory.
pub const DEFAULT_FILE: &str = "formrule.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Report format used when `--format` is not given.
    pub format: OutputFormat,

    /// Schema used when `--schema` is not given.
    pub schema: Option<PathBuf>,
}

impl Settings {
    /// Loads settings from `file` (or [`DEFAULT_FILE`]) and the environment.
    ///
    /// A missing default file is fine; a missing explicit file is not.
    pub fn load(file: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        figment = match file {
            Some(path) => {
                anyhow::ensure!(path.is_file(), "settings file {} not found", path.display());
                figment.merge(Toml::file(path))
            }
            None => figment.merge(Toml::file(DEFAULT_FILE)),
        };

        figment
            .merge(Env::prefixed("FORMRULE_").ignore(&["config"]))
            .extract()
            .context("invalid formrule settings")
    }
}
