//! The `check` and `rules` commands.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, bail};
use formrule_validator::prelude::*;
use serde::Serialize;

use crate::cli::OutputFormat;

/// Outcome of a `check` run.
#[derive(Debug, Serialize)]
pub struct Report {
    pub passes: bool,
    pub errors: ErrorBag,
}

impl Report {
    pub fn write(&self, format: OutputFormat, out: &mut impl Write) -> anyhow::Result<()> {
        match format {
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut *out, self)?;
                writeln!(out)?;
            }
            OutputFormat::Text if self.passes => writeln!(out, "ok")?,
            OutputFormat::Text => {
                for (field, messages) in self.errors.iter() {
                    for message in messages {
                        writeln!(out, "{field}: {message}")?;
                    }
                }
            }
        }
        Ok(())
    }
}

/// Loads the schema and data, runs one full pass and reports the bag.
pub fn run(schema: &Path, data: &Path) -> anyhow::Result<Report> {
    let schema = FormSchema::from_path(schema)
        .with_context(|| format!("failed to load schema {}", schema.display()))?;
    let data = load_data(data)?;

    tracing::info!(fields = schema.len(), "schema loaded");

    let form = schema.into_builder().build_value(data);
    form.execute();

    Ok(Report {
        passes: form.passes(),
        errors: form.errors(),
    })
}

fn load_data(path: &Path) -> anyhow::Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read data {}", path.display()))?;
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    let value: Value = match extension.as_str() {
        "json" => serde_json::from_str(&text)?,
        "toml" => toml::from_str(&text)?,
        "yaml" | "yml" => serde_yaml::from_str(&text)?,
        other => bail!("unsupported data format `{other}` (expected json, toml, yaml or yml)"),
    };
    Ok(value)
}

/// Prints every built-in rule with its default template.
pub fn list_rules(out: &mut impl Write) -> anyhow::Result<()> {
    let registry = RuleRegistry::builtin();
    for name in registry.names() {
        let template = registry
            .get(name)
            .and_then(|rule| rule.default_message())
            .unwrap_or_default();
        writeln!(out, "{name:<10} {template}")?;
    }
    writeln!(out, "{NULLABLE:<10} (marker) skip the remaining rules when the value is empty")?;
    Ok(())
}
