//! Form schemas loaded from documents
//!
//! A schema has three optional top-level tables:
//!
//! ```toml
//! [rules]
//! email = "required|email"
//! age = ["numeric", { name = "between", params = [18, 65] }]
//!
//! [messages]
//! "email.required" = "We need your :attr."
//!
//! [attributes]
//! age = "your age"
//! ```
//!
//! JSON and YAML documents use the same shape.

use std::collections::BTreeMap;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::foundation::{FieldPath, SchemaError};
use crate::form::RuleValidatorBuilder;
use crate::rules::RuleSpec;

/// Rules, templates and labels for one form.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormSchema {
    /// Field path → rule specification, in document order.
    #[serde(default)]
    pub rules: IndexMap<FieldPath, RuleSpec>,

    /// `field.rule` → message template.
    #[serde(default)]
    pub messages: BTreeMap<String, String>,

    /// Field path → label.
    #[serde(default)]
    pub attributes: IndexMap<FieldPath, String>,
}

impl FormSchema {
    /// Parses a JSON document.
    pub fn from_json_str(text: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parses a TOML document.
    #[cfg(feature = "toml")]
    pub fn from_toml_str(text: &str) -> Result<Self, SchemaError> {
        Ok(toml::from_str(text)?)
    }

    /// Parses a YAML document.
    #[cfg(feature = "yaml")]
    pub fn from_yaml_str(text: &str) -> Result<Self, SchemaError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Reads a schema file, choosing the format from its extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let text = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.display().to_string(),
            source,
        })?;

        match extension.as_str() {
            "json" => Self::from_json_str(&text),
            #[cfg(feature = "toml")]
            "toml" => Self::from_toml_str(&text),
            #[cfg(feature = "yaml")]
            "yaml" | "yml" => Self::from_yaml_str(&text),
            _ => Err(SchemaError::UnsupportedFormat(extension)),
        }
    }

    /// Number of fields with rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if the schema declares no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Turns the schema into a builder with the built-in rules, ready for
    /// extra rules and a data source.
    #[must_use]
    pub fn into_builder(self) -> RuleValidatorBuilder {
        RuleValidatorBuilder::new()
            .fields(self.rules)
            .messages(self.messages)
            .attributes(self.attributes)
    }
}
