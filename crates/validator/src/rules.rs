//! Rule specifications and their parsed form
//!
//! A field's rules are written either as a pipe-delimited string or as an
//! explicit list of entries:
//!
//! ```rust
//! use formrule_validator::rules::{ParsedRules, RuleEntry, RuleSpec};
//!
//! let rules = ParsedRules::parse([
//!     ("email", RuleSpec::from("required|email")),
//!     ("age", RuleSpec::from("numeric|between:18,65")),
//!     (
//!         "nickname",
//!         RuleSpec::from(vec![
//!             RuleEntry::named("nullable"),
//!             RuleEntry::parameterized("max", ["12"]),
//!         ]),
//!     ),
//! ]);
//!
//! assert_eq!(
//!     rules.get("age").unwrap(),
//!     &[
//!         RuleEntry::named("numeric"),
//!         RuleEntry::parameterized("between", ["18", "65"]),
//!     ]
//! );
//! ```

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

use crate::foundation::{FieldPath, Value};

// ============================================================================
// PREDICATE
// ============================================================================

type PredicateFn = dyn Fn(&Value, &str) -> Option<String> + Send + Sync;

/// An inline rule: receives `(value, field path)` and returns an error
/// message, or `None` when the value is acceptable.
///
/// An empty returned message counts as no error.
#[derive(Clone)]
pub struct Predicate(Arc<PredicateFn>);

impl Predicate {
    /// Wraps a closure.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value, &str) -> Option<String> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Runs the predicate.
    #[must_use]
    pub fn call(&self, value: &Value, path: &str) -> Option<String> {
        (self.0)(value, path)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(<function>)")
    }
}

// ============================================================================
// RULE ENTRY
// ============================================================================

/// One step of a field's rule pipeline.
#[derive(Debug, Clone)]
pub enum RuleEntry {
    /// A registered rule referenced by name, e.g. `required`.
    Named(String),

    /// A registered rule with positional parameters, e.g. `between:18,65`.
    Parameterized {
        /// Rule name.
        name: String,
        /// Raw parameter text, in order.
        params: Vec<String>,
    },

    /// An inline check.
    Predicate(Predicate),
}

impl RuleEntry {
    /// Creates a named entry.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Creates a parameterized entry.
    pub fn parameterized<I, S>(name: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Parameterized {
            name: name.into(),
            params: params.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates an inline entry from a closure.
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&Value, &str) -> Option<String> + Send + Sync + 'static,
    {
        Self::Predicate(Predicate::new(f))
    }

    /// Rule name, `None` for inline entries.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Named(name) | Self::Parameterized { name, .. } => Some(name),
            Self::Predicate(_) => None,
        }
    }

    /// Positional parameters; empty unless parameterized.
    #[must_use]
    pub fn params(&self) -> &[String] {
        match self {
            Self::Parameterized { params, .. } => params,
            _ => &[],
        }
    }

    /// Parses one piece of a pipe string: `name` or `name:a,b,c`.
    fn from_piece(piece: &str) -> Self {
        match piece.split_once(':') {
            Some((name, args)) => Self::Parameterized {
                name: name.trim().to_owned(),
                params: args.split(',').map(str::to_owned).collect(),
            },
            None => Self::Named(piece.trim().to_owned()),
        }
    }
}

/// Inline entries are equal only when they share the same closure.
impl PartialEq for RuleEntry {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Named(a), Self::Named(b)) => a == b,
            (
                Self::Parameterized { name: a, params: pa },
                Self::Parameterized { name: b, params: pb },
            ) => a == b && pa == pb,
            (Self::Predicate(a), Self::Predicate(b)) => Arc::ptr_eq(&a.0, &b.0),
            _ => false,
        }
    }
}

impl From<&str> for RuleEntry {
    fn from(name: &str) -> Self {
        Self::named(name)
    }
}

impl From<Predicate> for RuleEntry {
    fn from(predicate: Predicate) -> Self {
        Self::Predicate(predicate)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Name(String),
    Call {
        name: String,
        #[serde(default, deserialize_with = "params_as_text")]
        params: Vec<String>,
    },
}

/// Parameters may be written as strings, numbers or booleans in documents.
fn params_as_text<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|value| match value {
            Value::String(s) => s,
            other => other.to_string(),
        })
        .collect())
}

impl<'de> Deserialize<'de> for RuleEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawEntry::deserialize(deserializer)? {
            RawEntry::Name(name) => Self::Named(name),
            RawEntry::Call { name, params } => Self::Parameterized { name, params },
        })
    }
}

// ============================================================================
// RULE SPEC
// ============================================================================

/// How a field's rules are written.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RuleSpec {
    /// `"required|max:10"`
    Pipe(String),
    /// An explicit list of entries, used as given.
    List(Vec<RuleEntry>),
}

impl RuleSpec {
    /// Produces the ordered pipeline.
    ///
    /// Pipe strings are split on `|`; a piece containing `:` is split once into
    /// the name and a comma-separated parameter list. Empty pieces are skipped.
    /// List entries are taken verbatim, so a list string such as `"max:10"`
    /// names a rule literally called `max:10`.
    #[must_use]
    pub fn parse(&self) -> Vec<RuleEntry> {
        match self {
            Self::Pipe(text) => text
                .split('|')
                .filter(|piece| !piece.trim().is_empty())
                .map(RuleEntry::from_piece)
                .collect(),
            Self::List(entries) => entries.clone(),
        }
    }
}

impl From<&str> for RuleSpec {
    fn from(text: &str) -> Self {
        Self::Pipe(text.to_owned())
    }
}

impl From<String> for RuleSpec {
    fn from(text: String) -> Self {
        Self::Pipe(text)
    }
}

impl From<Vec<RuleEntry>> for RuleSpec {
    fn from(entries: Vec<RuleEntry>) -> Self {
        Self::List(entries)
    }
}

// ============================================================================
// PARSED RULES
// ============================================================================

/// Field path → pipeline, in declaration order. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedRules {
    fields: IndexMap<FieldPath, Arc<[RuleEntry]>>,
}

impl ParsedRules {
    /// Parses every field's specification.
    ///
    /// A field declared twice keeps its first position and its last pipeline.
    pub fn parse<I, K, S>(specs: I) -> Self
    where
        I: IntoIterator<Item = (K, S)>,
        K: Into<FieldPath>,
        S: Into<RuleSpec>,
    {
        let fields = specs
            .into_iter()
            .map(|(path, spec)| {
                let spec: RuleSpec = spec.into();
                (path.into(), Arc::from(spec.parse()))
            })
            .collect();
        Self { fields }
    }

    /// Pipeline for a field.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&[RuleEntry]> {
        self.fields.get(path).map(|rules| &**rules)
    }

    /// Shared handle to a field's pipeline.
    #[must_use]
    pub fn pipeline(&self, path: &str) -> Option<Arc<[RuleEntry]>> {
        self.fields.get(path).cloned()
    }

    /// Returns true if the field has rules.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.fields.contains_key(path)
    }

    /// Declared fields in order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldPath> {
        self.fields.keys()
    }

    /// `(field, pipeline)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&FieldPath, &[RuleEntry])> {
        self.fields.iter().map(|(path, rules)| (path, &**rules))
    }

    /// Number of declared fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no field is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_pipe_parsing_keeps_order() {
        let parsed = RuleSpec::from("nullable|email|max:255").parse();
        assert_eq!(
            parsed,
            vec![
                RuleEntry::named("nullable"),
                RuleEntry::named("email"),
                RuleEntry::parameterized("max", ["255"]),
            ]
        );
    }

    #[test]
    fn test_pipe_parsing_params() {
        let parsed = RuleSpec::from("between:18,65").parse();
        assert_eq!(parsed[0].name(), Some("between"));
        assert_eq!(parsed[0].params(), ["18", "65"]);
    }

    #[test]
    fn test_pipe_parsing_skips_empty_pieces() {
        let parsed = RuleSpec::from("required||email|").parse();
        assert_eq!(parsed.len(), 2);
    }

    #[test]
    fn test_only_first_colon_splits() {
        let parsed = RuleSpec::from("pattern:a:b").parse();
        assert_eq!(parsed[0], RuleEntry::parameterized("pattern", ["a:b"]));
    }

    #[test]
    fn test_predicate_identity() {
        let entry = RuleEntry::predicate(|_, _| None);
        assert_eq!(entry, entry.clone());
        assert_ne!(entry, RuleEntry::predicate(|_, _| None));
        assert_eq!(entry.name(), None);
    }

    #[test]
    fn test_deserialize_specs() {
        let spec: RuleSpec = serde_json::from_value(json!("required|email")).unwrap();
        assert_eq!(spec, RuleSpec::Pipe("required|email".to_owned()));

        let spec: RuleSpec = serde_json::from_value(json!([
            "required",
            {"name": "between", "params": [18, "65"]},
            {"name": "numeric"}
        ]))
        .unwrap();
        assert_eq!(
            spec.parse(),
            vec![
                RuleEntry::named("required"),
                RuleEntry::parameterized("between", ["18", "65"]),
                RuleEntry::parameterized("numeric", Vec::<String>::new()),
            ]
        );
    }

    #[test]
    fn test_parsed_rules_order() {
        let rules = ParsedRules::parse([("b", "required"), ("a", "email"), ("c", "numeric")]);
        let order: Vec<&str> = rules.fields().map(FieldPath::as_str).collect();
        assert_eq!(order, ["b", "a", "c"]);
        assert!(rules.contains("a"));
        assert!(rules.get("z").is_none());
    }
}
