//! Error types for rule failures and configuration problems
//!
//! A failing rule is not an error in the `Result` sense for callers of the
//! form API: it becomes a message in the error bag. Internally a rule reports
//! failure through [`ValidationError`], which carries the rule code and the
//! placeholder values used when rendering the message template.
//!
//! All string fields use `Cow<'static, str>` so static rule codes and
//! placeholder names never allocate.

use std::borrow::Cow;
use std::fmt;

// ============================================================================
// VALIDATION ERROR
// ============================================================================

/// A rule failure with the placeholder values for its message template.
///
/// # Examples
///
/// ```rust
/// use formrule_validator::foundation::ValidationError;
///
/// let error = ValidationError::new("between")
///     .with_param("min", "18")
///     .with_param("max", "65");
///
/// assert_eq!(error.param("min"), Some("18"));
/// assert_eq!(error.to_string(), "between (min=18, max=65)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Rule code, also the suffix of the message-template key.
    ///
    /// Examples: "required", "email", "between"
    pub code: Cow<'static, str>,

    /// Placeholder values, in the order the rule declares them.
    ///
    /// Example: `[("min", "18"), ("max", "65")]`
    pub params: Vec<(Cow<'static, str>, Cow<'static, str>)>,
}

impl ValidationError {
    /// Creates a failure for the given rule code.
    pub fn new(code: impl Into<Cow<'static, str>>) -> Self {
        Self {
            code: code.into(),
            params: Vec::new(),
        }
    }

    /// Adds a placeholder value.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_param(
        mut self,
        key: impl Into<Cow<'static, str>>,
        value: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Looks up a placeholder value by name.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k.as_ref() == key)
            .map(|(_, v)| v.as_ref())
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)?;

        if !self.params.is_empty() {
            write!(f, " (")?;
            for (i, (k, v)) in self.params.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{k}={v}")?;
            }
            write!(f, ")")?;
        }

        Ok(())
    }
}

impl std::error::Error for ValidationError {}

// ============================================================================
// RULE ERROR
// ============================================================================

/// Outcome of a named rule that did not pass.
///
/// Only [`RuleError::Failed`] turns into a message. The other variants are
/// configuration problems: the form validator skips the rule, logs a warning
/// and keeps running the field's other rules.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    /// The value does not satisfy the rule.
    #[error("rule failed: {0}")]
    Failed(ValidationError),

    /// A positional parameter could not be interpreted.
    #[error("rule `{rule}` parameter #{index} is not a number: {value:?}")]
    InvalidParam {
        /// Rule name.
        rule: Cow<'static, str>,
        /// Zero-based parameter position.
        index: usize,
        /// Raw parameter text.
        value: String,
    },

    /// Fewer positional parameters than the rule needs.
    #[error("rule `{rule}` expects {expected} parameter(s), got {actual}")]
    MissingParam {
        /// Rule name.
        rule: Cow<'static, str>,
        /// Number of parameters the rule reads.
        expected: usize,
        /// Number of parameters supplied.
        actual: usize,
    },
}

impl RuleError {
    /// Returns true when this is a configuration problem rather than a failure.
    #[must_use]
    pub fn is_misconfiguration(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }
}

impl From<ValidationError> for RuleError {
    fn from(error: ValidationError) -> Self {
        Self::Failed(error)
    }
}

// ============================================================================
// SCHEMA ERROR
// ============================================================================

/// Errors raised while loading a [`FormSchema`](crate::schema::FormSchema).
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The JSON document is malformed or has the wrong shape.
    #[error("invalid JSON schema: {0}")]
    Json(#[from] serde_json::Error),

    /// The TOML document is malformed or has the wrong shape.
    #[cfg(feature = "toml")]
    #[error("invalid TOML schema: {0}")]
    Toml(#[from] toml::de::Error),

    /// The YAML document is malformed or has the wrong shape.
    #[cfg(feature = "yaml")]
    #[error("invalid YAML schema: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The schema file could not be read.
    #[error("failed to read schema file {path}: {source}")]
    Io {
        /// File that was being read.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The file extension does not name a supported format.
    #[error("unsupported schema format `{0}` (expected json, toml, yaml or yml)")]
    UnsupportedFormat(String),
}

// ============================================================================
// PATH ERROR
// ============================================================================

/// Errors raised when writing through a field path.
///
/// Reads never fail: a path that cannot be resolved is an absent value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// The path has no segments to write to.
    #[error("cannot write through an empty field path")]
    Empty,

    /// An intermediate segment holds a value that cannot contain children.
    #[error("segment `{segment}` of `{path}` is not an object or array")]
    NotAContainer {
        /// Full path being written.
        path: String,
        /// Segment whose value is a scalar.
        segment: String,
    },

    /// An array segment is not a valid index for that array.
    #[error("segment `{segment}` of `{path}` is not a valid array index")]
    BadIndex {
        /// Full path being written.
        path: String,
        /// Offending segment.
        segment: String,
    },
}

// ============================================================================
// TESTS
// ============================================================================
