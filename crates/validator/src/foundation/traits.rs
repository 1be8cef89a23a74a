//! The trait every named rule implements.

use std::borrow::Cow;

use serde_json::Value;

use crate::foundation::{RuleError, ValidationError};

// ============================================================================
// CORE VALIDATOR TRAIT
// ============================================================================

/// A named rule that can be referenced from a rule specification.
///
/// Named rules validate a dynamic [`Value`] and receive the positional
/// parameters written after the colon in the rule string (`between:18,65`).
/// A failure is reported as [`RuleError::Failed`] carrying the rule code and
/// the placeholder values for its message template.
///
/// # Examples
///
/// ```rust
/// use formrule_validator::foundation::{RuleError, RuleParams, Validate, ValidationError};
/// use serde_json::Value;
///
/// struct Uppercase;
///
/// impl Validate for Uppercase {
///     fn validate(&self, input: &Value, _params: RuleParams<'_>) -> Result<(), RuleError> {
///         match input.as_str() {
///             Some(s) if s.chars().any(char::is_lowercase) => {
///                 Err(ValidationError::new("uppercase").into())
///             }
///             _ => Ok(()),
///         }
///     }
///
///     fn default_message(&self) -> Option<&'static str> {
///         Some("The :attr must be uppercase.")
///     }
/// }
/// ```
pub trait Validate: Send + Sync {
    /// Checks the value against this rule.
    fn validate(&self, input: &Value, params: RuleParams<'_>) -> Result<(), RuleError>;

    /// Message template used when the form supplies none for this rule.
    fn default_message(&self) -> Option<&'static str> {
        None
    }
}

impl<F> Validate for F
where
    F: Fn(&Value, RuleParams<'_>) -> Result<(), RuleError> + Send + Sync,
{
    fn validate(&self, input: &Value, params: RuleParams<'_>) -> Result<(), RuleError> {
        self(input, params)
    }
}

// ============================================================================
// RULE PARAMETERS
// ============================================================================

/// Positional parameters passed to a named rule.
#[derive(Debug, Clone, Copy)]
pub struct RuleParams<'a> {
    rule: &'a str,
    raw: &'a [String],
}

impl<'a> RuleParams<'a> {
    /// Wraps the raw parameters of the named rule.
    #[must_use]
    pub fn new(rule: &'a str, raw: &'a [String]) -> Self {
        Self { rule, raw }
    }

    /// Name of the rule these parameters belong to.
    #[must_use]
    pub fn rule(&self) -> &'a str {
        self.rule
    }

    /// Number of parameters supplied.
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns true when no parameters were supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Raw text of the parameter at `index`.
    pub fn text(&self, index: usize) -> Result<&'a str, RuleError> {
        self.raw
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| RuleError::MissingParam {
                rule: Cow::Owned(self.rule.to_owned()),
                expected: index + 1,
                actual: self.raw.len(),
            })
    }

    /// Parameter at `index` read as a number.
    pub fn number(&self, index: usize) -> Result<f64, RuleError> {
        let text = self.text(index)?;
        text.trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .ok_or_else(|| RuleError::InvalidParam {
                rule: Cow::Owned(self.rule.to_owned()),
                index,
                value: text.to_owned(),
            })
    }

    /// Builds a failure for this rule that echoes the named parameters.
    ///
    /// Names are paired with parameters by position.
    #[must_use]
    pub fn failure(&self, code: &'static str, names: &[&'static str]) -> ValidationError {
        names
            .iter()
            .zip(self.raw)
            .fold(ValidationError::new(code), |error, (name, value)| {
                error.with_param(*name, value.trim().to_owned())
            })
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn test_number_parsing() {
        let raw = params(&["18", " 65 ", "x"]);
        let p = RuleParams::new("between", &raw);

        assert_eq!(p.number(0), Ok(18.0));
        assert_eq!(p.number(1), Ok(65.0));
        assert!(matches!(p.number(2), Err(RuleError::InvalidParam { index: 2, .. })));
        assert!(matches!(
            p.number(3),
            Err(RuleError::MissingParam {
                expected: 4,
                actual: 3,
                ..
            })
        ));
    }

    #[test]
    fn test_failure_pairs_names() {
        let raw = params(&["1", "5"]);
        let error = RuleParams::new("between", &raw).failure("between", &["min", "max"]);
        assert_eq!(error.param("min"), Some("1"));
        assert_eq!(error.param("max"), Some("5"));
    }

    #[test]
    fn test_closure_rule() {
        let odd = |input: &Value, _: RuleParams<'_>| -> Result<(), RuleError> {
            if input.as_i64().is_some_and(|n| n % 2 == 1) {
                Ok(())
            } else {
                Err(ValidationError::new("odd").into())
            }
        };

        assert!(odd.validate(&json!(3), RuleParams::new("odd", &[])).is_ok());
        assert!(odd.validate(&json!(4), RuleParams::new("odd", &[])).is_err());
    }
}
