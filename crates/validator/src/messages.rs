//! Attribute labels, message templates and placeholder rendering
//!
//! Both tables are resolved once when the form is built:
//!
//! - every declared field gets a label, derived from its last path segment
//!   unless one was supplied;
//! - every `field.rule` pair gets a template, either the supplied one or the
//!   rule's built-in default.
//!
//! Templates keep their placeholders (`:attr`, `:min`, `:max`, ...). They are
//! filled in when a rule fails, from the field label and the values the rule
//! reported.

use std::cmp::Reverse;
use std::collections::HashMap;

use indexmap::IndexMap;

use crate::foundation::{FieldPath, ValidationError};
use crate::registry::RuleRegistry;
use crate::rules::ParsedRules;
use crate::validators::NULLABLE;

// ============================================================================
// ATTRIBUTE LABELS
// ============================================================================

/// Derives a label from a field path.
///
/// Takes the last segment, turns `_` and `-` into spaces, puts a space before
/// every uppercase ASCII letter, lowercases and trims.
///
/// # Examples
///
/// ```rust
/// use formrule_validator::messages::derive_label;
///
/// assert_eq!(derive_label("user.firstName"), "first name");
/// assert_eq!(derive_label("postal_code"), "postal code");
/// assert_eq!(derive_label("Country-Code"), "country  code");
/// ```
#[must_use]
pub fn derive_label(path: &str) -> String {
    let segment = path.rsplit('.').next().unwrap_or(path);
    let mut spaced = String::with_capacity(segment.len() + 4);

    for c in segment.chars() {
        match c {
            '_' | '-' => spaced.push(' '),
            c if c.is_ascii_uppercase() => {
                spaced.push(' ');
                spaced.push(c);
            }
            c => spaced.push(c),
        }
    }

    spaced.to_lowercase().trim().to_owned()
}

/// Human-readable field names substituted for `:attr`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeLabels {
    labels: IndexMap<FieldPath, String>,
}

impl AttributeLabels {
    /// Keeps every override and derives a label for each field without one.
    pub fn resolve<'a, I>(fields: I, overrides: IndexMap<FieldPath, String>) -> Self
    where
        I: IntoIterator<Item = &'a FieldPath>,
    {
        let mut labels = overrides;
        for path in fields {
            if !labels.contains_key(path) {
                labels.insert(path.clone(), derive_label(path.as_str()));
            }
        }
        Self { labels }
    }

    /// Label of a field.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&str> {
        self.labels.get(path).map(String::as_str)
    }

    /// `(field, label)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&FieldPath, &str)> {
        self.labels.iter().map(|(path, label)| (path, label.as_str()))
    }

    /// Number of labelled fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns true if there are no labels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

// ============================================================================
// MESSAGE TEMPLATES
// ============================================================================

/// `field.rule` → template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageTemplates {
    templates: HashMap<String, String>,
}

impl MessageTemplates {
    /// Keeps every supplied template and fills in defaults for the named rules
    /// each field uses.
    ///
    /// Rules without a default template and without a supplied one get no
    /// entry; their failures render as empty messages and are dropped.
    #[must_use]
    pub fn resolve(
        rules: &ParsedRules,
        registry: &RuleRegistry,
        custom: HashMap<String, String>,
    ) -> Self {
        let mut templates = custom;

        for (path, pipeline) in rules.iter() {
            for name in pipeline.iter().filter_map(|entry| entry.name()) {
                if name == NULLABLE {
                    continue;
                }

                let key = path.rule_key(name);
                if templates.contains_key(&key) {
                    continue;
                }

                if let Some(default) = registry.get(name).and_then(|rule| rule.default_message()) {
                    templates.insert(key, default.to_owned());
                }
            }
        }

        Self { templates }
    }

    /// Template for a `field.rule` key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.templates.get(key).map(String::as_str)
    }

    /// Template for a rule on a field.
    #[must_use]
    pub fn for_rule(&self, path: &FieldPath, rule: &str) -> Option<&str> {
        self.get(&path.rule_key(rule))
    }

    /// All `(key, template)` pairs, sorted by key.
    #[must_use]
    pub fn sorted(&self) -> Vec<(&str, &str)> {
        let mut pairs: Vec<(&str, &str)> = self
            .templates
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        pairs.sort_unstable();
        pairs
    }

    /// Number of templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Returns true if there are no templates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

// ============================================================================
// RENDERING
// ============================================================================

/// Fills a template from a label and a rule failure.
///
/// Every occurrence of `:attr` becomes the label and every `:name` matching a
/// reported parameter becomes its value. Where names overlap the longest one
/// wins, so `:maxlen` is not read as `:max` followed by `len`. Substituted text
/// is never rescanned.
///
/// # Examples
///
/// ```rust
/// use formrule_validator::foundation::ValidationError;
/// use formrule_validator::messages::render;
///
/// let failure = ValidationError::new("between")
///     .with_param("min", "18")
///     .with_param("max", "65");
///
/// assert_eq!(
///     render("The :attr must be between :min and :max.", "age", &failure),
///     "The age must be between 18 and 65."
/// );
/// ```
#[must_use]
pub fn render(template: &str, label: &str, failure: &ValidationError) -> String {
    let mut placeholders: Vec<(&str, &str)> = std::iter::once(("attr", label))
        .chain(failure.params.iter().map(|(k, v)| (&**k, &**v)))
        .filter(|(name, _)| !name.is_empty())
        .collect();
    placeholders.sort_by_key(|(name, _)| Reverse(name.len()));

    let mut out = String::with_capacity(template.len() + label.len());
    let mut rest = template;

    while let Some(pos) = rest.find(':') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        match placeholders.iter().find(|(name, _)| after.starts_with(name)) {
            Some((name, value)) => {
                out.push_str(value);
                rest = &after[name.len()..];
            }
            None => {
                out.push(':');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

// ============================================================================
// TESTS
// ============================================================================
