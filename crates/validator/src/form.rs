//! The form validator
//!
//! [`RuleValidator`] ties the pieces together: a parsed rule table, resolved
//! labels and templates, a frozen rule registry, a data source and the live
//! error bag.
//!
//! Validation runs in two ways:
//!
//! - manually, through [`RuleValidator::execute`], which revalidates every
//!   declared field;
//! - automatically, when the validator was built with
//!   [`RuleValidatorBuilder::build_observed`] and the host reports that a
//!   field's value changed.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use formrule_validator::form::RuleValidator;
//! use serde_json::json;
//!
//! let form = RuleValidator::builder()
//!     .field("email", "required|email")
//!     .field("age", "numeric|between:18,65")
//!     .build(Arc::new(json!({"email": "ann@example.com", "age": 70})));
//!
//! assert!(form.execute().fails());
//! assert_eq!(
//!     form.first_error("age").as_deref(),
//!     Some("The age must be between 18 and 65.")
//! );
//! assert!(!form.has_error("email"));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

use indexmap::IndexMap;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, trace, warn};

use crate::bag::ErrorBag;
use crate::foundation::{
    FieldPath, RuleError, RuleParams, Validate, ValidationError, Value, is_truthy,
    kind_name,
};
use crate::messages::{AttributeLabels, MessageTemplates, derive_label, render};
use crate::observe::{ChangeNotifier, DataSource, OnChange, SubscriptionId};
use crate::registry::RuleRegistry;
use crate::rules::{ParsedRules, RuleEntry, RuleSpec};
use crate::validators::NULLABLE;

// ============================================================================
// BUILDER
// ============================================================================

/// Collects the inputs of a [`RuleValidator`].
#[derive(Debug, Default)]
pub struct RuleValidatorBuilder {
    specs: Vec<(FieldPath, RuleSpec)>,
    messages: HashMap<String, String>,
    attributes: IndexMap<FieldPath, String>,
    registry: RuleRegistry,
}

impl RuleValidatorBuilder {
    /// Starts with no fields and the built-in rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a field's rules.
    #[must_use = "builder methods must be chained or built"]
    pub fn field(mut self, path: impl Into<FieldPath>, spec: impl Into<RuleSpec>) -> Self {
        self.specs.push((path.into(), spec.into()));
        self
    }

    /// Declares several fields.
    #[must_use = "builder methods must be chained or built"]
    pub fn fields<I, K, S>(mut self, specs: I) -> Self
    where
        I: IntoIterator<Item = (K, S)>,
        K: Into<FieldPath>,
        S: Into<RuleSpec>,
    {
        self.specs
            .extend(specs.into_iter().map(|(path, spec)| (path.into(), spec.into())));
        self
    }

    /// Supplies a template for a `field.rule` key.
    #[must_use = "builder methods must be chained or built"]
    pub fn message(mut self, key: impl Into<String>, template: impl Into<String>) -> Self {
        self.messages.insert(key.into(), template.into());
        self
    }

    /// Supplies several templates.
    #[must_use = "builder methods must be chained or built"]
    pub fn messages<I, K, V>(mut self, templates: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.messages
            .extend(templates.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Overrides a field's label.
    #[must_use = "builder methods must be chained or built"]
    pub fn attribute(mut self, path: impl Into<FieldPath>, label: impl Into<String>) -> Self {
        self.attributes.insert(path.into(), label.into());
        self
    }

    /// Overrides several labels.
    #[must_use = "builder methods must be chained or built"]
    pub fn attributes<I, K, V>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<FieldPath>,
        V: Into<String>,
    {
        self.attributes
            .extend(labels.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Registers an extra named rule, replacing any rule of the same name.
    #[must_use = "builder methods must be chained or built"]
    pub fn rule(mut self, name: impl Into<String>, rule: impl Validate + 'static) -> Self {
        let name: String = name.into();
        self.registry.register(name, rule);
        self
    }

    /// Replaces the whole registry.
    #[must_use = "builder methods must be chained or built"]
    pub fn registry(mut self, registry: RuleRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Builds a validator that only validates when asked to.
    #[must_use]
    pub fn build(self, data: Arc<dyn DataSource>) -> RuleValidator {
        RuleValidator {
            inner: Arc::new(self.into_inner(data, None)),
        }
    }

    /// Builds a validator over a fixed document.
    #[must_use]
    pub fn build_value(self, data: Value) -> RuleValidator {
        self.build(Arc::new(data))
    }

    /// Builds a validator that also revalidates a field whenever the host
    /// reports that its value changed.
    #[must_use]
    pub fn build_observed<S>(self, store: Arc<S>) -> RuleValidator
    where
        S: DataSource + ChangeNotifier + 'static,
    {
        let notifier: Arc<dyn ChangeNotifier> = store.clone();
        let inner = Arc::new(self.into_inner(store, Some(Arc::clone(&notifier))));

        let ids: Vec<SubscriptionId> = inner
            .rules
            .fields()
            .map(|path| notifier.observe(path, on_change(Arc::downgrade(&inner))))
            .collect();
        debug!(subscriptions = ids.len(), "observing form fields");
        *inner.subscriptions.lock() = ids;

        RuleValidator { inner }
    }

    fn into_inner(
        self,
        data: Arc<dyn DataSource>,
        notifier: Option<Arc<dyn ChangeNotifier>>,
    ) -> Inner {
        let rules = ParsedRules::parse(self.specs);
        let labels = AttributeLabels::resolve(rules.fields(), self.attributes);
        let templates = MessageTemplates::resolve(&rules, &self.registry, self.messages);

        Inner {
            rules,
            labels,
            templates,
            registry: self.registry,
            data,
            errors: RwLock::new(ErrorBag::new()),
            subscriptions: Mutex::new(Vec::new()),
            notifier,
        }
    }
}

fn on_change(form: Weak<Inner>) -> OnChange {
    Arc::new(move |path: &FieldPath, value: Option<&Value>| {
        if let Some(form) = form.upgrade() {
            let changed = form.revalidate(path, value.unwrap_or(&Value::Null));
            trace!(field = %path, changed, "field revalidated");
        }
    })
}

// ============================================================================
// VALIDATOR
// ============================================================================

struct Inner {
    rules: ParsedRules,
    labels: AttributeLabels,
    templates: MessageTemplates,
    registry: RuleRegistry,
    data: Arc<dyn DataSource>,
    errors: RwLock<ErrorBag>,
    subscriptions: Mutex<Vec<SubscriptionId>>,
    notifier: Option<Arc<dyn ChangeNotifier>>,
}

impl Inner {
    fn current(&self, path: &FieldPath) -> Value {
        self.data.get(path).unwrap_or(Value::Null)
    }

    fn validate(&self, path: &FieldPath, value: &Value, rules: &[RuleEntry]) -> Vec<String> {
        let mut messages = Vec::new();

        for entry in rules {
            match entry {
                RuleEntry::Named(name) if name == NULLABLE => {
                    if !is_truthy(&self.current(path)) {
                        break;
                    }
                }
                RuleEntry::Named(name) | RuleEntry::Parameterized { name, .. } => {
                    let Some(rule) = self.registry.get(name) else {
                        warn!(field = %path, rule = %name, "unknown rule, field skipped");
                        return Vec::new();
                    };

                    match rule.validate(value, RuleParams::new(name, entry.params())) {
                        Ok(()) => {}
                        Err(RuleError::Failed(failure)) => {
                            messages.push(self.message(path, name, &failure));
                        }
                        Err(error) => {
                            warn!(
                                field = %path,
                                kind = kind_name(value),
                                %error,
                                "misconfigured rule skipped"
                            );
                        }
                    }
                }
                RuleEntry::Predicate(predicate) => {
                    if let Some(message) = predicate.call(value, path.as_str()) {
                        messages.push(message);
                    }
                }
            }
        }

        messages.retain(|m| !m.is_empty());
        messages
    }

    fn message(&self, path: &FieldPath, rule: &str, failure: &ValidationError) -> String {
        let Some(template) = self.templates.for_rule(path, rule) else {
            return String::new();
        };

        match self.labels.get(path.as_str()) {
            Some(label) => render(template, label, failure),
            None => render(template, &derive_label(path.as_str()), failure),
        }
    }

    fn revalidate(&self, path: &FieldPath, value: &Value) -> bool {
        let Some(pipeline) = self.rules.pipeline(path.as_str()) else {
            return false;
        };

        let messages = self.validate(path, value, &pipeline);
        self.errors.write().replace(path.clone(), messages)
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(notifier) = &self.notifier {
            for id in self.subscriptions.get_mut().drain(..) {
                notifier.unobserve(id);
            }
        }
    }
}

/// Validates a form's fields and keeps their current error messages.
///
/// Cloning is cheap and every clone shares the same error bag. Change
/// subscriptions are released when the last clone is dropped.
#[derive(Clone)]
pub struct RuleValidator {
    inner: Arc<Inner>,
}

impl RuleValidator {
    /// Starts building a validator.
    #[must_use]
    pub fn builder() -> RuleValidatorBuilder {
        RuleValidatorBuilder::new()
    }

    /// Runs a pipeline against a value and returns the resulting messages in
    /// rule order.
    ///
    /// An unknown rule name aborts the pipeline and yields no messages at
    /// all. A misconfigured rule (bad or missing parameters) is skipped and
    /// the rest of the pipeline still runs. `nullable` reads the field's
    /// stored value, not `value`.
    #[must_use]
    pub fn validate(&self, path: &FieldPath, value: &Value, rules: &[RuleEntry]) -> Vec<String> {
        self.inner.validate(path, value, rules)
    }

    /// Revalidates every declared field against its current value.
    pub fn execute(&self) -> &Self {
        for (path, pipeline) in self.inner.rules.iter() {
            let value = self.inner.current(path);
            let messages = self.inner.validate(path, &value, pipeline);
            self.inner.errors.write().replace(path.clone(), messages);
        }

        let errors = self.inner.errors.read();
        debug!(
            fields = self.inner.rules.len(),
            failed = errors.len(),
            errors = errors.count(),
            "validation pass finished"
        );
        self
    }

    /// Revalidates one declared field against its current value.
    ///
    /// Returns false if the field has no rules.
    pub fn validate_field(&self, path: &str) -> bool {
        if !self.inner.rules.contains(path) {
            return false;
        }

        let path = FieldPath::new(path);
        let value = self.inner.current(&path);
        self.inner.revalidate(&path, &value);
        true
    }

    /// Returns true if no field currently has errors.
    #[must_use]
    pub fn passes(&self) -> bool {
        self.inner.errors.read().is_empty()
    }

    /// Returns true if at least one field currently has errors.
    #[must_use]
    pub fn fails(&self) -> bool {
        !self.passes()
    }

    /// Snapshot of the whole error bag.
    #[must_use]
    pub fn errors(&self) -> ErrorBag {
        self.inner.errors.read().clone()
    }

    /// Current messages for one field, empty when it has none.
    #[must_use]
    pub fn field_errors(&self, path: &str) -> Vec<String> {
        self.inner
            .errors
            .read()
            .get(path)
            .map(<[String]>::to_vec)
            .unwrap_or_default()
    }

    /// Every current message, field by field.
    #[must_use]
    pub fn message_bag(&self) -> Vec<String> {
        self.inner
            .errors
            .read()
            .messages()
            .map(str::to_owned)
            .collect()
    }

    /// Total number of current messages.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.inner.errors.read().count()
    }

    /// Returns true if the field currently has errors.
    #[must_use]
    pub fn has_error(&self, path: &str) -> bool {
        self.inner.errors.read().has(path)
    }

    /// First current message for a field.
    #[must_use]
    pub fn first_error(&self, path: &str) -> Option<String> {
        self.inner.errors.read().first(path).map(str::to_owned)
    }

    /// The parsed rule table.
    #[must_use]
    pub fn rules(&self) -> &ParsedRules {
        &self.inner.rules
    }

    /// The resolved field labels.
    #[must_use]
    pub fn attributes(&self) -> &AttributeLabels {
        &self.inner.labels
    }

    /// The resolved message templates.
    #[must_use]
    pub fn messages(&self) -> &MessageTemplates {
        &self.inner.templates
    }

    /// The frozen rule registry.
    #[must_use]
    pub fn registry(&self) -> &RuleRegistry {
        &self.inner.registry
    }

    /// Number of change subscriptions held.
    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.inner.subscriptions.lock().len()
    }
}

impl fmt::Debug for RuleValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleValidator")
            .field("rules", &self.inner.rules)
            .field("errors", &*self.inner.errors.read())
            .field("subscriptions", &self.subscription_count())
            .finish_non_exhaustive()
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

    fn form(rules: &[(&str, &str)], data: Value) -> RuleValidator {
        RuleValidator::builder()
            .fields(rules.iter().copied())
            .build_value(data)
    }

    #[test]
    fn test_nullable_short_circuits_on_falsy() {
        let form = form(&[("nick", "nullable|email")], json!({"nick": ""}));
        assert!(form.execute().passes());
    }

    #[test]
    fn test_nullable_is_skipped_on_truthy() {
        let form = form(&[("nick", "nullable|email")], json!({"nick": "nope"}));
        assert_eq!(
            form.execute().field_errors("nick"),
            vec!["The nick must be a valid email address.".to_owned()]
        );
    }

    #[test]
    fn test_unknown_rule_discards_field() {
        let form = form(&[("x", "required|bogus")], json!({}));
        let path = FieldPath::new("x");
        let pipeline = form.rules().pipeline("x").unwrap();

        assert!(form.validate(&path, &Value::Null, &pipeline).is_empty());
        assert!(form.execute().passes());
    }

    #[test]
    fn test_misconfigured_rule_is_skipped() {
        let required = form(&[("n", "required|max:ten")], json!({"n": ""}));
        required.execute();
        assert_eq!(required.field_errors("n"), vec!["The n field is required.".to_owned()]);

        let numeric = form(&[("n", "max:ten|numeric")], json!({"n": "x"}));
        numeric.execute();
        assert_eq!(numeric.field_errors("n"), vec!["The n must be a number.".to_owned()]);
    }

    #[test]
    fn test_predicate_entries() {
        let form = RuleValidator::builder()
            .field(
                "code",
                vec![
                    RuleEntry::named("required"),
                    RuleEntry::predicate(|value, path| {
                        (value.as_str() != Some("abc")).then(|| format!("{path} is wrong"))
                    }),
                    RuleEntry::predicate(|_, _| Some(String::new())),
                ],
            )
            .build_value(json!({"code": "xyz"}));

        assert_eq!(form.execute().field_errors("code"), vec!["code is wrong".to_owned()]);
    }

    #[test]
    fn test_custom_rule_and_template() {
        let even = |input: &Value, params: RuleParams<'_>| -> Result<(), RuleError> {
            match input.as_i64() {
                Some(n) if n % 2 != 0 => Err(ValidationError::new(params.rule().to_owned()).into()),
                _ => Ok(()),
            }
        };

        let form = RuleValidator::builder()
            .field("count", "even")
            .rule("even", even)
            .message("count.even", ":attr must be even")
            .attribute("count", "The count")
            .build_value(json!({"count": 3}));

        assert_eq!(form.execute().first_error("count").as_deref(), Some("The count must be even"));
    }

    #[test]
    fn test_failing_rule_without_template_is_dropped() {
        let never = |_: &Value, _: RuleParams<'_>| -> Result<(), RuleError> {
            Err(ValidationError::new("never").into())
        };

        let form = RuleValidator::builder()
            .field("a", "never")
            .rule("never", never)
            .build_value(json!({}));

        assert!(form.execute().passes());
    }

    #[test]
    fn test_validate_field_scope() {
        let form = form(&[("a", "required"), ("b", "required")], json!({}));

        assert!(form.validate_field("a"));
        assert!(!form.validate_field("zzz"));
        assert!(form.has_error("a"));
        assert!(!form.has_error("b"));
        assert_eq!(form.error_count(), 1);
    }

    #[test]
    fn test_clones_share_state() {
        let form = form(&[("a", "required")], json!({}));
        let other = form.clone();
        form.execute();
        assert!(other.fails());
        assert_eq!(other.message_bag(), vec!["The a field is required.".to_owned()]);
    }
}
