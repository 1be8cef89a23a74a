//! Name → rule lookup table.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::foundation::Validate;
use crate::validators::{Between, Email, Max, Numeric, Required};

/// The named rules a form can reference.
///
/// A registry is assembled while the form is being built and is frozen once
/// the form exists. [`RuleRegistry::default`] contains the built-in rules.
#[derive(Clone)]
pub struct RuleRegistry {
    rules: HashMap<Cow<'static, str>, Arc<dyn Validate>>,
}

impl RuleRegistry {
    /// Creates a registry with no rules at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Creates a registry holding the built-in rules.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(Required::NAME, Required);
        registry.register(Email::NAME, Email);
        registry.register(Max::NAME, Max);
        registry.register(Between::NAME, Between);
        registry.register(Numeric::NAME, Numeric);
        registry
    }

    /// Adds or replaces a rule, returning the one it replaced.
    pub fn register(
        &mut self,
        name: impl Into<Cow<'static, str>>,
        rule: impl Validate + 'static,
    ) -> Option<Arc<dyn Validate>> {
        self.rules.insert(name.into(), Arc::new(rule))
    }

    /// Looks up a rule by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn Validate> {
        self.rules.get(name).map(|rule| &**rule)
    }

    /// Returns true if a rule is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.keys().map(|name| &**name).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if no rules are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.names())
            .finish()
    }
}
