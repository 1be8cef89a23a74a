//! Prelude module for convenient imports.
//!
//! Provides a single `use formrule_validator::prelude::*;` import that brings
//! in the form validator, its builder inputs and the traits needed to add
//! rules or hosts.
//!
//! # Examples
//!
//! ```rust
//! use formrule_validator::prelude::*;
//! use serde_json::json;
//!
//! let data = ReactiveData::shared(json!({"age": 30}));
//! let form = RuleValidator::builder()
//!     .field("age", "numeric|between:18,65")
//!     .build_observed(data.clone());
//!
//! data.set("age", json!(99)).unwrap();
//! assert!(form.has_error("age"));
//! ```

// ============================================================================
// FOUNDATION: Core traits, errors, paths
// ============================================================================

pub use crate::foundation::{
    FieldPath, RuleError, RuleParams, SchemaError, Validate, ValidationError, Value, is_truthy,
};

// ============================================================================
// RULES: Specifications, registry, built-ins
// ============================================================================

pub use crate::registry::RuleRegistry;
pub use crate::rules::{ParsedRules, Predicate, RuleEntry, RuleSpec};

#[allow(clippy::wildcard_imports)]
pub use crate::validators::*;

// ============================================================================
// FORM: Validator, error bag, observation
// ============================================================================

pub use crate::bag::ErrorBag;
pub use crate::form::{RuleValidator, RuleValidatorBuilder};
pub use crate::observe::{ChangeNotifier, DataSource, OnChange, ReactiveData, SubscriptionId};
pub use crate::schema::FormSchema;
