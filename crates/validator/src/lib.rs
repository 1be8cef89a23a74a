//! # formrule-validator
//!
//! Rule-based validation for form fields held in a JSON document.
//!
//! Each field declares a pipeline of rules, either as a pipe string
//! (`"required|max:10"`) or as a list of entries. The validator runs the
//! pipelines against the current data and keeps an error bag keyed by dotted
//! field path.
//!
//! ## Quick Start
//!
//! ```rust
//! use formrule_validator::prelude::*;
//! use serde_json::json;
//!
//! let form = RuleValidator::builder()
//!     .field("email", "required|email")
//!     .field("user.firstName", "required")
//!     .build_value(json!({"email": "", "user": {}}));
//!
//! form.execute();
//! assert_eq!(form.error_count(), 3);
//! assert_eq!(
//!     form.first_error("user.firstName").as_deref(),
//!     Some("The first name field is required.")
//! );
//! ```
//!
//! ## Revalidating on change
//!
//! Built with [`build_observed`](form::RuleValidatorBuilder::build_observed),
//! the validator subscribes to every declared field and revalidates a field as
//! soon as the host reports a new value. [`ReactiveData`](observe::ReactiveData)
//! is a host that does this for a plain JSON document.
//!
//! ## Built-in Rules
//!
//! [`required`](validators::Required), [`email`](validators::Email),
//! [`max`](validators::Max), [`between`](validators::Between) and
//! [`numeric`](validators::Numeric), plus the `nullable` marker. Declare more
//! with the [`rule!`] macro or by implementing
//! [`Validate`](foundation::Validate).

pub mod bag;
pub mod form;
pub mod foundation;
mod macros;
pub mod messages;
pub mod observe;
pub mod prelude;
pub mod registry;
pub mod rules;
pub mod schema;
pub mod validators;
