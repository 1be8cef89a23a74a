//! Core validation types and traits
//!
//! This module contains the building blocks the rest of the crate is made of:
//!
//! - **Traits**: [`Validate`], implemented by every named rule
//! - **Errors**: [`ValidationError`], [`RuleError`], [`SchemaError`], [`PathError`]
//! - **Paths**: [`FieldPath`] and the [`data_get`] / [`data_set`] helpers
//! - **Values**: truthiness and size measurement over `serde_json::Value`
//!
//! # Rule failures are data
//!
//! A named rule never decides the final message. It reports a
//! [`ValidationError`] naming its code and the placeholder values, and the form
//! renders the message from its template table:
//!
//! ```rust
//! use formrule_validator::foundation::{RuleParams, Validate};
//! use formrule_validator::validators::Between;
//! use serde_json::json;
//!
//! let raw = vec!["18".to_owned(), "65".to_owned()];
//! let err = Between
//!     .validate(&json!(70), RuleParams::new("between", &raw))
//!     .unwrap_err();
//! assert_eq!(err.to_string(), "rule failed: between (min=18, max=65)");
//! ```

pub mod error;
pub mod path;
pub mod traits;
pub mod value;

pub use error::{PathError, RuleError, SchemaError, ValidationError};
pub use path::{FieldPath, data_get, data_set};
pub use traits::{RuleParams, Validate};
pub use value::{Size, is_truthy, kind_name};

/// The dynamic value type rules operate on.
pub use serde_json::Value;

/// Common imports for implementing rules.
pub mod prelude {
    pub use super::{FieldPath, RuleError, RuleParams, Validate, ValidationError, is_truthy};
}
