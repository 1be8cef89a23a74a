//! Built-in named rules
//!
//! | name | parameters | fails when |
//! |---|---|---|
//! | `required` | — | the value is falsy |
//! | `email` | — | the value is not a `local@domain.tld` string |
//! | `max` | `max` | the size is greater than `max` |
//! | `between` | `min`, `max` | the size is outside `[min, max]` |
//! | `numeric` | — | the value is not a number |
//!
//! `nullable` is not a rule. It is a marker handled by the form pipeline.

pub mod content;
pub mod numeric;
pub mod presence;
pub mod size;

pub use content::Email;
pub use numeric::Numeric;
pub use presence::Required;
pub use size::{Between, Max};

/// Name of the marker that makes the remaining rules of a field optional.
pub const NULLABLE: &str = "nullable";
