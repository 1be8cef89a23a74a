//! Macros for declaring named rules with minimal boilerplate.
//!
//! # Available Macros
//!
//! - [`rule!`] — Declare a named rule (unit struct + `Validate` impl + name and
//!   message constants)
//!
//! # Examples
//!
//! ```rust
//! use formrule_validator::rule;
//!
//! rule! {
//!     /// Fails unless the value is a boolean.
//!     pub Boolean => "boolean";
//!     check(input) { input.is_boolean() }
//!     message "The :attr field must be true or false.";
//! }
//!
//! rule! {
//!     /// Fails when a number is below the first parameter.
//!     pub AtLeast => "at_least";
//!     params(min);
//!     check(input, params) {
//!         let min = params.number(0)?;
//!         Ok::<_, formrule_validator::foundation::RuleError>(
//!             input.as_f64().is_none_or(|n| n >= min),
//!         )
//!     }
//!     message "The :attr must be at least :min.";
//! }
//!
//! assert_eq!(Boolean::NAME, "boolean");
//! assert_eq!(AtLeast::MESSAGE, "The :attr must be at least :min.");
//! ```

/// Declares a named rule.
///
/// Always derives `Debug, Clone, Copy, PartialEq, Eq, Hash, Default` on the
/// generated unit struct and adds `NAME` / `MESSAGE` associated constants.
///
/// # Variants
///
/// **Without parameters**: `check(input)` is a block evaluating to `bool`.
///
/// **With parameters**: `params(a, b, ...)` names the positional parameters
/// (these names become template placeholders), and `check(input, params)` is a
/// block evaluating to `Result<bool, RuleError>`. A parameter that cannot be
/// read propagates as a configuration error.
#[macro_export]
macro_rules! rule {
    // ── Shared: struct + constants ───────────────────────────────────────
    (@item $(#[$meta:meta])* $vis:vis $name:ident => $code:literal; message $msg:literal;) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        $vis struct $name;

        impl $name {
            /// Name the rule is referenced by in rule strings.
            pub const NAME: &'static str = $code;

            /// Built-in message template.
            pub const MESSAGE: &'static str = $msg;
        }
    };

    // ── Variant 1: rule without parameters ───────────────────────────────
    (
        $(#[$meta:meta])*
        $vis:vis $name:ident => $code:literal;
        check($inp:ident) $check:block
        message $msg:literal;
    ) => {
        $crate::rule!(@item $(#[$meta])* $vis $name => $code; message $msg;);

        impl $crate::foundation::Validate for $name {
            fn validate(
                &self,
                $inp: &$crate::foundation::Value,
                _params: $crate::foundation::RuleParams<'_>,
            ) -> ::std::result::Result<(), $crate::foundation::RuleError> {
                if $check {
                    Ok(())
                } else {
                    Err($crate::foundation::ValidationError::new($code).into())
                }
            }

            fn default_message(&self) -> ::std::option::Option<&'static str> {
                Some($msg)
            }
        }
    };

    // ── Variant 2: rule with positional parameters ───────────────────────
    (
        $(#[$meta:meta])*
        $vis:vis $name:ident => $code:literal;
        params($($pname:ident),+ $(,)?);
        check($inp:ident, $params:ident) $check:block
        message $msg:literal;
    ) => {
        $crate::rule!(@item $(#[$meta])* $vis $name => $code; message $msg;);

        impl $name {
            /// Placeholder names, in parameter order.
            pub const PARAMS: &'static [&'static str] = &[$(stringify!($pname)),+];
        }

        impl $crate::foundation::Validate for $name {
            fn validate(
                &self,
                $inp: &$crate::foundation::Value,
                $params: $crate::foundation::RuleParams<'_>,
            ) -> ::std::result::Result<(), $crate::foundation::RuleError> {
                let passed: bool = $check?;
                if passed {
                    Ok(())
                } else {
                    Err($params.failure($code, Self::PARAMS).into())
                }
            }

            fn default_message(&self) -> ::std::option::Option<&'static str> {
                Some($msg)
            }
        }
    };
}
