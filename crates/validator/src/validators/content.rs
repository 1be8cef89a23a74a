//! String content rules
//!
//! Rules that inspect the text of a string value.

use std::sync::LazyLock;

use regex::Regex;

use crate::foundation::Value;

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

fn is_email(input: &Value) -> bool {
    input.as_str().is_some_and(|s| EMAIL_REGEX.is_match(s))
}

// ============================================================================
// EMAIL
// ============================================================================

crate::rule! {
    /// Fails unless the value is a string shaped like `local@domain.tld`.
    ///
    /// Non-string values, `null` included, always fail. Pair with `nullable`
    /// to make the field optional.
    pub Email => "email";
    check(input) { is_email(input) }
    message "The :attr must be a valid email address.";
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::{RuleParams, Validate};
    use serde_json::json;

    fn check(input: Value) -> bool {
        Email
            .validate(&input, RuleParams::new(Email::NAME, &[]))
            .is_ok()
    }

    #[test]
    fn test_email() {
        assert!(check(json!("user@example.com")));
        assert!(check(json!("a.b+c@sub.example.org")));
        assert!(!check(json!("invalid")));
        assert!(!check(json!("@example.com")));
        assert!(!check(json!("user@")));
        assert!(!check(json!("user@example")));
        assert!(!check(json!("us er@example.com")));
    }

    #[test]
    fn test_email_rejects_empty_and_non_strings() {
        assert!(!check(json!("")));
        assert!(!check(json!(null)));
        assert!(!check(json!(12)));
        assert!(!check(json!(["user@example.com"])));
    }
}
