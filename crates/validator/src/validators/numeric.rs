//! Type rules.

crate::rule! {
    /// Fails unless the value is a JSON number.
    ///
    /// Numeric strings such as `"42"` are not numbers.
    pub Numeric => "numeric";
    check(input) { input.is_number() }
    message "The :attr must be a number.";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::{RuleParams, Validate};
    use serde_json::json;

    #[test]
    fn test_numeric() {
        let params = RuleParams::new(Numeric::NAME, &[]);
        assert!(Numeric.validate(&json!(0), params).is_ok());
        assert!(Numeric.validate(&json!(-1.5), params).is_ok());
        assert!(Numeric.validate(&json!("42"), params).is_err());
        assert!(Numeric.validate(&json!(null), params).is_err());
    }
}
