//! Size rules
//!
//! Size is the value itself for numbers, the character count for strings and
//! the element count for arrays. Values of other kinds have no size and pass
//! these rules untouched.

use crate::foundation::{RuleError, RuleParams, Size, Value};

fn exceeds(input: &Value, params: RuleParams<'_>) -> Result<bool, RuleError> {
    let max = params.number(0)?;
    Ok(Size::of(input).is_some_and(|size| size.as_f64() > max))
}

fn outside(input: &Value, params: RuleParams<'_>) -> Result<bool, RuleError> {
    let min = params.number(0)?;
    let max = params.number(1)?;
    Ok(Size::of(input).is_some_and(|size| {
        let n = size.as_f64();
        n < min || n > max
    }))
}

// ============================================================================
// MAX
// ============================================================================

crate::rule! {
    /// Fails when the size exceeds the limit (`max:10`).
    pub Max => "max";
    params(max);
    check(input, params) { exceeds(input, params).map(|over| !over) }
    message "The :attr must not be greater than :max.";
}

// ============================================================================
// BETWEEN
// ============================================================================

crate::rule! {
    /// Fails when the size falls outside the inclusive range (`between:18,65`).
    pub Between => "between";
    params(min, max);
    check(input, params) { outside(input, params).map(|out| !out) }
    message "The :attr must be between :min and :max.";
}

// ============================================================================
// TESTS
// ============================================================================
