//! Presence rules.

use crate::foundation::is_truthy;

crate::rule! {
    /// Fails when the value is absent or falsy.
    ///
    /// `null`, `false`, `0`, `""` and `[]` all fail; see
    /// [`is_truthy`](crate::foundation::is_truthy).
    pub Required => "required";
    check(input) { is_truthy(input) }
    message "The :attr field is required.";
}
