//! Property-based tests for formrule-validator.

use formrule_validator::foundation::is_truthy;
use formrule_validator::messages::derive_label;
use formrule_validator::prelude::*;
use proptest::prelude::*;
use serde_json::json;

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i32>().prop_map(Value::from),
        "[a-z@. ]{0,12}".prop_map(Value::from),
        prop::collection::vec(any::<u8>(), 0..6).prop_map(Value::from),
    ]
}

fn form_over(email: Value, age: Value, tags: Value) -> RuleValidator {
    RuleValidator::builder()
        .field("email", "nullable|email")
        .field("age", "required|numeric|between:18,65")
        .field("tags", "max:3")
        .build_value(json!({"email": email, "age": age, "tags": tags}))
}

// ============================================================================
// ERROR BAG INVARIANTS
// ============================================================================

proptest! {
    #[test]
    fn bag_never_holds_empty_entries(email in scalar(), age in scalar(), tags in scalar()) {
        let form = form_over(email, age, tags);
        let errors = form.execute().errors();

        for (_, messages) in errors.iter() {
            prop_assert!(!messages.is_empty());
            prop_assert!(messages.iter().all(|m| !m.is_empty()));
        }
    }

    #[test]
    fn message_bag_length_is_sum_of_fields(email in scalar(), age in scalar(), tags in scalar()) {
        let form = form_over(email, age, tags);
        form.execute();

        let per_field: usize = form.errors().iter().map(|(_, m)| m.len()).sum();
        prop_assert_eq!(form.message_bag().len(), per_field);
        prop_assert_eq!(form.passes(), per_field == 0);
    }

    #[test]
    fn execute_is_idempotent(email in scalar(), age in scalar(), tags in scalar()) {
        let form = form_over(email, age, tags);
        let first = form.execute().errors();
        let second = form.execute().errors();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn nullable_field_passes_when_falsy(email in scalar()) {
        let form = form_over(email.clone(), json!(30), json!([]));
        form.execute();
        if !is_truthy(&email) {
            prop_assert!(!form.has_error("email"));
        }
    }
}

// ============================================================================
// PARSING AND LABELS
// ============================================================================

proptest! {
    #[test]
    fn pipe_parsing_preserves_order(names in prop::collection::vec("[a-z]{1,8}", 1..6)) {
        let spec = RuleSpec::from(names.join("|"));
        let parsed: Vec<String> = spec
            .parse()
            .iter()
            .filter_map(RuleEntry::name)
            .map(str::to_owned)
            .collect();
        prop_assert_eq!(parsed, names);
    }

    #[test]
    fn derived_labels_are_trimmed_lowercase(path in "[a-zA-Z_.-]{0,24}") {
        let label = derive_label(&path);
        prop_assert_eq!(label.trim(), label.as_str());
        prop_assert!(!label.chars().any(|c| c.is_ascii_uppercase()));
        prop_assert!(!label.contains('.'));
    }

    #[test]
    fn unknown_rules_never_record_errors(value in scalar()) {
        let form = RuleValidator::builder()
            .field("x", "required|no_such_rule")
            .build_value(json!({ "x": value }));
        prop_assert!(form.execute().passes());
    }
}
