//! End-to-end behavior of the form validator on fixed documents.

use formrule_validator::prelude::*;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

fn form(rules: &[(&str, &str)], data: Value) -> RuleValidator {
    RuleValidator::builder()
        .fields(rules.iter().copied())
        .build_value(data)
}

// ============================================================================
// PIPELINE SEMANTICS
// ============================================================================

#[test]
fn empty_email_fails_required_and_email() {
    let form = form(&[("email", "required|email")], json!({"email": ""}));
    form.execute();

    assert_eq!(
        form.field_errors("email"),
        vec![
            "The email field is required.".to_owned(),
            "The email must be a valid email address.".to_owned(),
        ]
    );
}

#[test]
fn out_of_range_age_reports_between_only() {
    let form = form(&[("age", "numeric|between:18,65")], json!({"age": 70}));
    form.execute();

    let errors = form.field_errors("age");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("18"));
    assert!(errors[0].contains("65"));
    assert!(!errors[0].contains("number"));
}

#[test]
fn unknown_rule_is_absorbed() {
    let form = form(&[("x", "bogus")], json!({"x": "anything"}));
    let pipeline = form.rules().pipeline("x").unwrap();

    let messages = form.validate(&FieldPath::new("x"), &json!("anything"), &pipeline);
    assert!(messages.is_empty());
    assert!(form.execute().passes());
    assert!(!form.has_error("x"));
}

#[test]
fn nested_label_is_derived() {
    let form = form(&[("user.firstName", "required")], json!({"user": {}}));
    assert_eq!(form.attributes().get("user.firstName"), Some("first name"));

    form.execute();
    assert_eq!(
        form.first_error("user.firstName").as_deref(),
        Some("The first name field is required.")
    );
}

#[rstest]
#[case::null(json!(null), true)]
#[case::empty_string(json!(""), true)]
#[case::zero(json!(0), true)]
#[case::empty_array(json!([]), true)]
#[case::false_(json!(false), true)]
#[case::text(json!("x"), false)]
#[case::object(json!({}), false)]
fn required_follows_truthiness(#[case] value: Value, #[case] fails: bool) {
    let form = form(&[("f", "required")], json!({ "f": value }));
    assert_eq!(form.execute().fails(), fails);
}

#[rstest]
#[case("max:3", json!("abcd"), Some("The f must not be greater than 3."))]
#[case("max:3", json!("abc"), None)]
#[case("max:3", json!([1, 2, 3, 4]), Some("The f must not be greater than 3."))]
#[case("max:3", json!(3.5), Some("The f must not be greater than 3."))]
#[case("max:3", json!({"a": 1}), None)]
#[case("between:2,4", json!("é"), Some("The f must be between 2 and 4."))]
#[case("between:2,4", json!(["a", "b"]), None)]
#[case("numeric", json!("12"), Some("The f must be a number."))]
#[case("numeric", json!(12), None)]
fn size_and_type_rules(#[case] rule: &str, #[case] value: Value, #[case] expected: Option<&str>) {
    let form = form(&[("f", rule)], json!({ "f": value }));
    form.execute();
    assert_eq!(form.first_error("f").as_deref(), expected);
}

#[test]
fn nullable_skips_remaining_rules_for_empty_values() {
    let form = form(
        &[("nick", "nullable|email|max:5"), ("site", "required|nullable|email")],
        json!({"nick": null, "site": ""}),
    );
    form.execute();

    assert!(!form.has_error("nick"));
    assert_eq!(form.field_errors("site"), vec!["The site field is required.".to_owned()]);
}

#[test]
fn malformed_parameters_skip_only_that_rule() {
    let form = form(
        &[("a", "required|max:lots"), ("b", "required|between:1")],
        json!({}),
    );
    form.execute();

    assert_eq!(form.error_count(), 2);
    assert_eq!(form.field_errors("a"), vec!["The a field is required.".to_owned()]);
    assert_eq!(form.field_errors("b"), vec!["The b field is required.".to_owned()]);
}

#[test]
fn typo_in_a_parameter_does_not_hide_required() {
    let form = form(&[("name", "required|max:ten")], json!({"name": ""}));
    form.execute();

    assert!(form.has_error("name"));
    assert_eq!(
        form.field_errors("name"),
        vec!["The name field is required.".to_owned()]
    );
}

// ============================================================================
// TEMPLATES AND LABELS
// ============================================================================

#[test]
fn custom_templates_and_labels() {
    let form = RuleValidator::builder()
        .field("age", "numeric|between:18,65")
        .message("age.between", ":attr: :min to :max, please (:attr)")
        .attribute("age", "Age")
        .build_value(json!({"age": 4}));

    form.execute();
    assert_eq!(
        form.first_error("age").as_deref(),
        Some("Age: 18 to 65, please (Age)")
    );
    assert_eq!(
        form.messages().get("age.numeric"),
        Some("The :attr must be a number.")
    );
}

#[test]
fn rule_macro_declares_usable_rules() {
    formrule_validator::rule! {
        /// Fails unless the value is `true`.
        Accepted => "accepted";
        check(input) { input.as_bool() == Some(true) }
        message "The :attr must be accepted.";
    }

    let form = RuleValidator::builder()
        .field("terms", "accepted")
        .rule(Accepted::NAME, Accepted)
        .build_value(json!({"terms": false}));

    form.execute();
    assert_eq!(
        form.message_bag(),
        vec!["The terms must be accepted.".to_owned()]
    );
}

// ============================================================================
// QUERY SURFACE
// ============================================================================

#[test]
fn queries_on_a_clean_field() {
    let form = form(&[("a", "required")], json!({"a": "ok"}));
    form.execute();

    assert!(form.passes());
    assert!(!form.fails());
    assert_eq!(form.first_error("a"), None);
    assert_eq!(form.first_error("never-declared"), None);
    assert!(form.field_errors("a").is_empty());
    assert!(form.errors().is_empty());
}

#[test]
fn message_bag_matches_per_field_counts() {
    let form = form(
        &[("email", "required|email"), ("age", "required|numeric"), ("ok", "required")],
        json!({"email": "", "ok": 1}),
    );
    form.execute();

    let errors = form.errors();
    let per_field: usize = errors.iter().map(|(_, messages)| messages.len()).sum();

    assert_eq!(form.message_bag().len(), per_field);
    assert_eq!(form.error_count(), per_field);
    assert_eq!(per_field, 4);

    let fields: Vec<&str> = errors.fields().map(FieldPath::as_str).collect();
    assert_eq!(fields, ["email", "age"]);
}

#[test]
fn execute_is_idempotent() {
    let form = form(
        &[("email", "required|email"), ("age", "numeric|between:18,65")],
        json!({"email": "x", "age": 7}),
    );

    let first = form.execute().errors();
    let second = form.execute().errors();
    assert_eq!(first, second);
}
