//! The error bag: field path → current error messages.

use indexmap::IndexMap;
use serde::Serialize;

use crate::foundation::FieldPath;

/// Current error messages per field.
///
/// A field is present only while it has at least one message. Each pass
/// replaces a field's entry wholesale; messages are never merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErrorBag {
    fields: IndexMap<FieldPath, Vec<String>>,
}

impl ErrorBag {
    /// Creates an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces a field's messages.
    ///
    /// Empty messages are discarded, and the field is removed when nothing is
    /// left. Returns true if the field's entry changed.
    pub fn replace(&mut self, path: FieldPath, messages: Vec<String>) -> bool {
        let messages: Vec<String> = messages.into_iter().filter(|m| !m.is_empty()).collect();

        if messages.is_empty() {
            return self.fields.shift_remove(&path).is_some();
        }

        match self.fields.get_mut(&path) {
            Some(current) if *current == messages => false,
            Some(current) => {
                *current = messages;
                true
            }
            None => {
                self.fields.insert(path, messages);
                true
            }
        }
    }

    /// Messages for a field.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&[String]> {
        self.fields.get(path).map(Vec::as_slice)
    }

    /// Returns true if the field currently has errors.
    #[must_use]
    pub fn has(&self, path: &str) -> bool {
        self.fields.contains_key(path)
    }

    /// First message for a field.
    #[must_use]
    pub fn first(&self, path: &str) -> Option<&str> {
        self.get(path)
            .and_then(<[String]>::first)
            .map(String::as_str)
    }

    /// Every message, field by field.
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.fields.values().flatten().map(String::as_str)
    }

    /// Total number of messages.
    #[must_use]
    pub fn count(&self) -> usize {
        self.fields.values().map(Vec::len).sum()
    }

    /// Fields with errors, in the order they first failed.
    pub fn fields(&self) -> impl Iterator<Item = &FieldPath> {
        self.fields.keys()
    }

    /// `(field, messages)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&FieldPath, &[String])> {
        self.fields.iter().map(|(path, messages)| (path, messages.as_slice()))
    }

    /// Number of fields with errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true when no field has errors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msgs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn test_replace_drops_empty() {
        let mut bag = ErrorBag::new();
        assert!(bag.replace("a".into(), msgs(&["", "x", ""])));
        assert_eq!(bag.get("a"), Some(&["x".to_owned()][..]));

        assert!(bag.replace("a".into(), msgs(&[""])));
        assert!(!bag.has("a"));
        assert!(bag.is_empty());
    }

    #[test]
    fn test_replace_is_not_additive() {
        let mut bag = ErrorBag::new();
        bag.replace("a".into(), msgs(&["one", "two"]));
        bag.replace("a".into(), msgs(&["three"]));
        assert_eq!(bag.count(), 1);
        assert_eq!(bag.first("a"), Some("three"));
    }

    #[test]
    fn test_replace_reports_change() {
        let mut bag = ErrorBag::new();
        assert!(!bag.replace("a".into(), Vec::new()));
        assert!(bag.replace("a".into(), msgs(&["x"])));
        assert!(!bag.replace("a".into(), msgs(&["x"])));
    }

    #[test]
    fn test_messages_flatten_in_order() {
        let mut bag = ErrorBag::new();
        bag.replace("b".into(), msgs(&["b1", "b2"]));
        bag.replace("a".into(), msgs(&["a1"]));

        let all: Vec<&str> = bag.messages().collect();
        assert_eq!(all, ["b1", "b2", "a1"]);
        assert_eq!(bag.count(), all.len());
        assert_eq!(bag.first("missing"), None);
    }

    #[test]
    fn test_serializes_as_map() {
        let mut bag = ErrorBag::new();
        bag.replace("email".into(), msgs(&["bad"]));
        assert_eq!(
            serde_json::to_string(&bag).unwrap(),
            r#"{"email":["bad"]}"#
        );
    }
}
