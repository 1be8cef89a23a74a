//! Dotted field paths and nested lookup into a data document.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::foundation::PathError;

// ============================================================================
// FIELD PATH
// ============================================================================

/// A dot-separated path naming a (possibly nested) field, e.g. `user.email`.
///
/// Cloning is cheap; the text is shared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPath(Arc<str>);

impl FieldPath {
    /// Creates a path from its dotted text.
    pub fn new(path: impl AsRef<str>) -> Self {
        Self(Arc::from(path.as_ref()))
    }

    /// Returns the dotted text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterates over the dot-separated segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    /// Returns the last segment, which names the field itself.
    #[must_use]
    pub fn last_segment(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }

    /// Builds the message-template key for a rule on this field.
    #[must_use]
    pub fn rule_key(&self, rule: &str) -> String {
        format!("{}.{rule}", self.0)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for FieldPath {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for FieldPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FieldPath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for FieldPath {
    fn from(path: String) -> Self {
        Self(Arc::from(path))
    }
}

impl From<&String> for FieldPath {
    fn from(path: &String) -> Self {
        Self::new(path)
    }
}

// ============================================================================
// LOOKUP
// ============================================================================

/// Resolves a dotted path against a data document.
///
/// Object members are looked up by key and array elements by decimal index.
/// Returns `None` as soon as a segment is missing or an intermediate value is
/// a scalar.
///
/// # Examples
///
/// ```rust
/// use formrule_validator::foundation::data_get;
/// use serde_json::json;
///
/// let data = json!({"user": {"tags": ["a", "b"]}, "age": 4});
/// assert_eq!(data_get(&data, "user.tags.1"), Some(&json!("b")));
/// assert_eq!(data_get(&data, "age.years"), None);
/// assert_eq!(data_get(&data, "missing.deeper"), None);
/// ```
#[must_use]
pub fn data_get<'a>(target: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(target, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Writes a value at a dotted path, creating missing intermediate objects.
///
/// Array segments must address an existing element or the slot right after
/// the last one (which appends).
pub fn data_set(target: &mut Value, path: &str, value: Value) -> Result<(), PathError> {
    if path.is_empty() {
        return Err(PathError::Empty);
    }

    let segments: Vec<&str> = path.split('.').collect();
    let (last, parents) = segments.split_last().ok_or(PathError::Empty)?;

    let mut current = target;
    for segment in parents {
        current = child_mut(current, path, segment)?;
    }

    if current.is_null() {
        *current = Value::Object(Map::new());
    }

    match current {
        Value::Object(map) => {
            map.insert((*last).to_owned(), value);
            Ok(())
        }
        Value::Array(items) => {
            let index = parse_index(path, last, items.len())?;
            if index == items.len() {
                items.push(value);
            } else {
                items[index] = value;
            }
            Ok(())
        }
        _ => Err(PathError::NotAContainer {
            path: path.to_owned(),
            segment: (*last).to_owned(),
        }),
    }
}

fn child_mut<'a>(
    current: &'a mut Value,
    path: &str,
    segment: &str,
) -> Result<&'a mut Value, PathError> {
    if current.is_null() {
        *current = Value::Object(Map::new());
    }

    match current {
        Value::Object(map) => Ok(map
            .entry(segment.to_owned())
            .or_insert_with(|| Value::Object(Map::new()))),
        Value::Array(items) => {
            let index = parse_index(path, segment, items.len())?;
            if index == items.len() {
                items.push(Value::Object(Map::new()));
            }
            Ok(&mut items[index])
        }
        _ => Err(PathError::NotAContainer {
            path: path.to_owned(),
            segment: segment.to_owned(),
        }),
    }
}

fn parse_index(path: &str, segment: &str, len: usize) -> Result<usize, PathError> {
    segment
        .parse::<usize>()
        .ok()
        .filter(|&i| i <= len)
        .ok_or_else(|| PathError::BadIndex {
            path: path.to_owned(),
            segment: segment.to_owned(),
        })
}

// ============================================================================
// TESTS
// ============================================================================
