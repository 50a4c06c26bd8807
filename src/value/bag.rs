//! Multi-valued string mapping shared between sources.

use std::collections::BTreeMap;

use serde_yaml::Value;

/// A mapping from keys to ordered string values.
///
/// `set` replaces a key's values; `add` appends to them. Keys iterate in
/// sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataBag {
    entries: BTreeMap<String, Vec<String>>,
}

impl DataBag {
    /// Create an empty bag.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Parse an inline `key=value&key=value` query.
    ///
    /// Keys and values are form-urlencoded, so `%20` and `+` decode to a
    /// space. Repeated keys append. A key without `=` is recorded as `true`.
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let mut bag = Self::new();
        for pair in query.split('&').filter(|pair| !pair.is_empty()) {
            let bare = !pair.contains('=');
            for (key, value) in form_urlencoded::parse(pair.as_bytes()) {
                bag.add(&key, if bare { "true" } else { value.as_ref() });
            }
        }
        bag
    }

    /// First value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// All values for `key`, empty when absent.
    #[must_use]
    pub fn get_all(&self, key: &str) -> &[String] {
        self.entries.get(key).map_or(&[], Vec::as_slice)
    }

    /// Replace the values for `key`.
    pub fn set(&mut self, key: &str, values: Vec<String>) {
        self.entries.insert(key.to_owned(), values);
    }

    /// Append one value to `key`.
    pub fn add(&mut self, key: &str, value: &str) {
        self.entries
            .entry(key.to_owned())
            .or_default()
            .push(value.to_owned());
    }

    /// Remove `key`, returning its values.
    pub fn delete(&mut self, key: &str) -> Option<Vec<String>> {
        self.entries.remove(key)
    }

    /// Whether `key` is present.
    #[must_use]
    pub fn exists(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Whether the first value for `key` is `true`.
    #[must_use]
    pub fn is_true(&self, key: &str) -> bool {
        self.get(key) == Some("true")
    }

    /// Whether the bag holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// A bag holding only the listed keys.
    #[must_use]
    pub fn filter(&self, keys: &[&str]) -> Self {
        let entries = self
            .entries
            .iter()
            .filter(|(key, _)| keys.contains(&key.as_str()))
            .map(|(key, values)| (key.clone(), values.clone()))
            .collect();
        Self { entries }
    }

    /// Overlay `other` onto this bag; `other` wins per key.
    pub fn merge(&mut self, other: &Self) {
        for (key, values) in &other.entries {
            self.entries.insert(key.clone(), values.clone());
        }
    }

    /// Document form: single values become scalars, repeated values lists.
    #[must_use]
    pub fn to_yaml(&self) -> BTreeMap<String, Value> {
        self.entries
            .iter()
            .map(|(key, values)| {
                let value = match values.as_slice() {
                    [single] => Value::String(single.clone()),
                    many => Value::Sequence(many.iter().cloned().map(Value::String).collect()),
                };
                (key.clone(), value)
            })
            .collect()
    }
}
