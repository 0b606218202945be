//! Query-string builder for store requests.

use serde_json::Value;

/// Ordered list of query parameters.
///
/// Setting a key that is already present replaces its value in place, so
/// caller-supplied filters can override defaults such as `per_page`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    /// Create an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, replacing every previous value of `key`.
    pub fn set(&mut self, key: impl Into<String>, value: impl ToString) -> &mut Self {
        let key = key.into();
        self.pairs.retain(|(k, _)| *k != key);
        self.pairs.push((key, value.to_string()));
        self
    }

    /// Builder flavour of [`Query::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.set(key, value);
        self
    }

    /// Set `key` from an arbitrary JSON value.
    ///
    /// Arrays become repeated keys, `null` is skipped, objects are sent as
    /// their JSON text.
    pub fn set_json(&mut self, key: &str, value: &Value) -> &mut Self {
        match value {
            Value::Null => {}
            Value::String(s) => {
                self.set(key, s);
            }
            Value::Array(items) => {
                self.pairs.retain(|(k, _)| k != key);
                for item in items {
                    let text = match item {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    self.pairs.push((key.to_string(), text));
                }
            }
            other => {
                self.set(key, other);
            }
        }
        self
    }

    /// Merge every entry of a JSON object, later keys winning.
    pub fn merge_object(&mut self, object: &serde_json::Map<String, Value>) -> &mut Self {
        for (key, value) in object {
            self.set_json(key, value);
        }
        self
    }

    /// Value of the first occurrence of `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// All pairs in insertion order.
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
