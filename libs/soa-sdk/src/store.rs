//! Key/value store contract and an in-memory implementation.
//!
//! Values are stored as JSON text. Reads parse best-effort: text that is not
//! valid JSON comes back as a JSON string holding the raw text.

use parking_lot::RwLock;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to serialize value for key '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Ordered string-keyed storage.
pub trait Store: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;

    /// Store `value` under `key`, replacing any previous value in place.
    ///
    /// # Errors
    /// Returns [`StoreError::Serialize`] if the value cannot be written as JSON.
    fn set(&self, key: &str, value: &Value) -> Result<(), StoreError>;

    fn delete(&self, key: &str);

    /// Key at position `index` in insertion order.
    fn key(&self, index: usize) -> Option<String>;

    fn count(&self) -> usize;

    fn clear(&self);
}

/// Typed writes on top of any [`Store`].
pub trait StoreExt: Store {
    /// # Errors
    /// Returns [`StoreError::Serialize`] if `value` cannot be represented as JSON.
    fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let value = serde_json::to_value(value).map_err(|source| StoreError::Serialize {
            key: key.to_owned(),
            source,
        })?;
        self.set(key, &value)
    }
}

impl<S: Store + ?Sized> StoreExt for S {}

/// Process-local [`Store`] keeping entries in insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<Vec<(String, String)>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw text as-is, bypassing JSON serialization.
    pub fn set_raw(&self, key: &str, raw: impl Into<String>) {
        let raw = raw.into();
        let mut entries = self.entries.write();
        if let Some(slot) = entries.iter_mut().find(|(k, _)| k == key) {
            slot.1 = raw;
        } else {
            entries.push((key.to_owned(), raw));
        }
    }
}

fn parse_lenient(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()))
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries
            .read()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, raw)| parse_lenient(raw))
    }

    fn set(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value).map_err(|source| StoreError::Serialize {
            key: key.to_owned(),
            source,
        })?;
        self.set_raw(key, raw);
        Ok(())
    }

    fn delete(&self, key: &str) {
        self.entries.write().retain(|(k, _)| k != key);
    }

    fn key(&self, index: usize) -> Option<String> {
        self.entries.read().get(index).map(|(k, _)| k.clone())
    }

    fn count(&self) -> usize {
        self.entries.read().len()
    }

    fn clear(&self) {
        self.entries.write().clear();
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_get_round_trip() {
        let store = MemoryStore::new();
        store.set("user", &json!({"id": 1, "name": "Bob"})).unwrap();
        assert_eq!(store.get("user"), Some(json!({"id": 1, "name": "Bob"})));
        assert_eq!(store.get("missing"), None);
    }

    #[test]
    fn test_order_and_replace_in_place() {
        let store = MemoryStore::new();
        store.set("a", &json!(1)).unwrap();
        store.set("b", &json!(2)).unwrap();
        store.set("a", &json!(3)).unwrap();

        assert_eq!(store.count(), 2);
        assert_eq!(store.key(0).as_deref(), Some("a"));
        assert_eq!(store.key(1).as_deref(), Some("b"));
        assert_eq!(store.key(2), None);
        assert_eq!(store.get("a"), Some(json!(3)));
    }

    #[test]
    fn test_delete_and_clear() {
        let store = MemoryStore::new();
        store.set("a", &json!(1)).unwrap();
        store.set("b", &json!(2)).unwrap();

        store.delete("a");
        assert_eq!(store.count(), 1);
        assert_eq!(store.key(0).as_deref(), Some("b"));

        store.clear();
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn test_unparseable_value_is_raw_string() {
        let store = MemoryStore::new();
        store.set_raw("token", "not json {");
        assert_eq!(store.get("token"), Some(json!("not json {")));
    }

    #[test]
    fn test_set_json_typed() {
        #[derive(Serialize)]
        struct Prefs {
            theme: &'static str,
        }

        let store = MemoryStore::new();
        store.set_json("prefs", &Prefs { theme: "dark" }).unwrap();
        assert_eq!(store.get("prefs"), Some(json!({"theme": "dark"})));
    }
}
