//! Synchronous string key-value store contract used as the local (demo-mode) fallback.

use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

use serde::{de::DeserializeOwned, Serialize};

/// Host service for a browser-scoped string key-value store (`localStorage` semantics).
///
/// All operations are synchronous; values are unbounded strings.
pub trait LocalStore {
    /// Reads the raw string stored under `key`.
    fn get_item(&self, key: &str) -> Result<Option<String>, String>;

    /// Writes a raw string under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<(), String>;

    /// Removes `key`. Missing keys are not an error.
    fn remove_item(&self, key: &str) -> Result<(), String>;

    /// Lists every key currently present.
    fn keys(&self) -> Result<Vec<String>, String>;
}

impl<S: LocalStore + ?Sized> LocalStore for Rc<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>, String> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), String> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), String> {
        (**self).remove_item(key)
    }

    fn keys(&self) -> Result<Vec<String>, String> {
        (**self).keys()
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory local store. Clones share the same map.
pub struct MemoryLocalStore {
    inner: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryLocalStore {
    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    /// Returns `true` when the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }
}

impl LocalStore for MemoryLocalStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, String> {
        Ok(self.inner.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), String> {
        self.inner
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), String> {
        self.inner.borrow_mut().remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, String> {
        Ok(self.inner.borrow().keys().cloned().collect())
    }
}

/// Loads and deserializes a JSON value stored under `key`.
///
/// # Errors
///
/// Returns an error when the store read or JSON deserialization fails.
pub fn load_local_json<S: LocalStore + ?Sized, T: DeserializeOwned>(
    store: &S,
    key: &str,
) -> Result<Option<T>, String> {
    let Some(raw) = store.get_item(key)? else {
        return Ok(None);
    };
    let value = serde_json::from_str(&raw).map_err(|e| format!("{key}: {e}"))?;
    Ok(Some(value))
}

/// Serializes `value` to JSON and stores it under `key`.
///
/// # Errors
///
/// Returns an error when serialization or the store write fails.
pub fn save_local_json<S: LocalStore + ?Sized, T: Serialize + ?Sized>(
    store: &S,
    key: &str,
    value: &T,
) -> Result<(), String> {
    let raw = serde_json::to_string(value).map_err(|e| e.to_string())?;
    store.set_item(key, &raw)
}

/// Lists keys starting with `prefix`, sorted.
///
/// # Errors
///
/// Returns an error when the store cannot enumerate its keys.
pub fn keys_with_prefix<S: LocalStore + ?Sized>(
    store: &S,
    prefix: &str,
) -> Result<Vec<String>, String> {
    let mut keys = store
        .keys()?
        .into_iter()
        .filter(|k| k.starts_with(prefix))
        .collect::<Vec<_>>();
    keys.sort();
    Ok(keys)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Volume {
        level: u8,
    }

    #[test]
    fn memory_local_store_round_trip_overwrite_and_remove() {
        let store = MemoryLocalStore::default();
        let store_obj: &dyn LocalStore = &store;

        store_obj.set_item("a", "1").expect("set");
        store_obj.set_item("a", "2").expect("overwrite");
        assert_eq!(store_obj.get_item("a").expect("get"), Some("2".to_string()));

        store_obj.remove_item("a").expect("remove");
        store_obj.remove_item("a").expect("remove missing");
        assert_eq!(store_obj.get_item("a").expect("get"), None);
        assert!(store.is_empty());
    }

    #[test]
    fn clones_share_state() {
        let store = MemoryLocalStore::default();
        let other = store.clone();
        store.set_item("k", "v").expect("set");
        assert_eq!(other.get_item("k").expect("get"), Some("v".to_string()));
        assert_eq!(other.len(), 1);
    }

    #[test]
    fn typed_json_helpers_round_trip_and_surface_decode_errors() {
        let store = MemoryLocalStore::default();
        save_local_json(&store, "volume", &Volume { level: 7 }).expect("save");
        let loaded: Option<Volume> = load_local_json(&store, "volume").expect("load");
        assert_eq!(loaded, Some(Volume { level: 7 }));

        store.set_item("broken", "{not json").expect("set");
        let err = load_local_json::<_, Volume>(&store, "broken").expect_err("decode failure");
        assert!(err.starts_with("broken:"));

        assert_eq!(
            load_local_json::<_, Volume>(&store, "missing").expect("load"),
            None
        );
    }

    #[test]
    fn keys_with_prefix_filters_and_sorts() {
        let store = MemoryLocalStore::default();
        for key in ["p-b", "q-a", "p-a"] {
            store.set_item(key, "{}").expect("set");
        }
        assert_eq!(
            keys_with_prefix(&store, "p-").expect("keys"),
            vec!["p-a".to_string(), "p-b".to_string()]
        );
    }
}
