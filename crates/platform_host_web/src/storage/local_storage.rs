//! `localStorage`-backed [`LocalStore`] implementation.
//!
//! On non-`wasm32` targets there is no browser storage: reads return nothing and writes report
//! the store as unavailable, so callers degrade the same way they would in a locked-down browser.

use platform_host::LocalStore;

#[derive(Debug, Clone, Copy, Default)]
/// Browser local store backed by `window.localStorage`.
pub struct WebLocalStore;

impl WebLocalStore {
    /// Returns `true` when `window.localStorage` is reachable.
    pub fn is_available(self) -> bool {
        #[cfg(target_arch = "wasm32")]
        {
            storage().is_ok()
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            false
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn storage() -> Result<web_sys::Storage, String> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .ok_or_else(|| "localStorage unavailable".to_string())
}

#[cfg(not(target_arch = "wasm32"))]
fn unavailable() -> String {
    "localStorage is only available when compiled for wasm32".to_string()
}

impl LocalStore for WebLocalStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, String> {
        #[cfg(target_arch = "wasm32")]
        {
            storage()?
                .get_item(key)
                .map_err(|e| format!("localStorage get_item failed: {e:?}"))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = key;
            Ok(None)
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), String> {
        #[cfg(target_arch = "wasm32")]
        {
            storage()?
                .set_item(key, value)
                .map_err(|e| format!("localStorage set_item failed: {e:?}"))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = (key, value);
            Err(unavailable())
        }
    }

    fn remove_item(&self, key: &str) -> Result<(), String> {
        #[cfg(target_arch = "wasm32")]
        {
            storage()?
                .remove_item(key)
                .map_err(|e| format!("localStorage remove_item failed: {e:?}"))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = key;
            Err(unavailable())
        }
    }

    fn keys(&self) -> Result<Vec<String>, String> {
        #[cfg(target_arch = "wasm32")]
        {
            let storage = storage()?;
            let len = storage
                .length()
                .map_err(|e| format!("localStorage length failed: {e:?}"))?;
            let mut keys = Vec::with_capacity(len as usize);
            for index in 0..len {
                if let Some(key) = storage
                    .key(index)
                    .map_err(|e| format!("localStorage key failed: {e:?}"))?
                {
                    keys.push(key);
                }
            }
            Ok(keys)
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            Ok(Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn non_wasm_store_reads_empty_and_rejects_writes() {
        let store = WebLocalStore;
        assert!(!store.is_available());
        assert_eq!(store.get_item("k").expect("get"), None);
        assert_eq!(store.keys().expect("keys"), Vec::<String>::new());
        assert!(store.set_item("k", "v").is_err());
        assert!(store.remove_item("k").is_err());
    }
}
