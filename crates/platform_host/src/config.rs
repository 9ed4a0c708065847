//! Backend configuration detection.

use serde::{Deserialize, Serialize};

/// Environment variable holding the remote backend base URL.
pub const BACKEND_URL_ENV: &str = "HACKSIM_BACKEND_URL";
/// Environment variable holding the remote backend anonymous API key.
pub const BACKEND_ANON_KEY_ENV: &str = "HACKSIM_BACKEND_ANON_KEY";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
/// Connection settings for the remote table backend.
///
/// Both values must be present and non-blank for the remote store to count as configured; any
/// other combination selects demo mode (local fallback only).
pub struct BackendConfig {
    /// Base URL of the backend (for example `https://xyz.example.co`).
    pub url: Option<String>,
    /// Anonymous API key sent with every request.
    pub anon_key: Option<String>,
}

impl BackendConfig {
    /// Builds a config with explicit credentials.
    pub fn remote(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            anon_key: Some(anon_key.into()),
        }
    }

    /// Demo-mode config with no remote credentials.
    pub fn demo() -> Self {
        Self::default()
    }

    /// Resolves the config through a key lookup function.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            url: lookup(BACKEND_URL_ENV).and_then(non_blank),
            anon_key: lookup(BACKEND_ANON_KEY_ENV).and_then(non_blank),
        }
    }

    /// Resolves the config from the process environment.
    ///
    /// On `wasm32` the values are baked in at compile time, since the browser has no process
    /// environment.
    pub fn from_env() -> Self {
        #[cfg(target_arch = "wasm32")]
        {
            Self::from_lookup(|key| match key {
                BACKEND_URL_ENV => option_env!("HACKSIM_BACKEND_URL").map(str::to_string),
                BACKEND_ANON_KEY_ENV => {
                    option_env!("HACKSIM_BACKEND_ANON_KEY").map(str::to_string)
                }
                _ => None,
            })
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            Self::from_lookup(|key| std::env::var(key).ok())
        }
    }

    /// Returns `true` when both the URL and the key are available.
    pub fn is_remote_configured(&self) -> bool {
        self.credentials().is_some()
    }

    /// Returns `(url, anon_key)` when the remote store is configured.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let url = self.url.as_deref().filter(|v| !v.trim().is_empty())?;
        let key = self.anon_key.as_deref().filter(|v| !v.trim().is_empty())?;
        Some((url.trim_end_matches('/'), key))
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn lookup_with_both_values_is_configured() {
        let env = HashMap::from([
            (BACKEND_URL_ENV, "https://db.example.co/"),
            (BACKEND_ANON_KEY_ENV, "anon"),
        ]);
        let config = BackendConfig::from_lookup(|k| env.get(k).map(|v| v.to_string()));

        assert!(config.is_remote_configured());
        assert_eq!(config.credentials(), Some(("https://db.example.co", "anon")));
    }

    #[test]
    fn blank_or_missing_values_select_demo_mode() {
        let only_url = BackendConfig::from_lookup(|k| {
            (k == BACKEND_URL_ENV).then(|| "https://db.example.co".to_string())
        });
        assert!(!only_url.is_remote_configured());

        let blank_key = BackendConfig::from_lookup(|k| {
            Some(if k == BACKEND_URL_ENV {
                "https://db.example.co".to_string()
            } else {
                "   ".to_string()
            })
        });
        assert_eq!(blank_key.anon_key, None);
        assert!(!blank_key.is_remote_configured());

        assert!(!BackendConfig::demo().is_remote_configured());
    }
}
