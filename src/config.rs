//! Configuration of the resolution mode.

use std::env;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Configuration for an [`AutoWiredCache`](crate::AutoWiredCache).
///
/// The configuration can be deserialized from any serde format. Missing fields fall back to
/// their defaults:
///
/// ```
/// use autowire::CacheConfig;
///
/// let config: CacheConfig = serde_json::from_str(r#"{ "evaluate_lazy": true }"#).unwrap();
/// assert!(config.evaluate_lazy);
///
/// let config: CacheConfig = serde_json::from_str("{}").unwrap();
/// assert_eq!(config, CacheConfig::eager());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Defers dependency validation from blueprint registration to the first lookup.
    pub evaluate_lazy: bool,
}

impl CacheConfig {
    /// Environment variable read by [`CacheConfig::from_env`].
    pub const EVALUATE_LAZY_ENV: &'static str = "AUTOWIRE_EVALUATE_LAZY";

    /// Validates dependencies when blueprints are registered.
    pub const fn eager() -> Self {
        CacheConfig {
            evaluate_lazy: false,
        }
    }

    /// Validates dependencies when a type is first looked up.
    pub const fn lazy() -> Self {
        CacheConfig {
            evaluate_lazy: true,
        }
    }

    /// Sets whether dependency validation is deferred to lookup.
    pub const fn with_evaluate_lazy(self, evaluate_lazy: bool) -> Self {
        CacheConfig { evaluate_lazy }
    }

    /// Reads the configuration from the environment.
    ///
    /// `AUTOWIRE_EVALUATE_LAZY` accepts `1`, `true`, `yes` and `on` to enable lazy evaluation, and
    /// `0`, `false`, `no` and `off` to disable it. Unset or unrecognised values keep the default.
    pub fn from_env() -> Self {
        Self::from_env_value(env::var(Self::EVALUATE_LAZY_ENV).ok().as_deref())
    }

    fn from_env_value(value: Option<&str>) -> Self {
        let Some(value) = value else {
            return CacheConfig::default();
        };

        match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => CacheConfig::lazy(),
            "0" | "false" | "no" | "off" | "" => CacheConfig::eager(),
            other => {
                warn!(
                    variable = Self::EVALUATE_LAZY_ENV,
                    value = other,
                    "unrecognised value, using eager evaluation"
                );
                CacheConfig::default()
            }
        }
    }
}
