// src/config.rs
//! Runtime configuration for the classifier endpoints, loaded from TOML with
//! env overrides. Scoring thresholds and word lists are deliberately NOT
//! configurable — they are part of the scoring contract.

use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use tracing::warn;

// --- env defaults & names ---
pub const DEFAULT_CONFIG_PATH: &str = "config/classifiers.toml";

pub const ENV_CONFIG_PATH: &str = "CLASSIFIERS_CONFIG_PATH";
/// Set to `mock` to replace both classifiers with deterministic fixtures.
pub const ENV_TEST_MODE: &str = "CLASSIFIER_TEST_MODE";

/// Root config: one section per classifier endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassifiersConfig {
    #[serde(default)]
    pub lexical: LexicalCfg,
    #[serde(default)]
    pub zeroshot: ZeroShotCfg,
}

/// Bag-of-words model server.
#[derive(Debug, Clone, Deserialize)]
pub struct LexicalCfg {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub endpoint: String,
}

impl Default for LexicalCfg {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: String::new(),
        }
    }
}

/// Zero-shot NLI endpoint plus its cache/budget settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ZeroShotCfg {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub endpoint: String,
    /// Name of the env var holding the bearer token (never the token itself).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_daily_limit")]
    pub daily_limit: u32,
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,
}

fn default_api_key_env() -> String {
    "HF_API_TOKEN".to_string()
}
fn default_daily_limit() -> u32 {
    200
}
fn default_cache_dir() -> String {
    "cache/zeroshot".to_string()
}

impl Default for ZeroShotCfg {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: String::new(),
            api_key_env: default_api_key_env(),
            daily_limit: default_daily_limit(),
            cache_dir: default_cache_dir(),
        }
    }
}

impl ClassifiersConfig {
    /// Load from `CLASSIFIERS_CONFIG_PATH` or the default path. A missing or
    /// unparsable file falls back to defaults (both classifiers disabled) —
    /// the service still answers, leaning on the quality heuristic.
    pub fn load() -> Self {
        let path = std::env::var(ENV_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

        match fs::read_to_string(&path) {
            Ok(s) => Self::from_toml_str(&s).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "invalid classifiers config; using defaults");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Load from a TOML string.
    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const TEST_TOML: &str = r#"
[lexical]
enabled = true
endpoint = "http://localhost:8801/predict"

[zeroshot]
enabled = true
endpoint = "https://api-inference.example.com/models/nli"
daily_limit = 50
"#;

    #[test]
    fn parses_full_config() {
        let cfg = ClassifiersConfig::from_toml_str(TEST_TOML).expect("parse");
        assert!(cfg.lexical.enabled);
        assert_eq!(cfg.lexical.endpoint, "http://localhost:8801/predict");
        assert!(cfg.zeroshot.enabled);
        assert_eq!(cfg.zeroshot.daily_limit, 50);
        // Unspecified fields keep their defaults.
        assert_eq!(cfg.zeroshot.api_key_env, "HF_API_TOKEN");
        assert_eq!(cfg.zeroshot.cache_dir, "cache/zeroshot");
    }

    #[test]
    fn empty_config_disables_everything() {
        let cfg = ClassifiersConfig::from_toml_str("").expect("parse empty");
        assert!(!cfg.lexical.enabled);
        assert!(!cfg.zeroshot.enabled);
    }

    #[test]
    #[serial]
    fn load_falls_back_to_defaults_without_file() {
        std::env::set_var(ENV_CONFIG_PATH, "does/not/exist.toml");
        let cfg = ClassifiersConfig::load();
        assert!(!cfg.lexical.enabled);
        assert!(!cfg.zeroshot.enabled);
        std::env::remove_var(ENV_CONFIG_PATH);
    }
}
