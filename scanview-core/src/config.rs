//! # Config Loader — Loads and validates TOML configuration
//!
//! Reads `scanview.toml` (or a custom path) and deserializes into typed config
//! structs. A missing file logs a warning and falls back to defaults so the
//! dashboard can start against a local scanner service with zero setup.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Top-level ScanView configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanViewConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub scanner: ScannerConfig,
    #[serde(default = "default_presets")]
    pub presets: Vec<ConfigPreset>,
}

impl Default for ScanViewConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            scanner: ScannerConfig::default(),
            presets: default_presets(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    pub bind: String,
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8787".into(),
            log_level: "info".into(),
        }
    }
}

/// Where the external MCP scanner service lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".into(),
            timeout_secs: 30,
        }
    }
}

/// A named scan configuration the UI offers as a quick-select action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigPreset {
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub expected_risk: String,
}

fn default_presets() -> Vec<ConfigPreset> {
    vec![
        ConfigPreset {
            name: "Poisoned Configuration".into(),
            path: "configs/poisoned_config.json".into(),
            description: "Malicious MCP server with hidden instructions".into(),
            expected_risk: "CRITICAL".into(),
        },
        ConfigPreset {
            name: "Clean Configuration".into(),
            path: "configs/clean_config.json".into(),
            description: "Safe MCP configuration".into(),
            expected_risk: "SAFE".into(),
        },
    ]
}

impl ScanViewConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        if !path.exists() {
            warn!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config: {}", e))?;
        let config: ScanViewConfig = toml::from_str(&content)
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        info!(
            path = %path.display(),
            scanner = %config.scanner.base_url,
            presets = config.presets.len(),
            "Configuration loaded"
        );
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), String> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;
        std::fs::write(path.as_ref(), content)
            .map_err(|e| format!("Failed to write config: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_scanner() {
        let config = ScanViewConfig::load("/nonexistent/scanview.toml").unwrap();
        assert_eq!(config.scanner.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.general.bind, "127.0.0.1:8787");
        assert_eq!(config.presets.len(), 2);
        assert_eq!(config.presets[0].expected_risk, "CRITICAL");
        assert_eq!(config.presets[1].expected_risk, "SAFE");
    }

    #[test]
    fn config_roundtrip() {
        let dir = std::env::temp_dir().join("scanview_config_rt_test");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();

        let path = dir.join("scanview.toml");
        let mut config = ScanViewConfig::default();
        config.scanner.base_url = "http://scanner.internal:9000".into();
        config.save(&path).unwrap();

        let loaded = ScanViewConfig::load(&path).unwrap();
        assert_eq!(loaded.scanner.base_url, "http://scanner.internal:9000");
        assert_eq!(loaded.presets.len(), config.presets.len());
        assert_eq!(loaded.general.log_level, config.general.log_level);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
