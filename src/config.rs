//! Runtime configuration.
//!
//! Loads settings from config.json at startup. Provides the market platform,
//! fuzzy-match acceptance distance, and preprocessing parameters.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Global configuration instance, initialized once at startup.
static CONFIG: OnceLock<ScanConfig> = OnceLock::new();

/// Complete scan configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Market platform to filter sell orders by ("pc", "ps4", "xbox", "switch")
    #[serde(default = "default_platform")]
    pub platform: String,
    /// Maximum Levenshtein distance still accepted as a catalog match
    #[serde(default = "default_max_match_distance")]
    pub max_match_distance: usize,
    /// Odd neighborhood size for the adaptive threshold, in pixels
    #[serde(default = "default_threshold_block_size")]
    pub threshold_block_size: u32,
    /// Bias subtracted from the neighborhood mean. Negative values raise the
    /// local threshold, which suppresses background glow around the name text.
    #[serde(default = "default_threshold_bias")]
    pub threshold_bias: i32,
    /// Whether to persist the screenshot and per-slot sub-images to captures/
    #[serde(default = "default_save_captures")]
    pub save_captures: bool,
}

fn default_platform() -> String {
    "pc".to_string()
}

fn default_max_match_distance() -> usize {
    10
}

fn default_threshold_block_size() -> u32 {
    51
}

fn default_threshold_bias() -> i32 {
    -10
}

fn default_save_captures() -> bool {
    true
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            platform: default_platform(),
            max_match_distance: default_max_match_distance(),
            threshold_block_size: default_threshold_block_size(),
            threshold_bias: default_threshold_bias(),
            save_captures: default_save_captures(),
        }
    }
}

/// Loads configuration from config.json or returns defaults.
/// Looks for config.json in the same directory as the executable.
fn load_config() -> ScanConfig {
    let config_path = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.join("config.json")))
        .unwrap_or_else(|| Path::new("config.json").to_path_buf());

    if config_path.exists() {
        match fs::read_to_string(&config_path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    crate::log("Config loaded from config.json");
                    return config;
                }
                Err(e) => {
                    crate::log(&format!(
                        "Failed to parse config.json: {}. Using defaults.",
                        e
                    ));
                }
            },
            Err(e) => {
                crate::log(&format!(
                    "Failed to read config.json: {}. Using defaults.",
                    e
                ));
            }
        }
    } else {
        crate::log("config.json not found. Using default config.");
    }

    ScanConfig::default()
}

/// Initializes the global configuration. Call once at startup.
pub fn init_config() {
    let _ = CONFIG.set(load_config());
}

/// Returns a reference to the global configuration.
/// Panics if called before init_config().
pub fn get_config() -> &'static ScanConfig {
    CONFIG
        .get()
        .expect("Config not initialized. Call init_config() first.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ScanConfig::default();
        assert_eq!(config.platform, "pc");
        assert_eq!(config.max_match_distance, 10);
        assert_eq!(config.threshold_block_size, 51);
        assert_eq!(config.threshold_bias, -10);
        assert!(config.save_captures);
    }

    #[test]
    fn test_partial_json_uses_field_defaults() {
        let config: ScanConfig = serde_json::from_str(r#"{"platform": "ps4"}"#).unwrap();
        assert_eq!(config.platform, "ps4");
        assert_eq!(config.max_match_distance, 10);
        assert_eq!(config.threshold_block_size, 51);
    }
}
