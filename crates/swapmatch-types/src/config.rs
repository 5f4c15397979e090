//! Engine configuration types.
//!
//! `EngineConfig` represents the top-level `config.toml` that tunes matching
//! and listing limits. Every field has a default.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the swap engine.
///
/// Loaded from `~/.swapmatch/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub matching: MatchingConfig,

    #[serde(default)]
    pub listing: ListingConfig,
}

/// Partner matching knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Maximum number of matches returned.
    #[serde(default = "default_max_results")]
    pub max_results: u32,

    /// Score assigned to every mutual skill match.
    #[serde(default = "default_base_score")]
    pub base_score: u8,
}

fn default_max_results() -> u32 {
    20
}

fn default_base_score() -> u8 {
    80
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            base_score: default_base_score(),
        }
    }
}

/// Caps applied to swap request listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingConfig {
    /// Per-direction cap for the sent/received overview.
    #[serde(default = "default_overview_limit")]
    pub overview_limit: u32,

    #[serde(default = "default_pending_limit")]
    pub pending_limit: u32,

    #[serde(default = "default_history_limit")]
    pub history_limit: u32,

    /// Largest page a caller may request.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

fn default_overview_limit() -> u32 {
    50
}

fn default_pending_limit() -> u32 {
    100
}

fn default_history_limit() -> u32 {
    50
}

fn default_max_page_size() -> u32 {
    100
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            overview_limit: default_overview_limit(),
            pending_limit: default_pending_limit(),
            history_limit: default_history_limit(),
            max_page_size: default_max_page_size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_config_default_values() {
        let config = EngineConfig::default();
        assert_eq!(config.matching.max_results, 20);
        assert_eq!(config.matching.base_score, 80);
        assert_eq!(config.listing.overview_limit, 50);
        assert_eq!(config.listing.pending_limit, 100);
        assert_eq!(config.listing.history_limit, 50);
        assert_eq!(config.listing.max_page_size, 100);
    }

    #[test]
    fn test_engine_config_deserialize_empty() {
        let config: EngineConfig = toml::from_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_engine_config_deserialize_partial() {
        let toml_str = r#"
[matching]
max_results = 5

[listing]
history_limit = 10
"#;
        let config: EngineConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.matching.max_results, 5);
        assert_eq!(config.matching.base_score, 80);
        assert_eq!(config.listing.history_limit, 10);
        assert_eq!(config.listing.pending_limit, 100);
    }
}
