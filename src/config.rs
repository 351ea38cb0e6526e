use crate::constants::DEFAULT_PAGE_SIZE;
use crate::error::{CatalogError, Result};
use serde::Deserialize;
use std::fs;
use tracing::warn;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub mock: MockConfig,
}

#[derive(Debug, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_sort")]
    pub default_sort: String,
}

#[derive(Debug, Deserialize)]
pub struct MockConfig {
    #[serde(default = "default_product_count")]
    pub product_count: usize,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_sort() -> String {
    "newest".to_string()
}

fn default_product_count() -> usize {
    137
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            default_sort: default_sort(),
        }
    }
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            product_count: default_product_count(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            display: DisplayConfig::default(),
            mock: MockConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from("config.toml")
    }

    pub fn load_from(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CatalogError::Config(format!("Failed to read config file '{}': {}", path, e))
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Loads `config.toml` if present, otherwise falls back to defaults.
    /// A missing config file is normal for ad-hoc CLI use.
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                warn!("Using default configuration: {}", e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_sections_missing() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.display.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.display.default_sort, "newest");
        assert_eq!(config.mock.product_count, 137);
    }

    #[test]
    fn test_partial_override() {
        let config: Config = toml::from_str("[display]\npage_size = 50\n").unwrap();
        assert_eq!(config.display.page_size, 50);
        assert_eq!(config.display.default_sort, "newest");
    }
}
