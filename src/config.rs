//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the
//! tuvi-config.toml file. It provides defaults for the values the chart
//! binary needs beyond the birth instant itself (querent year, display
//! name) plus terminal rendering options.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Application configuration loaded from tuvi-config.toml
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Chart defaults applied when the command line leaves them out
    pub chart: ChartConfig,
    /// Terminal output configuration
    pub display: DisplayConfig,
}

/// Defaults for chart inputs
#[derive(Debug, Deserialize, Serialize)]
pub struct ChartConfig {
    /// Querent year the periods are computed against
    pub querent_year: i32,
    /// Name printed in the chart header
    pub display_name: String,
}

/// Terminal output configuration
#[derive(Debug, Deserialize, Serialize)]
pub struct DisplayConfig {
    /// Emit the JSON snapshot instead of the ASCII grid
    pub json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            chart: ChartConfig {
                querent_year: 2023,
                display_name: "Khuyết danh".to_string(),
            },
            display: DisplayConfig { json: false },
        }
    }
}

impl Config {
    /// Load configuration from tuvi-config.toml file
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path("tuvi-config.toml")
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Warning: Invalid config file format: {}", e);
                    eprintln!("Using default configuration");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Save current configuration to tuvi-config.toml
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let contents = toml::to_string_pretty(self)?;
        fs::write("tuvi-config.toml", contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.chart.querent_year, 2023);
        assert_eq!(config.chart.display_name, "Khuyết danh");
        assert!(!config.display.json);
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.chart.querent_year, parsed.chart.querent_year);
        assert_eq!(config.chart.display_name, parsed.chart.display_name);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let config = Config::load_from_path("/nonexistent/path");
        // Should fallback to default
        assert_eq!(config.chart.querent_year, 2023);
    }

    #[test]
    fn test_parse_custom_file() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "[chart]\nquerent_year = 2026\ndisplay_name = \"Nguyễn Văn A\"\n\n[display]\njson = true\n"
        )
        .unwrap();
        let config = Config::load_from_path(file.path());
        assert_eq!(config.chart.querent_year, 2026);
        assert_eq!(config.chart.display_name, "Nguyễn Văn A");
        assert!(config.display.json);
    }
}
