/// Optional JSON configuration for the summary tool
///
/// Every field is optional. Values given on the command line win over the
/// file, and the file wins over the built-in defaults.

use std::path::Path;

use log::info;
use serde::Deserialize;

use crate::core::report::DEFAULT_TOP_N;
use crate::error::{Result, ToolkitError};

/// Contents of a `--config` file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SummaryConfig {
    pub top_n: Option<usize>,
    pub delimiter: Option<char>,
    pub na_values: Vec<String>,
}

impl SummaryConfig {
    /// # Errors
    ///
    /// `FileNotFound` for a missing file, `Config` for unreadable JSON, a
    /// `top_n` of zero, or a delimiter that is not a single ASCII character.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(ToolkitError::FileNotFound(path.to_path_buf()));
        }
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw).map_err(|e| ToolkitError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        if config.top_n == Some(0) {
            return Err(ToolkitError::Config {
                path: path.to_path_buf(),
                message: "top_n must be at least 1".to_string(),
            });
        }
        if let Some(delimiter) = config.delimiter {
            delimiter_byte(delimiter).map_err(|message| ToolkitError::Config {
                path: path.to_path_buf(),
                message,
            })?;
        }
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}

/// Effective settings after merging CLI flags, config file and defaults
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarySettings {
    pub top_n: usize,
    pub delimiter: u8,
    pub na_values: Vec<String>,
}

impl SummarySettings {
    /// # Errors
    ///
    /// A delimiter that is not a single ASCII character is rejected.
    pub fn resolve(
        cli_top_n: Option<usize>,
        cli_delimiter: Option<char>,
        config: &SummaryConfig,
    ) -> std::result::Result<Self, String> {
        let delimiter = match cli_delimiter.or(config.delimiter) {
            Some(c) => delimiter_byte(c)?,
            None => b',',
        };
        Ok(Self {
            top_n: cli_top_n.or(config.top_n).unwrap_or(DEFAULT_TOP_N),
            delimiter,
            na_values: config.na_values.clone(),
        })
    }
}

fn delimiter_byte(c: char) -> std::result::Result<u8, String> {
    if c.is_ascii() {
        Ok(c as u8)
    } else {
        Err(format!("delimiter {c:?} must be a single ASCII character"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_config_overrides_default() {
        let config = SummaryConfig {
            top_n: Some(3),
            delimiter: Some(';'),
            na_values: vec!["-".to_string()],
        };

        let settings = SummarySettings::resolve(None, None, &config).expect("resolve");
        assert_eq!(settings.top_n, 3);
        assert_eq!(settings.delimiter, b';');
        assert_eq!(settings.na_values, vec!["-"]);

        let settings = SummarySettings::resolve(Some(7), Some('\t'), &config).expect("resolve");
        assert_eq!(settings.top_n, 7);
        assert_eq!(settings.delimiter, b'\t');

        let settings =
            SummarySettings::resolve(None, None, &SummaryConfig::default()).expect("resolve");
        assert_eq!(settings.top_n, DEFAULT_TOP_N);
        assert_eq!(settings.delimiter, b',');
    }

    #[test]
    fn test_non_ascii_delimiter_is_rejected() {
        assert!(SummarySettings::resolve(None, Some('§'), &SummaryConfig::default()).is_err());
    }

    #[test]
    fn test_load_config_file() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = temp_dir.path().join("summary.json");
        std::fs::write(&path, r#"{ "top_n": 2, "na_values": ["?"] }"#).expect("write");

        let config = SummaryConfig::load(&path).expect("Failed to load config");
        assert_eq!(config.top_n, Some(2));
        assert_eq!(config.delimiter, None);
        assert_eq!(config.na_values, vec!["?"]);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = temp_dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").expect("write");
        assert!(matches!(
            SummaryConfig::load(&path),
            Err(ToolkitError::Config { .. })
        ));

        assert!(matches!(
            SummaryConfig::load(&temp_dir.path().join("missing.json")),
            Err(ToolkitError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_zero_top_n_in_config_is_rejected() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = temp_dir.path().join("summary.json");
        std::fs::write(&path, r#"{"top_n": 0}"#).expect("write");

        match SummaryConfig::load(&path) {
            Err(ToolkitError::Config { message, .. }) => assert!(message.contains("top_n")),
            other => panic!("expected a config error, got {other:?}"),
        }
    }
}
