//! Configuration structures for the extraction pipeline.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Main configuration for flytax.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlytaxConfig {
    /// External document parser invocation.
    pub parser: ParserConfig,

    /// Output rendering.
    pub output: OutputConfig,
}

/// How to invoke the external document parser.
///
/// The document path is appended after `args`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Program to run.
    pub program: String,

    /// Arguments placed before the document path.
    pub args: Vec<String>,

    /// Wall-clock limit for one parser run, in seconds.
    pub timeout_secs: u64,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            program: "python".to_string(),
            args: vec!["-m".to_string(), "flytax".to_string()],
            timeout_secs: 120,
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON output.
    pub pretty: bool,

    /// Wrap the summary together with the raw parser output.
    pub include_parsed: bool,
}

impl FlytaxConfig {
    /// Load configuration from a JSON file and validate it.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.parser.program.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "parser.program".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if self.parser.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "parser.timeout_secs".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_match_service() {
        let config = FlytaxConfig::default();
        assert_eq!(config.parser.program, "python");
        assert_eq!(config.parser.args, vec!["-m", "flytax"]);
        assert_eq!(config.parser.timeout_secs, 120);
        assert!(!config.output.include_parsed);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"parser": {"timeout_secs": 30}}"#).unwrap();

        let config = FlytaxConfig::from_file(&path).unwrap();
        assert_eq!(config.parser.timeout_secs, 30);
        assert_eq!(config.parser.program, "python");
        assert_eq!(config.output, OutputConfig::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = FlytaxConfig::default();
        config.output.pretty = true;
        config.parser.args = vec!["--json".to_string()];
        config.save(&path).unwrap();

        assert_eq!(FlytaxConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"parser": {"timeout_secs": 0}}"#).unwrap();

        let err = FlytaxConfig::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("parser.timeout_secs"));
    }

    #[test]
    fn test_reports_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            FlytaxConfig::from_file(&path),
            Err(crate::FlytaxError::Config(ConfigError::Parse { .. }))
        ));
    }
}
