//! Configuration types for ReelKit

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Engine binary to spawn (name on PATH or absolute path)
    pub binary: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            binary: "ffmpeg".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }
}

/// Job host configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    /// Jobs allowed to run at the same time
    pub max_concurrent: usize,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self { max_concurrent: 1 }
    }
}

impl HostConfig {
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent;
        self
    }
}

/// Top-level configuration, loadable from a TOML file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub host: HostConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| Error::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.engine.binary, "ffmpeg");
        assert_eq!(config.host.max_concurrent, 1);
    }

    #[test]
    fn test_builders() {
        let engine = EngineConfig::default().with_binary("/opt/ffmpeg/bin/ffmpeg");
        assert_eq!(engine.binary, "/opt/ffmpeg/bin/ffmpeg");

        let host = HostConfig::default().with_max_concurrent(4);
        assert_eq!(host.max_concurrent, 4);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[host]\nmax_concurrent = 3").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.host.max_concurrent, 3);
        assert_eq!(config.engine.binary, "ffmpeg");
    }

    #[test]
    fn test_invalid_file_is_a_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "not toml at all [").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
