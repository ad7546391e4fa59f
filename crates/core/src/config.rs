//! Configuration structures for the choppiness indicator.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::PriceSource;

/// Main configuration for the indicator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Score window configuration.
    pub choppiness: ChoppinessConfig,
    /// Moving-average line configuration.
    pub moving_averages: MovingAverageConfig,
}

impl Config {
    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Reject settings the indicator cannot run with.
    pub fn validate(&self) -> Result<()> {
        self.choppiness.validate()?;
        self.moving_averages.validate()
    }
}

/// Score window configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChoppinessConfig {
    /// Window capacity N in bars.
    pub period: usize,
}

impl ChoppinessConfig {
    pub fn validate(&self) -> Result<()> {
        if self.period == 0 {
            return Err(Error::config("choppiness period must be at least 1"));
        }
        Ok(())
    }
}

impl Default for ChoppinessConfig {
    fn default() -> Self {
        Self { period: 15 }
    }
}

/// Smoothing filter used for the three lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovingAverageKind {
    /// Exponential moving average.
    #[default]
    Ema,
    /// Simple moving average.
    Sma,
}

impl std::str::FromStr for MovingAverageKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ema" => Ok(MovingAverageKind::Ema),
            "sma" => Ok(MovingAverageKind::Sma),
            other => Err(Error::config(format!("unknown moving average kind: {other}"))),
        }
    }
}

/// Moving-average line configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MovingAverageConfig {
    /// Filter kind shared by all three lines.
    pub kind: MovingAverageKind,
    /// Bar price fed to the filters.
    pub source: PriceSource,
    /// Fast line length.
    pub fast: usize,
    /// Medium line length.
    pub medium: usize,
    /// Slow line length.
    pub slow: usize,
}

impl MovingAverageConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, length) in [("fast", self.fast), ("medium", self.medium), ("slow", self.slow)] {
            if length == 0 {
                return Err(Error::config(format!(
                    "{name} moving average length must be at least 1"
                )));
            }
        }
        Ok(())
    }
}

impl Default for MovingAverageConfig {
    fn default() -> Self {
        Self {
            kind: MovingAverageKind::Ema,
            source: PriceSource::Close,
            fast: 8,
            medium: 50,
            slow: 200,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.choppiness.period, 15);
        assert_eq!(config.moving_averages.fast, 8);
        assert_eq!(config.moving_averages.medium, 50);
        assert_eq!(config.moving_averages.slow, 200);
        assert_eq!(config.moving_averages.kind, MovingAverageKind::Ema);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_period_rejected() {
        let mut config = Config::default();
        config.choppiness.period = 0;
        assert!(config.validate().unwrap_err().is_config());
    }

    #[test]
    fn test_zero_length_rejected() {
        let mut config = Config::default();
        config.moving_averages.slow = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("slow"));
    }

    #[test]
    fn test_partial_json() {
        let config = Config::from_json(
            r#"{"choppiness": {"period": 30}, "moving_averages": {"kind": "sma", "source": "typical"}}"#,
        )
        .unwrap();
        assert_eq!(config.choppiness.period, 30);
        assert_eq!(config.moving_averages.kind, MovingAverageKind::Sma);
        assert_eq!(config.moving_averages.source, PriceSource::Typical);
        assert_eq!(config.moving_averages.slow, 200);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"choppiness": {{"period": 40}}}}"#).unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.choppiness.period, 40);
        assert_eq!(config.moving_averages.fast, 8);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_invalid_json_period() {
        assert!(Config::from_json(r#"{"choppiness": {"period": 0}}"#).is_err());
        assert!(Config::from_json("{").is_err());
    }
}
