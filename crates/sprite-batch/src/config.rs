use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sprite_fetch::{DEFAULT_BASE_URL, RetryPolicy};

use crate::profile::ParseErrorPolicy;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub initial_delay_secs: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_secs: 5.0,
        }
    }
}

/// Settings shared by all modes, read from a JSON file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExtractConfig {
    pub base_url: String,
    pub user_agent: Option<String>,
    pub request_timeout_secs: u64,
    pub retry: RetryConfig,
    /// Applies to the local and remote batch modes.
    pub on_parse_error: ParseErrorPolicy,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: None,
            request_timeout_secs: 30,
            retry: RetryConfig::default(),
            on_parse_error: ParseErrorPolicy::Abort,
        }
    }
}

impl ExtractConfig {
    /// Loads config from a specified path.
    /// Returns default config if file doesn't exist.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        Ok(config)
    }

    /// Saves config to a specified path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Negative delays are clamped to zero; delays too large for a
    /// `Duration` are rejected.
    pub fn retry_policy(&self) -> Result<RetryPolicy> {
        let secs = self.retry.initial_delay_secs.max(0.0);
        let initial_delay = Duration::try_from_secs_f64(secs)
            .with_context(|| format!("Invalid retry.initial_delay_secs: {secs}"))?;
        Ok(RetryPolicy {
            max_attempts: self.retry.max_attempts.max(1),
            initial_delay,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_values() {
        let config = ExtractConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.user_agent.is_none());
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.on_parse_error, ParseErrorPolicy::Abort);
        assert_eq!(config.retry_policy().unwrap(), RetryPolicy::default());
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        let dir = tempdir().unwrap();
        let config = ExtractConfig::load_from(dir.path().join("missing.json")).unwrap();
        assert_eq!(config, ExtractConfig::default());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"base_url": "http://localhost:8080", "on_parse_error": "skip", "retry": {"max_attempts": 5}}"#,
        )
        .unwrap();

        let config = ExtractConfig::load_from(&path).unwrap();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.on_parse_error, ParseErrorPolicy::Skip);
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.initial_delay_secs, 5.0);
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = ExtractConfig {
            user_agent: Some("tester/1.0".to_string()),
            request_timeout_secs: 5,
            ..Default::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(ExtractConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_json_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(ExtractConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_retry_policy_from_fractional_delay() {
        let config = ExtractConfig {
            retry: RetryConfig {
                max_attempts: 0,
                initial_delay_secs: 0.5,
            },
            ..Default::default()
        };
        let policy = config.retry_policy().unwrap();
        assert_eq!(policy.max_attempts, 1);
        assert_eq!(policy.initial_delay, Duration::from_millis(500));
    }

    #[test]
    fn test_overflowing_retry_delay_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"retry": {"initial_delay_secs": 1e300}}"#).unwrap();
        let config = ExtractConfig::load_from(&path).unwrap();
        let err = config.retry_policy().unwrap_err();
        assert!(err.to_string().contains("initial_delay_secs"), "{err}");
    }

    #[test]
    fn test_negative_retry_delay_clamps_to_zero() {
        let config = ExtractConfig {
            retry: RetryConfig {
                max_attempts: 3,
                initial_delay_secs: -2.0,
            },
            ..Default::default()
        };
        assert_eq!(config.retry_policy().unwrap().initial_delay, Duration::ZERO);
    }
}
