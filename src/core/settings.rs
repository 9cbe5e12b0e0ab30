use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::{Error, Result};

pub const TOKEN_ENV_VAR: &str = "SLACK_USER_TOKEN";
pub const APPLY_ENV_VAR: &str = "APPLY";
pub const DEFAULT_PLAN_FILE: &str = "channel_mapping.csv";

/// Slack refuses `limit` values above this for conversations.list.
const MAX_PAGE_LIMIT: u32 = 1000;

/// Tunables for one run. Every field can be overridden from a JSON file;
/// anything omitted keeps the built-in default.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_api_timeout_secs")]
    pub api_timeout_secs: u64,

    #[serde(default = "default_pause_between_ms")]
    pub pause_between_ms: u64,

    #[serde(default = "default_rate_limit_fallback_secs")]
    pub rate_limit_fallback_secs: u64,

    #[serde(default = "default_max_rename_attempts")]
    pub max_rename_attempts: u32,

    #[serde(default = "default_page_limit")]
    pub page_limit: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            api_timeout_secs: default_api_timeout_secs(),
            pause_between_ms: default_pause_between_ms(),
            rate_limit_fallback_secs: default_rate_limit_fallback_secs(),
            max_rename_attempts: default_max_rename_attempts(),
            page_limit: default_page_limit(),
        }
    }
}

impl Settings {
    pub fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api_timeout_secs)
    }

    pub fn pause_between(&self) -> Duration {
        Duration::from_millis(self.pause_between_ms)
    }

    pub fn rate_limit_fallback(&self) -> Duration {
        Duration::from_secs(self.rate_limit_fallback_secs)
    }

    /// Wait to apply after a rate-limit signal. Missing or zero hints fall
    /// back to the configured duration.
    pub fn backoff_for(&self, retry_after: Option<Duration>) -> Duration {
        match retry_after {
            Some(wait) if !wait.is_zero() => wait,
            _ => self.rate_limit_fallback(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_base_url.trim().is_empty() {
            return Err(Error::config_invalid_value(
                "api_base_url",
                None,
                "api_base_url cannot be empty",
            ));
        }
        if self.api_timeout_secs == 0 {
            return Err(Error::config_invalid_value(
                "api_timeout_secs",
                Some("0".to_string()),
                "api_timeout_secs must be at least 1",
            ));
        }
        if self.rate_limit_fallback_secs == 0 {
            return Err(Error::config_invalid_value(
                "rate_limit_fallback_secs",
                Some("0".to_string()),
                "rate_limit_fallback_secs must be at least 1",
            ));
        }
        if self.max_rename_attempts == 0 {
            return Err(Error::config_invalid_value(
                "max_rename_attempts",
                Some("0".to_string()),
                "max_rename_attempts must be at least 1",
            ));
        }
        if self.page_limit == 0 || self.page_limit > MAX_PAGE_LIMIT {
            return Err(Error::config_invalid_value(
                "page_limit",
                Some(self.page_limit.to_string()),
                format!("page_limit must be between 1 and {}", MAX_PAGE_LIMIT),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_api_base_url() -> String {
    "https://slack.com/api".to_string()
}

fn default_api_timeout_secs() -> u64 {
    15
}

fn default_pause_between_ms() -> u64 {
    1000
}

fn default_rate_limit_fallback_secs() -> u64 {
    5
}

fn default_max_rename_attempts() -> u32 {
    3
}

fn default_page_limit() -> u32 {
    200
}

// =============================================================================
// Loading
// =============================================================================

/// Load settings from an optional JSON file. No path means built-in defaults.
pub fn load(path: Option<&str>) -> Result<Settings> {
    let settings = match path {
        Some(path) => load_from_file(path)?,
        None => Settings::default(),
    };
    settings.validate()?;
    Ok(settings)
}

fn load_from_file(path: &str) -> Result<Settings> {
    let expanded = shellexpand::tilde(path).to_string();
    let path = Path::new(&expanded);

    let content = fs::read_to_string(path).map_err(|e| {
        Error::internal_io(e.to_string(), Some(format!("read {}", path.display())))
    })?;

    serde_json::from_str(&content)
        .map_err(|e| Error::config_invalid_json(path.display().to_string(), e))
}

/// `APPLY=true` (any case) turns on apply mode.
pub fn apply_from_env() -> bool {
    std::env::var(APPLY_ENV_VAR)
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_documented_values() {
        let settings = Settings::default();
        assert_eq!(settings.api_timeout(), Duration::from_secs(15));
        assert_eq!(settings.pause_between(), Duration::from_secs(1));
        assert_eq!(settings.rate_limit_fallback(), Duration::from_secs(5));
        assert_eq!(settings.max_rename_attempts, 3);
        assert_eq!(settings.page_limit, 200);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"pause_between_ms": 250, "page_limit": 50}}"#).unwrap();

        let settings = load(Some(file.path().to_str().unwrap())).unwrap();
        assert_eq!(settings.pause_between(), Duration::from_millis(250));
        assert_eq!(settings.page_limit, 50);
        assert_eq!(settings.max_rename_attempts, 3);
    }

    #[test]
    fn malformed_file_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();

        let err = load(Some(file.path().to_str().unwrap())).unwrap_err();
        assert_eq!(err.code.as_str(), "config.invalid_json");
    }

    #[test]
    fn zero_attempts_rejected() {
        let settings = Settings {
            max_rename_attempts: 0,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn oversized_page_limit_rejected() {
        let settings = Settings {
            page_limit: 5000,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn backoff_uses_hint_or_fallback() {
        let settings = Settings::default();
        assert_eq!(
            settings.backoff_for(Some(Duration::from_secs(2))),
            Duration::from_secs(2)
        );
        assert_eq!(settings.backoff_for(Some(Duration::ZERO)), Duration::from_secs(5));
        assert_eq!(settings.backoff_for(None), Duration::from_secs(5));
    }
}
