//! Client configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use crate::api::RetryPolicy;
use crate::tournament::filter::DEFAULT_TIMEZONE;
use chrono_tz::Tz;
use std::time::Duration;

/// Production API root
pub const DEFAULT_BASE_URL: &str = "https://api.challonge.com/v1";

/// Complete client configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API key sent with every request (required)
    pub api_key: String,
    /// API root, without trailing slash
    pub base_url: String,
    /// Zone used to display timestamps and compare date bounds
    pub timezone: Tz,
    /// Retry behaviour for outbound calls
    pub retry: RetryPolicy,
    /// Per-request timeout
    pub http_timeout: Duration,
    /// User-Agent header value
    pub user_agent: String,
    /// Values applied to newly created tournaments
    pub defaults: TournamentDefaults,
}

/// Settings copied into every tournament this client creates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TournamentDefaults {
    pub game_name: String,
    pub description: String,
    pub private: bool,
    pub show_rounds: bool,
}

impl Default for TournamentDefaults {
    fn default() -> Self {
        Self {
            game_name: "Call of Duty: Warzone".to_string(),
            description: "Created via API".to_string(),
            private: false,
            show_rounds: true,
        }
    }
}

/// Values given on the command line, taking precedence over the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timezone: Option<String>,
}

impl ClientConfig {
    /// Configuration with defaults for everything but the credentials
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timezone: DEFAULT_TIMEZONE,
            retry: RetryPolicy::default(),
            http_timeout: Duration::from_secs(30),
            user_agent: default_user_agent(),
            defaults: TournamentDefaults::default(),
        }
    }

    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns error if `CHALLONGE_API_KEY` is missing or a value is invalid
    pub fn from_env(overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        Self::from_lookup(overrides, |key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// # Arguments
    ///
    /// * `overrides` - Command-line values, used before the lookup
    /// * `lookup` - Returns the value of a variable, if set
    pub fn from_lookup<F>(overrides: ConfigOverrides, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = overrides
            .api_key
            .or_else(|| lookup("CHALLONGE_API_KEY"))
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingRequired {
                var: "CHALLONGE_API_KEY".to_string(),
                hint: "Find it under Settings > Developer API on the bracket site, or pass --api-key"
                    .to_string(),
            })?;

        let base_url = overrides
            .base_url
            .or_else(|| lookup("CHALLONGE_BASE_URL"))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let mut config = ClientConfig::new(api_key.trim(), base_url);

        if let Some(name) = overrides.timezone.or_else(|| lookup("BRACKET_TIMEZONE")) {
            config.timezone = name.parse().map_err(|_| ConfigError::Invalid {
                var: "BRACKET_TIMEZONE".to_string(),
                reason: format!("'{}' is not an IANA timezone name", name),
            })?;
        }

        let retry_delay_secs = parse_var_or(&lookup, "BRACKET_RETRY_DELAY_SECS", 5u64)?;
        config.retry = RetryPolicy::new(
            parse_var_or(&lookup, "BRACKET_MAX_RETRIES", 3u32)?,
            Duration::from_secs(retry_delay_secs),
        );
        config.http_timeout =
            Duration::from_secs(parse_var_or(&lookup, "BRACKET_HTTP_TIMEOUT_SECS", 30u64)?);

        if let Some(agent) = lookup("BRACKET_USER_AGENT") {
            config.user_agent = agent;
        }

        let defaults = &mut config.defaults;
        if let Some(game_name) = lookup("BRACKET_GAME_NAME") {
            defaults.game_name = game_name;
        }
        if let Some(description) = lookup("BRACKET_DESCRIPTION") {
            defaults.description = description;
        }
        defaults.private = parse_var_or(&lookup, "BRACKET_PRIVATE", false)?;

        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::Invalid {
                var: "BRACKET_MAX_RETRIES".to_string(),
                reason: "Must be at least 1".to_string(),
            });
        }

        if self.http_timeout.is_zero() {
            return Err(ConfigError::Invalid {
                var: "BRACKET_HTTP_TIMEOUT_SECS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                var: "CHALLONGE_BASE_URL".to_string(),
                reason: format!("'{}' must start with http:// or https://", self.base_url),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}\nHint: {hint}")]
    MissingRequired { var: String, hint: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

fn default_user_agent() -> String {
    format!("bracket_admin/{}", env!("CARGO_PKG_VERSION"))
}

/// Parse an optional variable, failing loudly on a malformed value
fn parse_var_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            var: key.to_string(),
            reason: format!("Cannot parse '{}'", raw),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)], overrides: ConfigOverrides) -> Result<ClientConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClientConfig::from_lookup(overrides, |key| vars.get(key).cloned())
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingRequired {
            var: "CHALLONGE_API_KEY".to_string(),
            hint: "Pass --api-key".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("CHALLONGE_API_KEY"));
        assert!(msg.contains("Pass --api-key"));
    }

    #[test]
    fn test_missing_api_key() {
        let err = load(&[], ConfigOverrides::default()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingRequired { .. }));
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("CHALLONGE_API_KEY", "secret")], ConfigOverrides::default()).unwrap();

        assert_eq!(config.api_key, "secret");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timezone, chrono_tz::Europe::Paris);
        assert_eq!(config.retry, RetryPolicy::default());
        assert_eq!(config.defaults, TournamentDefaults::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides_win_over_environment() {
        let overrides = ConfigOverrides {
            api_key: Some("from-cli".to_string()),
            base_url: Some("http://localhost:8080/v1/".to_string()),
            timezone: Some("America/New_York".to_string()),
        };
        let config = load(
            &[
                ("CHALLONGE_API_KEY", "from-env"),
                ("CHALLONGE_BASE_URL", "https://example.com"),
                ("BRACKET_TIMEZONE", "Asia/Tokyo"),
            ],
            overrides,
        )
        .unwrap();

        assert_eq!(config.api_key, "from-cli");
        assert_eq!(config.base_url, "http://localhost:8080/v1");
        assert_eq!(config.timezone, chrono_tz::America::New_York);
    }

    #[test]
    fn test_invalid_timezone() {
        let err = load(
            &[("CHALLONGE_API_KEY", "k"), ("BRACKET_TIMEZONE", "Mars/Olympus")],
            ConfigOverrides::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref var, .. } if var == "BRACKET_TIMEZONE"));
    }

    #[test]
    fn test_malformed_number_is_rejected() {
        let err = load(
            &[("CHALLONGE_API_KEY", "k"), ("BRACKET_MAX_RETRIES", "many")],
            ConfigOverrides::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref var, .. } if var == "BRACKET_MAX_RETRIES"));
    }

    #[test]
    fn test_validation_zero_retries() {
        let config = load(
            &[("CHALLONGE_API_KEY", "k"), ("BRACKET_MAX_RETRIES", "0")],
            ConfigOverrides::default(),
        )
        .unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_validation_bad_scheme() {
        let config = ClientConfig::new("k", "ftp://example.com");
        assert!(config.validate().is_err());
    }
}
