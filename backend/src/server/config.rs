//! Environment-driven application configuration.
//!
//! The whole configuration surface is a flat set of environment variables
//! read once at startup; a missing or malformed mandatory value fails the
//! boot with a typed error instead of limping along half-configured.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::domain::{RepeatNotificationPolicy, SenderIdentity};

const DEFAULT_SYNC_INTERVAL_HOURS: u64 = 24;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_TEMPLATE_DIR: &str = "templates";

/// Errors raised while loading configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A mandatory environment variable is unset or blank.
    #[error("missing required environment variable {name}")]
    Missing {
        /// Variable that was absent.
        name: &'static str,
    },
    /// A variable is set but cannot be parsed.
    #[error("invalid value for {name}: {message}")]
    Invalid {
        /// Variable that failed to parse.
        name: &'static str,
        /// Parse failure detail.
        message: String,
    },
}

impl ConfigError {
    fn missing(name: &'static str) -> Self {
        Self::Missing { name }
    }

    fn invalid(name: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            name,
            message: message.into(),
        }
    }
}

/// Credentials and endpoint for the JSON mail API.
#[derive(Debug, Clone)]
pub struct MailApiConfig {
    /// Send endpoint.
    pub endpoint: Url,
    /// API key sent with each message.
    pub api_key: String,
    /// Namespace sent with each message.
    pub namespace: String,
}

/// Fully loaded application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Feed endpoint for the batched timeseries request.
    pub feed_api_url: Url,
    /// Registration key sent with each feed request.
    pub feed_api_key: String,
    /// Mail API settings; absent means messages are logged, not delivered.
    pub mail: Option<MailApiConfig>,
    /// Directory holding the notification templates.
    pub template_dir: PathBuf,
    /// Identity substituted into sender placeholders.
    pub sender: SenderIdentity,
    /// Gap between scheduled cycles.
    pub sync_interval: Duration,
    /// Repeat-alert behaviour while a breach persists.
    pub repeat_policy: RepeatNotificationPolicy,
    /// Address the HTTP surface binds to.
    pub bind_addr: SocketAddr,
}

impl AppConfig {
    /// Load the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = require("DATABASE_URL")?;
        let feed_api_url = parse_url("FEED_API_URL", require("FEED_API_URL")?)?;
        let feed_api_key = require("FEED_API_KEY")?;

        let mail = match optional("MAIL_API_URL") {
            Some(raw) => Some(MailApiConfig {
                endpoint: parse_url("MAIL_API_URL", raw)?,
                api_key: require("MAIL_API_KEY")?,
                namespace: require("MAIL_NAMESPACE")?,
            }),
            None => None,
        };

        let template_dir =
            PathBuf::from(optional("TEMPLATE_DIR").unwrap_or_else(|| DEFAULT_TEMPLATE_DIR.to_owned()));

        let sender = SenderIdentity {
            first_name: optional("SENDER_FIRST_NAME").unwrap_or_else(|| "Economic".to_owned()),
            last_name: optional("SENDER_LAST_NAME").unwrap_or_else(|| "Alerts".to_owned()),
            email: require("SENDER_EMAIL")?,
        };

        let sync_interval = match optional("SYNC_INTERVAL_HOURS") {
            Some(raw) => {
                let hours: u64 = raw
                    .parse()
                    .map_err(|_| ConfigError::invalid("SYNC_INTERVAL_HOURS", raw.clone()))?;
                if hours == 0 {
                    return Err(ConfigError::invalid(
                        "SYNC_INTERVAL_HOURS",
                        "interval must be at least one hour",
                    ));
                }
                Duration::from_secs(hours * 60 * 60)
            }
            None => Duration::from_secs(DEFAULT_SYNC_INTERVAL_HOURS * 60 * 60),
        };

        let repeat_policy = match optional("REPEAT_NOTIFICATIONS") {
            Some(raw) => parse_repeat_policy(&raw)
                .ok_or_else(|| ConfigError::invalid("REPEAT_NOTIFICATIONS", raw.clone()))?,
            None => RepeatNotificationPolicy::default(),
        };

        let bind_raw = optional("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned());
        let bind_addr: SocketAddr = bind_raw
            .parse()
            .map_err(|_| ConfigError::invalid("BIND_ADDR", bind_raw.clone()))?;

        Ok(Self {
            database_url,
            feed_api_url,
            feed_api_key,
            mail,
            template_dir,
            sender,
            sync_interval,
            repeat_policy,
            bind_addr,
        })
    }
}

/// Parse the repeat-alert policy name used by `REPEAT_NOTIFICATIONS`.
pub fn parse_repeat_policy(raw: &str) -> Option<RepeatNotificationPolicy> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "every-tick" => Some(RepeatNotificationPolicy::EveryTick),
        "once-per-update" => Some(RepeatNotificationPolicy::OncePerUpdate),
        _ => None,
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    optional(name).ok_or_else(|| ConfigError::missing(name))
}

fn optional(name: &'static str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn parse_url(name: &'static str, raw: String) -> Result<Url, ConfigError> {
    Url::parse(&raw).map_err(|error| ConfigError::invalid(name, error.to_string()))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the pure parsing helpers. Loading from the
    //! process environment is exercised at startup, not here, to keep tests
    //! free of global env mutation.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("every-tick", RepeatNotificationPolicy::EveryTick)]
    #[case("once-per-update", RepeatNotificationPolicy::OncePerUpdate)]
    #[case("Once-Per-Update", RepeatNotificationPolicy::OncePerUpdate)]
    fn recognised_policy_names_parse(
        #[case] raw: &str,
        #[case] expected: RepeatNotificationPolicy,
    ) {
        assert_eq!(parse_repeat_policy(raw), Some(expected));
    }

    #[rstest]
    #[case("")]
    #[case("always")]
    #[case("never")]
    fn unknown_policy_names_are_rejected(#[case] raw: &str) {
        assert_eq!(parse_repeat_policy(raw), None);
    }

    #[test]
    fn url_parse_failures_name_the_variable() {
        let error = parse_url("FEED_API_URL", "not a url".to_owned())
            .expect_err("invalid url rejected");
        assert!(matches!(
            error,
            ConfigError::Invalid {
                name: "FEED_API_URL",
                ..
            }
        ));
    }
}
