//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `FURIA_BASE_URL` - Public URL for the site
//! - `FURIA_ORDER_EMAIL` - Recipient of order requests
//!
//! ## Optional
//! - `FURIA_HOST` - Bind address (default: 127.0.0.1)
//! - `FURIA_PORT` - Listen port (default: 3000)
//! - `FURIA_ORDER_SUBJECT` - Subject of order requests
//! - `FURIA_SCHEDULE_SOURCE` - Schedule feed URL or file path
//! - `FURIA_SCHEDULE_POLL_SECS` - Schedule refresh interval (default: 300)
//! - `FURIA_HOME_VENUE` - Venue shown for home games (default: LANXESS arena)
//! - `FURIA_INVALID_QUANTITY` - `remove` or `reject` (default: remove)
//! - `FURIA_SESSION_DATABASE_URL` - `SQLite` database for visitor sessions
//!   (default: sqlite://furia-sessions.db?mode=rwc)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use furia_core::Email;
use furia_core::cart::InvalidQuantityPolicy;
use furia_core::checkout::{CheckoutSettings, DEFAULT_SUBJECT};
use furia_core::schedule::DEFAULT_HOME_VENUE;
use thiserror::Error;

/// Default schedule feed, relative to the workspace root.
pub const DEFAULT_SCHEDULE_SOURCE: &str = "crates/storefront/static/schedule.json";

const DEFAULT_POLL_SECS: u64 = 300;

/// Default session database, created next to the working directory.
pub const DEFAULT_SESSION_DATABASE_URL: &str = "sqlite://furia-sessions.db?mode=rwc";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the site
    pub base_url: String,
    /// Where checkout sends order requests
    pub checkout: CheckoutSettings,
    /// Upcoming-games feed
    pub schedule: ScheduleConfig,
    /// Handling of invalid quantity input
    pub invalid_quantity: InvalidQuantityPolicy,
    /// Session database URL
    pub session_database_url: String,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Schedule feed configuration.
#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    /// URL or file path of the feed
    pub source: String,
    /// Refresh interval
    pub poll_interval: Duration,
    /// Venue shown for home games
    pub home_venue: String,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its
    /// value.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(lookup);

        let host = env
            .or_default("FURIA_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("FURIA_HOST".to_string(), e.to_string()))?;
        let port = env
            .or_default("FURIA_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("FURIA_PORT".to_string(), e.to_string()))?;
        let base_url = env.required("FURIA_BASE_URL")?;

        let recipient = Email::parse(&env.required("FURIA_ORDER_EMAIL")?).map_err(|e| {
            ConfigError::InvalidEnvVar("FURIA_ORDER_EMAIL".to_string(), e.to_string())
        })?;
        let checkout = CheckoutSettings::new(recipient)
            .with_subject(env.or_default("FURIA_ORDER_SUBJECT", DEFAULT_SUBJECT));

        let schedule = ScheduleConfig::from_env(&env)?;

        let invalid_quantity = env
            .or_default("FURIA_INVALID_QUANTITY", InvalidQuantityPolicy::default().as_str())
            .parse::<InvalidQuantityPolicy>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("FURIA_INVALID_QUANTITY".to_string(), e.to_string())
            })?;

        Ok(Self {
            host,
            port,
            base_url,
            checkout,
            schedule,
            invalid_quantity,
            session_database_url: env
                .or_default("FURIA_SESSION_DATABASE_URL", DEFAULT_SESSION_DATABASE_URL),
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the site is served over HTTPS (secure cookies).
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl ScheduleConfig {
    fn from_env<F: Fn(&str) -> Option<String>>(env: &Env<F>) -> Result<Self, ConfigError> {
        let poll_secs = env
            .or_default("FURIA_SCHEDULE_POLL_SECS", &DEFAULT_POLL_SECS.to_string())
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or_else(|| {
                ConfigError::InvalidEnvVar(
                    "FURIA_SCHEDULE_POLL_SECS".to_string(),
                    "must be a positive number of seconds".to_string(),
                )
            })?;

        Ok(Self {
            source: env.or_default("FURIA_SCHEDULE_SOURCE", DEFAULT_SCHEDULE_SOURCE),
            poll_interval: Duration::from_secs(poll_secs),
            home_venue: env.or_default("FURIA_HOME_VENUE", DEFAULT_HOME_VENUE),
        })
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            source: DEFAULT_SCHEDULE_SOURCE.to_string(),
            poll_interval: Duration::from_secs(DEFAULT_POLL_SECS),
            home_venue: DEFAULT_HOME_VENUE.to_string(),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable lookup with the usual required/optional/default accessors.
struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get an optional variable; empty values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    const REQUIRED: [(&str, &str); 2] = [
        ("FURIA_BASE_URL", "https://furia.example"),
        ("FURIA_ORDER_EMAIL", "shop@furia.example"),
    ];

    #[test]
    fn test_defaults() {
        let config = load(&REQUIRED).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert!(config.is_secure());
        assert_eq!(config.checkout.recipient.as_str(), "shop@furia.example");
        assert_eq!(config.checkout.subject, DEFAULT_SUBJECT);
        assert_eq!(config.schedule.source, DEFAULT_SCHEDULE_SOURCE);
        assert_eq!(config.schedule.poll_interval, Duration::from_secs(300));
        assert_eq!(config.schedule.home_venue, "LANXESS arena");
        assert_eq!(config.invalid_quantity, InvalidQuantityPolicy::Remove);
        assert_eq!(config.session_database_url, DEFAULT_SESSION_DATABASE_URL);
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_overrides() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([
            ("FURIA_PORT", "8080"),
            ("FURIA_INVALID_QUANTITY", "reject"),
            ("FURIA_SCHEDULE_POLL_SECS", "60"),
            ("FURIA_HOME_VENUE", "Eisstadion"),
            ("FURIA_SESSION_DATABASE_URL", "sqlite::memory:"),
        ]);
        let config = load(&vars).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.invalid_quantity, InvalidQuantityPolicy::Reject);
        assert_eq!(config.schedule.poll_interval, Duration::from_secs(60));
        assert_eq!(config.schedule.home_venue, "Eisstadion");
        assert_eq!(config.session_database_url, "sqlite::memory:");
    }

    #[test]
    fn test_missing_required() {
        let err = load(&[("FURIA_BASE_URL", "http://localhost:3000")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref key) if key == "FURIA_ORDER_EMAIL"));
    }

    #[test]
    fn test_invalid_values() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("FURIA_SCHEDULE_POLL_SECS", "0"));
        assert!(matches!(load(&vars), Err(ConfigError::InvalidEnvVar(..))));

        let mut vars = REQUIRED.to_vec();
        vars.push(("FURIA_INVALID_QUANTITY", "ignore"));
        assert!(matches!(load(&vars), Err(ConfigError::InvalidEnvVar(..))));

        let vars = [
            ("FURIA_BASE_URL", "http://localhost:3000"),
            ("FURIA_ORDER_EMAIL", "not-an-email"),
        ];
        assert!(matches!(load(&vars), Err(ConfigError::InvalidEnvVar(..))));
    }
}
