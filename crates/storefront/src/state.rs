//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tower_sessions_sqlx_store::SqliteStore;

use crate::config::StorefrontConfig;
use crate::schedule::{ScheduleFeed, ScheduleSource, spawn_poller};

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Error building application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("invalid schedule source: {0}")]
    ScheduleSource(#[from] url::ParseError),
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// configuration, the session store and the schedule feed.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    sessions: SqliteStore,
    schedule: ScheduleFeed,
    schedule_source: ScheduleSource,
    http: reqwest::Client,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `sessions` - Migrated session store (see
    ///   [`create_session_store`](crate::middleware::create_session_store))
    ///
    /// # Errors
    ///
    /// Returns an error if the schedule source is not a valid URL or the HTTP
    /// client cannot be built.
    pub fn new(config: StorefrontConfig, sessions: SqliteStore) -> Result<Self, StateError> {
        let schedule_source = config.schedule.source.parse::<ScheduleSource>()?;
        let schedule = ScheduleFeed::new(config.schedule.poll_interval);
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .user_agent(concat!("furia-storefront/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                sessions,
                schedule,
                schedule_source,
                http,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the session store.
    #[must_use]
    pub fn sessions(&self) -> &SqliteStore {
        &self.inner.sessions
    }

    /// Get a reference to the upcoming-games feed.
    #[must_use]
    pub fn schedule(&self) -> &ScheduleFeed {
        &self.inner.schedule
    }

    /// Fetch the schedule once, e.g. before the first request.
    pub async fn refresh_schedule(&self) {
        self.inner
            .schedule
            .refresh(&self.inner.http, &self.inner.schedule_source)
            .await;
    }

    /// Start refreshing the schedule feed in the background.
    pub fn start_schedule_polling(&self) -> JoinHandle<()> {
        spawn_poller(
            self.inner.schedule.clone(),
            self.inner.http.clone(),
            self.inner.schedule_source.clone(),
            self.inner.config.schedule.poll_interval,
        )
    }
}
