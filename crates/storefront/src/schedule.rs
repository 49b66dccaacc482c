//! Upcoming-games feed: fetching, caching and periodic refresh.
//!
//! The feed is re-fetched on a fixed interval. The last good feed is kept in a
//! `moka` cache whose TTL is three poll intervals, so a feed that keeps
//! failing eventually shows the "could not be loaded" message instead of
//! stale games. Feed problems never touch cart state.

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDateTime;
use furia_core::schedule::{Game, ScheduleError, parse_feed, upcoming};
use moka::future::Cache;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use url::Url;

/// Number of poll intervals a fetched feed stays valid.
const FEED_TTL_INTERVALS: u32 = 3;

const FEED_KEY: &str = "games";

/// Errors fetching the schedule feed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Feed endpoint answered with a non-success status.
    #[error("feed returned status {0}")]
    Status(u16),

    /// Reading the feed file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The feed content is invalid.
    #[error(transparent)]
    Parse(#[from] ScheduleError),
}

/// Where the feed comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleSource {
    /// Remote endpoint.
    Http(Url),
    /// Static file on disk.
    File(PathBuf),
}

impl FromStr for ScheduleSource {
    type Err = url::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with("http://") || s.starts_with("https://") {
            Ok(Self::Http(Url::parse(s)?))
        } else {
            Ok(Self::File(PathBuf::from(s)))
        }
    }
}

impl std::fmt::Display for ScheduleSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http(url) => write!(f, "{url}"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Fetch and parse the feed once.
///
/// # Errors
///
/// Returns an error if the feed cannot be read or is invalid.
pub async fn fetch_games(
    client: &reqwest::Client,
    source: &ScheduleSource,
) -> Result<Vec<Game>, FetchError> {
    let body = match source {
        ScheduleSource::Http(url) => {
            let response = client.get(url.clone()).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status(status.as_u16()));
            }
            response.text().await?
        }
        ScheduleSource::File(path) => tokio::fs::read_to_string(path).await?,
    };
    Ok(parse_feed(&body)?)
}

/// Last successfully fetched feed.
#[derive(Clone)]
pub struct ScheduleFeed {
    cache: Cache<&'static str, Arc<Vec<Game>>>,
}

impl ScheduleFeed {
    /// Create an empty feed for the given poll interval.
    #[must_use]
    pub fn new(poll_interval: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(poll_interval.saturating_mul(FEED_TTL_INTERVALS))
            .build();
        Self { cache }
    }

    /// Replace the feed.
    pub async fn store(&self, games: Vec<Game>) {
        self.cache.insert(FEED_KEY, Arc::new(games)).await;
    }

    /// The whole feed, if a fetch succeeded recently enough.
    pub async fn games(&self) -> Option<Arc<Vec<Game>>> {
        self.cache.get(FEED_KEY).await
    }

    /// Games after `now`, earliest first, at most `limit`. `None` when no
    /// feed is available.
    pub async fn upcoming(&self, now: NaiveDateTime, limit: usize) -> Option<Vec<Game>> {
        self.games().await.map(|games| upcoming(&games, now, limit))
    }

    /// Fetch once and store the result; failures are logged and the previous
    /// feed is kept.
    pub async fn refresh(&self, client: &reqwest::Client, source: &ScheduleSource) {
        match fetch_games(client, source).await {
            Ok(games) => {
                tracing::debug!(%source, games = games.len(), "schedule feed refreshed");
                self.store(games).await;
            }
            Err(e) => tracing::warn!(%source, error = %e, "failed to refresh schedule feed"),
        }
    }
}

/// Refresh `feed` from `source` every `interval`, starting immediately.
pub fn spawn_poller(
    feed: ScheduleFeed,
    client: reqwest::Client,
    source: ScheduleSource,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            feed.refresh(&client, &source).await;
        }
    })
}
