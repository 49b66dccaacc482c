//! Session middleware configuration.
//!
//! Sets up `SQLite`-backed sessions using tower-sessions. The session carries
//! the visitor's cart, so it lives as long as the visitor keeps coming back
//! and survives restarts of the server.

use sqlx::SqlitePool;
use tokio::task::JoinHandle;
use tower_sessions::{ExpiredDeletion, Expiry, SessionManagerLayer, session_store};
use tower_sessions_sqlx_store::SqliteStore;

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "furia_session";

/// Session expiry after inactivity (one year).
const SESSION_EXPIRY_DAYS: i64 = 365;

/// How often expired sessions are purged from the store.
const EXPIRED_DELETION_PERIOD: tokio::time::Duration = tokio::time::Duration::from_secs(60 * 60);

/// Open the session database and create the sessions table if needed.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or migrated.
pub async fn create_session_store(database_url: &str) -> Result<SqliteStore, sqlx::Error> {
    let pool = SqlitePool::connect(database_url).await?;
    let store = SqliteStore::new(pool);
    store.migrate().await?;
    Ok(store)
}

/// Periodically delete expired sessions in the background.
pub fn spawn_expired_deletion(store: SqliteStore) -> JoinHandle<session_store::Result<()>> {
    tokio::spawn(store.continuously_delete_expired(EXPIRED_DELETION_PERIOD))
}

/// Create the session layer over `store`.
#[must_use]
pub fn create_session_layer(
    store: SqliteStore,
    config: &StorefrontConfig,
) -> SessionManagerLayer<SqliteStore> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::days(SESSION_EXPIRY_DAYS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tower_sessions::SessionStore;
    use tower_sessions::cookie::time::{Duration, OffsetDateTime};
    use tower_sessions::session::{Id, Record};

    use super::*;

    fn record(expiry_date: OffsetDateTime) -> Record {
        Record {
            id: Id::default(),
            data: [("cart".to_string(), serde_json::json!("[]"))]
                .into_iter()
                .collect(),
            expiry_date,
        }
    }

    fn database_url(dir: &tempfile::TempDir) -> String {
        format!("sqlite://{}?mode=rwc", dir.path().join("sessions.db").display())
    }

    #[tokio::test]
    async fn test_records_survive_reopening() {
        let dir = tempfile::tempdir().unwrap();
        let url = database_url(&dir);

        let mut saved = record(OffsetDateTime::now_utc() + Duration::days(1));
        let store = create_session_store(&url).await.unwrap();
        store.create(&mut saved).await.unwrap();
        drop(store);

        let reopened = create_session_store(&url).await.unwrap();
        let loaded = reopened.load(&saved.id).await.unwrap().unwrap();
        assert_eq!(loaded.data, saved.data);
    }

    #[tokio::test]
    async fn test_expired_records_are_deleted() {
        let dir = tempfile::tempdir().unwrap();
        let url = database_url(&dir);
        let store = create_session_store(&url).await.unwrap();

        let mut expired = record(OffsetDateTime::now_utc() - Duration::days(1));
        store.create(&mut expired).await.unwrap();
        store.delete_expired().await.unwrap();

        let pool = SqlitePool::connect(&url).await.unwrap();
        let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tower_sessions")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(remaining, 0);
    }
}
