//! Integration tests for the Colonia Furia site.
//!
//! The storefront router is driven in-process; no server or network is
//! needed.
//!
//! ```bash
//! cargo test -p furia-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `storefront_cart` - Cart routes, session persistence and checkout
//! - `storefront_pages` - Pages, schedule fragment, cookie consent

use std::collections::HashMap;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderMap, Request, StatusCode, header};
use furia_storefront::config::StorefrontConfig;
use furia_storefront::middleware::create_session_store;
use furia_storefront::state::AppState;
use tempfile::TempDir;
use tower::ServiceExt;

/// Order recipient used by test apps.
pub const ORDER_EMAIL: &str = "shop@furia.example";

const MAX_BODY: usize = 1024 * 1024;

/// Feed with one past and two future games.
const SCHEDULE: &str = r#"[
    {"opponent": "Past Opponent", "date": "2001-01-01T19:30:00", "isHome": true},
    {"opponent": "Rhein Rockets", "date": "2099-11-15T19:30:00", "isHome": true},
    {"opponent": "Ruhr Wolves", "date": "2099-11-22T18:00:00", "isHome": false, "venue": "Eissporthalle Essen"}
]"#;

/// A storefront router plus a visitor holding a session cookie.
///
/// The schedule feed and the session database live in a temp dir owned by
/// the app.
pub struct TestApp {
    router: Router,
    cookie: Option<String>,
    vars: HashMap<String, String>,
    dir: TempDir,
}

/// A buffered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// The parsed `HX-Trigger` header.
    #[must_use]
    pub fn hx_trigger(&self) -> Option<serde_json::Value> {
        self.headers
            .get("HX-Trigger")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| serde_json::from_str(value).ok())
    }

    /// The toast message announced by the response.
    #[must_use]
    pub fn toast(&self) -> Option<String> {
        self.hx_trigger()?
            .get("show-toast")?
            .get("message")?
            .as_str()
            .map(str::to_string)
    }

    /// The `Location` header.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
    }
}

async fn build_router(vars: &HashMap<String, String>, dir: &TempDir) -> Router {
    let config = StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
        .expect("Invalid test configuration");
    let sessions = create_session_store(&config.session_database_url)
        .await
        .expect("Failed to open session database");
    let state = AppState::new(config, sessions).expect("Failed to build state");
    state.refresh_schedule().await;

    furia_storefront::app_with_static(state, dir.path())
}

impl TestApp {
    /// App with default settings.
    pub async fn new() -> Self {
        Self::with_vars(&[]).await
    }

    /// App with extra environment variables.
    ///
    /// # Panics
    ///
    /// Panics if the configuration is invalid or the temp dir cannot be set up.
    pub async fn with_vars(extra: &[(&str, &str)]) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let schedule = dir.path().join("schedule.json");
        std::fs::write(&schedule, SCHEDULE).expect("Failed to write schedule");

        let mut vars: HashMap<String, String> = [
            ("FURIA_BASE_URL", "http://localhost:3000"),
            ("FURIA_ORDER_EMAIL", ORDER_EMAIL),
        ]
        .iter()
        .chain(extra)
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
        vars.entry("FURIA_SCHEDULE_SOURCE".to_string())
            .or_insert_with(|| schedule.display().to_string());
        vars.entry("FURIA_SESSION_DATABASE_URL".to_string())
            .or_insert_with(|| {
                format!("sqlite://{}?mode=rwc", dir.path().join("sessions.db").display())
            });

        let router = build_router(&vars, &dir).await;
        Self {
            router,
            cookie: None,
            vars,
            dir,
        }
    }

    /// Stop this app and start a fresh one over the same session database,
    /// keeping the visitor's cookie.
    pub async fn restart(self) -> Self {
        let router = build_router(&self.vars, &self.dir).await;
        Self { router, ..self }
    }

    /// Forget the session cookie, as a new visitor.
    pub fn new_visitor(&mut self) {
        self.cookie = None;
    }

    pub async fn get(&mut self, path: &str) -> TestResponse {
        let request = Request::get(path).body(Body::empty());
        self.send(request.expect("Invalid request")).await
    }

    pub async fn post_form(&mut self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        let request = Request::post(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body));
        self.send(request.expect("Invalid request")).await
    }

    async fn send(&mut self, mut request: Request<Body>) -> TestResponse {
        if let Some(cookie) = &self.cookie {
            request.headers_mut().insert(
                header::COOKIE,
                cookie.parse().expect("Invalid cookie header"),
            );
        }

        let response = match self.router.clone().oneshot(request).await {
            Ok(response) => response,
            Err(never) => match never {},
        };

        if let Some(set_cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
        {
            self.cookie = Some(set_cookie.to_string());
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), MAX_BODY)
            .await
            .expect("Failed to read body");

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}
