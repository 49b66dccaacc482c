//! Home page and upcoming-games fragment.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use furia_core::schedule::{GameView, UPCOMING_LIMIT};
use tower_sessions::Session;
use tracing::instrument;

use super::PageChrome;
use crate::filters;
use crate::state::AppState;

/// Upcoming games as shown on the page.
#[derive(Clone)]
pub struct GamesView {
    pub games: Vec<GameView>,
    /// No usable feed is available.
    pub unavailable: bool,
}

impl GamesView {
    /// Current upcoming games from the feed.
    pub async fn load(state: &AppState) -> Self {
        let now = chrono::Local::now().naive_local();
        match state.schedule().upcoming(now, UPCOMING_LIMIT).await {
            Some(games) => Self {
                games: games
                    .iter()
                    .map(|game| GameView::new(game, &state.config().schedule.home_venue))
                    .collect(),
                unavailable: false,
            },
            None => Self {
                games: Vec::new(),
                unavailable: true,
            },
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub chrome: PageChrome,
    pub schedule: GamesView,
    /// Seconds between fragment refreshes.
    pub poll_secs: u64,
}

/// Upcoming games fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/games.html")]
pub struct GamesTemplate {
    pub schedule: GamesView,
}

/// Display home page.
#[instrument(skip(state, session))]
pub async fn index(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    HomeTemplate {
        chrome: PageChrome::load(&session).await,
        schedule: GamesView::load(&state).await,
        poll_secs: state.config().schedule.poll_interval.as_secs(),
    }
}

/// Upcoming games fragment (HTMX).
#[instrument(skip(state))]
pub async fn games(State(state): State<AppState>) -> impl IntoResponse {
    GamesTemplate {
        schedule: GamesView::load(&state).await,
    }
}
