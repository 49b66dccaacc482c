//! Upcoming games from the feed.

#![allow(clippy::print_stdout)]

use furia_core::schedule::{GameView, upcoming as upcoming_games};
use furia_storefront::schedule::{ScheduleSource, fetch_games};

use crate::error::CliError;

/// Fetch the feed from `source` and print up to `limit` upcoming games.
pub async fn upcoming(source: &str, limit: usize, home_venue: &str) -> Result<(), CliError> {
    let source = source.parse::<ScheduleSource>()?;
    let client = reqwest::Client::builder()
        .user_agent(concat!("furia-cli/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let games = fetch_games(&client, &source).await?;
    tracing::debug!(%source, games = games.len(), "feed loaded");

    let now = chrono::Local::now().naive_local();
    let games = upcoming_games(&games, now, limit);
    if games.is_empty() {
        println!("No games are scheduled at the moment or the season is over.");
        return Ok(());
    }

    for game in &games {
        let view = GameView::new(game, home_venue);
        println!(
            "{} {} {}  {:<4}  vs. {:<24} {}",
            view.day, view.date, view.time, view.tag, view.opponent, view.location
        );
    }
    Ok(())
}
