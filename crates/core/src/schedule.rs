//! Upcoming-games feed model.
//!
//! The feed is a JSON array of games:
//!
//! ```json
//! [{"opponent":"Bonn Barracudas","date":"2026-11-12T19:30:00","isHome":true,"venue":null}]
//! ```
//!
//! Dates are ISO-8601 and usually carry no offset; they are kickoff times in
//! the club's local time.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How many games the widget shows.
pub const UPCOMING_LIMIT: usize = 3;

/// Venue shown for home games when none is configured.
pub const DEFAULT_HOME_VENUE: &str = "LANXESS arena";

/// Error reading a schedule feed.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// The feed is not a JSON array of games.
    #[error("invalid schedule feed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One scheduled game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub opponent: String,
    #[serde(with = "kickoff")]
    pub date: NaiveDateTime,
    #[serde(default)]
    pub is_home: bool,
    #[serde(default)]
    pub venue: Option<String>,
}

/// Parse a feed.
///
/// # Errors
///
/// Returns an error if the feed is not a JSON array of games.
pub fn parse_feed(raw: &str) -> Result<Vec<Game>, ScheduleError> {
    Ok(serde_json::from_str(raw)?)
}

/// Games kicking off after `now`, earliest first, at most `limit`.
#[must_use]
pub fn upcoming(games: &[Game], now: NaiveDateTime, limit: usize) -> Vec<Game> {
    let mut future: Vec<Game> = games.iter().filter(|g| g.date > now).cloned().collect();
    future.sort_by_key(|g| g.date);
    future.truncate(limit);
    future
}

/// A game formatted for the schedule widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameView {
    /// Weekday, e.g. `SUN`.
    pub day: String,
    /// Day and month, e.g. `12 NOV`.
    pub date: String,
    /// Kickoff, e.g. `19:30`.
    pub time: String,
    pub is_home: bool,
    /// `HOME` or `AWAY`.
    pub tag: &'static str,
    pub opponent: String,
    pub location: String,
}

impl GameView {
    /// Format `game`; home games are shown at `home_venue`.
    #[must_use]
    pub fn new(game: &Game, home_venue: &str) -> Self {
        let location = if game.is_home {
            home_venue.to_string()
        } else {
            game.venue
                .clone()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| "TBA".to_string())
        };

        Self {
            day: game.date.format("%a").to_string().to_uppercase(),
            date: game.date.format("%d %b").to_string().to_uppercase(),
            time: game.date.format("%H:%M").to_string(),
            is_home: game.is_home,
            tag: if game.is_home { "HOME" } else { "AWAY" },
            opponent: game.opponent.clone(),
            location,
        }
    }
}

/// Kickoff timestamps: `YYYY-MM-DDTHH:MM[:SS]`, RFC 3339 with offset (wall
/// time is kept), or a bare date (midnight).
mod kickoff {
    use super::{DateTime, NaiveDate, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    pub fn serialize<S: Serializer>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(raw.trim()).ok_or_else(|| D::Error::custom(format!("invalid kickoff date {raw:?}")))
    }

    pub(super) fn parse(raw: &str) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(raw, FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|d| d.naive_local()))
            .or_else(|| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn at(raw: &str) -> NaiveDateTime {
        kickoff::parse(raw).unwrap()
    }

    fn game(opponent: &str, date: &str, is_home: bool) -> Game {
        Game {
            opponent: opponent.to_string(),
            date: at(date),
            is_home,
            venue: Some("Away Hall".to_string()),
        }
    }

    #[test]
    fn test_parse_feed() {
        let raw = r#"[
            {"opponent":"Bonn","date":"2026-11-15T19:30:00","isHome":true},
            {"opponent":"Essen","date":"2026-11-22T18:00:00+01:00","isHome":false,"venue":"Eissporthalle"},
            {"opponent":"Dortmund","date":"2026-12-01"}
        ]"#;
        let games = parse_feed(raw).unwrap();
        assert_eq!(games.len(), 3);
        assert!(games.first().unwrap().is_home);
        assert_eq!(games.get(1).unwrap().date, at("2026-11-22T18:00:00"));
        assert_eq!(games.get(2).unwrap().date, at("2026-12-01T00:00:00"));
    }

    #[test]
    fn test_parse_feed_rejects_bad_dates() {
        assert!(parse_feed(r#"[{"opponent":"X","date":"next sunday"}]"#).is_err());
        assert!(parse_feed("{}").is_err());
    }

    #[test]
    fn test_upcoming_filters_sorts_and_limits() {
        let games = vec![
            game("Past", "2026-10-01T19:00:00", true),
            game("Fourth", "2026-12-20T19:00:00", true),
            game("Second", "2026-11-01T19:00:00", false),
            game("First", "2026-10-20T19:00:00", true),
            game("Third", "2026-11-10T19:00:00", false),
        ];
        let next = upcoming(&games, at("2026-10-19T12:00:00"), UPCOMING_LIMIT);
        let names: Vec<&str> = next.iter().map(|g| g.opponent.as_str()).collect();
        assert_eq!(names, ["First", "Second", "Third"]);
    }

    #[test]
    fn test_upcoming_excludes_kickoff_now() {
        let games = vec![game("Now", "2026-10-19T12:00:00", true)];
        assert!(upcoming(&games, at("2026-10-19T12:00:00"), 3).is_empty());
    }

    #[test]
    fn test_game_view() {
        let home = GameView::new(&game("Bonn", "2026-11-15T19:30:00", true), "LANXESS arena");
        assert_eq!(home.day, "SUN");
        assert_eq!(home.date, "15 NOV");
        assert_eq!(home.time, "19:30");
        assert_eq!(home.tag, "HOME");
        assert_eq!(home.location, "LANXESS arena");

        let away = GameView::new(&game("Essen", "2026-11-22T18:05:00", false), "LANXESS arena");
        assert_eq!(away.tag, "AWAY");
        assert_eq!(away.location, "Away Hall");
        assert_eq!(away.time, "18:05");
    }

    #[test]
    fn test_serialize_roundtrip() {
        let g = game("Bonn", "2026-11-15T19:30:00", true);
        let json = serde_json::to_string(&g).unwrap();
        assert!(json.contains("\"date\":\"2026-11-15T19:30:00\""));
        assert!(json.contains("\"isHome\":true"));
        assert_eq!(serde_json::from_str::<Game>(&json).unwrap(), g);
    }
}
