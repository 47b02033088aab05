use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A league team from the static roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: u32,
    pub code: String,
}

/// One upcoming regular-season game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub start_time_utc: DateTime<Utc>,
    /// Calendar date portion of the raw start time, e.g. "2025-01-06".
    pub date: String,
}

/// A team's upcoming games, in API order.
pub type ParsedSchedule = Vec<GameRecord>;

/// Watchability of one team's schedule at one UTC offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewabilityResult {
    pub team: String,
    pub viewable_games: u32,
    pub game_dates: Vec<String>,
}

/// A team's entry in a timezone's top-N ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedTeam {
    pub team: String,
    pub viewable_games: u32,
}

/// Top-N teams for one UTC offset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimezoneRanking {
    /// Canonical label, sign always shown: "UTC-5", "UTC+0", "UTC+12".
    pub label: String,
    pub offset_hours: i32,
    pub teams: Vec<RankedTeam>,
}

/// Rankings across the full UTC offset range, ordered by ascending offset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimezoneLeaderboard {
    pub timezones: Vec<TimezoneRanking>,
}
