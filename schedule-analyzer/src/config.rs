use common::errors::AppError;
use common::models::Team;
use std::collections::HashMap;
use std::env;

use crate::roster;
use crate::windows::ViewingWindows;

pub struct Config {
    pub api_base_url: String,
    pub fetch_timeout_secs: u64,
    pub fetch_max_retries: u32,
    pub team_concurrency: usize,
    pub timezone_concurrency: usize,
    pub top_n_teams: usize,
    roster_json: Option<String>,
    windows_json: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            api_base_url: env::var("SCHEDULE_API_URL")
                .unwrap_or_else(|_| "https://api-web.nhle.com".to_string()),
            fetch_timeout_secs: env::var("FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            fetch_max_retries: env::var("FETCH_MAX_RETRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(2),
            team_concurrency: env::var("TEAM_CONCURRENCY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(12),
            timezone_concurrency: env::var("TIMEZONE_CONCURRENCY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8),
            top_n_teams: env::var("TOP_N_TEAMS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            roster_json: env::var("TEAM_ROSTER").ok(),
            windows_json: env::var("VIEWING_WINDOWS").ok(),
        }
    }

    /// Roster override: JSON object of league id to team code, e.g.
    /// `{"3": "NYR", "6": "BOS"}`. Falls back to the built-in roster.
    /// Override entries are ordered by id so rankings stay deterministic.
    pub fn roster(&self) -> Result<Vec<Team>, AppError> {
        let Some(raw) = &self.roster_json else {
            return Ok(roster::default_roster());
        };

        let parsed: HashMap<u32, String> = serde_json::from_str(raw)?;
        if parsed.is_empty() {
            return Err(AppError::validation(
                "TEAM_ROSTER must name at least one team",
            ));
        }

        let mut teams: Vec<Team> = parsed
            .into_iter()
            .map(|(id, code)| Team { id, code })
            .collect();
        teams.sort_by_key(|t| t.id);
        Ok(teams)
    }

    /// Viewing-window override: JSON object of weekday name to [start, end]
    /// time strings, e.g. `{"Monday": ["15:00:00", "22:30:00"]}`. Falls back
    /// to the built-in table.
    pub fn viewing_windows(&self) -> Result<ViewingWindows, AppError> {
        let Some(raw) = &self.windows_json else {
            return Ok(ViewingWindows::default());
        };

        let parsed: HashMap<String, (String, String)> = serde_json::from_str(raw)?;
        ViewingWindows::from_table(&parsed)
    }
}
