use crate::cache::ScheduleCache;
use chrono::{DateTime, NaiveDate, Utc};
use common::errors::AppError;
use common::http_client::HttpClient;
use common::models::{GameRecord, ParsedSchedule, Team};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

const REGULAR_SEASON: i32 = 2;

#[derive(Debug, Deserialize)]
struct ClubScheduleResponse {
    #[serde(default)]
    games: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RawGame {
    #[serde(rename = "gameType")]
    game_type: i32,
    #[serde(rename = "startTimeUTC")]
    start_time_utc: String,
}

/// Client for the league's club-schedule-season endpoint.
pub struct NhlScheduleClient {
    http_client: HttpClient,
    cache: Arc<ScheduleCache>,
    base_url: String,
    /// Captured once at process start; games on or before this date are
    /// dropped. A run spanning a date rollover keeps the start-of-run date.
    today: NaiveDate,
}

impl NhlScheduleClient {
    pub fn new(
        cache: Arc<ScheduleCache>,
        base_url: String,
        timeout_secs: u64,
        max_retries: u32,
        today: NaiveDate,
    ) -> Self {
        Self {
            http_client: HttpClient::new(timeout_secs, max_retries),
            cache,
            base_url,
            today,
        }
    }

    /// Schedule for `team`, fetched and parsed at most once per run.
    ///
    /// A failed fetch is cached as an empty schedule so siblings and later
    /// callers do not retry it; the failure is logged here with the team
    /// code, which is what distinguishes it from a genuinely empty schedule.
    #[instrument(skip(self), fields(team = %team.code))]
    pub async fn get_schedule(&self, team: &Team) -> Arc<ParsedSchedule> {
        self.cache
            .get_or_compute(&team.code, || async {
                match self.fetch_schedule(&team.code).await {
                    Ok(schedule) => {
                        info!(team = %team.code, games = schedule.len(), "Fetched schedule");
                        schedule
                    }
                    Err(e) => {
                        warn!(
                            team = %team.code,
                            error = %e,
                            "Schedule fetch failed, caching empty schedule"
                        );
                        ParsedSchedule::new()
                    }
                }
            })
            .await
    }

    async fn fetch_schedule(&self, code: &str) -> Result<ParsedSchedule, AppError> {
        let url = format!("{}/v1/club-schedule-season/{}/now", self.base_url, code);
        let response: ClubScheduleResponse = self.http_client.get_json(&url).await?;
        Ok(parse_games(&response.games, self.today))
    }
}

/// Future regular-season games from the raw payload, input order preserved.
/// Entries that fail to deserialize or carry an unparsable start time are
/// skipped rather than failing the whole schedule.
fn parse_games(games: &[serde_json::Value], today: NaiveDate) -> ParsedSchedule {
    let mut parsed = Vec::new();

    for value in games {
        let Ok(game) = serde_json::from_value::<RawGame>(value.clone()) else {
            debug!("Skipping malformed game entry");
            continue;
        };
        if game.game_type != REGULAR_SEASON {
            continue;
        }
        let Ok(start) = DateTime::parse_from_rfc3339(&game.start_time_utc) else {
            debug!(start_time = %game.start_time_utc, "Skipping game with unparsable start time");
            continue;
        };
        let start = start.with_timezone(&Utc);
        if start.date_naive() > today {
            let date = game
                .start_time_utc
                .split('T')
                .next()
                .unwrap_or_default()
                .to_string();
            parsed.push(GameRecord {
                start_time_utc: start,
                date,
            });
        }
    }

    parsed
}
