use crate::api_client::NhlScheduleClient;
use crate::windows::ViewingWindows;
use chrono::{Datelike, TimeDelta};
use common::errors::AppError;
use common::models::{
    GameRecord, RankedTeam, Team, TimezoneLeaderboard, TimezoneRanking, ViewabilityResult,
};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, instrument, warn};

/// Full UTC offset range, whole hours only.
const OFFSET_RANGE: std::ops::RangeInclusive<i32> = -12..=12;

/// Two-level fan-out over teams and timezones, bounded by one semaphore per
/// level. Cloning is cheap; every field is shared.
#[derive(Clone)]
pub struct Analyzer {
    client: Arc<NhlScheduleClient>,
    roster: Arc<Vec<Team>>,
    windows: Arc<ViewingWindows>,
    team_pool: Arc<Semaphore>,
    timezone_pool: Arc<Semaphore>,
}

impl Analyzer {
    pub fn new(
        client: Arc<NhlScheduleClient>,
        roster: Vec<Team>,
        windows: ViewingWindows,
        team_concurrency: usize,
        timezone_concurrency: usize,
    ) -> Self {
        Self {
            client,
            roster: Arc::new(roster),
            windows: Arc::new(windows),
            team_pool: Arc::new(Semaphore::new(team_concurrency.max(1))),
            timezone_pool: Arc::new(Semaphore::new(timezone_concurrency.max(1))),
        }
    }

    pub fn team_count(&self) -> usize {
        self.roster.len()
    }

    /// Prefetch every roster team's schedule so the per-timezone passes run
    /// against a warm cache. Per-team failures are absorbed at the cache
    /// boundary as empty schedules.
    #[instrument(skip(self))]
    pub async fn warm_cache(&self) {
        let mut handles = Vec::with_capacity(self.roster.len());

        for team in self.roster.iter().cloned() {
            let client = self.client.clone();
            let pool = self.team_pool.clone();

            handles.push(tokio::spawn(async move {
                let _permit = match pool.acquire().await {
                    Ok(permit) => permit,
                    Err(_) => return,
                };
                client.get_schedule(&team).await;
            }));
        }

        for (team, handle) in self.roster.iter().zip(handles) {
            if let Err(e) = handle.await {
                error!(team = %team.code, error = %e, "Cache warm task panicked");
            }
        }
    }

    /// Rank all teams for one UTC offset, descending by watchable games.
    ///
    /// Evaluations run concurrently under the team pool with unordered
    /// completion; join handles are awaited in roster order so the stable
    /// sort sees the same input sequence on every run, and equal-count teams
    /// keep their roster order.
    #[instrument(skip(self), fields(offset = offset_hours))]
    pub async fn rank_teams(&self, offset_hours: i32) -> Vec<ViewabilityResult> {
        let mut handles = Vec::with_capacity(self.roster.len());

        for team in self.roster.iter().cloned() {
            let client = self.client.clone();
            let windows = self.windows.clone();
            let pool = self.team_pool.clone();

            handles.push(tokio::spawn(async move {
                let _permit = match pool.acquire().await {
                    Ok(permit) => permit,
                    Err(e) => return Err(AppError::internal(format!("Team pool closed: {e}"))),
                };
                let schedule = client.get_schedule(&team).await;
                Ok(evaluate(&team, &schedule, offset_hours, &windows))
            }));
        }

        let mut results = Vec::with_capacity(self.roster.len());
        for (team, handle) in self.roster.iter().zip(handles) {
            match handle.await {
                Ok(Ok(result)) => results.push(result),
                Ok(Err(e)) => warn!(team = %team.code, error = %e, "Evaluation failed"),
                Err(e) => error!(team = %team.code, error = %e, "Evaluation task panicked"),
            }
        }

        results.sort_by(|a, b| b.viewable_games.cmp(&a.viewable_games));
        results
    }

    /// Leaderboard across UTC-12..UTC+12, top `top_n` teams per timezone,
    /// ordered by ascending offset. One timezone's failure is logged with
    /// its offset and does not stop the others.
    #[instrument(skip(self))]
    pub async fn aggregate(&self, top_n: usize) -> Result<TimezoneLeaderboard, AppError> {
        if top_n == 0 {
            return Err(AppError::validation("top_n must be at least 1"));
        }

        info!(top_n, "Starting timezone aggregation");

        let mut handles = Vec::new();
        for offset in OFFSET_RANGE {
            let analyzer = self.clone();

            let handle = tokio::spawn(async move {
                let _permit = match analyzer.timezone_pool.acquire().await {
                    Ok(permit) => permit,
                    Err(e) => return Err(AppError::internal(format!("Timezone pool closed: {e}"))),
                };
                Ok(analyzer.rank_teams(offset).await)
            });

            handles.push((offset, handle));
        }

        let mut timezones = Vec::with_capacity(handles.len());
        for (offset, handle) in handles {
            match handle.await {
                Ok(Ok(ranking)) => {
                    let teams = ranking
                        .into_iter()
                        .take(top_n)
                        .map(|r| RankedTeam {
                            team: r.team,
                            viewable_games: r.viewable_games,
                        })
                        .collect();
                    timezones.push(TimezoneRanking {
                        label: format!("UTC{offset:+}"),
                        offset_hours: offset,
                        teams,
                    });
                }
                Ok(Err(e)) => warn!(offset, error = %e, "Timezone ranking failed"),
                Err(e) => error!(offset, error = %e, "Timezone task panicked"),
            }
        }

        info!(timezones = timezones.len(), "Timezone aggregation completed");

        Ok(TimezoneLeaderboard { timezones })
    }
}

/// Watchability of one schedule at one UTC offset. Pure: depends only on the
/// schedule, the offset, and the window table.
///
/// Weekday and time-of-day come from the offset-adjusted instant, never the
/// UTC one; the offset can roll a game across local midnight into a
/// different weekday.
pub fn evaluate(
    team: &Team,
    schedule: &[GameRecord],
    offset_hours: i32,
    windows: &ViewingWindows,
) -> ViewabilityResult {
    let shift = TimeDelta::hours(offset_hours as i64);
    let mut viewable_games = 0;
    let mut game_dates = Vec::new();

    for game in schedule {
        let local = game.start_time_utc + shift;
        if windows.contains(local.weekday(), local.time()) {
            viewable_games += 1;
            game_dates.push(game.date.clone());
        }
    }

    ViewabilityResult {
        team: team.code.clone(),
        viewable_games,
        game_dates,
    }
}
