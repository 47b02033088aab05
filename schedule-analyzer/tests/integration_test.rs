use chrono::NaiveDate;
use common::errors::AppError;
use common::models::Team;
use schedule_analyzer::analyzer::{self, Analyzer};
use schedule_analyzer::api_client::NhlScheduleClient;
use schedule_analyzer::cache::ScheduleCache;
use schedule_analyzer::windows::ViewingWindows;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn team(id: u32, code: &str) -> Team {
    Team {
        id,
        code: code.to_string(),
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date")
}

fn client_for(server_uri: &str, cache: Arc<ScheduleCache>) -> NhlScheduleClient {
    NhlScheduleClient::new(cache, server_uri.to_string(), 2, 0, today())
}

async fn mock_schedule(server: &MockServer, code: &str, games: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/v1/club-schedule-season/{code}/now")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "games": games })))
        .mount(server)
        .await;
}

/// A Monday 23:00 UTC game lands at Monday 18:00 local for UTC-5, inside the
/// Monday window, but at Tuesday 08:00 local for UTC+9, before that window
/// opens.
#[tokio::test]
async fn monday_evening_game_is_watchable_at_utc_minus_5_but_not_plus_9() {
    let server = MockServer::start().await;
    mock_schedule(
        &server,
        "NYR",
        json!([{ "gameType": 2, "startTimeUTC": "2025-01-06T23:00:00Z" }]),
    )
    .await;

    let cache = Arc::new(ScheduleCache::new());
    let client = client_for(&server.uri(), cache);
    let nyr = team(3, "NYR");

    let schedule = client.get_schedule(&nyr).await;
    assert_eq!(schedule.len(), 1);

    let windows = ViewingWindows::default();

    let result = analyzer::evaluate(&nyr, &schedule, -5, &windows);
    assert_eq!(result.viewable_games, 1);
    assert_eq!(result.game_dates, vec!["2025-01-06".to_string()]);

    let result = analyzer::evaluate(&nyr, &schedule, 9, &windows);
    assert_eq!(result.viewable_games, 0);
    assert!(result.game_dates.is_empty());
}

/// 50 concurrent first callers for the same team must trigger exactly one
/// request (wiremock verifies the expect(1) on drop) and observe the same
/// schedule instance.
#[tokio::test]
async fn concurrent_callers_trigger_exactly_one_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/club-schedule-season/BOS/now"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "games": [{ "gameType": 2, "startTimeUTC": "2025-01-10T00:00:00Z" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let cache = Arc::new(ScheduleCache::new());
    let client = Arc::new(client_for(&server.uri(), cache.clone()));
    let bos = team(6, "BOS");

    let mut handles = Vec::new();
    for _ in 0..50 {
        let client = client.clone();
        let bos = bos.clone();
        handles.push(tokio::spawn(async move { client.get_schedule(&bos).await }));
    }

    let mut schedules = Vec::with_capacity(handles.len());
    for handle in handles {
        schedules.push(handle.await.expect("caller task"));
    }

    let first = &schedules[0];
    assert_eq!(first.len(), 1);
    assert!(schedules.iter().all(|s| s == first));

    // Repeated calls keep returning the same cached instance.
    let again = client.get_schedule(&bos).await;
    assert!(Arc::ptr_eq(&again, first));

    let cached = cache.get("BOS").await.expect("cached entry");
    assert!(Arc::ptr_eq(&cached, first));
}

/// A failed fetch is absorbed as an empty schedule and never retried within
/// the run (wiremock verifies a single request).
#[tokio::test]
async fn failed_fetch_is_cached_as_empty_schedule() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/club-schedule-season/PIT/now"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let cache = Arc::new(ScheduleCache::new());
    let client = client_for(&server.uri(), cache);
    let pit = team(5, "PIT");

    let schedule = client.get_schedule(&pit).await;
    assert!(schedule.is_empty());

    let again = client.get_schedule(&pit).await;
    assert!(again.is_empty());
}

/// Only future regular-season games with a parsable start time survive
/// parsing; everything else is skipped without failing the schedule.
#[tokio::test]
async fn preseason_past_and_malformed_games_are_filtered() {
    let server = MockServer::start().await;
    mock_schedule(
        &server,
        "TOR",
        json!([
            { "gameType": 1, "startTimeUTC": "2025-03-01T00:00:00Z" },
            { "gameType": 2, "startTimeUTC": "2024-12-30T23:00:00Z" },
            { "gameType": 2, "startTimeUTC": "2025-01-01T12:00:00Z" },
            { "gameType": 2, "startTimeUTC": "not-a-timestamp" },
            { "gameType": 2 },
            { "gameType": 2, "startTimeUTC": "2025-01-10T23:00:00Z" }
        ]),
    )
    .await;

    let cache = Arc::new(ScheduleCache::new());
    let client = client_for(&server.uri(), cache);

    let schedule = client.get_schedule(&team(10, "TOR")).await;
    assert_eq!(schedule.len(), 1);
    assert_eq!(schedule[0].date, "2025-01-10");
}

/// Full pipeline: 25 timezone entries in ascending-offset order, top-N
/// truncation, one team's API failure isolated to that team, and stable
/// roster-order ties at equal counts.
#[tokio::test]
async fn aggregate_covers_all_offsets_and_isolates_failures() {
    let server = MockServer::start().await;
    mock_schedule(
        &server,
        "NYR",
        json!([{ "gameType": 2, "startTimeUTC": "2025-01-06T23:00:00Z" }]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/v1/club-schedule-season/BOS/now"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mock_schedule(&server, "TOR", json!([])).await;

    let cache = Arc::new(ScheduleCache::new());
    let client = Arc::new(client_for(&server.uri(), cache));
    let roster = vec![team(3, "NYR"), team(6, "BOS"), team(10, "TOR")];
    let analyzer = Analyzer::new(client, roster, ViewingWindows::default(), 4, 4);

    analyzer.warm_cache().await;
    let leaderboard = analyzer.aggregate(2).await.expect("aggregate");

    assert_eq!(leaderboard.timezones.len(), 25);
    let labels: Vec<String> = leaderboard
        .timezones
        .iter()
        .map(|tz| tz.label.clone())
        .collect();
    let expected: Vec<String> = (-12..=12).map(|o| format!("UTC{o:+}")).collect();
    assert_eq!(labels, expected);
    assert!(leaderboard.timezones.iter().all(|tz| tz.teams.len() <= 2));

    // UTC-5 sees the NYR game at Monday 18:00 local.
    let minus5 = leaderboard
        .timezones
        .iter()
        .find(|tz| tz.offset_hours == -5)
        .expect("UTC-5 entry");
    assert_eq!(minus5.teams[0].team, "NYR");
    assert_eq!(minus5.teams[0].viewable_games, 1);
    // BOS (failed fetch) and TOR (empty schedule) tie at zero; roster order
    // decides, and truncation to top 2 keeps only BOS.
    assert_eq!(minus5.teams[1].team, "BOS");
    assert_eq!(minus5.teams[1].viewable_games, 0);
}

/// Repeated aggregation over a fixed snapshot is byte-identical regardless
/// of completion order.
#[tokio::test]
async fn aggregate_is_deterministic_across_runs() {
    let server = MockServer::start().await;
    mock_schedule(
        &server,
        "NYR",
        json!([{ "gameType": 2, "startTimeUTC": "2025-01-06T23:00:00Z" }]),
    )
    .await;
    mock_schedule(
        &server,
        "BOS",
        json!([{ "gameType": 2, "startTimeUTC": "2025-01-11T01:00:00Z" }]),
    )
    .await;
    mock_schedule(&server, "TOR", json!([])).await;

    let cache = Arc::new(ScheduleCache::new());
    let client = Arc::new(client_for(&server.uri(), cache));
    let roster = vec![team(3, "NYR"), team(6, "BOS"), team(10, "TOR")];
    let analyzer = Analyzer::new(client, roster, ViewingWindows::default(), 2, 2);

    let first = analyzer.aggregate(3).await.expect("first run");
    let second = analyzer.aggregate(3).await.expect("second run");

    let first_json = serde_json::to_string(&first).expect("serialize");
    let second_json = serde_json::to_string(&second).expect("serialize");
    assert_eq!(first_json, second_json);
}

#[tokio::test]
async fn aggregate_rejects_zero_top_n() {
    let cache = Arc::new(ScheduleCache::new());
    let client = Arc::new(client_for("http://127.0.0.1:9", cache));
    let analyzer = Analyzer::new(
        client,
        vec![team(3, "NYR")],
        ViewingWindows::default(),
        2,
        2,
    );

    let result = analyzer.aggregate(0).await;
    assert!(matches!(result, Err(AppError::ValidationError(_))));
}
