use chrono::Utc;
use common::tracing::init_tracing;
use schedule_analyzer::analyzer::Analyzer;
use schedule_analyzer::api_client::NhlScheduleClient;
use schedule_analyzer::cache::ScheduleCache;
use schedule_analyzer::config::Config;
use schedule_analyzer::summary;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = Config::from_env();
    let today = Utc::now().date_naive();

    let cache = Arc::new(ScheduleCache::new());
    let client = Arc::new(NhlScheduleClient::new(
        cache,
        config.api_base_url.clone(),
        config.fetch_timeout_secs,
        config.fetch_max_retries,
        today,
    ));
    let analyzer = Analyzer::new(
        client,
        config.roster()?,
        config.viewing_windows()?,
        config.team_concurrency,
        config.timezone_concurrency,
    );

    info!(teams = analyzer.team_count(), %today, "Warming schedule cache");
    analyzer.warm_cache().await;

    let leaderboard = analyzer.aggregate(config.top_n_teams).await?;

    println!("{}", summary::render(&leaderboard));

    Ok(())
}
