use common::models::TimezoneLeaderboard;

/// Render the leaderboard as a printable summary, one block per timezone in
/// ascending-offset order.
pub fn render(leaderboard: &TimezoneLeaderboard) -> String {
    let mut out = String::from("NHL Viewing Schedule Summary\n");

    for tz in &leaderboard.timezones {
        out.push_str(&format!("\n{}:\n", tz.label));
        for team in &tz.teams {
            out.push_str(&format!(
                "  {}: {} viewable games\n",
                team.team, team.viewable_games
            ));
        }
    }

    out
}
