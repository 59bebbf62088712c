use tracing::{debug, warn};

use super::models::Team;
use super::provider::FootballProvider;

/// Goals-per-match assumed for a team whose statistics are unavailable.
pub const DEFAULT_TEAM_RATE: f64 = 1.0;

/// Average goals scored per match by `team` in the given competition/season.
///
/// Total by construction: any request failure, missing figure, negative or
/// non-finite value falls back to [`DEFAULT_TEAM_RATE`]. Each call hits the
/// provider; nothing is cached across fixtures.
pub async fn team_rate(
    provider: &dyn FootballProvider,
    team: &Team,
    league_id: i64,
    season: i32,
) -> f64 {
    match provider.team_goal_average(team.id, league_id, season).await {
        Ok(avg) => {
            let rate = usable_rate(avg);
            debug!("{} ({}) scores {:.2} goals/match", team.name, team.id, rate);
            rate
        }
        Err(e) => {
            warn!(
                "{}: statistics for {} ({}) unavailable, using {:.1}: {:#}",
                provider.name(),
                team.name,
                team.id,
                DEFAULT_TEAM_RATE,
                e
            );
            DEFAULT_TEAM_RATE
        }
    }
}

fn usable_rate(avg: Option<f64>) -> f64 {
    match avg {
        Some(v) if v.is_finite() && v >= 0.0 => v,
        _ => DEFAULT_TEAM_RATE,
    }
}
