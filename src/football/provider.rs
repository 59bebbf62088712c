use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

use super::models::FixtureEntry;

/// Trait that every football data provider must implement.
#[async_trait]
pub trait FootballProvider: Send + Sync {
    /// All fixtures scheduled on `date`, in provider order.
    ///
    /// Never fails: a broken or empty provider response is an empty list.
    async fn fixtures_on(&self, date: NaiveDate) -> Vec<FixtureEntry>;

    /// Average goals scored per match (home and away combined) for a team in
    /// the given competition/season. `Ok(None)` means the provider answered
    /// but had no usable figure.
    async fn team_goal_average(&self, team_id: i64, league_id: i64, season: i32)
        -> Result<Option<f64>>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}
