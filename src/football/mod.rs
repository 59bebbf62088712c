pub mod api_sports;
pub mod models;
pub mod provider;
pub mod rate;

pub use api_sports::ApiSports;
pub use models::{FixtureEntry, SkipReason};
pub use provider::FootballProvider;
pub use rate::team_rate;
