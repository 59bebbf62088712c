use thiserror::Error;

/// A team as it appears in a fixture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    /// Provider team ID
    pub id: i64,
    pub name: String,
}

/// A scheduled match, scoped to the competition/season its statistics come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    /// Provider competition (league) ID
    pub league_id: i64,
    /// Season year, e.g. 2025 for 2025/26
    pub season: i32,
    pub home: Team,
    pub away: Team,
}

/// Why a raw provider fixture entry could not be turned into a [`Fixture`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` has unexpected value {value}")]
    InvalidField { field: &'static str, value: String },
}

/// One entry of the provider's fixture list, in provider order.
pub type FixtureEntry = Result<Fixture, SkipReason>;
