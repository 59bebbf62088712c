use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use super::models::{Fixture, FixtureEntry, SkipReason, Team};
use super::provider::FootballProvider;

/// Football provider backed by API-Sports (API-Football v3).
/// Docs: <https://www.api-football.com/documentation-v3>
#[derive(Clone)]
pub struct ApiSports {
    http: Client,
    api_key: String,
    /// Base URL for overriding in tests
    base_url: String,
}

impl ApiSports {
    pub fn new(api_key: &str, base_url: &str, timeout: std::time::Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ApiSports {
            http,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str, query: &[(&str, String)]) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/{}", self.base_url, path))
            .with_context(|| format!("Invalid API-Sports URL for '{}'", path))?;
        url.query_pairs_mut()
            .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        Ok(url)
    }

    async fn get_json(&self, url: Url) -> Result<Value> {
        debug!("GET {}", url.path());

        let resp = self
            .http
            .get(url)
            .header("x-apisports-key", &self.api_key)
            .send()
            .await
            .context("API-Sports request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("API-Sports error {}: {}", status, body);
        }

        let raw: Value = resp
            .json()
            .await
            .context("Failed to parse API-Sports response")?;

        if has_provider_errors(&raw) {
            warn!("API-Sports reported errors: {}", raw["errors"]);
        }

        Ok(raw)
    }
}

#[async_trait]
impl FootballProvider for ApiSports {
    fn name(&self) -> &str {
        "API-Sports"
    }

    async fn fixtures_on(&self, date: NaiveDate) -> Vec<FixtureEntry> {
        let day = date.format("%Y-%m-%d").to_string();
        let raw = match self.endpoint("fixtures", &[("date", day.clone())]) {
            Ok(url) => self.get_json(url).await,
            Err(e) => Err(e),
        };

        match raw {
            Ok(raw) => {
                let entries = parse_fixtures_response(&raw);
                debug!("API-Sports returned {} fixture(s) for {}", entries.len(), day);
                entries
            }
            Err(e) => {
                warn!("Fixture list for {} unavailable: {:#}", day, e);
                vec![]
            }
        }
    }

    async fn team_goal_average(
        &self,
        team_id: i64,
        league_id: i64,
        season: i32,
    ) -> Result<Option<f64>> {
        let url = self.endpoint(
            "teams/statistics",
            &[
                ("team", team_id.to_string()),
                ("season", season.to_string()),
                ("league", league_id.to_string()),
            ],
        )?;
        let raw = self.get_json(url).await?;
        Ok(parse_goal_average(&raw))
    }
}

// ── Parsing helpers ────────────────────────────────────────────────────────────

fn has_provider_errors(raw: &Value) -> bool {
    match &raw["errors"] {
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        _ => false,
    }
}

/// Turn a `/fixtures` payload into per-entry results, preserving order.
/// A missing or non-array `response` yields no entries.
fn parse_fixtures_response(raw: &Value) -> Vec<FixtureEntry> {
    match raw["response"].as_array() {
        Some(items) => items.iter().map(parse_fixture).collect(),
        None => vec![],
    }
}

fn parse_fixture(item: &Value) -> FixtureEntry {
    let season = int_field(item, "league.season")?;
    let season = i32::try_from(season).map_err(|_| SkipReason::InvalidField {
        field: "league.season",
        value: season.to_string(),
    })?;

    Ok(Fixture {
        league_id: int_field(item, "league.id")?,
        season,
        home: Team {
            id: int_field(item, "teams.home.id")?,
            name: str_field(item, "teams.home.name")?,
        },
        away: Team {
            id: int_field(item, "teams.away.id")?,
            name: str_field(item, "teams.away.name")?,
        },
    })
}

fn field<'a>(item: &'a Value, path: &'static str) -> Result<&'a Value, SkipReason> {
    let v = path.split('.').fold(item, |v, key| &v[key]);
    if v.is_null() {
        Err(SkipReason::MissingField(path))
    } else {
        Ok(v)
    }
}

fn int_field(item: &Value, path: &'static str) -> Result<i64, SkipReason> {
    let v = field(item, path)?;
    v.as_i64().ok_or_else(|| SkipReason::InvalidField {
        field: path,
        value: v.to_string(),
    })
}

fn str_field(item: &Value, path: &'static str) -> Result<String, SkipReason> {
    let v = field(item, path)?;
    v.as_str()
        .map(str::to_string)
        .ok_or_else(|| SkipReason::InvalidField {
            field: path,
            value: v.to_string(),
        })
}

/// `response.goals.for.average.total` from a `/teams/statistics` payload.
/// API-Sports sends it as a string ("1.5"); plain numbers are accepted too,
/// except a bare numeric zero, which means "no figure".
fn parse_goal_average(raw: &Value) -> Option<f64> {
    let total = &raw["response"]["goals"]["for"]["average"]["total"];
    match total {
        Value::Number(n) => n.as_f64().filter(|v| *v != 0.0),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
