use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};

use super::classifier::{classify, Prediction};
use crate::football::{team_rate, FixtureEntry, FootballProvider, SkipReason};

/// Most fixtures a single digest covers (the first N processed, in provider order).
pub const MAX_FIXTURES: usize = 10;

pub const DIGEST_HEADER: &str = "📊 *Today's Over 2.5 Predictions*";
pub const NO_MATCHES: &str = "No matches found today.";

/// One rendered fixture of the digest
#[derive(Debug, Clone, PartialEq)]
pub struct DigestLine {
    pub home_team: String,
    pub away_team: String,
    pub prediction: Prediction,
}

impl DigestLine {
    pub fn render(&self) -> String {
        format!(
            "⚽ {} vs {} — {}",
            escape_markdown(&self.home_team),
            escape_markdown(&self.away_team),
            self.prediction
        )
    }
}

/// Result of processing a single provider fixture entry.
#[derive(Debug, Clone, PartialEq)]
pub enum FixtureOutcome {
    Processed(DigestLine),
    Skipped(SkipReason),
}

/// The day's report, ready to hand to a notifier.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyDigest {
    pub date: NaiveDate,
    pub lines: Vec<DigestLine>,
}

impl DailyDigest {
    /// Telegram (legacy Markdown) message text.
    pub fn render(&self) -> String {
        let mut message = format!("{}\n\n", DIGEST_HEADER);
        if self.lines.is_empty() {
            message.push_str(NO_MATCHES);
        } else {
            let body: Vec<String> = self.lines.iter().map(DigestLine::render).collect();
            message.push_str(&body.join("\n"));
        }
        message
    }
}

/// Builds the daily digest from a football provider.
#[derive(Clone)]
pub struct DigestBuilder {
    provider: Arc<dyn FootballProvider>,
    max_fixtures: usize,
}

impl DigestBuilder {
    pub fn new(provider: Arc<dyn FootballProvider>) -> Self {
        Self {
            provider,
            max_fixtures: MAX_FIXTURES,
        }
    }

    /// Fetch `date`'s fixtures and predict each one, sequentially, until
    /// `MAX_FIXTURES` have been processed. Entries that cannot be processed
    /// are skipped without aborting the run.
    pub async fn build(&self, date: NaiveDate) -> DailyDigest {
        let entries = self.provider.fixtures_on(date).await;
        let total = entries.len();

        let mut lines = Vec::with_capacity(self.max_fixtures.min(total));
        let mut skipped = 0usize;
        for entry in entries {
            if lines.len() >= self.max_fixtures {
                break;
            }
            match self.process(entry).await {
                FixtureOutcome::Processed(line) => lines.push(line),
                FixtureOutcome::Skipped(reason) => {
                    skipped += 1;
                    debug!("Skipping fixture: {}", reason);
                }
            }
        }

        info!(
            "Digest for {}: {} fixture(s) listed, {} predicted, {} skipped",
            date,
            total,
            lines.len(),
            skipped
        );
        DailyDigest { date, lines }
    }

    async fn process(&self, entry: FixtureEntry) -> FixtureOutcome {
        let fixture = match entry {
            Ok(f) => f,
            Err(reason) => return FixtureOutcome::Skipped(reason),
        };

        let provider = self.provider.as_ref();
        let home_rate = team_rate(provider, &fixture.home, fixture.league_id, fixture.season).await;
        let away_rate = team_rate(provider, &fixture.away, fixture.league_id, fixture.season).await;

        FixtureOutcome::Processed(DigestLine {
            home_team: fixture.home.name,
            away_team: fixture.away.name,
            prediction: classify(home_rate, away_rate),
        })
    }
}

/// Escape the characters that are special in Telegram's legacy Markdown.
fn escape_markdown(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '_' | '*' | '`' | '[') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
