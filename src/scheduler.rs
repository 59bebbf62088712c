//! Daily digest trigger.
//!
//! Fires once per local calendar day at a fixed wall-clock time. Days on
//! which the process was not running at that time are not caught up.

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use crate::digest::DigestBuilder;
use crate::telegram::Notifier;

/// Where and when the daily digest goes.
#[derive(Clone)]
pub struct DailySchedule {
    pub builder: DigestBuilder,
    pub notifier: Arc<dyn Notifier>,
    /// Chat that receives the digest
    pub recipient: i64,
    pub at: NaiveTime,
}

/// The first occurrence of `at` strictly after `now`.
pub fn next_run_after(now: NaiveDateTime, at: NaiveTime) -> NaiveDateTime {
    let today = now.date().and_time(at);
    if today > now {
        today
    } else {
        (now.date() + chrono::Days::new(1)).and_time(at)
    }
}

/// Longest DST gap searched when the trigger time does not exist on a day.
const MAX_GAP_MINUTES: i64 = 3 * 60;

/// The instant `local` denotes in `tz`. A wall-clock time skipped by a DST
/// jump resolves to the first valid minute after it; a repeated one to its
/// earlier occurrence.
pub fn resolve_local<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> DateTime<Tz> {
    for minutes in 0..=MAX_GAP_MINUTES {
        let candidate = local + chrono::Duration::minutes(minutes);
        if let Some(t) = tz.from_local_datetime(&candidate).earliest() {
            return t;
        }
    }
    tz.from_utc_datetime(&local)
}

/// Real time left from `now` until the local wall-clock time `next`.
pub fn wait_until<Tz: TimeZone>(now: &DateTime<Tz>, next: NaiveDateTime) -> Duration {
    resolve_local(&now.timezone(), next)
        .signed_duration_since(now.clone())
        .to_std()
        .unwrap_or_default()
}

/// Whether a wake-up at `fired_at` should deliver the digest scheduled for
/// `next`. Early wake-ups and a second fire on an already served day are
/// refused.
pub fn should_fire(
    fired_at: NaiveDateTime,
    next: NaiveDateTime,
    last_run: Option<NaiveDate>,
) -> bool {
    fired_at >= next && last_run != Some(next.date())
}

/// Build `date`'s digest and deliver it to the recipient.
pub async fn deliver_digest(
    builder: &DigestBuilder,
    notifier: &dyn Notifier,
    recipient: i64,
    date: NaiveDate,
) -> Result<()> {
    let digest = builder.build(date).await;
    notifier
        .send(recipient, &digest.render())
        .await
        .with_context(|| format!("Failed to deliver digest for {}", date))?;
    info!(
        "Digest for {} delivered to chat {} ({} fixture(s))",
        digest.date,
        recipient,
        digest.lines.len()
    );
    Ok(())
}

impl DailySchedule {
    /// Deliver today's digest immediately. Returns the date it covered.
    pub async fn deliver_now(&self) -> Result<NaiveDate> {
        let today = Local::now().date_naive();
        deliver_digest(&self.builder, self.notifier.as_ref(), self.recipient, today).await?;
        Ok(today)
    }

    /// Sleep until the configured time, deliver, repeat. Never returns.
    /// `last_run` is the date already served, if any (e.g. at startup).
    pub async fn run(self, mut last_run: Option<NaiveDate>) {
        info!("Daily digest scheduled at {} (local time)", self.at.format("%H:%M"));

        loop {
            let now = Local::now();
            let next = next_run_after(now.naive_local(), self.at);
            if last_run == Some(next.date()) {
                info!("Digest for {} already sent, skipping that day", next.date());
            } else {
                info!("Next digest at {}", next.format("%Y-%m-%d %H:%M"));
            }
            tokio::time::sleep(wait_until(&now, next)).await;

            // Wall-clock jumps can wake us early or twice for the same day.
            if !should_fire(Local::now().naive_local(), next, last_run) {
                continue;
            }
            last_run = Some(next.date());

            if let Err(e) =
                deliver_digest(&self.builder, self.notifier.as_ref(), self.recipient, next.date())
                    .await
            {
                error!("{:#}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::football::{FixtureEntry, FootballProvider};
    use async_trait::async_trait;
    use chrono::{FixedOffset, LocalResult};
    use std::sync::Mutex;

    fn at(date: (i32, u32, u32), h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(date.0, date.1, date.2)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn noon() -> NaiveTime {
        NaiveTime::from_hms_opt(12, 0, 0).unwrap()
    }

    #[test]
    fn test_next_run_later_today() {
        let now = at((2026, 10, 17), 9, 30, 0);
        assert_eq!(next_run_after(now, noon()), at((2026, 10, 17), 12, 0, 0));
    }

    #[test]
    fn test_next_run_at_trigger_time_is_tomorrow() {
        let now = at((2026, 10, 17), 12, 0, 0);
        assert_eq!(next_run_after(now, noon()), at((2026, 10, 18), 12, 0, 0));
    }

    #[test]
    fn test_next_run_after_trigger_time_is_tomorrow() {
        let now = at((2026, 12, 31), 18, 0, 0);
        assert_eq!(next_run_after(now, noon()), at((2027, 1, 1), 12, 0, 0));
    }

    /// US Eastern around the 2026 spring-forward: 02:00 EST jumps to 03:00 EDT
    /// on 2026-03-08 (07:00 UTC).
    #[derive(Debug, Clone, Copy)]
    struct SpringForward;

    impl SpringForward {
        fn switch() -> NaiveDateTime {
            at((2026, 3, 8), 7, 0, 0)
        }

        fn est() -> FixedOffset {
            FixedOffset::west_opt(5 * 3600).unwrap()
        }

        fn edt() -> FixedOffset {
            FixedOffset::west_opt(4 * 3600).unwrap()
        }
    }

    impl TimeZone for SpringForward {
        type Offset = FixedOffset;

        fn from_offset(_offset: &FixedOffset) -> Self {
            SpringForward
        }

        fn offset_from_local_date(&self, local: &NaiveDate) -> LocalResult<FixedOffset> {
            self.offset_from_local_datetime(&local.and_hms_opt(0, 0, 0).unwrap())
        }

        fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> LocalResult<FixedOffset> {
            let as_est = *local + chrono::Duration::hours(5) < Self::switch();
            let as_edt = *local + chrono::Duration::hours(4) >= Self::switch();
            match (as_est, as_edt) {
                (true, true) => LocalResult::Ambiguous(Self::est(), Self::edt()),
                (true, false) => LocalResult::Single(Self::est()),
                (false, true) => LocalResult::Single(Self::edt()),
                (false, false) => LocalResult::None,
            }
        }

        fn offset_from_utc_date(&self, utc: &NaiveDate) -> FixedOffset {
            self.offset_from_utc_datetime(&utc.and_hms_opt(0, 0, 0).unwrap())
        }

        fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> FixedOffset {
            if *utc < Self::switch() {
                Self::est()
            } else {
                Self::edt()
            }
        }
    }

    #[test]
    fn test_wait_spans_real_time_across_spring_forward() {
        let now = SpringForward
            .from_local_datetime(&at((2026, 3, 8), 1, 0, 0))
            .single()
            .unwrap();
        let next = next_run_after(now.naive_local(), noon());

        // 01:00 EST -> 12:00 EDT is 10 real hours, not 11
        assert_eq!(wait_until(&now, next), Duration::from_secs(10 * 3600));
        let woke = now + chrono::Duration::from_std(wait_until(&now, next)).unwrap();
        assert_eq!(woke.naive_local(), at((2026, 3, 8), 12, 0, 0));
    }

    #[test]
    fn test_skipped_wall_clock_time_resolves_after_gap() {
        let t = resolve_local(&SpringForward, at((2026, 3, 8), 2, 30, 0));
        assert_eq!(t.naive_local(), at((2026, 3, 8), 3, 0, 0));
    }

    #[test]
    fn test_wait_on_ordinary_day() {
        let now = SpringForward
            .from_local_datetime(&at((2026, 3, 9), 11, 30, 0))
            .single()
            .unwrap();
        let next = next_run_after(now.naive_local(), noon());
        assert_eq!(wait_until(&now, next), Duration::from_secs(30 * 60));
    }

    #[test]
    fn test_should_fire_on_time() {
        let next = at((2026, 10, 17), 12, 0, 0);
        assert!(should_fire(next, next, None));
        assert!(should_fire(at((2026, 10, 17), 12, 0, 1), next, Some(date((2026, 10, 16)))));
    }

    #[test]
    fn test_should_not_fire_on_early_wake() {
        let next = at((2026, 10, 17), 12, 0, 0);
        assert!(!should_fire(at((2026, 10, 17), 11, 59, 59), next, None));
    }

    #[test]
    fn test_should_not_fire_twice_for_same_date() {
        let next = at((2026, 10, 17), 12, 0, 0);
        assert!(!should_fire(at((2026, 10, 17), 12, 0, 5), next, Some(date((2026, 10, 17)))));
    }

    fn date(d: (i32, u32, u32)) -> NaiveDate {
        NaiveDate::from_ymd_opt(d.0, d.1, d.2).unwrap()
    }

    struct NoFixtures;

    #[async_trait]
    impl FootballProvider for NoFixtures {
        fn name(&self) -> &str {
            "empty"
        }

        async fn fixtures_on(&self, _date: NaiveDate) -> Vec<FixtureEntry> {
            vec![]
        }

        async fn team_goal_average(&self, _: i64, _: i64, _: i32) -> Result<Option<f64>> {
            Ok(None)
        }
    }

    struct Recorder {
        sent: Mutex<Vec<(i64, String)>>,
        fail: bool,
    }

    #[async_trait]
    impl Notifier for Recorder {
        async fn send(&self, chat_id: i64, text: &str) -> Result<()> {
            if self.fail {
                anyhow::bail!("Bad Request: chat not found");
            }
            self.sent.lock().unwrap().push((chat_id, text.to_string()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_deliver_digest_goes_to_recipient() {
        let builder = DigestBuilder::new(Arc::new(NoFixtures));
        let notifier = Recorder { sent: Mutex::new(vec![]), fail: false };
        let date = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();

        deliver_digest(&builder, &notifier, 4242, date).await.unwrap();

        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, 4242);
        assert!(sent[0].1.ends_with("No matches found today."));
    }

    #[tokio::test]
    async fn test_deliver_digest_propagates_send_failure() {
        let builder = DigestBuilder::new(Arc::new(NoFixtures));
        let notifier = Recorder { sent: Mutex::new(vec![]), fail: true };
        let date = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();

        let err = deliver_digest(&builder, &notifier, 4242, date).await.unwrap_err();
        assert!(format!("{:#}", err).contains("chat not found"));
    }
}
