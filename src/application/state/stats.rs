//! Usage counters: unique users and per-day message volume
//!
//! Nothing here is persisted; counters start from zero on every launch.
//! Today's and the weekly totals are derived from the daily buckets whenever
//! they are needed.

use std::collections::{BTreeMap, HashSet};
use std::fmt::Write as _;

use chrono::{DateTime, Duration, Local, NaiveDate};
use tokio::sync::Mutex;

use crate::domain::entities::UserId;

/// Days in the weekly rollup, today included
const WINDOW_DAYS: i64 = 7;

pub struct StatsTracker {
    inner: Mutex<Counters>,
    started_at: DateTime<Local>,
}

#[derive(Default)]
struct Counters {
    users: HashSet<UserId>,
    daily: BTreeMap<NaiveDate, u64>,
}

impl Counters {
    fn day(&self, day: NaiveDate) -> u64 {
        self.daily.get(&day).copied().unwrap_or(0)
    }

    fn week_ending(&self, today: NaiveDate) -> u64 {
        let first = window_start(today);
        self.daily.range(first..=today).map(|(_, count)| count).sum()
    }
}

fn window_start(today: NaiveDate) -> NaiveDate {
    today - Duration::days(WINDOW_DAYS - 1)
}

/// One trailing-day bucket of a report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCount {
    pub label: String,
    pub count: u64,
}

/// Snapshot returned by [`StatsTracker::report`]
#[derive(Debug, Clone)]
pub struct StatsReport {
    pub unique_users: usize,
    pub messages_today: u64,
    pub messages_this_week: u64,
    /// Oldest first, today last
    pub days: Vec<DayCount>,
    pub uptime: Duration,
    pub started_at: DateTime<Local>,
}

impl StatsTracker {
    pub fn new() -> Self {
        Self::started_at(Local::now())
    }

    pub fn started_at(started_at: DateTime<Local>) -> Self {
        Self {
            inner: Mutex::new(Counters::default()),
            started_at,
        }
    }

    /// Count one message from `user_id` today
    pub async fn record(&self, user_id: UserId) {
        self.record_on(user_id, Local::now().date_naive()).await;
    }

    pub async fn record_on(&self, user_id: UserId, today: NaiveDate) {
        let mut counters = self.inner.lock().await;

        counters.users.insert(user_id);
        *counters.daily.entry(today).or_insert(0) += 1;

        // Older buckets are never read again
        let first = window_start(today);
        counters.daily.retain(|day, _| *day >= first);

        tracing::debug!(
            "Stats: user {} counted, {} today, {} this week",
            user_id,
            counters.day(today),
            counters.week_ending(today)
        );
    }

    pub async fn unique_users(&self) -> usize {
        self.inner.lock().await.users.len()
    }

    pub async fn report(&self) -> StatsReport {
        self.report_at(Local::now()).await
    }

    pub async fn report_at(&self, now: DateTime<Local>) -> StatsReport {
        let counters = self.inner.lock().await;
        let today = now.date_naive();

        let days = (0..WINDOW_DAYS)
            .rev()
            .map(|offset| {
                let day = today - Duration::days(offset);
                let label = if offset == 0 {
                    "Today".to_string()
                } else {
                    day.format("%d.%m").to_string()
                };
                DayCount { label, count: counters.day(day) }
            })
            .collect();

        StatsReport {
            unique_users: counters.users.len(),
            messages_today: counters.day(today),
            messages_this_week: counters.week_ending(today),
            days,
            uptime: (now - self.started_at).max(Duration::zero()),
            started_at: self.started_at,
        }
    }
}

impl Default for StatsTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsReport {
    /// Uptime as "D d. H h. M min."
    pub fn uptime_text(&self) -> String {
        format!(
            "{} d. {} h. {} min.",
            self.uptime.num_days(),
            self.uptime.num_hours() % 24,
            self.uptime.num_minutes() % 60
        )
    }

    /// Report text in Telegram's legacy Markdown
    pub fn render(&self) -> String {
        let mut days = String::new();
        for day in &self.days {
            let _ = writeln!(days, "  {}: {}", day.label, day.count);
        }

        format!(
            "📊 *Bot statistics*\n\n\
             👥 *Unique users:* {}\n\
             📨 *Messages today:* {}\n\
             📈 *Messages this week:* {}\n\n\
             📅 *By day:*\n{}\n\
             ⏱️ *Uptime:* {}\n\
             🚀 *Started:* {}",
            self.unique_users,
            self.messages_today,
            self.messages_this_week,
            days.trim_end(),
            self.uptime_text(),
            self.started_at.format("%d.%m.%Y %H:%M"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, m, d, h, min, 0).single().expect("valid local time")
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[tokio::test]
    async fn unique_users_counts_distinct_ids() {
        let stats = StatsTracker::new();
        let mut last = 0;
        for id in [1, 2, 2, 3, 1, 3, 4] {
            stats.record(id).await;
            let now = stats.unique_users().await;
            assert!(now >= last);
            last = now;
        }
        assert_eq!(last, 4);
    }

    #[tokio::test]
    async fn week_covers_seven_days_including_today() {
        let stats = StatsTracker::started_at(at(2026, 10, 1, 9, 0));
        // Outside the window
        stats.record_on(1, date(2026, 10, 12)).await;
        // Inside: 13th through 19th
        stats.record_on(1, date(2026, 10, 13)).await;
        stats.record_on(2, date(2026, 10, 16)).await;
        stats.record_on(3, date(2026, 10, 19)).await;
        stats.record_on(3, date(2026, 10, 19)).await;

        let report = stats.report_at(at(2026, 10, 19, 12, 0)).await;
        assert_eq!(report.messages_today, 2);
        assert_eq!(report.messages_this_week, 4);
        assert!(report.messages_this_week >= report.messages_today);

        let sum: u64 = report.days.iter().map(|d| d.count).sum();
        assert_eq!(sum, report.messages_this_week);
    }

    #[tokio::test]
    async fn report_labels_today_last() {
        let stats = StatsTracker::started_at(at(2026, 10, 19, 8, 0));
        stats.record_on(5, date(2026, 10, 19)).await;
        stats.record_on(5, date(2026, 10, 18)).await;

        let report = stats.report_at(at(2026, 10, 19, 10, 30)).await;
        assert_eq!(report.days.len(), 7);
        assert_eq!(report.days[0].label, "13.10");
        assert_eq!(report.days[5], DayCount { label: "18.10".into(), count: 1 });
        assert_eq!(report.days[6], DayCount { label: "Today".into(), count: 1 });
        assert_eq!(report.unique_users, 1);
    }

    #[tokio::test]
    async fn today_recomputed_on_report() {
        let stats = StatsTracker::started_at(at(2026, 10, 18, 8, 0));
        stats.record_on(5, date(2026, 10, 18)).await;

        // A day later nothing has been recorded yet
        let report = stats.report_at(at(2026, 10, 19, 8, 0)).await;
        assert_eq!(report.messages_today, 0);
        assert_eq!(report.messages_this_week, 1);
    }

    #[tokio::test]
    async fn uptime_and_start_rendering() {
        let stats = StatsTracker::started_at(at(2026, 10, 17, 9, 5));
        let report = stats.report_at(at(2026, 10, 19, 12, 45)).await;
        assert_eq!(report.uptime_text(), "2 d. 3 h. 40 min.");

        let text = report.render();
        assert!(text.contains("🚀 *Started:* 17.10.2026 09:05"));
        assert!(text.contains("  Today: 0"));
        assert!(text.contains("👥 *Unique users:* 0"));
    }
}
