// Demo mode: an in-process log service for trying the dashboard offline
//
// Knows the two stock accounts, keeps its records in memory, and grows the
// store with a synthetic record every few seconds so the poll loop has
// something to show.
//
// Run with: LOGSTREAM_DEMO=1 cargo run --release

use crate::api::{ApiError, LogLevel, LogQuery, LogRecord, LogService, LoginResponse, StatBucket};
use chrono::{Duration as ChronoDuration, Utc};
use futures::future::BoxFuture;
use rand::seq::IndexedRandom;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::oneshot;
use uuid::Uuid;

/// How often the generator adds a record
pub const GENERATE_EVERY: Duration = Duration::from_secs(4);

/// Maximum records returned by one log query
const QUERY_LIMIT: usize = 50;

/// Stock accounts: (username, password, role label)
const ACCOUNTS: [(&str, &str, &str); 2] = [
    ("admin", "admin123", "Administrator"),
    ("client_user", "client123", "Standard Client"),
];

/// Owners the generator writes records for
const OWNERS: [&str; 2] = ["admin", "client_user"];

/// Base URL used for demo download links
const DEMO_BASE_URL: &str = "http://demo.local";

/// In-memory log service
pub struct DemoService {
    /// Oldest first
    records: Mutex<Vec<LogRecord>>,
}

impl Default for DemoService {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoService {
    /// Empty store
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }

    /// Store pre-filled with `count` records spread over the last hour
    pub fn seeded(count: usize) -> Self {
        let service = Self::new();
        let now = Utc::now();
        for i in 0..count {
            let age = ChronoDuration::seconds(((count - i) * 60) as i64);
            service.push(random_record(now - age));
        }
        service
    }

    /// Append a record
    pub fn push(&self, record: LogRecord) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
    }

    /// Generate one synthetic record stamped now
    pub fn generate(&self) -> LogRecord {
        let record = random_record(Utc::now());
        tracing::debug!("Demo generated {} log {}", record.level, record.filename);
        self.push(record.clone());
        record
    }

    /// Records visible to `query`, newest first
    fn query(&self, query: &LogQuery) -> Vec<LogRecord> {
        let needle = query.search.to_lowercase();
        let records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        records
            .iter()
            .rev()
            .filter(|r| query.user == "admin" || r.owner == query.user)
            .filter(|r| query.level.matches(r.level))
            .filter(|r| {
                needle.is_empty()
                    || r.id.to_lowercase().contains(&needle)
                    || r.owner.to_lowercase().contains(&needle)
                    || r.filename.to_lowercase().contains(&needle)
            })
            .take(QUERY_LIMIT)
            .cloned()
            .collect()
    }

    /// Per-level counts for `user`, in severity order
    fn count_levels(&self, user: &str) -> Vec<StatBucket> {
        let records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        LogLevel::ALL
            .iter()
            .filter_map(|level| {
                let value = records
                    .iter()
                    .filter(|r| r.level == *level && (user == "admin" || r.owner == user))
                    .count() as u64;
                (value > 0).then(|| StatBucket {
                    name: level.as_str().to_string(),
                    value,
                })
            })
            .collect()
    }
}

impl LogService for DemoService {
    fn login<'a>(
        &'a self,
        username: &'a str,
        password: &'a str,
    ) -> BoxFuture<'a, Result<LoginResponse, ApiError>> {
        Box::pin(async move {
            let account = ACCOUNTS
                .iter()
                .find(|(user, pass, _)| *user == username && *pass == password);
            Ok(match account {
                Some((user, _, role)) => LoginResponse {
                    success: true,
                    user: Some(user.to_string()),
                    role: Some(role.to_string()),
                    message: None,
                },
                None => LoginResponse {
                    success: false,
                    message: Some("Invalid credentials".to_string()),
                    ..Default::default()
                },
            })
        })
    }

    fn logs<'a>(&'a self, query: &'a LogQuery) -> BoxFuture<'a, Result<Vec<LogRecord>, ApiError>> {
        Box::pin(async move { Ok(self.query(query)) })
    }

    fn stats<'a>(&'a self, user: &'a str) -> BoxFuture<'a, Result<Vec<StatBucket>, ApiError>> {
        Box::pin(async move { Ok(self.count_levels(user)) })
    }

    fn download_url(&self, filename: &str) -> String {
        format!("{}/s3-view/{}", DEMO_BASE_URL, filename)
    }
}

/// Add a record every [`GENERATE_EVERY`] until shutdown
pub async fn run_generator(service: Arc<DemoService>, mut shutdown_rx: oneshot::Receiver<()>) {
    let mut ticker = tokio::time::interval(GENERATE_EVERY);
    // Skip the immediate first tick
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = &mut shutdown_rx => {
                tracing::info!("Demo generator received shutdown signal");
                return;
            }
            _ = ticker.tick() => {
                service.generate();
            }
        }
    }
}

fn random_record(at: chrono::DateTime<Utc>) -> LogRecord {
    let mut rng = rand::rng();
    let level = LogLevel::ALL.choose(&mut rng).copied().unwrap_or(LogLevel::Info);
    let owner = OWNERS.choose(&mut rng).copied().unwrap_or("admin");
    let id = Uuid::new_v4().to_string();
    LogRecord {
        filename: format!("{}_{}.json", owner, id),
        id,
        level,
        timestamp: at.to_rfc3339(),
        owner: owner.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::LevelFilter;

    fn record(id: &str, owner: &str, level: LogLevel, minute: u32) -> LogRecord {
        LogRecord {
            id: id.to_string(),
            filename: format!("{}_{}.json", owner, id),
            level,
            timestamp: format!("2025-03-01T10:{:02}:00+00:00", minute),
            owner: owner.to_string(),
        }
    }

    fn fixture() -> DemoService {
        let service = DemoService::new();
        service.push(record("a1", "admin", LogLevel::Info, 0));
        service.push(record("c1", "client_user", LogLevel::Error, 1));
        service.push(record("c2", "client_user", LogLevel::Warning, 2));
        service.push(record("a2", "admin", LogLevel::Error, 3));
        service
    }

    fn query(user: &str, level: LevelFilter, search: &str) -> LogQuery {
        LogQuery {
            user: user.to_string(),
            level,
            search: search.to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_accepts_stock_accounts() {
        let service = DemoService::new();

        let ok = service.login("client_user", "client123").await.unwrap();
        assert!(ok.success);
        assert_eq!(ok.role.as_deref(), Some("Standard Client"));

        let bad = service.login("admin", "nope").await.unwrap();
        assert!(!bad.success);
        assert_eq!(bad.message.as_deref(), Some("Invalid credentials"));
    }

    #[tokio::test]
    async fn test_admin_sees_everything_newest_first() {
        let service = fixture();
        let logs = service
            .logs(&query("admin", LevelFilter::All, ""))
            .await
            .unwrap();
        let ids: Vec<_> = logs.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a2", "c2", "c1", "a1"]);
    }

    #[tokio::test]
    async fn test_client_sees_own_records_only() {
        let service = fixture();
        let logs = service
            .logs(&query("client_user", LevelFilter::All, ""))
            .await
            .unwrap();
        assert!(logs.iter().all(|r| r.owner == "client_user"));
        assert_eq!(logs.len(), 2);
    }

    #[tokio::test]
    async fn test_level_and_search_filters_combine() {
        let service = fixture();
        let logs = service
            .logs(&query("admin", LevelFilter::Error, "CLIENT"))
            .await
            .unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].id, "c1");
    }

    #[tokio::test]
    async fn test_query_is_limited() {
        let service = DemoService::seeded(QUERY_LIMIT + 10);
        let logs = service
            .logs(&query("admin", LevelFilter::All, ""))
            .await
            .unwrap();
        assert_eq!(logs.len(), QUERY_LIMIT);
    }

    #[tokio::test]
    async fn test_stats_grouped_by_level() {
        let service = fixture();

        let all = service.stats("admin").await.unwrap();
        assert_eq!(
            all,
            vec![
                StatBucket {
                    name: "INFO".into(),
                    value: 1
                },
                StatBucket {
                    name: "WARNING".into(),
                    value: 1
                },
                StatBucket {
                    name: "ERROR".into(),
                    value: 2
                },
            ]
        );

        let client = service.stats("client_user").await.unwrap();
        assert_eq!(client.iter().map(|b| b.value).sum::<u64>(), 2);
    }

    #[test]
    fn test_generated_records_follow_naming() {
        let service = DemoService::new();
        let record = service.generate();
        assert_eq!(record.filename, format!("{}_{}.json", record.owner, record.id));
        assert!(OWNERS.contains(&record.owner.as_str()));
        assert_ne!(record.level, LogLevel::Unknown);
        assert!(record.parsed_timestamp().is_some());
        assert_eq!(record.id.len(), 36);
    }

    #[test]
    fn test_generated_ids_are_v4_uuids() {
        let service = DemoService::new();
        for _ in 0..200 {
            let id = Uuid::parse_str(&service.generate().id).unwrap();
            assert_eq!(id.get_version(), Some(uuid::Version::Random));
            assert_eq!(id.get_variant(), uuid::Variant::RFC4122);
        }
    }

    #[test]
    fn test_generator_covers_levels_and_owners() {
        let service = DemoService::seeded(300);
        let admin = query("admin", LevelFilter::All, "");
        let records = service.query(&admin);
        let all = service.records.lock().unwrap().clone();
        assert_eq!(records.len(), QUERY_LIMIT);
        for level in LogLevel::ALL {
            assert!(all.iter().any(|r| r.level == level), "no {} records", level);
        }
        for owner in OWNERS {
            assert!(all.iter().any(|r| r.owner == owner));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_generator_adds_records_until_shutdown() {
        let service = Arc::new(DemoService::new());
        let (tx, rx) = oneshot::channel();
        let task = tokio::spawn(run_generator(service.clone(), rx));

        tokio::time::sleep(GENERATE_EVERY * 2 + Duration::from_millis(10)).await;
        let admin = query("admin", LevelFilter::All, "");
        assert_eq!(service.logs(&admin).await.unwrap().len(), 2);

        tx.send(()).unwrap();
        task.await.unwrap();
        tokio::time::sleep(GENERATE_EVERY * 3).await;
        assert_eq!(service.logs(&admin).await.unwrap().len(), 2);
    }
}
