use crate::types::{NewStory, Result, StoryRecord};
use chrono::{Duration, NaiveDate, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::path::Path;
use tracing::{debug, info};

/// Durable table of summarized stories, keyed by title.
///
/// The store is the single source of truth for dedup; duplicate prevention
/// is the processor's responsibility via `exists`, the store itself only
/// fails on lower-level I/O faults. Every insert commits before returning,
/// so an `exists` check later in the same run sees it.
pub struct NewsStore {
    db: SqlitePool,
}

impl NewsStore {
    /// Open (or create) the SQLite database at the given path.
    pub async fn open(path: &Path) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let db = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        info!("Connected to database at {}", path.display());
        Ok(Self { db })
    }

    /// Wrap an existing pool (used by tests with in-memory databases).
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Idempotent creation of the `news` table and its secondary indexes.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS news (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                feed TEXT,
                title TEXT,
                link TEXT,
                summary TEXT,
                created_date DATE DEFAULT CURRENT_DATE
            )
            "#,
        )
        .execute(&self.db)
        .await?;

        // Indexes back the dedup lookup and the retention sweep.
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_news_title ON news (title)")
            .execute(&self.db)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_news_created_date ON news (created_date)")
            .execute(&self.db)
            .await?;

        Ok(())
    }

    /// True iff a record with exactly this title string is present.
    pub async fn exists(&self, title: &str) -> Result<bool> {
        let row = sqlx::query("SELECT 1 FROM news WHERE title = ?1")
            .bind(title)
            .fetch_optional(&self.db)
            .await?;
        Ok(row.is_some())
    }

    /// Append a new row, stamped with today's date.
    pub async fn insert(&self, story: &NewStory) -> Result<()> {
        let today = Utc::now().date_naive();
        sqlx::query(
            "INSERT INTO news (feed, title, link, summary, created_date) VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&story.feed)
        .bind(&story.title)
        .bind(&story.link)
        .bind(&story.summary)
        .bind(today)
        .execute(&self.db)
        .await?;
        debug!("Inserted story: {}", story.title);
        Ok(())
    }

    /// Delete every record whose `created_date` is strictly before
    /// `today - days`. Returns the count removed. A single DELETE statement,
    /// so qualifying rows disappear atomically.
    pub async fn purge_older_than(&self, days: u32) -> Result<u64> {
        let cutoff = Utc::now().date_naive() - Duration::days(i64::from(days));
        let result = sqlx::query("DELETE FROM news WHERE date(created_date) < date(?1)")
            .bind(cutoff)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected())
    }

    /// Read contract for the presentation layer: all records ingested on
    /// the given date, in arbitrary order.
    pub async fn fetched_on(&self, date: NaiveDate) -> Result<Vec<StoryRecord>> {
        let rows = sqlx::query(
            "SELECT id, feed, title, link, summary, created_date FROM news WHERE date(created_date) = date(?1)",
        )
        .bind(date)
        .fetch_all(&self.db)
        .await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            records.push(StoryRecord {
                id: row.try_get("id")?,
                feed: row.try_get("feed")?,
                title: row.try_get("title")?,
                link: row.try_get("link")?,
                summary: row.try_get("summary")?,
                created_date: row.try_get("created_date")?,
            });
        }
        Ok(records)
    }
}
