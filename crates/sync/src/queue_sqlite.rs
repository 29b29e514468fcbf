//! SQLite-backed durable publish queue.

use {async_trait::async_trait, sqlx::SqlitePool};

use crosslist_common::{Platform, now_ms};

use crate::{
    Error, Result,
    queue::PublishQueue,
    types::{ClaimedJob, PublishJob},
};

/// Durable queue persisted next to the stores, in the same SQLite database.
pub struct SqlitePublishQueue {
    pool: SqlitePool,
}

impl SqlitePublishQueue {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Initialize the publish_queue table schema.
    pub async fn init(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS publish_queue (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                listing_id  TEXT    NOT NULL,
                platform    TEXT    NOT NULL,
                status      TEXT    NOT NULL DEFAULT 'pending',
                error       TEXT,
                created_at  INTEGER NOT NULL,
                claimed_at  INTEGER,
                finished_at INTEGER
            )",
        )
        .execute(pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_publish_queue_pending
             ON publish_queue (status, id)",
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl PublishQueue for SqlitePublishQueue {
    async fn enqueue(&self, job: PublishJob) -> Result<()> {
        sqlx::query(
            "INSERT INTO publish_queue (listing_id, platform, created_at) VALUES (?, ?, ?)",
        )
        .bind(&job.listing_id)
        .bind(job.platform.as_str())
        .bind(now_ms())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn claim(&self) -> Result<Option<ClaimedJob>> {
        // Single atomic statement: concurrent workers never double-claim.
        let row = sqlx::query_as::<_, (i64, String, String)>(
            "UPDATE publish_queue
             SET status = 'running', claimed_at = ?
             WHERE id = (
                 SELECT id FROM publish_queue WHERE status = 'pending' ORDER BY id LIMIT 1
             )
             RETURNING id, listing_id, platform",
        )
        .bind(now_ms())
        .fetch_optional(&self.pool)
        .await?;

        let Some((id, listing_id, platform)) = row else {
            return Ok(None);
        };
        let platform = Platform::parse(&platform)
            .ok_or_else(|| Error::malformed_job(id, format!("unknown platform: {platform}")))?;
        Ok(Some(ClaimedJob {
            id,
            job: PublishJob {
                listing_id,
                platform,
            },
        }))
    }

    async fn complete(&self, id: i64) -> Result<()> {
        sqlx::query("UPDATE publish_queue SET status = 'done', finished_at = ? WHERE id = ?")
            .bind(now_ms())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn fail(&self, id: i64, error: &str) -> Result<()> {
        sqlx::query(
            "UPDATE publish_queue SET status = 'failed', error = ?, finished_at = ? WHERE id = ?",
        )
        .bind(error)
        .bind(now_ms())
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn pending_count(&self) -> Result<u64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM publish_queue WHERE status = 'pending'")
                .fetch_one(&self.pool)
                .await?;
        Ok(count as u64)
    }
}
