//! SQLite-backed audit log.

use {async_trait::async_trait, sqlx::SqlitePool};

use crosslist_common::{Platform, now_ms};

use crate::{
    Error, Result,
    audit::{AuditEvent, AuditEventType, AuditLog, AuditPage, AuditQuery, NewAuditEvent},
};

/// SQLite-backed append-only audit log.
pub struct SqliteAuditLog {
    pool: SqlitePool,
}

impl SqliteAuditLog {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Initialize the audit_events table schema.
    pub async fn init(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS audit_events (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                listing_id TEXT    NOT NULL,
                platform   TEXT,
                event_type TEXT    NOT NULL,
                detail     TEXT    NOT NULL,
                payload    TEXT    NOT NULL,
                created_at INTEGER NOT NULL
            )",
        )
        .execute(pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_audit_events_listing
             ON audit_events (listing_id, id DESC)",
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl AuditLog for SqliteAuditLog {
    async fn record(&self, event: NewAuditEvent) -> Result<()> {
        let payload = serde_json::to_string(&event.payload)?;
        sqlx::query(
            "INSERT INTO audit_events
               (listing_id, platform, event_type, detail, payload, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&event.listing_id)
        .bind(event.platform.map(|p| p.as_str()))
        .bind(event.event_type.as_str())
        .bind(&event.detail)
        .bind(&payload)
        .bind(now_ms())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn query(&self, query: AuditQuery) -> Result<AuditPage> {
        let limit = query.effective_limit();

        // Fetch one extra row to know whether an older page exists.
        let rows = sqlx::query_as::<_, (i64, String, Option<String>, String, String, String, i64)>(
            "SELECT id, listing_id, platform, event_type, detail, payload, created_at
             FROM audit_events
             WHERE (?1 IS NULL OR listing_id = ?1)
               AND (?2 IS NULL OR platform = ?2)
               AND (?3 IS NULL OR event_type = ?3)
               AND (?4 IS NULL OR id < ?4)
             ORDER BY id DESC
             LIMIT ?5",
        )
        .bind(&query.listing_id)
        .bind(query.platform.map(|p| p.as_str()))
        .bind(query.event_type.map(|t| t.as_str()))
        .bind(query.cursor)
        .bind(i64::from(limit) + 1)
        .fetch_all(&self.pool)
        .await?;

        let has_more = rows.len() as i64 > i64::from(limit);
        let mut events = Vec::with_capacity(rows.len().min(limit as usize));
        for r in rows.into_iter().take(limit as usize) {
            let platform = match r.2 {
                Some(name) => Some(
                    Platform::parse(&name)
                        .ok_or_else(|| Error::not_found(format!("unknown platform: {name}")))?,
                ),
                None => None,
            };
            let event_type = AuditEventType::parse(&r.3)
                .ok_or_else(|| Error::not_found(format!("unknown event type: {}", r.3)))?;
            events.push(AuditEvent {
                id: r.0,
                listing_id: r.1,
                platform,
                event_type,
                detail: r.4,
                payload: serde_json::from_str(&r.5)?,
                created_at: r.6,
            });
        }

        let next_cursor = has_more.then(|| events.last().map(|e| e.id)).flatten();
        Ok(AuditPage {
            events,
            next_cursor,
        })
    }
}
