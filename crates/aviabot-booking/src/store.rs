use crate::record::BookingRecord;
use aviabot_core::{AviabotError, AviabotResult};
use async_trait::async_trait;
use rusqlite::Connection;
use std::path::Path;
use tokio::sync::{Mutex, RwLock};

/// Append-only booking log.
#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn append(&self, record: BookingRecord) -> AviabotResult<()>;
    /// The most recently appended record for `identity`, if any.
    async fn latest(&self, identity: &str) -> AviabotResult<Option<BookingRecord>>;
    async fn count(&self, identity: &str) -> AviabotResult<usize>;
}

/// Vec-backed log for tests and single-process runs.
pub struct InMemoryBookingStore {
    records: RwLock<Vec<BookingRecord>>,
}

impl InMemoryBookingStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }
}

impl Default for InMemoryBookingStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn append(&self, record: BookingRecord) -> AviabotResult<()> {
        self.records.write().await.push(record);
        Ok(())
    }

    async fn latest(&self, identity: &str) -> AviabotResult<Option<BookingRecord>> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .rev()
            .find(|r| r.identity == identity)
            .cloned())
    }

    async fn count(&self, identity: &str) -> AviabotResult<usize> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .filter(|r| r.identity == identity)
            .count())
    }
}

/// SQLite-backed log, `bookings` table with an autoincrement row id.
pub struct SqliteBookingStore {
    conn: Mutex<Connection>,
}

impl SqliteBookingStore {
    pub fn open(path: impl AsRef<Path>) -> AviabotResult<Self> {
        let conn = Connection::open(path).map_err(storage_err)?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS bookings (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                identity TEXT NOT NULL,
                display_name TEXT NOT NULL,
                flight_summary TEXT NOT NULL,
                seat_count INTEGER NOT NULL,
                comment TEXT NOT NULL,
                phone_number TEXT NOT NULL
            )",
            [],
        )
        .map_err(storage_err)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

#[async_trait]
impl BookingStore for SqliteBookingStore {
    async fn append(&self, record: BookingRecord) -> AviabotResult<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO bookings
                (identity, display_name, flight_summary, seat_count, comment, phone_number)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            (
                &record.identity,
                &record.display_name,
                &record.flight_summary,
                record.seat_count,
                &record.comment,
                &record.phone_number,
            ),
        )
        .map_err(storage_err)?;
        Ok(())
    }

    async fn latest(&self, identity: &str) -> AviabotResult<Option<BookingRecord>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare(
                "SELECT identity, display_name, flight_summary, seat_count, comment, phone_number
                 FROM bookings WHERE identity = ?1 ORDER BY id DESC LIMIT 1",
            )
            .map_err(storage_err)?;
        let mut rows = stmt.query([identity]).map_err(storage_err)?;
        match rows.next().map_err(storage_err)? {
            Some(row) => Ok(Some(BookingRecord {
                identity: row.get(0).map_err(storage_err)?,
                display_name: row.get(1).map_err(storage_err)?,
                flight_summary: row.get(2).map_err(storage_err)?,
                seat_count: row.get(3).map_err(storage_err)?,
                comment: row.get(4).map_err(storage_err)?,
                phone_number: row.get(5).map_err(storage_err)?,
            })),
            None => Ok(None),
        }
    }

    async fn count(&self, identity: &str) -> AviabotResult<usize> {
        let conn = self.conn.lock().await;
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM bookings WHERE identity = ?1",
                [identity],
                |row| row.get(0),
            )
            .map_err(storage_err)?;
        Ok(count as usize)
    }
}

fn storage_err(e: rusqlite::Error) -> AviabotError {
    AviabotError::Storage(e.to_string())
}
