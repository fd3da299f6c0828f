//! SQLite Geo Repository
//!
//! Implements BatchWriter and GeoRepository on a single SQLite database.
//! All statements run on Tokio's blocking pool.

use crate::domain::entities::GeoRecord;
use crate::domain::ports::{BatchWriter, GeoRepository, StoreError};
use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::{params, Connection, Row, TransactionBehavior};
use std::path::Path;
use std::sync::Arc;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS ip_geoinfo (
        ip            TEXT PRIMARY KEY,
        country_code  TEXT NOT NULL,
        country       TEXT NOT NULL,
        city          TEXT NOT NULL,
        latitude      REAL NOT NULL,
        longitude     REAL NOT NULL,
        mystery_value TEXT NOT NULL
    )";

const INSERT_IGNORE: &str = "
    INSERT INTO ip_geoinfo (ip, country_code, country, city, latitude, longitude, mystery_value)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
    ON CONFLICT (ip) DO NOTHING";

const SELECT_ONE: &str = "
    SELECT ip, country_code, country, city, latitude, longitude, mystery_value
    FROM ip_geoinfo
    WHERE ip = ?1";

/// SQLite-backed geo record store.
///
/// Holds one connection; concurrent callers are serialized by the mutex.
#[derive(Clone)]
pub struct SqliteGeoRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteGeoRepository {
    /// Open (or create) the database file and ensure the table exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        Self::with_connection(Connection::open(path)?)
    }

    /// Private in-memory database, mostly for tests.
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Number of stored rows.
    pub async fn count(&self) -> Result<u64, StoreError> {
        self.run_blocking(|conn| {
            let n: i64 = conn.query_row("SELECT COUNT(*) FROM ip_geoinfo", [], |row| row.get(0))?;
            Ok(n as u64)
        })
        .await
    }

    /// Run `f` against the connection on the blocking pool.
    async fn run_blocking<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock();
            f(&mut guard)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }

    /// Insert rows in one IMMEDIATE transaction, skipping existing keys.
    fn insert_rows(conn: &mut Connection, rows: &[GeoRecord]) -> Result<u64, StoreError> {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let mut inserted = 0u64;
        {
            let mut stmt = tx.prepare_cached(INSERT_IGNORE)?;
            for r in rows {
                inserted += stmt.execute(params![
                    r.ip_address,
                    r.country_code,
                    r.country,
                    r.city,
                    r.latitude,
                    r.longitude,
                    r.mystery_value,
                ])? as u64;
            }
        }
        tx.commit()?;
        Ok(inserted)
    }

    /// Convert a SQLite row to a GeoRecord entity.
    fn row_to_record(row: &Row) -> rusqlite::Result<GeoRecord> {
        Ok(GeoRecord {
            ip_address: row.get(0)?,
            country_code: row.get(1)?,
            country: row.get(2)?,
            city: row.get(3)?,
            latitude: row.get(4)?,
            longitude: row.get(5)?,
            mystery_value: row.get(6)?,
        })
    }
}

#[async_trait]
impl BatchWriter for SqliteGeoRepository {
    async fn insert_batch(&self, rows: &[GeoRecord]) -> Result<u64, StoreError> {
        if rows.is_empty() {
            return Ok(0);
        }
        let rows = rows.to_vec();
        let inserted = self
            .run_blocking(move |conn| Self::insert_rows(conn, &rows))
            .await?;
        tracing::debug!("bulk insert committed, inserted={}", inserted);
        Ok(inserted)
    }
}

#[async_trait]
impl GeoRepository for SqliteGeoRepository {
    async fn fetch_one(&self, ip_address: &str) -> Result<GeoRecord, StoreError> {
        let ip = ip_address.to_string();
        self.run_blocking(move |conn| {
            conn.query_row(SELECT_ONE, params![ip], |row| Self::row_to_record(row))
                .map_err(|e| match e {
                    rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                    other => StoreError::Database(other),
                })
        })
        .await
    }
}
