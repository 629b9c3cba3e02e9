use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, types::Type, Connection, OptionalExtension};
use std::path::Path;

use super::traits::{Record, Storage};

const DB_SCHEMA_VERSION: i64 = 1;

#[derive(Clone)]
pub struct SqliteStorage {
    pub path: String,
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err)))
}

fn map_record_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Record> {
    let id_int: i64 = row.get(0)?;
    let id: u64 = id_int.try_into().map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(0, Type::Integer, Box::new(err))
    })?;
    let name: String = row.get(1)?;
    let email: String = row.get(2)?;
    let created_raw: String = row.get(3)?;
    let updated_raw: String = row.get(4)?;
    Ok(Record {
        id,
        name,
        email,
        created_at: parse_timestamp(3, &created_raw)?,
        updated_at: parse_timestamp(4, &updated_raw)?,
    })
}

fn db_insert_record(conn: &Connection, name: &str, email: &str) -> rusqlite::Result<u64> {
    let now = format_timestamp(Utc::now());
    conn.execute(
        "INSERT INTO records (name, email, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)",
        params![name, email, now, now],
    )?;
    Ok(conn.last_insert_rowid() as u64)
}

fn db_list_records(conn: &Connection) -> rusqlite::Result<Vec<Record>> {
    let mut stmt = conn
        .prepare("SELECT id, name, email, created_at, updated_at FROM records ORDER BY id")?;
    let mapped = stmt
        .query_map([], map_record_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(mapped)
}

fn db_load_record(conn: &Connection, id: u64) -> rusqlite::Result<Option<Record>> {
    conn.query_row(
        "SELECT id, name, email, created_at, updated_at FROM records WHERE id = ?1",
        params![id as i64],
        map_record_row,
    )
    .optional()
}

fn db_update_record(
    conn: &Connection,
    id: u64,
    name: &str,
    email: &str,
) -> rusqlite::Result<Option<Record>> {
    let now = format_timestamp(Utc::now());
    let changed = conn.execute(
        "UPDATE records SET name = ?2, email = ?3, updated_at = ?4 WHERE id = ?1",
        params![id as i64, name, email, now],
    )?;
    if changed == 0 {
        return Ok(None);
    }
    db_load_record(conn, id)
}

fn db_delete_record(conn: &Connection, id: u64) -> rusqlite::Result<bool> {
    let rows = conn.execute("DELETE FROM records WHERE id = ?1", params![id as i64])?;
    Ok(rows > 0)
}

impl SqliteStorage {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_string_lossy().to_string(),
        }
    }

    pub fn reset_all(&self) -> Result<()> {
        if !std::path::Path::new(&self.path).exists() {
            return Ok(());
        }
        std::fs::remove_file(&self.path)?;
        Ok(())
    }

    pub fn init(&self) -> Result<()> {
        self.with_conn(|_conn| Ok(()))?;
        Ok(())
    }

    fn with_conn<F, T>(&self, f: F) -> rusqlite::Result<T>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T>,
    {
        let conn = Connection::open(&self.path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.busy_timeout(std::time::Duration::from_millis(500))?;

        Self::migrate(&conn)?;
        f(&conn)
    }

    fn migrate(conn: &Connection) -> rusqlite::Result<()> {
        let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

        if version == DB_SCHEMA_VERSION {
            return Ok(());
        }

        log::info!(
            "SQLite schema migration: {} -> {}",
            version,
            DB_SCHEMA_VERSION
        );

        if version == 0 {
            // AUTOINCREMENT keeps deleted ids from ever being reassigned.
            conn.execute_batch(
                r#"
            CREATE TABLE IF NOT EXISTS records (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL CHECK (length(name) <= 100),
                email TEXT NOT NULL CHECK (length(email) <= 100),
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
        "#,
            )?;
            conn.pragma_update(None, "user_version", DB_SCHEMA_VERSION)?;
            return Ok(());
        }

        Err(rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::ErrorCode::SchemaChanged as i32),
            Some("database schema version mismatch; please run with --reset option".to_string()),
        ))
    }
}

impl Storage for SqliteStorage {
    fn insert_record(&self, name: &str, email: &str) -> Result<u64> {
        let id = self.with_conn(|conn| db_insert_record(conn, name, email))?;
        Ok(id)
    }

    fn list_records(&self) -> Result<Vec<Record>> {
        let rows = self.with_conn(db_list_records)?;
        Ok(rows)
    }

    fn load_record(&self, id: u64) -> Result<Option<Record>> {
        let row = self.with_conn(|conn| db_load_record(conn, id))?;
        Ok(row)
    }

    fn update_record(&self, id: u64, name: &str, email: &str) -> Result<Option<Record>> {
        let row = self.with_conn(|conn| db_update_record(conn, id, name, email))?;
        Ok(row)
    }

    fn delete_record(&self, id: u64) -> Result<bool> {
        let deleted = self.with_conn(|conn| db_delete_record(conn, id))?;
        Ok(deleted)
    }
}
