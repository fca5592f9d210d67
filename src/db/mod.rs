mod schema;

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension};

/// A versioned payload stored under a fixed key.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    pub key: String,
    /// Schema version of `payload`, written by whoever saved it.
    pub version: i64,
    pub payload: String,
    pub updated_at: DateTime<Utc>,
}

/// Local durable key/value storage backed by SQLite.
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: PathBuf) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn default_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "docwizard")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        Ok(dirs.data_dir().join("docwizard.db"))
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.lock()?;
        schema::run_migrations(&conn)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow::anyhow!("database lock poisoned"))
    }

    // ============================================================
    // Record operations
    // ============================================================

    pub fn load_record(&self, key: &str) -> Result<Option<StoredRecord>> {
        let conn = self.lock()?;
        let record = conn
            .query_row(
                "SELECT key, version, payload, updated_at FROM storage WHERE key = ?",
                [key],
                |row| {
                    Ok(StoredRecord {
                        key: row.get(0)?,
                        version: row.get(1)?,
                        payload: row.get(2)?,
                        updated_at: parse_datetime(row.get::<_, String>(3)?),
                    })
                },
            )
            .optional()?;

        Ok(record)
    }

    /// Insert or overwrite the record stored under `key`.
    pub fn save_record(&self, key: &str, version: i64, payload: &str) -> Result<StoredRecord> {
        let conn = self.lock()?;
        let now = Utc::now();

        conn.execute(
            "INSERT INTO storage (key, version, payload, updated_at) VALUES (?, ?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET
                version = excluded.version,
                payload = excluded.payload,
                updated_at = excluded.updated_at",
            (key, version, payload, now.to_rfc3339()),
        )?;

        Ok(StoredRecord {
            key: key.to_string(),
            version,
            payload: payload.to_string(),
            updated_at: now,
        })
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
        }
    }
}

fn parse_datetime(s: String) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
