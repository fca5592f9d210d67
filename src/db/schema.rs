use anyhow::{Context, Result};
use rusqlite::Connection;

/// Ordered schema steps. The database's `user_version` is the number of
/// steps already applied.
const MIGRATIONS: &[(&str, &str)] = &[("initial", include_str!("migrations/001_initial.sql"))];

pub fn run_migrations(conn: &Connection) -> Result<()> {
    let mut applied = schema_version(conn)?;

    // A storage table without a recorded version was created by hand or by a
    // build that predates versioning; treat the initial step as done.
    if applied == 0 && has_storage_table(conn)? {
        set_schema_version(conn, 1)?;
        applied = 1;
        tracing::info!("Found unversioned storage table, starting from schema 1");
    }

    for (index, (name, sql)) in MIGRATIONS.iter().enumerate().skip(applied) {
        let version = index + 1;
        tracing::info!("Applying migration {:03}: {}", version, name);

        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(sql)
            .with_context(|| format!("Failed to apply migration {:03}: {}", version, name))?;
        set_schema_version(&tx, version)?;
        tx.commit()?;
    }

    Ok(())
}

pub fn schema_version(conn: &Connection) -> Result<usize> {
    let version: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    Ok(usize::try_from(version).unwrap_or(0))
}

fn set_schema_version(conn: &Connection, version: usize) -> Result<()> {
    conn.pragma_update(None, "user_version", version as i64)?;
    Ok(())
}

fn has_storage_table(conn: &Connection) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'storage'",
        [],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}
