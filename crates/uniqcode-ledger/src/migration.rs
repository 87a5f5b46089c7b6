//! Versioned schema for the SQLite ledger.
//!
//! `MIGRATIONS[i]` upgrades the schema from version `i` to `i + 1`. The
//! applied version is kept in `ledger_schema`, so opening an existing file
//! only runs the steps it has not seen yet.

use rusqlite::{params, Connection};

use crate::error::{LedgerError, Result};

/// Ordered schema steps.
const MIGRATIONS: &[&str] = &[
    // v1: public state and private collections in separate tables
    r#"
    CREATE TABLE world_state (
        key         TEXT PRIMARY KEY,
        value       BLOB NOT NULL,
        updated_at  INTEGER NOT NULL
    );

    CREATE TABLE private_data (
        collection  TEXT NOT NULL,
        key         TEXT NOT NULL,
        value       BLOB NOT NULL,
        updated_at  INTEGER NOT NULL,
        PRIMARY KEY (collection, key)
    );
    "#,
];

/// Schema version a fully migrated database reports.
pub const CURRENT_VERSION: u32 = MIGRATIONS.len() as u32;

/// Bring the schema up to [`CURRENT_VERSION`]. Safe to call on every open.
pub fn migrate(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS ledger_schema (
            version     INTEGER PRIMARY KEY,
            applied_at  INTEGER NOT NULL
        )",
    )?;

    let applied = schema_version(conn)?;
    if applied > CURRENT_VERSION {
        return Err(LedgerError::Migration(format!(
            "database schema v{} is newer than this build (v{})",
            applied, CURRENT_VERSION
        )));
    }
    if applied == CURRENT_VERSION {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for (step, sql) in MIGRATIONS.iter().enumerate().skip(applied as usize) {
        let version = step as u32 + 1;
        tx.execute_batch(sql)
            .map_err(|e| LedgerError::Migration(format!("v{}: {}", version, e)))?;
        tx.execute(
            "INSERT INTO ledger_schema (version, applied_at) VALUES (?1, ?2)",
            params![version, now_millis()],
        )?;
    }
    tx.commit()?;

    tracing::debug!(from = applied, to = CURRENT_VERSION, "ledger schema migrated");
    Ok(())
}

/// Highest applied schema version, 0 for a fresh database.
pub fn schema_version(conn: &Connection) -> Result<u32> {
    let version = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM ledger_schema",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

/// Wall clock in Unix milliseconds, for `updated_at` columns.
pub(crate) fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
