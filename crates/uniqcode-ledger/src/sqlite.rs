//! SQLite implementation of the Ledger trait.
//!
//! Persistent backend for hosts that run the services outside a managed
//! ledger. It uses rusqlite with bundled SQLite, wrapped in async via
//! tokio::spawn_blocking.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{LedgerError, Result};
use crate::migration::{self, now_millis};
use crate::traits::{Ledger, Write, WriteSet};

const UPSERT_STATE: &str = "INSERT INTO world_state (key, value, updated_at) VALUES (?1, ?2, ?3)
     ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at";

const INSERT_STATE: &str = "INSERT INTO world_state (key, value, updated_at) VALUES (?1, ?2, ?3)
     ON CONFLICT(key) DO NOTHING";

const UPSERT_PRIVATE: &str =
    "INSERT INTO private_data (collection, key, value, updated_at) VALUES (?1, ?2, ?3, ?4)
     ON CONFLICT(collection, key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at";

/// Ledger persisted in a single SQLite file.
///
/// One connection behind a mutex; every query hops to the blocking pool so
/// callers on the async runtime never stall on disk I/O.
pub struct SqliteLedger {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteLedger {
    /// Open or create the ledger file at `path` and bring its schema up to
    /// date.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    /// A throwaway ledger that lives only as long as this value.
    pub fn open_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(mut conn: Connection) -> Result<Self> {
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run a blocking operation on the connection off the async runtime.
    async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);

        tokio::task::spawn_blocking(move || {
            let mut conn = conn
                .lock()
                .map_err(|e| LedgerError::Task(format!("mutex poisoned: {}", e)))?;
            f(&mut conn)
        })
        .await
        .map_err(|e| LedgerError::Task(format!("spawn_blocking failed: {}", e)))?
    }
}

fn apply_write(conn: &Connection, write: &Write, now: i64) -> Result<()> {
    match write {
        Write::State { key, value } => {
            conn.execute(UPSERT_STATE, params![key, value.as_ref(), now])?;
        }
        Write::CreateState { key, value } => {
            let inserted = conn.execute(INSERT_STATE, params![key, value.as_ref(), now])?;
            if inserted == 0 {
                return Err(LedgerError::AlreadyExists { key: key.clone() });
            }
        }
        Write::Private {
            collection,
            key,
            value,
        } => {
            conn.execute(UPSERT_PRIVATE, params![collection, key, value.as_ref(), now])?;
        }
    }
    Ok(())
}

#[async_trait]
impl Ledger for SqliteLedger {
    async fn get_state(&self, key: &str) -> Result<Option<Bytes>> {
        let key = key.to_string();

        self.run(move |conn| {
            let value: Option<Vec<u8>> = conn
                .query_row(
                    "SELECT value FROM world_state WHERE key = ?1",
                    params![key],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(value.map(Bytes::from))
        })
        .await
    }

    async fn put_state(&self, key: &str, value: Bytes) -> Result<()> {
        let write = Write::State {
            key: key.to_string(),
            value,
        };

        self.run(move |conn| apply_write(conn, &write, now_millis()))
            .await
    }

    async fn get_private_data(&self, collection: &str, key: &str) -> Result<Option<Bytes>> {
        let collection = collection.to_string();
        let key = key.to_string();

        self.run(move |conn| {
            let value: Option<Vec<u8>> = conn
                .query_row(
                    "SELECT value FROM private_data WHERE collection = ?1 AND key = ?2",
                    params![collection, key],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(value.map(Bytes::from))
        })
        .await
    }

    async fn put_private_data(&self, collection: &str, key: &str, value: Bytes) -> Result<()> {
        let write = Write::Private {
            collection: collection.to_string(),
            key: key.to_string(),
            value,
        };

        self.run(move |conn| apply_write(conn, &write, now_millis()))
            .await
    }

    async fn commit(&self, writes: WriteSet) -> Result<()> {
        let count = writes.len();

        self.run(move |conn| {
            // A failed write drops `tx`, which rolls back everything before it.
            let tx = conn.transaction()?;
            let now = now_millis();
            for write in writes.iter() {
                apply_write(&tx, write, now)?;
            }
            tx.commit()?;
            Ok(())
        })
        .await?;

        tracing::debug!(writes = count, "sqlite ledger commit applied");
        Ok(())
    }
}
