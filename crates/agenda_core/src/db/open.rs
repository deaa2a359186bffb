//! Connection bootstrap for the agenda store.
//!
//! # Invariants
//! - Returned connections have migrations fully applied.
//! - Every open attempt emits exactly one terminal `db_open` event.

use super::migrations::apply_migrations;
use super::StoreError;
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (or creates) a store file and applies all pending migrations.
///
/// # Errors
/// - `StoreError::Open` when the file cannot be opened.
/// - `StoreError::Migration` when a schema step fails. The store keeps its
///   previous version.
/// - `StoreError::SchemaTooNew` when the file was written by a newer build.
pub fn open_db(path: impl AsRef<Path>) -> Result<Connection, StoreError> {
    open_with("file", || Connection::open(path))
}

/// Opens a private in-memory store and applies all migrations.
///
/// Used by tests and by callers that run without `AGENDA_DB_PATH`.
pub fn open_db_in_memory() -> Result<Connection, StoreError> {
    open_with("memory", Connection::open_in_memory)
}

fn open_with<F>(mode: &'static str, connect: F) -> Result<Connection, StoreError>
where
    F: FnOnce() -> rusqlite::Result<Connection>,
{
    let started_at = Instant::now();

    let result = connect()
        .map_err(|source| StoreError::Open { mode, source })
        .and_then(|mut conn| {
            let migrated = prepare_connection(&mut conn)?;
            Ok((conn, migrated))
        });

    match result {
        Ok((conn, migrated)) => {
            info!(
                "event=db_open module=db status=ok mode={mode} migrated={migrated} duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code={} error={}",
                started_at.elapsed().as_millis(),
                err.code(),
                err
            );
            Err(err)
        }
    }
}

fn prepare_connection(conn: &mut Connection) -> Result<usize, StoreError> {
    conn.pragma_update(None, "foreign_keys", true)
        .and_then(|()| conn.busy_timeout(BUSY_TIMEOUT))
        .map_err(StoreError::Configure)?;
    apply_migrations(conn)
}
