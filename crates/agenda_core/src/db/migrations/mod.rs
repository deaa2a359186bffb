//! Versioned schema for the agenda store.
//!
//! # Invariants
//! - Versions start at 1 and increase by one per migration.
//! - The applied version is mirrored to `PRAGMA user_version`.
//! - An upgrade holds the write lock from version check to commit, so two
//!   processes opening the same file never run a migration twice.

use crate::db::StoreError;
use log::info;
use rusqlite::{Connection, TransactionBehavior};

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "users",
        sql: include_str!("0001_users.sql"),
    },
    Migration {
        version: 2,
        name: "notes",
        sql: include_str!("0002_notes.sql"),
    },
];

/// Schema version this build writes.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Upgrades the store to [`latest_version`] and returns how many migrations
/// ran. A store already at the latest version is left untouched.
pub fn apply_migrations(conn: &mut Connection) -> Result<usize, StoreError> {
    let latest = latest_version();
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(StoreError::Query)?;

    let store_version = current_user_version(&tx).map_err(StoreError::Query)?;
    if store_version > latest {
        return Err(StoreError::SchemaTooNew {
            store_version,
            latest_supported: latest,
        });
    }

    let mut applied = Vec::new();
    for migration in MIGRATIONS.iter().skip_while(|m| m.version <= store_version) {
        tx.execute_batch(migration.sql)
            .and_then(|()| tx.pragma_update(None, "user_version", migration.version))
            .map_err(|source| StoreError::Migration {
                version: migration.version,
                source,
            })?;
        applied.push(migration.name);
    }

    if applied.is_empty() {
        return Ok(0);
    }

    tx.commit().map_err(StoreError::Query)?;
    info!(
        "event=db_migrate module=db status=ok from_version={store_version} to_version={latest} applied={}",
        applied.join(",")
    );
    Ok(applied.len())
}

/// Reads the schema version stored in `PRAGMA user_version`.
pub fn current_user_version(conn: &Connection) -> rusqlite::Result<u32> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
}
