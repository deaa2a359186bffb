//! Agenda store bootstrap.
//!
//! The store is one SQLite file, or a private in-memory database, holding the
//! `users` and `notes` collections. Connections are handed out only after the
//! schema has reached [`migrations::latest_version`].

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

/// Failure while opening, migrating or querying the agenda store.
#[derive(Debug)]
pub enum StoreError {
    /// SQLite refused to open the `mode` ("file" or "memory") store.
    Open {
        mode: &'static str,
        source: rusqlite::Error,
    },
    /// Connection pragmas could not be applied.
    Configure(rusqlite::Error),
    /// Migration `version` failed and the whole upgrade was rolled back.
    Migration {
        version: u32,
        source: rusqlite::Error,
    },
    /// The store was written by a newer build.
    SchemaTooNew {
        store_version: u32,
        latest_supported: u32,
    },
    Query(rusqlite::Error),
}

impl StoreError {
    /// Stable identifier used in `error_code=` log fields.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Open { .. } => "store_open_failed",
            Self::Configure(_) => "store_configure_failed",
            Self::Migration { .. } => "store_migration_failed",
            Self::SchemaTooNew { .. } => "store_schema_too_new",
            Self::Query(_) => "store_query_failed",
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { mode, source } => write!(f, "cannot open {mode} agenda store: {source}"),
            Self::Configure(err) => write!(f, "cannot configure agenda store connection: {err}"),
            Self::Migration { version, source } => {
                write!(f, "agenda store migration {version} failed: {source}")
            }
            Self::SchemaTooNew {
                store_version,
                latest_supported,
            } => write!(
                f,
                "agenda store schema version {store_version} is newer than supported {latest_supported}"
            ),
            Self::Query(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } | Self::Migration { source, .. } => Some(source),
            Self::Configure(err) | Self::Query(err) => Some(err),
            Self::SchemaTooNew { .. } => None,
        }
    }
}
