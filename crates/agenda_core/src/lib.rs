//! Core logic for the agenda backend: accounts, dated notes and contacts.
//! Services validate input and enforce business rules; repositories own the
//! store queries.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{AgendaConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::contact::{Contact, ContactId, ContactView};
pub use model::note::{Note, NoteId, NoteView};
pub use model::user::{User, UserId};
pub use repo::note_repo::{NoteRepository, SqliteNoteRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use service::account_service::AccountService;
pub use service::contact_service::ContactService;
pub use service::error::{AgendaError, AgendaResult};
pub use service::note_service::{day_bounds, NoteService};
pub use service::validation::{parse_date_field, validate_email, validate_string_field};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
