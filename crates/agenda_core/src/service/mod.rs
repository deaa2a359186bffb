//! Use-case services for accounts, notes and contacts.
//!
//! # Responsibility
//! - Validate caller input before touching the store.
//! - Enforce business rules on top of repository lookups.
//! - Keep callers decoupled from storage details.
//!
//! # Invariants
//! - Every operation is validate -> lookup -> act -> respond, in that order.
//! - Services hold only their injected repositories; no shared state.
//! - Log lines carry event metadata only, never credentials or user content.

pub mod account_service;
pub mod contact_service;
pub mod error;
pub mod note_service;
pub mod validation;

use crate::model::user::User;
use crate::repo::user_repo::UserRepository;
use crate::service::error::{AgendaError, AgendaResult};
use log::{error, info, warn};

/// Loads the user registered under `email` or fails with `NotFound`.
pub(crate) fn require_user<U: UserRepository>(users: &U, email: &str) -> AgendaResult<User> {
    users
        .find_user_by_email(email)?
        .ok_or_else(|| AgendaError::NotFound {
            email: email.to_owned(),
        })
}

/// Emits the terminal event for one operation and returns its outcome.
pub(crate) fn log_outcome<T>(
    event: &'static str,
    module: &'static str,
    outcome: AgendaResult<T>,
) -> AgendaResult<T> {
    match &outcome {
        Ok(_) => info!("event={event} module={module} status=ok"),
        Err(AgendaError::Repo(err)) => error!(
            "event={event} module={module} status=error error_code=store_failure error={err}"
        ),
        Err(err) => warn!(
            "event={event} module={module} status=rejected error_code={}",
            err.code()
        ),
    }
    outcome
}
