//! Error type shared by all agenda services.

use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type AgendaResult<T> = Result<T, AgendaError>;

/// Business-rule and validation failures, plus pass-through store errors.
#[derive(Debug)]
pub enum AgendaError {
    /// A required argument is empty or malformed. Carries the field label.
    InvalidField(&'static str),
    /// Another user is already registered under `email`.
    AlreadyExists { email: String },
    /// No user is registered under `email`.
    NotFound { email: String },
    /// Password does not match the stored one.
    WrongCredentials,
    /// New password equals the old one.
    SamePassword,
    /// No note with `note_id` exists.
    NoteNotFound { note_id: String },
    /// The note exists but belongs to another user.
    NotOwner,
    /// Store failure, passed through uninterpreted.
    Repo(RepoError),
}

impl AgendaError {
    /// Stable machine-readable code, used in logs and by callers.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidField(_) => "invalid_field",
            Self::AlreadyExists { .. } => "already_exists",
            Self::NotFound { .. } => "user_not_found",
            Self::WrongCredentials => "wrong_credentials",
            Self::SamePassword => "same_password",
            Self::NoteNotFound { .. } => "note_not_found",
            Self::NotOwner => "not_owner",
            Self::Repo(_) => "store_failure",
        }
    }
}

impl Display for AgendaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidField(label) => write!(f, "invalid {label}"),
            Self::AlreadyExists { email } => write!(f, "user with {email} email already exist"),
            Self::NotFound { email } => write!(f, "user with {email} email does not exist"),
            Self::WrongCredentials => write!(f, "wrong password"),
            Self::SamePassword => write!(f, "new password must be different to old password"),
            Self::NoteNotFound { note_id } => write!(f, "note with id {note_id} does not exist"),
            Self::NotOwner => write!(f, "note does not belong to user"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AgendaError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for AgendaError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}
