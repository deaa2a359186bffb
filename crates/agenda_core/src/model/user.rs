//! User identity record.

use crate::model::contact::Contact;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a user record.
pub type UserId = Uuid;

/// Identity record keyed by a unique email.
///
/// `password` is stored and compared verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub password: String,
    /// Embedded address book, in append order.
    pub contacts: Vec<Contact>,
    /// Compare-and-swap counter; bumped by every successful update.
    pub revision: i64,
}

impl User {
    /// Creates a new user record with a generated id and no contacts.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            password: password.into(),
            contacts: Vec::new(),
            revision: 0,
        }
    }

    /// Returns whether `candidate` equals the stored password.
    pub fn password_matches(&self, candidate: &str) -> bool {
        self.password == candidate
    }
}
