//! Address-book entry embedded inside a `User`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of an embedded contact.
pub type ContactId = Uuid;

/// Embedded contact document, persisted inside `users.contacts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub surname: String,
    pub phone: String,
    pub email: String,
}

impl Contact {
    /// Creates a contact with a freshly generated id.
    pub fn new(
        name: impl Into<String>,
        surname: impl Into<String>,
        phone: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            surname: surname.into(),
            phone: phone.into(),
            email: email.into(),
        }
    }
}

/// Contact as returned by `list_contacts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactView {
    pub id: String,
    pub name: String,
    pub surname: String,
    pub phone: String,
    pub email: String,
}

impl From<Contact> for ContactView {
    fn from(value: Contact) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name,
            surname: value.surname,
            phone: value.phone,
            email: value.email,
        }
    }
}
