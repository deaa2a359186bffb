//! Contact use-case service.
//!
//! Contacts live inside the owning user record; appending one rewrites the
//! user under a revision check.

use crate::model::contact::{Contact, ContactView};
use crate::repo::user_repo::UserRepository;
use crate::service::error::AgendaResult;
use crate::service::validation::{validate_email, validate_string_field};
use crate::service::{log_outcome, require_user};

const MODULE: &str = "contacts";

/// Contact operations over an injected user repository.
pub struct ContactService<U: UserRepository> {
    users: U,
}

impl<U: UserRepository> ContactService<U> {
    pub fn new(users: U) -> Self {
        Self { users }
    }

    /// Appends a contact to the user's address book.
    ///
    /// `phone` is stored as given, without validation.
    ///
    /// # Errors
    /// - `InvalidField` for a malformed `email`, `contact_email`, or an empty
    ///   `name` / `surname`.
    /// - `NotFound` when no user has this email.
    /// - `Repo(RepoError::Conflict)` when the user changed since it was read.
    pub fn add_contact(
        &self,
        email: &str,
        name: &str,
        surname: &str,
        phone: &str,
        contact_email: &str,
    ) -> AgendaResult<bool> {
        log_outcome(
            "add_contact",
            MODULE,
            self.try_add_contact(email, name, surname, phone, contact_email),
        )
    }

    /// Lists contacts whose name's first character equals `starts_with`.
    pub fn list_contacts(&self, email: &str, starts_with: &str) -> AgendaResult<Vec<ContactView>> {
        log_outcome("list_contacts", MODULE, self.try_list_contacts(email, starts_with))
    }

    fn try_add_contact(
        &self,
        email: &str,
        name: &str,
        surname: &str,
        phone: &str,
        contact_email: &str,
    ) -> AgendaResult<bool> {
        validate_email(email)?;
        validate_email(contact_email)?;
        validate_string_field("name", name)?;
        validate_string_field("surname", surname)?;

        let mut user = require_user(&self.users, email)?;
        user.contacts.push(Contact::new(name, surname, phone, contact_email));
        self.users.update_user(&user)?;
        Ok(true)
    }

    fn try_list_contacts(&self, email: &str, starts_with: &str) -> AgendaResult<Vec<ContactView>> {
        validate_email(email)?;
        validate_string_field("startsWith filter", starts_with)?;

        let user = require_user(&self.users, email)?;
        let contacts = self.users.contacts_starting_with(user.id, starts_with)?;
        Ok(contacts.into_iter().map(ContactView::from).collect())
    }
}
