//! Account use-case service.
//!
//! # Responsibility
//! - Register, authenticate and unregister users.
//! - Change passwords under the password-change rules.
//!
//! # Invariants
//! - At most one user per email.
//! - Passwords are compared verbatim.
//! - `update_password` rejects `new == old` before any store access.
//! - Unregistering leaves the user's notes in the `notes` collection.

use crate::model::user::User;
use crate::repo::user_repo::UserRepository;
use crate::repo::RepoError;
use crate::service::error::{AgendaError, AgendaResult};
use crate::service::validation::{validate_email, validate_string_field};
use crate::service::{log_outcome, require_user};

const MODULE: &str = "account";

/// Account operations over an injected user repository.
pub struct AccountService<U: UserRepository> {
    users: U,
}

impl<U: UserRepository> AccountService<U> {
    /// Creates a service using the provided repository implementation.
    pub fn new(users: U) -> Self {
        Self { users }
    }

    /// Registers a new user.
    ///
    /// # Errors
    /// - `InvalidField("email" | "password")` on malformed input.
    /// - `AlreadyExists` when the email is taken, including when a concurrent
    ///   registration wins the unique index.
    pub fn register(&self, email: &str, password: &str) -> AgendaResult<bool> {
        log_outcome("register", MODULE, self.try_register(email, password))
    }

    /// Checks credentials. No session or token is issued.
    ///
    /// # Errors
    /// - `NotFound` when no user has this email.
    /// - `WrongCredentials` when the password differs.
    pub fn authenticate(&self, email: &str, password: &str) -> AgendaResult<bool> {
        log_outcome("authenticate", MODULE, self.try_authenticate(email, password))
    }

    /// Replaces the stored password after checking the old one.
    ///
    /// # Errors
    /// - `SamePassword` when `new_password == password`, whether or not
    ///   `password` is correct.
    /// - `NotFound` / `WrongCredentials` as for `authenticate`.
    /// - `Repo(RepoError::Conflict)` when the record changed since it was read.
    pub fn update_password(
        &self,
        email: &str,
        password: &str,
        new_password: &str,
    ) -> AgendaResult<bool> {
        log_outcome(
            "update_password",
            MODULE,
            self.try_update_password(email, password, new_password),
        )
    }

    /// Deletes the user record after checking credentials.
    ///
    /// Notes owned by the user are kept.
    pub fn unregister_user(&self, email: &str, password: &str) -> AgendaResult<bool> {
        log_outcome("unregister_user", MODULE, self.try_unregister(email, password))
    }

    fn try_register(&self, email: &str, password: &str) -> AgendaResult<bool> {
        validate_email(email)?;
        validate_string_field("password", password)?;

        if self.users.find_user_by_email(email)?.is_some() {
            return Err(already_exists(email));
        }

        match self.users.create_user(&User::new(email, password)) {
            Ok(_) => Ok(true),
            Err(RepoError::Duplicate { .. }) => Err(already_exists(email)),
            Err(err) => Err(err.into()),
        }
    }

    fn try_authenticate(&self, email: &str, password: &str) -> AgendaResult<bool> {
        validate_email(email)?;
        validate_string_field("password", password)?;

        self.verified_user(email, password)?;
        Ok(true)
    }

    fn try_update_password(
        &self,
        email: &str,
        password: &str,
        new_password: &str,
    ) -> AgendaResult<bool> {
        validate_email(email)?;
        validate_string_field("password", password)?;
        validate_string_field("new password", new_password)?;

        if password == new_password {
            return Err(AgendaError::SamePassword);
        }

        let mut user = self.verified_user(email, password)?;
        user.password = new_password.to_owned();
        self.users.update_user(&user)?;
        Ok(true)
    }

    fn try_unregister(&self, email: &str, password: &str) -> AgendaResult<bool> {
        validate_email(email)?;
        validate_string_field("password", password)?;

        let user = self.verified_user(email, password)?;
        self.users.delete_user(user.id)?;
        Ok(true)
    }

    fn verified_user(&self, email: &str, password: &str) -> AgendaResult<User> {
        let user = require_user(&self.users, email)?;
        if !user.password_matches(password) {
            return Err(AgendaError::WrongCredentials);
        }
        Ok(user)
    }
}

fn already_exists(email: &str) -> AgendaError {
    AgendaError::AlreadyExists {
        email: email.to_owned(),
    }
}
