//! User repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Look up, create, update and delete records in the `users` collection.
//! - Filter the embedded contact list inside the store.
//!
//! # Invariants
//! - `email` is unique; a racing insert surfaces as `RepoError::Duplicate`.
//! - `update_user` is a compare-and-swap on `revision`.
//! - Contacts are persisted as one JSON array document per user.

use crate::model::contact::Contact;
use crate::model::user::{User, UserId};
use crate::repo::{ensure_connection_ready, is_unique_violation, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const USERS_COLLECTION: &str = "users";

/// Repository interface for the `users` collection.
pub trait UserRepository {
    /// Finds the single user registered under `email`.
    fn find_user_by_email(&self, email: &str) -> RepoResult<Option<User>>;
    /// Inserts a new user record and returns its id.
    fn create_user(&self, user: &User) -> RepoResult<UserId>;
    /// Replaces the user record when its stored revision equals
    /// `user.revision`, returning the new revision.
    fn update_user(&self, user: &User) -> RepoResult<i64>;
    /// Deletes the user record. Notes owned by the user are not touched.
    fn delete_user(&self, id: UserId) -> RepoResult<()>;
    /// Returns the embedded contacts whose name starts with `first_char`.
    fn contacts_starting_with(&self, id: UserId, first_char: &str) -> RepoResult<Vec<Contact>>;
}

/// SQLite-backed user repository.
#[derive(Clone, Copy)]
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &[USERS_COLLECTION])?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn find_user_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, email, password, contacts, revision
             FROM users
             WHERE email = ?1;",
        )?;

        let mut rows = stmt.query([email])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_user_row(row)?));
        }

        Ok(None)
    }

    fn create_user(&self, user: &User) -> RepoResult<UserId> {
        let contacts = encode_contacts(&user.contacts)?;
        let inserted = self.conn.execute(
            "INSERT INTO users (id, email, password, contacts, revision)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                user.id.to_string(),
                user.email.as_str(),
                user.password.as_str(),
                contacts,
                user.revision,
            ],
        );

        match inserted {
            Ok(_) => Ok(user.id),
            Err(err) if is_unique_violation(&err) => Err(RepoError::Duplicate {
                collection: USERS_COLLECTION,
            }),
            Err(err) => Err(err.into()),
        }
    }

    fn update_user(&self, user: &User) -> RepoResult<i64> {
        let contacts = encode_contacts(&user.contacts)?;
        let changed = self.conn.execute(
            "UPDATE users
             SET
                email = ?2,
                password = ?3,
                contacts = ?4,
                revision = revision + 1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1
               AND revision = ?5;",
            params![
                user.id.to_string(),
                user.email.as_str(),
                user.password.as_str(),
                contacts,
                user.revision,
            ],
        );

        let changed = match changed {
            Ok(changed) => changed,
            Err(err) if is_unique_violation(&err) => {
                return Err(RepoError::Duplicate {
                    collection: USERS_COLLECTION,
                })
            }
            Err(err) => return Err(err.into()),
        };

        if changed == 0 {
            let exists = self
                .conn
                .query_row(
                    "SELECT 1 FROM users WHERE id = ?1;",
                    [user.id.to_string()],
                    |_| Ok(()),
                )
                .optional()?
                .is_some();
            return Err(if exists {
                RepoError::Conflict {
                    id: user.id,
                    expected_revision: user.revision,
                }
            } else {
                RepoError::NotFound {
                    collection: USERS_COLLECTION,
                    id: user.id,
                }
            });
        }

        Ok(user.revision + 1)
    }

    fn delete_user(&self, id: UserId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM users WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                collection: USERS_COLLECTION,
                id,
            });
        }

        Ok(())
    }

    fn contacts_starting_with(&self, id: UserId, first_char: &str) -> RepoResult<Vec<Contact>> {
        let mut stmt = self.conn.prepare(
            "SELECT contact.value
             FROM users, json_each(users.contacts) AS contact
             WHERE users.id = ?1
               AND substr(json_extract(contact.value, '$.name'), 1, 1) = ?2
             ORDER BY contact.key ASC;",
        )?;

        let mut rows = stmt.query(params![id.to_string(), first_char])?;
        let mut contacts = Vec::new();
        while let Some(row) = rows.next()? {
            let document: String = row.get(0)?;
            contacts.push(decode_contact(&document)?);
        }

        Ok(contacts)
    }
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    let id_text: String = row.get("id")?;
    let contacts_text: String = row.get("contacts")?;
    let contacts = serde_json::from_str(&contacts_text).map_err(|err| {
        RepoError::InvalidData(format!("invalid contacts document in users.contacts: {err}"))
    })?;

    Ok(User {
        id: parse_uuid(&id_text, "users.id")?,
        email: row.get("email")?,
        password: row.get("password")?,
        contacts,
        revision: row.get("revision")?,
    })
}

fn encode_contacts(contacts: &[Contact]) -> RepoResult<String> {
    serde_json::to_string(contacts)
        .map_err(|err| RepoError::InvalidData(format!("unable to encode contacts: {err}")))
}

fn decode_contact(document: &str) -> RepoResult<Contact> {
    serde_json::from_str(document).map_err(|err| {
        RepoError::InvalidData(format!("invalid contact entry in users.contacts: {err}"))
    })
}
