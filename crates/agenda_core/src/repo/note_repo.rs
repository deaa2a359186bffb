//! Note repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Create, fetch, list and delete records in the `notes` collection.
//!
//! # Invariants
//! - Dates are stored as Unix epoch milliseconds (UTC).
//! - Range listings are inclusive on both ends and return rows in insertion
//!   order.

use crate::model::note::{Note, NoteId};
use crate::model::user::UserId;
use crate::repo::{ensure_connection_ready, parse_uuid, RepoError, RepoResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

const NOTES_COLLECTION: &str = "notes";

/// Repository interface for the `notes` collection.
pub trait NoteRepository {
    /// Inserts a note and returns its id.
    fn create_note(&self, note: &Note) -> RepoResult<NoteId>;
    /// Fetches one note regardless of owner.
    fn find_note_by_id(&self, id: NoteId) -> RepoResult<Option<Note>>;
    /// Lists notes of `owner` dated within `[from, to]`.
    fn list_notes_between(
        &self,
        owner: UserId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> RepoResult<Vec<Note>>;
    /// Deletes one note by id.
    fn delete_note(&self, id: NoteId) -> RepoResult<()>;
}

/// SQLite-backed note repository.
#[derive(Clone, Copy)]
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &[NOTES_COLLECTION])?;
        Ok(Self { conn })
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn create_note(&self, note: &Note) -> RepoResult<NoteId> {
        self.conn.execute(
            "INSERT INTO notes (id, user_id, date_ms, text) VALUES (?1, ?2, ?3, ?4);",
            params![
                note.id.to_string(),
                note.owner.to_string(),
                note.date.timestamp_millis(),
                note.text.as_str(),
            ],
        )?;

        Ok(note.id)
    }

    fn find_note_by_id(&self, id: NoteId) -> RepoResult<Option<Note>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, date_ms, text
             FROM notes
             WHERE id = ?1;",
        )?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_note_row(row)?));
        }

        Ok(None)
    }

    fn list_notes_between(
        &self,
        owner: UserId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> RepoResult<Vec<Note>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, date_ms, text
             FROM notes
             WHERE user_id = ?1
               AND date_ms >= ?2
               AND date_ms <= ?3
             ORDER BY rowid ASC;",
        )?;

        let mut rows = stmt.query(params![
            owner.to_string(),
            from.timestamp_millis(),
            to.timestamp_millis(),
        ])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }

        Ok(notes)
    }

    fn delete_note(&self, id: NoteId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM notes WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                collection: NOTES_COLLECTION,
                id,
            });
        }

        Ok(())
    }
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    let id_text: String = row.get("id")?;
    let owner_text: String = row.get("user_id")?;
    let date_ms: i64 = row.get("date_ms")?;
    let date = DateTime::<Utc>::from_timestamp_millis(date_ms).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid date value `{date_ms}` in notes.date_ms"))
    })?;

    Ok(Note {
        id: parse_uuid(&id_text, "notes.id")?,
        owner: parse_uuid(&owner_text, "notes.user_id")?,
        date,
        text: row.get("text")?,
    })
}
