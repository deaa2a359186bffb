//! Dated text memo owned by a user.

use crate::model::user::{User, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a note record.
pub type NoteId = Uuid;

/// Note record as stored in the `notes` collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: NoteId,
    /// Owner reference. Not enforced by the store.
    pub owner: UserId,
    /// Millisecond precision; finer components are dropped on write.
    pub date: DateTime<Utc>,
    pub text: String,
}

impl Note {
    /// Creates a note owned by `owner` with a generated id.
    pub fn new(owner: UserId, date: DateTime<Utc>, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner,
            date,
            text: text.into(),
        }
    }

    /// Returns whether this note was created by `user`.
    pub fn belongs_to(&self, user: &User) -> bool {
        self.owner == user.id
    }

    /// Shapes this note for callers, dropping the owner reference.
    pub fn into_view(self) -> NoteView {
        NoteView {
            id: self.id.to_string(),
            date: self.date,
            text: self.text,
        }
    }
}

/// Note as returned by `list_notes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteView {
    pub id: String,
    pub date: DateTime<Utc>,
    pub text: String,
}
