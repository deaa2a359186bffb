//! Note use-case service.
//!
//! # Responsibility
//! - Add, list and remove dated notes for a registered user.
//!
//! # Invariants
//! - Notes are created with the id of an existing user as owner.
//! - Listing covers one UTC calendar day, both ends inclusive.
//! - Only the owner may remove a note.

use crate::model::note::{Note, NoteId, NoteView};
use crate::repo::note_repo::NoteRepository;
use crate::repo::user_repo::UserRepository;
use crate::service::error::{AgendaError, AgendaResult};
use crate::service::validation::{validate_email, validate_string_field};
use crate::service::{log_outcome, require_user};
use chrono::{DateTime, NaiveTime, SubsecRound, Utc};

const MODULE: &str = "notes";

/// Note operations over injected user and note repositories.
pub struct NoteService<U: UserRepository, N: NoteRepository> {
    users: U,
    notes: N,
}

impl<U: UserRepository, N: NoteRepository> NoteService<U, N> {
    /// Creates a service using the provided repository implementations.
    pub fn new(users: U, notes: N) -> Self {
        Self { users, notes }
    }

    /// Adds a note dated `date` for the user registered under `email`.
    ///
    /// `date` is stored with millisecond precision.
    pub fn add_note(&self, email: &str, date: DateTime<Utc>, text: &str) -> AgendaResult<bool> {
        log_outcome("add_note", MODULE, self.try_add_note(email, date, text))
    }

    /// Lists the user's notes dated on the same UTC day as `date`.
    ///
    /// Results come back in insertion order and never include the owner
    /// reference.
    pub fn list_notes(&self, email: &str, date: DateTime<Utc>) -> AgendaResult<Vec<NoteView>> {
        log_outcome("list_notes", MODULE, self.try_list_notes(email, date))
    }

    /// Removes one of the user's notes.
    ///
    /// # Errors
    /// - `NotFound` when no user has this email.
    /// - `NoteNotFound` when `note_id` does not name a stored note.
    /// - `NotOwner` when the note belongs to another user.
    pub fn remove_note(&self, email: &str, note_id: &str) -> AgendaResult<bool> {
        log_outcome("remove_note", MODULE, self.try_remove_note(email, note_id))
    }

    fn try_add_note(&self, email: &str, date: DateTime<Utc>, text: &str) -> AgendaResult<bool> {
        validate_email(email)?;
        validate_string_field("text", text)?;

        let user = require_user(&self.users, email)?;
        let note = Note::new(user.id, date.trunc_subsecs(3), text);
        self.notes.create_note(&note)?;
        Ok(true)
    }

    fn try_list_notes(&self, email: &str, date: DateTime<Utc>) -> AgendaResult<Vec<NoteView>> {
        validate_email(email)?;

        let user = require_user(&self.users, email)?;
        let (from, to) = day_bounds(date)?;
        let notes = self.notes.list_notes_between(user.id, from, to)?;
        Ok(notes.into_iter().map(Note::into_view).collect())
    }

    fn try_remove_note(&self, email: &str, note_id: &str) -> AgendaResult<bool> {
        validate_email(email)?;

        let user = require_user(&self.users, email)?;
        let note = NoteId::parse_str(note_id)
            .ok()
            .map(|id| self.notes.find_note_by_id(id))
            .transpose()?
            .flatten()
            .ok_or_else(|| AgendaError::NoteNotFound {
                note_id: note_id.to_owned(),
            })?;

        if !note.belongs_to(&user) {
            return Err(AgendaError::NotOwner);
        }

        self.notes.delete_note(note.id)?;
        Ok(true)
    }
}

/// Returns the first and last millisecond of the UTC day containing `date`.
///
/// Both ends are built from the calendar day, so dates at the edges of the
/// representable range do not overflow.
pub fn day_bounds(date: DateTime<Utc>) -> AgendaResult<(DateTime<Utc>, DateTime<Utc>)> {
    let day = date.date_naive();
    let start = day.and_time(NaiveTime::MIN).and_utc();
    let end = day
        .and_hms_milli_opt(23, 59, 59, 999)
        .ok_or(AgendaError::InvalidField("date"))?
        .and_utc();
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::day_bounds;
    use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};

    #[test]
    fn day_bounds_cover_whole_utc_day() {
        let date = Utc.with_ymd_and_hms(2018, 8, 24, 13, 15, 0).unwrap();
        let (start, end) = day_bounds(date).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2018, 8, 24, 0, 0, 0).unwrap());
        assert_eq!(
            end,
            Utc.with_ymd_and_hms(2018, 8, 24, 23, 59, 59).unwrap() + Duration::milliseconds(999)
        );
    }

    #[test]
    fn day_bounds_are_stable_at_midnight() {
        let midnight = Utc.with_ymd_and_hms(2018, 8, 24, 0, 0, 0).unwrap();
        let (start, _) = day_bounds(midnight).unwrap();
        assert_eq!(start, midnight);
    }

    #[test]
    fn day_bounds_hold_at_the_edges_of_the_calendar() {
        let (start, end) = day_bounds(DateTime::<Utc>::MAX_UTC).unwrap();
        assert_eq!(start.date_naive(), DateTime::<Utc>::MAX_UTC.date_naive());
        assert_eq!(end.time(), NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap());
        assert!(end <= DateTime::<Utc>::MAX_UTC);

        let (start, _) = day_bounds(DateTime::<Utc>::MIN_UTC).unwrap();
        assert_eq!(start, DateTime::<Utc>::MIN_UTC);
    }
}
