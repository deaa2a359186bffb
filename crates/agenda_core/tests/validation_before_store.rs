//! Invalid input must be rejected before any repository call.

use agenda_core::{
    AccountService, AgendaError, Contact, ContactService, Note, NoteId, NoteRepository,
    NoteService, RepoResult, User, UserId, UserRepository,
};
use chrono::{DateTime, TimeZone, Utc};

/// Repository that fails the test if any method is reached.
#[derive(Clone, Copy)]
struct UntouchableStore;

impl UserRepository for UntouchableStore {
    fn find_user_by_email(&self, _email: &str) -> RepoResult<Option<User>> {
        panic!("store touched: find_user_by_email")
    }

    fn create_user(&self, _user: &User) -> RepoResult<UserId> {
        panic!("store touched: create_user")
    }

    fn update_user(&self, _user: &User) -> RepoResult<i64> {
        panic!("store touched: update_user")
    }

    fn delete_user(&self, _id: UserId) -> RepoResult<()> {
        panic!("store touched: delete_user")
    }

    fn contacts_starting_with(&self, _id: UserId, _first_char: &str) -> RepoResult<Vec<Contact>> {
        panic!("store touched: contacts_starting_with")
    }
}

impl NoteRepository for UntouchableStore {
    fn create_note(&self, _note: &Note) -> RepoResult<NoteId> {
        panic!("store touched: create_note")
    }

    fn find_note_by_id(&self, _id: NoteId) -> RepoResult<Option<Note>> {
        panic!("store touched: find_note_by_id")
    }

    fn list_notes_between(
        &self,
        _owner: UserId,
        _from: DateTime<Utc>,
        _to: DateTime<Utc>,
    ) -> RepoResult<Vec<Note>> {
        panic!("store touched: list_notes_between")
    }

    fn delete_note(&self, _id: NoteId) -> RepoResult<()> {
        panic!("store touched: delete_note")
    }
}

const EMAIL: &str = "maider@mail.com";
const BAD_EMAILS: [&str; 4] = ["", "123", "maider", "maider@mail"];

fn assert_invalid(result: Result<impl std::fmt::Debug, AgendaError>, label: &str) {
    match result {
        Err(AgendaError::InvalidField(actual)) => assert_eq!(actual, label),
        other => panic!("expected invalid {label}, got {other:?}"),
    }
}

fn date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2018, 8, 24, 13, 15, 0).unwrap()
}

#[test]
fn account_operations_validate_before_lookup() {
    let accounts = AccountService::new(UntouchableStore);

    for bad in BAD_EMAILS {
        assert_invalid(accounts.register(bad, "pw"), "email");
        assert_invalid(accounts.authenticate(bad, "pw"), "email");
        assert_invalid(accounts.update_password(bad, "pw", "pw2"), "email");
        assert_invalid(accounts.unregister_user(bad, "pw"), "email");
    }

    assert_invalid(accounts.register(EMAIL, ""), "password");
    assert_invalid(accounts.authenticate(EMAIL, ""), "password");
    assert_invalid(accounts.update_password(EMAIL, "", "pw2"), "password");
    assert_invalid(accounts.update_password(EMAIL, "pw", ""), "new password");
    assert_invalid(accounts.unregister_user(EMAIL, ""), "password");
}

#[test]
fn same_password_is_rejected_before_lookup() {
    let accounts = AccountService::new(UntouchableStore);

    let err = accounts.update_password(EMAIL, "pw", "pw").unwrap_err();
    assert!(matches!(err, AgendaError::SamePassword));
}

#[test]
fn note_operations_validate_before_lookup() {
    let notes = NoteService::new(UntouchableStore, UntouchableStore);

    for bad in BAD_EMAILS {
        assert_invalid(notes.add_note(bad, date(), "text"), "email");
        assert_invalid(notes.list_notes(bad, date()), "email");
        assert_invalid(notes.remove_note(bad, "whatever"), "email");
    }

    assert_invalid(notes.add_note(EMAIL, date(), ""), "text");
}

#[test]
fn contact_operations_validate_before_lookup() {
    let contacts = ContactService::new(UntouchableStore);

    for bad in BAD_EMAILS {
        assert_invalid(
            contacts.add_contact(bad, "Maria", "Lopez", "1", "maria@mail.com"),
            "email",
        );
        assert_invalid(
            contacts.add_contact(EMAIL, "Maria", "Lopez", "1", bad),
            "email",
        );
        assert_invalid(contacts.list_contacts(bad, "M"), "email");
    }

    assert_invalid(
        contacts.add_contact(EMAIL, "", "Lopez", "1", "maria@mail.com"),
        "name",
    );
    assert_invalid(
        contacts.add_contact(EMAIL, "Maria", "", "1", "maria@mail.com"),
        "surname",
    );
    assert_invalid(contacts.list_contacts(EMAIL, ""), "startsWith filter");
}
