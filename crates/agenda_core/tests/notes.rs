use agenda_core::db::open_db_in_memory;
use agenda_core::{
    AccountService, AgendaError, NoteRepository, NoteService, NoteView, SqliteNoteRepository,
    SqliteUserRepository, UserRepository,
};
use chrono::{DateTime, Duration, SubsecRound, TimeZone, Utc};
use rusqlite::Connection;

const EMAIL: &str = "maider@mail.com";
const OTHER: &str = "jordi@mail.com";
const PASSWORD: &str = "123-secret";

type Notes<'conn> = NoteService<SqliteUserRepository<'conn>, SqliteNoteRepository<'conn>>;

fn notes(conn: &Connection) -> Notes<'_> {
    NoteService::new(
        SqliteUserRepository::try_new(conn).unwrap(),
        SqliteNoteRepository::try_new(conn).unwrap(),
    )
}

fn register(conn: &Connection, email: &str) {
    AccountService::new(SqliteUserRepository::try_new(conn).unwrap())
        .register(email, PASSWORD)
        .unwrap();
}

fn at(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .unwrap()
        .with_timezone(&Utc)
}

fn texts(items: &[NoteView]) -> Vec<&str> {
    items.iter().map(|note| note.text.as_str()).collect()
}

#[test]
fn add_note_then_list_same_day_returns_it() {
    let conn = open_db_in_memory().unwrap();
    register(&conn, EMAIL);
    let service = notes(&conn);
    let date = at("2018-08-24T13:15:00.474Z");

    assert!(service.add_note(EMAIL, date, "my note").unwrap());

    let listed = service.list_notes(EMAIL, date).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].text, "my note");
    assert_eq!(listed[0].date, date);
    assert!(!listed[0].id.is_empty());

    let day_before = service.list_notes(EMAIL, date - Duration::days(1)).unwrap();
    assert!(day_before.is_empty());
}

#[test]
fn list_notes_filters_by_day_and_keeps_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    register(&conn, EMAIL);
    let service = notes(&conn);

    for (date, text) in [
        ("2018-08-20T12:10:15.474Z", "text 1"),
        ("2018-08-23T13:00:00.000Z", "cumple jordi"),
        ("2018-08-24T13:21:00.000Z", "party hard"),
        ("2018-08-24T13:15:00.000Z", "pizza"),
        ("2018-08-24T23:59:59.999Z", "last minute"),
        ("2018-08-25T00:00:00.000Z", "next day"),
        ("2018-08-24T00:00:00.000Z", "first minute"),
    ] {
        service.add_note(EMAIL, at(date), text).unwrap();
    }

    let listed = service.list_notes(EMAIL, at("2018-08-24T08:00:00Z")).unwrap();
    assert_eq!(
        texts(&listed),
        vec!["party hard", "pizza", "last minute", "first minute"]
    );
}

#[test]
fn list_notes_only_returns_notes_of_the_user() {
    let conn = open_db_in_memory().unwrap();
    register(&conn, EMAIL);
    register(&conn, OTHER);
    let service = notes(&conn);
    let date = at("2018-08-24T13:15:00Z");

    service.add_note(EMAIL, date, "mine").unwrap();
    service.add_note(OTHER, date, "theirs").unwrap();

    assert_eq!(texts(&service.list_notes(EMAIL, date).unwrap()), vec!["mine"]);
    assert_eq!(texts(&service.list_notes(OTHER, date).unwrap()), vec!["theirs"]);
}

#[test]
fn note_view_serializes_without_owner_reference() {
    let conn = open_db_in_memory().unwrap();
    register(&conn, EMAIL);
    let service = notes(&conn);
    let date = Utc.with_ymd_and_hms(2018, 8, 24, 13, 15, 0).unwrap();
    service.add_note(EMAIL, date, "shaped").unwrap();

    let listed = service.list_notes(EMAIL, date).unwrap();
    let json = serde_json::to_value(&listed[0]).unwrap();
    let object = json.as_object().unwrap();

    let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["date", "id", "text"]);
    assert_eq!(json["text"], "shaped");
}

#[test]
fn add_note_truncates_date_to_milliseconds() {
    let conn = open_db_in_memory().unwrap();
    register(&conn, EMAIL);
    let service = notes(&conn);
    let precise = at("2018-08-24T13:15:00.123456789Z");

    service.add_note(EMAIL, precise, "precise").unwrap();

    let listed = service.list_notes(EMAIL, precise).unwrap();
    assert_eq!(listed[0].date, at("2018-08-24T13:15:00.123Z"));
}

#[test]
fn note_operations_require_registered_user() {
    let conn = open_db_in_memory().unwrap();
    let service = notes(&conn);
    let date = at("2018-08-24T13:15:00Z");

    let add = service.add_note(EMAIL, date, "text").unwrap_err();
    assert!(matches!(add, AgendaError::NotFound { .. }));

    let list = service.list_notes(EMAIL, date).unwrap_err();
    assert!(matches!(list, AgendaError::NotFound { .. }));

    let remove = service
        .remove_note(EMAIL, "00000000-0000-4000-8000-000000000001")
        .unwrap_err();
    assert!(matches!(remove, AgendaError::NotFound { .. }));
}

#[test]
fn add_note_rejects_empty_text() {
    let conn = open_db_in_memory().unwrap();
    register(&conn, EMAIL);
    let service = notes(&conn);

    let err = service
        .add_note(EMAIL, at("2018-08-24T13:15:00Z"), "")
        .unwrap_err();
    assert_eq!(err.to_string(), "invalid text");
}

#[test]
fn remove_note_deletes_own_note() {
    let conn = open_db_in_memory().unwrap();
    register(&conn, EMAIL);
    let service = notes(&conn);
    let date = at("2018-08-24T13:15:00Z");
    service.add_note(EMAIL, date, "pizza").unwrap();
    service.add_note(EMAIL, date, "la china").unwrap();

    let listed = service.list_notes(EMAIL, date).unwrap();
    assert!(service.remove_note(EMAIL, &listed[0].id).unwrap());

    let remaining = service.list_notes(EMAIL, date).unwrap();
    assert_eq!(texts(&remaining), vec!["la china"]);

    let repo = SqliteNoteRepository::try_new(&conn).unwrap();
    let removed_id = listed[0].id.parse().unwrap();
    assert!(repo.find_note_by_id(removed_id).unwrap().is_none());
}

#[test]
fn remove_note_of_another_user_fails_with_not_owner() {
    let conn = open_db_in_memory().unwrap();
    register(&conn, EMAIL);
    register(&conn, OTHER);
    let service = notes(&conn);
    let date = at("2018-08-24T13:15:00Z");
    service.add_note(OTHER, date, "theirs").unwrap();
    let theirs = service.list_notes(OTHER, date).unwrap();

    let err = service.remove_note(EMAIL, &theirs[0].id).unwrap_err();
    assert!(matches!(err, AgendaError::NotOwner));
    assert_eq!(err.to_string(), "note does not belong to user");

    assert_eq!(service.list_notes(OTHER, date).unwrap().len(), 1);
}

#[test]
fn remove_note_with_unknown_id_fails_with_note_not_found() {
    let conn = open_db_in_memory().unwrap();
    register(&conn, EMAIL);
    let service = notes(&conn);

    let unknown = "00000000-0000-4000-8000-000000000001";
    let err = service.remove_note(EMAIL, unknown).unwrap_err();
    assert!(matches!(err, AgendaError::NoteNotFound { ref note_id } if note_id == unknown));
    assert_eq!(err.to_string(), format!("note with id {unknown} does not exist"));

    let malformed = service.remove_note(EMAIL, "not-an-id").unwrap_err();
    assert!(matches!(malformed, AgendaError::NoteNotFound { .. }));
}

#[test]
fn notes_keep_owner_reference_in_store() {
    let conn = open_db_in_memory().unwrap();
    register(&conn, EMAIL);
    let service = notes(&conn);
    let date = at("2018-08-24T13:15:00Z");
    service.add_note(EMAIL, date, "owned").unwrap();

    let user = SqliteUserRepository::try_new(&conn)
        .unwrap()
        .find_user_by_email(EMAIL)
        .unwrap()
        .unwrap();
    let listed = service.list_notes(EMAIL, date).unwrap();
    let stored = SqliteNoteRepository::try_new(&conn)
        .unwrap()
        .find_note_by_id(listed[0].id.parse().unwrap())
        .unwrap()
        .unwrap();
    assert!(stored.belongs_to(&user));
}

#[test]
fn list_notes_accepts_dates_at_the_edges_of_the_calendar() {
    let conn = open_db_in_memory().unwrap();
    register(&conn, EMAIL);
    let service = notes(&conn);

    assert!(service.list_notes(EMAIL, DateTime::<Utc>::MAX_UTC).unwrap().is_empty());
    assert!(service.list_notes(EMAIL, DateTime::<Utc>::MIN_UTC).unwrap().is_empty());

    service
        .add_note(EMAIL, DateTime::<Utc>::MAX_UTC, "last day")
        .unwrap();
    let listed = service.list_notes(EMAIL, DateTime::<Utc>::MAX_UTC).unwrap();
    assert_eq!(texts(&listed), ["last day"]);
    assert_eq!(listed[0].date, DateTime::<Utc>::MAX_UTC.trunc_subsecs(3));
}
