//! Command-line caller for the agenda core.
//!
//! # Responsibility
//! - Map one subcommand to one core operation.
//! - Load configuration, initialize logging and open the store first.
//! - Print results as JSON on stdout; failures go to stderr with a non-zero
//!   exit code.

use agenda_core::db::{open_db, open_db_in_memory, StoreError};
use agenda_core::{
    init_logging, parse_date_field, AccountService, AgendaConfig, ContactService, NoteService,
    SqliteNoteRepository, SqliteUserRepository,
};
use clap::{Parser, Subcommand};
use log::{info, warn};
use rusqlite::Connection;
use serde_json::{json, Value};
use std::error::Error;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "agenda", version, about = "Accounts, dated notes and contacts")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Register a new user.
    Register { email: String, password: String },
    /// Check a user's credentials.
    Authenticate { email: String, password: String },
    /// Replace a user's password.
    UpdatePassword {
        email: String,
        password: String,
        new_password: String,
    },
    /// Delete a user. Their notes are kept.
    Unregister { email: String, password: String },
    /// Add a note dated DATE (RFC 3339).
    AddNote {
        email: String,
        date: String,
        text: String,
    },
    /// List the notes of the UTC day containing DATE (RFC 3339).
    ListNotes { email: String, date: String },
    /// Remove one of the user's notes.
    RemoveNote { email: String, note_id: String },
    /// Append a contact to the user's address book.
    AddContact {
        email: String,
        name: String,
        surname: String,
        #[arg(long, default_value = "")]
        phone: String,
        contact_email: String,
    },
    /// List contacts whose name starts with STARTS_WITH.
    ListContacts { email: String, starts_with: String },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli.command) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<Value, Box<dyn Error>> {
    let config = AgendaConfig::from_env()?;
    init_logging(config.log_level, config.log_dir.as_deref())?;
    info!(
        "event=cli_start module=cli status=ok version={}",
        agenda_core::core_version()
    );

    let conn = open_store(&config)?;
    execute(&conn, command)
}

/// Opens the configured store file, or a throwaway in-memory store when
/// `AGENDA_DB_PATH` is unset.
fn open_store(config: &AgendaConfig) -> Result<Connection, StoreError> {
    match config.db_path.as_deref() {
        Some(path) => open_db(path),
        None => {
            warn!(
                "event=store_select module=cli status=fallback mode=memory reason=db_path_unset"
            );
            open_db_in_memory()
        }
    }
}

fn execute(conn: &Connection, command: Command) -> Result<Value, Box<dyn Error>> {
    let users = SqliteUserRepository::try_new(conn)?;

    let output = match command {
        Command::Register { email, password } => {
            json!(AccountService::new(users).register(&email, &password)?)
        }
        Command::Authenticate { email, password } => {
            json!(AccountService::new(users).authenticate(&email, &password)?)
        }
        Command::UpdatePassword {
            email,
            password,
            new_password,
        } => json!(AccountService::new(users).update_password(&email, &password, &new_password)?),
        Command::Unregister { email, password } => {
            json!(AccountService::new(users).unregister_user(&email, &password)?)
        }
        Command::AddNote { email, date, text } => {
            let date = parse_date_field("date", &date)?;
            let notes = SqliteNoteRepository::try_new(conn)?;
            json!(NoteService::new(users, notes).add_note(&email, date, &text)?)
        }
        Command::ListNotes { email, date } => {
            let date = parse_date_field("date", &date)?;
            let notes = SqliteNoteRepository::try_new(conn)?;
            serde_json::to_value(NoteService::new(users, notes).list_notes(&email, date)?)?
        }
        Command::RemoveNote { email, note_id } => {
            let notes = SqliteNoteRepository::try_new(conn)?;
            json!(NoteService::new(users, notes).remove_note(&email, &note_id)?)
        }
        Command::AddContact {
            email,
            name,
            surname,
            phone,
            contact_email,
        } => json!(ContactService::new(users).add_contact(
            &email,
            &name,
            &surname,
            &phone,
            &contact_email
        )?),
        Command::ListContacts { email, starts_with } => {
            serde_json::to_value(ContactService::new(users).list_contacts(&email, &starts_with)?)?
        }
    };

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::{execute, open_store, Cli, Command};
    use agenda_core::db::open_db_in_memory;
    use agenda_core::AgendaConfig;
    use clap::Parser;
    use serde_json::json;

    fn command(args: &[&str]) -> Command {
        let mut argv = vec!["agenda"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap().command
    }

    #[test]
    fn parses_kebab_case_subcommands() {
        assert!(matches!(
            command(&["update-password", "a@mail.com", "pw1", "pw2"]),
            Command::UpdatePassword { .. }
        ));
        assert!(matches!(
            command(&["add-contact", "a@mail.com", "Maria", "Lopez", "m@mail.com"]),
            Command::AddContact { ref phone, .. } if phone.is_empty()
        ));
    }

    #[test]
    fn runs_notes_flow_against_one_store() {
        let conn = open_db_in_memory().unwrap();

        let registered = execute(&conn, command(&["register", "a@mail.com", "pw1"])).unwrap();
        assert_eq!(registered, json!(true));

        execute(
            &conn,
            command(&["add-note", "a@mail.com", "2018-08-24T13:15:00Z", "pizza"]),
        )
        .unwrap();
        let listed = execute(
            &conn,
            command(&["list-notes", "a@mail.com", "2018-08-24T20:00:00Z"]),
        )
        .unwrap();

        assert_eq!(listed.as_array().unwrap().len(), 1);
        assert_eq!(listed[0]["text"], "pizza");
        assert!(listed[0].get("owner").is_none());
    }

    #[test]
    fn reports_invalid_date_argument() {
        let conn = open_db_in_memory().unwrap();
        execute(&conn, command(&["register", "a@mail.com", "pw1"])).unwrap();

        let err = execute(&conn, command(&["add-note", "a@mail.com", "123", "pizza"])).unwrap_err();
        assert_eq!(err.to_string(), "invalid date");
    }

    #[test]
    fn configured_store_file_persists_across_invocations() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agenda.sqlite3");
        let config = AgendaConfig::from_iter([(
            "AGENDA_DB_PATH".to_string(),
            path.display().to_string(),
        )])
        .unwrap();

        let first = open_store(&config).unwrap();
        execute(&first, command(&["register", "a@mail.com", "pw1"])).unwrap();
        drop(first);

        let second = open_store(&config).unwrap();
        let authenticated =
            execute(&second, command(&["authenticate", "a@mail.com", "pw1"])).unwrap();
        assert_eq!(authenticated, json!(true));
    }

    #[test]
    fn unset_store_path_falls_back_to_empty_memory_store() {
        let config = AgendaConfig::from_iter(Vec::new()).unwrap();

        let first = open_store(&config).unwrap();
        execute(&first, command(&["register", "a@mail.com", "pw1"])).unwrap();

        let second = open_store(&config).unwrap();
        let err = execute(&second, command(&["authenticate", "a@mail.com", "pw1"])).unwrap_err();
        assert_eq!(err.to_string(), "user with a@mail.com email does not exist");
    }

    #[test]
    fn reports_business_errors_by_message() {
        let conn = open_db_in_memory().unwrap();
        execute(&conn, command(&["register", "a@mail.com", "pw1"])).unwrap();

        let err = execute(&conn, command(&["authenticate", "a@mail.com", "pw2"])).unwrap_err();
        assert_eq!(err.to_string(), "wrong password");
    }
}
