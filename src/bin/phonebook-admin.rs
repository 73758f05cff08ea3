//! Direct maintenance of a sled phonebook database, without going through the service.
//!
//! `phonebook-admin <DB_PATH>`
//!
//!     Print every record in the database.
//!
//! `phonebook-admin <DB_PATH> <NAME> <NUMBER>`
//!
//!     Validate and add a record.
//!
//! sled locks its database, so the server must not be running on the same DB_PATH.

use std::path::Path;
use std::process::exit;

use clap::{crate_version, App, Arg};
use phonebook::telemetry::subscriber_config;
use phonebook::{ContactPayload, ContactsEngine, Result, SledContactsEngine};

fn main() {
    subscriber_config();

    let matches = App::new("phonebook-admin")
        .version(crate_version!())
        .author("strohs <strohs1@gmail.com>")
        .about("list or add records of a phonebook database")
        .arg(
            Arg::with_name("DB_PATH")
                .required(true)
                .index(1)
                .help("directory of the sled database"),
        )
        .arg(Arg::with_name("NAME").index(2).requires("NUMBER"))
        .arg(Arg::with_name("NUMBER").index(3))
        .get_matches();

    let db_path = Path::new(matches.value_of("DB_PATH").unwrap_or_default());
    let result = match (matches.value_of("NAME"), matches.value_of("NUMBER")) {
        (Some(name), Some(number)) => add_record(db_path, name, number),
        _ => display_phonebook(db_path),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        exit(1);
    }
}

/// prints the name and number of every record
fn display_phonebook(db_path: &Path) -> Result<()> {
    let engine = SledContactsEngine::open(db_path)?;
    let contacts = engine.list()?;
    if contacts.is_empty() {
        println!("Found 0 records in the phonebook");
        return Ok(());
    }
    for contact in contacts {
        println!("{} {}", contact.name, contact.number);
    }
    Ok(())
}

/// applies the same checks as the service before storing the record
fn add_record(db_path: &Path, name: &str, number: &str) -> Result<()> {
    let fields = ContactPayload::new(name, number).require_fields()?;
    let engine = SledContactsEngine::open(db_path)?;
    let contact = engine.add(fields)?;
    engine.flush()?;
    println!(
        "added {} number {} to phonebook",
        contact.name, contact.number
    );
    Ok(())
}
