//! The phonebook executable drives a [`DirectoryClient`] from the command line:
//!
//! `phonebook list [SEARCH] [--addr URL]`
//!
//!     Print every contact whose name contains SEARCH (case-insensitive), or all of them.
//!
//! `phonebook add <NAME> <NUMBER> [--yes] [--addr URL]`
//!
//!     Add a contact. If NAME is already in the phonebook, asks whether its number should be
//!     replaced (--yes answers for you).
//!
//! `phonebook rm <ID> [--yes] [--addr URL]`
//!
//!     Delete the contact with the given id, after confirmation.
//!
//! `phonebook info [--addr URL]`
//!
//!     Print the service's info page.
//!
//! --addr is the base URL of the service and defaults to http://localhost:3001.
//! Any notice raised by the operation is printed to stderr, and an error notice makes the exit
//! code non-zero.

use std::io::{self, BufRead, Write};
use std::process::exit;

use clap::{crate_version, App, Arg, ArgMatches, SubCommand};
use phonebook::client::DEFAULT_BASE_URL;
use phonebook::telemetry::subscriber_config;
use phonebook::{
    AddOutcome, ContactId, DeleteOutcome, DirectoryClient, HttpContactsApi, NoticeKind,
    PhonebookError, Result,
};
use tracing::debug;

/// ['Opt'] holds parsed and validated options from the command line
#[derive(Debug)]
struct Opt {
    /// the service's base URL
    addr: String,
    /// answer yes to every confirmation
    assume_yes: bool,
    cmd: Cmd,
}

#[derive(Debug)]
enum Cmd {
    List { search: String },
    Add { name: String, number: String },
    Remove { id: ContactId },
    Info,
}

#[tokio::main]
async fn main() {
    // configure a subscriber that will log messages to STDERR
    subscriber_config();

    let yes = Arg::with_name("yes")
        .long("yes")
        .short("y")
        .help("answers yes to every confirmation");

    let matches = App::new("phonebook")
        .version(crate_version!())
        .author("strohs <strohs1@gmail.com>")
        .about("list, search, add and delete phonebook contacts")
        .subcommands(vec![
            SubCommand::with_name("list")
                .about("Print the contacts whose name contains SEARCH")
                .arg(Arg::with_name("SEARCH").index(1)),
            SubCommand::with_name("add")
                .about("Add a contact, or replace the number of an existing one")
                .arg(Arg::with_name("NAME").required(true).index(1))
                .arg(Arg::with_name("NUMBER").required(true).index(2))
                .arg(yes.clone()),
            SubCommand::with_name("rm")
                .about("Delete the contact with the given id")
                .arg(Arg::with_name("ID").required(true).index(1))
                .arg(yes),
            SubCommand::with_name("info").about("Print the service's info page"),
        ])
        .arg(
            Arg::with_name("addr")
                .long("addr")
                .value_name("URL")
                .help("sets the base URL of the phonebook service")
                .default_value(DEFAULT_BASE_URL),
        )
        .get_matches();

    let code = match parse_options(&matches) {
        Ok(opt) => match run(opt).await {
            Ok(code) => code,
            Err(e) => {
                eprintln!("{}", e);
                1
            }
        },
        Err(e) => {
            eprintln!("{}", e);
            2
        }
    };
    exit(code);
}

/// parses the matches from the command line into an [`Opt`] struct
fn parse_options(matches: &ArgMatches) -> Result<Opt> {
    let addr = matches
        .value_of("addr")
        .unwrap_or(DEFAULT_BASE_URL)
        .to_string();
    let (cmd, assume_yes) = match matches.subcommand() {
        ("list", Some(args)) => (
            Cmd::List {
                search: args.value_of("SEARCH").unwrap_or_default().to_string(),
            },
            false,
        ),
        ("add", Some(args)) => (
            Cmd::Add {
                name: required(args, "NAME")?,
                number: required(args, "NUMBER")?,
            },
            args.is_present("yes"),
        ),
        ("rm", Some(args)) => (
            Cmd::Remove {
                id: required(args, "ID")?.parse()?,
            },
            args.is_present("yes"),
        ),
        ("info", Some(_)) => (Cmd::Info, false),
        _ => {
            return Err(PhonebookError::Parsing(
                "a command is required, see `phonebook --help`".to_string(),
            ))
        }
    };
    Ok(Opt {
        addr,
        assume_yes,
        cmd,
    })
}

fn required(args: &ArgMatches, name: &str) -> Result<String> {
    args.value_of(name)
        .map(String::from)
        .ok_or_else(|| PhonebookError::Parsing(format!("missing {}", name)))
}

/// runs the requested command, returning the process exit code
async fn run(opt: Opt) -> Result<i32> {
    let api = HttpContactsApi::new(opt.addr)?;
    debug!("phonebook service at {}", api.base_url());

    if let Cmd::Info = opt.cmd {
        println!("{}", api.info().await?);
        return Ok(0);
    }

    let assume_yes = opt.assume_yes;
    let mut client = DirectoryClient::new(api, move |question: &str| {
        assume_yes || ask(question)
    });
    client.load().await?;

    match opt.cmd {
        Cmd::List { search } => {
            client.set_search(search);
            for contact in client.visible() {
                println!("{}  {} {}", contact.id, contact.name, contact.number);
            }
        }
        Cmd::Add { name, number } => {
            client.set_new_name(name);
            client.set_new_number(number);
            match client.submit().await {
                AddOutcome::Created(contact) | AddOutcome::Updated(contact) => {
                    println!("{}  {} {}", contact.id, contact.name, contact.number)
                }
                AddOutcome::Declined => println!("nothing changed"),
                AddOutcome::Failed(_) => {}
            }
        }
        Cmd::Remove { id } => match client.delete(id).await {
            DeleteOutcome::Deleted(contact) => println!("deleted {}", contact.name),
            DeleteOutcome::Declined => println!("nothing changed"),
            DeleteOutcome::Unknown => {
                eprintln!("no contact with id {}", id);
                return Ok(1);
            }
            DeleteOutcome::AlreadyGone(..) => {}
        },
        Cmd::Info => {}
    }

    match client.notice() {
        Some(notice) => {
            eprintln!("{}", notice);
            Ok(if notice.kind == NoticeKind::Error { 1 } else { 0 })
        }
        None => Ok(0),
    }
}

/// asks `question` on stdout and reads a y/n answer from stdin
fn ask(question: &str) -> bool {
    print!("{} [y/N] ", question);
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}
