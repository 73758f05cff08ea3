//! this binary starts the phonebook directory service
//! to see the list of options, type: `phonebook-server --help`
//!
//! Every option can also be given through the environment: `PORT`, `PHONEBOOK_ENGINE`,
//! `PHONEBOOK_DB` and `PHONEBOOK_STATIC_DIR`. Options on the command line win.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::process::exit;

use clap::{crate_version, App, Arg, ArgMatches};
use phonebook::telemetry::subscriber_config;
use phonebook::{
    Config, ContactsEngine, ContactsServer, EngineKind, MemoryContactsEngine, PhonebookError,
    Result, SledContactsEngine,
};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    // set up a tracing subscriber to log to STDERR
    subscriber_config();

    let matches = App::new("phonebook-server")
        .version(crate_version!())
        .author("strohs <strohs1@gmail.com>")
        .about("a contact directory service")
        .arg(
            Arg::with_name("port")
                .long("port")
                .value_name("PORT")
                .help("sets the port the server listens on [default: 3001, env: PORT]"),
        )
        .arg(
            Arg::with_name("engine")
                .long("engine")
                .value_name("ENGINE_NAME")
                .possible_values(&["sled", "memory"])
                .help("sets the storage engine to use [default: sled, env: PHONEBOOK_ENGINE]"),
        )
        .arg(
            Arg::with_name("db")
                .long("db")
                .value_name("PATH")
                .help("sets the directory of the sled database [default: phonebook-db, env: PHONEBOOK_DB]"),
        )
        .arg(
            Arg::with_name("static-dir")
                .long("static-dir")
                .value_name("DIR")
                .help("serves a built front end from DIR [env: PHONEBOOK_STATIC_DIR]"),
        )
        .get_matches();

    let config = match Config::from_env().and_then(|config| apply_options(config, &matches)) {
        Ok(config) => config,
        Err(err) => {
            error!("{}", err);
            eprintln!("{}", err);
            exit(1);
        }
    };

    if let Err(e) = run(config).await {
        error!("{}", e);
        eprintln!("{}", e);
        exit(1);
    }
}

/// overrides the settings loaded from the environment with the ones given on the command line
fn apply_options(mut config: Config, matches: &ArgMatches) -> Result<Config> {
    if let Some(port) = matches.value_of("port") {
        config.port = port
            .parse()
            .map_err(|_| PhonebookError::Parsing(format!("could not parse {} into a port", port)))?;
    }
    if let Some(engine) = matches.value_of("engine") {
        config.engine = engine.parse()?;
    }
    if let Some(db) = matches.value_of("db") {
        config.db_path = PathBuf::from(db);
    }
    if let Some(dir) = matches.value_of("static-dir") {
        config.static_dir = Some(PathBuf::from(dir));
    }
    Ok(config)
}

async fn run(config: Config) -> Result<()> {
    info!("phonebook-server {}", env!("CARGO_PKG_VERSION"));
    info!("Storage engine: {}", config.engine);

    match config.engine {
        EngineKind::Sled => {
            info!("Database: {}", config.db_path.display());
            run_with_engine(SledContactsEngine::open(&config.db_path)?, &config).await
        }
        EngineKind::Memory => {
            warn!("contacts are kept in memory and will be lost on shutdown");
            run_with_engine(MemoryContactsEngine::new(), &config).await
        }
    }
}

async fn run_with_engine<E: ContactsEngine>(engine: E, config: &Config) -> Result<()> {
    let mut server = ContactsServer::new(engine);
    if let Some(dir) = &config.static_dir {
        info!("Serving static files from {}", dir.display());
        server = server.with_static_dir(dir);
    }
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.port));
    server.run(addr).await
}
