pub mod commands;
pub mod output;
pub mod prompt;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{debug, level_filters::LevelFilter};

use crate::{
    storage::document::JsonFileStore,
    tracker::PomTracker,
    utils::{
        clock::DefaultClock,
        dir::{create_application_default_path, default_document_path},
        hours::Hours,
        logging::{enable_logging, CLI_PREFIX},
    },
};

#[derive(Parser, Debug)]
#[command(name = "metodo", version, long_about = None)]
#[command(about = "Metodo: a command line pomodoro application", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(short, long, global = true, help = "Include archived poms")]
    all: bool,
    #[arg(
        long,
        global = true,
        env = "METODO_FILE",
        help = "Pom document. By default it's saved into $XDG_STATE_HOME/metodo or $HOME/.local/state/metodo"
    )]
    file: Option<PathBuf>,
    #[arg(long, global = true, help = "Print logs into the console")]
    log: bool,
    #[arg(long = "log-filter", global = true, help = "Log level, for example debug or trace")]
    log_filter: Option<LevelFilter>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(alias = "a", about = "Add a pom")]
    Add {
        #[arg(long, help = "Title of the pom. Asked interactively when omitted")]
        title: Option<String>,
        #[arg(long, help = "Estimate in hours, for example 1.5. Asked interactively when omitted")]
        estimate: Option<Hours>,
    },
    #[command(alias = "s", about = "Start a pom")]
    Start {
        #[arg(long, help = "Notes to attach. Asked interactively when omitted")]
        notes: Option<String>,
    },
    #[command(alias = "/", about = "Stop a pom")]
    Finish {
        #[arg(long, help = "Hours actually spent. Measured from the start time when left empty")]
        actual: Option<Hours>,
        #[arg(long, help = "Notes to attach. Asked interactively when omitted")]
        notes: Option<String>,
    },
    #[command(alias = "D", about = "Delete a pom")]
    Delete {
        #[arg(short, long, help = "Don't ask for confirmation")]
        yes: bool,
    },
    #[command(alias = "i", about = "Get info about a pom")]
    Info,
    #[command(alias = "l", about = "List all active poms")]
    List,
    #[command(alias = "/day", about = "Finish a day")]
    Archive,
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let logging_level = if args.log {
        Some(args.log_filter.unwrap_or(LevelFilter::TRACE))
    } else {
        args.log_filter
    };
    enable_logging(
        CLI_PREFIX,
        &create_application_default_path()?,
        logging_level,
        args.log,
    )?;

    let path = args.file.map_or_else(default_document_path, Ok)?;
    let storage = JsonFileStore::new(path)?;
    debug!("Using document {:?}", storage.path());
    let mut tracker = PomTracker::open(storage, Box::new(DefaultClock)).await?;

    match args.commands {
        Commands::Add { title, estimate } => commands::add(&mut tracker, title, estimate).await,
        Commands::Start { notes } => commands::start(&mut tracker, notes).await,
        Commands::Finish { actual, notes } => commands::finish(&mut tracker, actual, notes).await,
        Commands::Delete { yes } => commands::delete(&mut tracker, yes).await,
        Commands::Info => commands::info(&tracker, args.all).await,
        Commands::List => {
            commands::list(&tracker, args.all);
            Ok(())
        }
        Commands::Archive => commands::archive(&mut tracker).await,
    }
}
