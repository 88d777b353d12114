//! An interactive terminal front end to administrate events.
//!
//! Set `EVENTS_ADMIN_URL` and `EVENTS_ADMIN_KEY` to target a backend, or `EVENTS_ADMIN_STORE` to use a local JSON file instead.
//! Set `RUST_LOG` to display more info.

use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

use events_admin::client::Client;
use events_admin::config;
use events_admin::page::EventsPage;
use events_admin::resource::Resource;
use events_admin::store::LocalStore;
use events_admin::traits::EventSource;
use events_admin::{EventId, FieldChange};


/// A line typed by the user. The first word is the command
#[derive(Debug, Parser)]
#[command(multicall = true)]
struct Line {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the events
    List,
    /// Fetch the events again
    Refresh,
    /// Edit a row
    Edit { id: EventId },
    /// Change a field of the row being edited
    Set {
        field: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Save the row being edited
    Save,
    /// Stop editing without saving
    Cancel,
    /// Delete a row
    Delete { id: EventId },
    /// Change a field of the "new event" form
    New {
        field: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Create an event from the form
    Add,
    /// Wait for the pending changes to complete
    Wait,
    /// Exit
    #[command(alias = "exit")]
    Quit,
}


#[tokio::main]
async fn main() {
    env_logger::init();

    let source = match open_source() {
        Ok(source) => source,
        Err(err) => {
            eprintln!("{}", err);
            eprintln!("Set {} and {}, or {}", config::ENV_URL, config::ENV_KEY, config::ENV_STORE);
            std::process::exit(1);
        }
    };

    let mut page = EventsPage::new(source);
    page.mount().await;
    events_admin::utils::print_view(&page.view().render());
    println!("Type 'help' for the list of commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                log::error!("Unable to read the input: {}", err);
                break;
            }
        };

        match run_command(&mut page, &line).await {
            Ok(true) => {},
            Ok(false) => break,
            Err(err) => println!("{}", err),
        }
    }

    if page.in_flight() > 0 {
        println!("Waiting for {} pending changes...", page.in_flight());
        for settlement in page.settle_pending().await {
            println!("{}", settlement);
        }
    }
}

fn open_source() -> Result<Arc<dyn EventSource>, Box<dyn Error + Send + Sync>> {
    if let Ok(table) = std::env::var(config::ENV_TABLE) {
        config::set_table_name(table);
    }

    if let Ok(path) = std::env::var(config::ENV_STORE) {
        let path = Path::new(&path);
        let store = match LocalStore::from_file(path) {
            Ok(store) => store,
            Err(err) => {
                log::warn!("Invalid store file: {}. Using an empty store", err);
                LocalStore::new(path)
            }
        };
        return Ok(Arc::new(store));
    }

    let resource = Resource::from_env()?;
    log::info!("Using backend {:?}", resource);
    Ok(Arc::new(Client::from_resource(resource)))
}

/// Run a line typed by the user. Returns `Ok(false)` when the user wants to quit
async fn run_command(page: &mut EventsPage<dyn EventSource>, line: &str) -> Result<bool, Box<dyn Error + Send + Sync>> {
    for settlement in page.poll_settled().await {
        println!("{}", settlement);
    }

    let words: Vec<&str> = line.split_whitespace().collect();
    if words.is_empty() {
        return Ok(true);
    }

    let command = match Line::try_parse_from(words) {
        Ok(line) => line.command,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand | ErrorKind::DisplayVersion => {
                println!("{}", err.render());
                return Ok(true);
            },
            _ => return Err(err.render().to_string().into()),
        },
    };

    match command {
        Command::Quit => return Ok(false),
        Command::List => {},
        Command::Refresh => { page.refresh().await; },
        Command::Edit { id } => page.edit(&id)?,
        Command::Set { field, value } => {
            if page.change(FieldChange::parse(&field, &value.join(" "))?) == false {
                return Err("No row is being edited".into());
            }
        },
        Command::Save => match page.save() {
            None => return Err("No row is being edited".into()),
            Some(id) => println!("Saving ({})", id),
        },
        Command::Cancel => page.cancel(),
        Command::Delete { id } => {
            let id = page.delete(&id)?;
            println!("Deleting ({})", id);
        },
        Command::New { field, value } => page.change_new(FieldChange::parse(&field, &value.join(" "))?),
        Command::Add => {
            let id = page.create();
            println!("Adding ({})", id);
        },
        Command::Wait => {
            for settlement in page.settle_pending().await {
                println!("{}", settlement);
            }
        },
    }

    if let Some(err) = page.last_error() {
        println!("Last change failed: {}", err);
    }
    if let Some(err) = page.view().refresh_error() {
        println!("Showing outdated events: {}", err);
    }
    events_admin::utils::print_view(&page.view().render());
    Ok(true)
}
