//! `roster` command-line front end.
//!
//! # Responsibility
//! - Parse arguments and load configuration.
//! - Open the configured slot storage and hand one service to the commands.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use roster_core::storage::open_db;
use roster_core::{
    init_logging, KeyValueStore, MemoryKeyValueStore, RecordService, RecordStore, RosterConfig,
    SqliteKeyValueStore,
};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "roster")]
#[command(about = "Employee roster manager", long_about = None)]
struct Cli {
    /// Path to a roster.toml configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database file (overrides configuration)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Keep records in memory only; nothing is persisted
    #[arg(long, global = true, conflicts_with = "db")]
    memory: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List records, optionally filtered by search text
    List {
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Add a new employee
    Add(NewEmployee),
    /// Edit the employee at a list position
    Edit {
        index: usize,
        #[command(flatten)]
        changes: EmployeeChanges,
    },
    /// Edit the employee with the given id
    EditId {
        id: String,
        #[command(flatten)]
        changes: EmployeeChanges,
    },
    /// Delete the employee at a list position
    Delete { index: usize },
    /// Delete the employee with the given id
    DeleteId { id: String },
    /// Delete every record
    Clear {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Add the sample employees that are not present yet
    Seed,
    /// Export all records as CSV
    Export {
        /// Target directory (defaults to configuration, then the working directory)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Print CSV to stdout instead of writing a file
        #[arg(long, conflicts_with = "out")]
        stdout: bool,
    },
}

#[derive(Args)]
struct NewEmployee {
    #[arg(long)]
    id: String,
    #[arg(long)]
    name: String,
    #[arg(long)]
    age: String,
    #[arg(long)]
    address: String,
}

#[derive(Args)]
struct EmployeeChanges {
    #[arg(long)]
    id: Option<String>,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    age: Option<String>,
    #[arg(long)]
    address: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = RosterConfig::load_or_default(cli.config.as_deref())?;

    if let Some(log_dir) = config.logging.dir.as_deref() {
        if let Err(err) = init_logging(&config.logging.level, log_dir) {
            eprintln!("warning: file logging disabled: {err}");
        }
    }

    let storage: Box<dyn KeyValueStore> = if cli.memory {
        Box::new(MemoryKeyValueStore::new())
    } else {
        let path = cli.db.clone().unwrap_or_else(|| config.db_path());
        let conn = open_db(&path)
            .with_context(|| format!("failed to open database `{}`", path.display()))?;
        Box::new(SqliteKeyValueStore::new(conn))
    };

    let store = RecordStore::open(storage, config.store_options());
    let mut service = RecordService::new(store).with_export_prefix(config.export.prefix.clone());

    match cli.command {
        Commands::List { search } => commands::list(&service, search.as_deref().unwrap_or("")),
        Commands::Add(employee) => commands::add(&mut service, employee.into()),
        Commands::Edit { index, changes } => commands::edit(&mut service, index, changes.into()),
        Commands::EditId { id, changes } => commands::edit_id(&mut service, &id, changes.into()),
        Commands::Delete { index } => commands::delete(&mut service, index),
        Commands::DeleteId { id } => commands::delete_id(&mut service, &id),
        Commands::Clear { yes } => commands::clear(&mut service, yes),
        Commands::Seed => commands::seed(&mut service),
        Commands::Export { out, stdout } => {
            let dir = out
                .or_else(|| config.export.dir.clone())
                .unwrap_or_else(|| PathBuf::from("."));
            commands::export(&service, &dir, stdout)
        }
    }
}

impl From<NewEmployee> for roster_core::EmployeeForm {
    fn from(value: NewEmployee) -> Self {
        Self {
            id: value.id,
            name: value.name,
            age: value.age,
            address: value.address,
        }
    }
}

impl From<EmployeeChanges> for commands::FieldChanges {
    fn from(value: EmployeeChanges) -> Self {
        Self {
            id: value.id,
            name: value.name,
            age: value.age,
            address: value.address,
        }
    }
}
