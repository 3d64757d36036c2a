use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "site")]
#[command(about = "SQLite data store and page renderer")]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to ./site.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file, overrides [db] path from the config
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the page table and seed it
    Init,

    /// Run a statement and print the affected row count
    Exec {
        sql: String,
    },

    /// Run a query and print the rows as JSON
    Fetch {
        sql: String,
    },

    /// Insert a row and print its id
    Create {
        table: String,
        /// Column value as key=value (repeatable)
        #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_assignment)]
        set: Vec<(String, String)>,
    },

    /// Print a row as JSON
    Read {
        table: String,
        id: i64,
    },

    /// Update columns of a row
    Update {
        table: String,
        id: i64,
        /// Column value as key=value (repeatable)
        #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_assignment)]
        set: Vec<(String, String)>,
    },

    /// Delete a row
    Delete {
        table: String,
        id: i64,
    },

    /// Count rows in a table
    Count {
        table: String,
    },

    /// Render a template file
    Render {
        template: PathBuf,
        /// Placeholder value as key=value (repeatable)
        #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_assignment)]
        set: Vec<(String, String)>,
    },

    /// Run the smoke checks against the database
    Check,
}

/// Split `key=value` on the first `=`
pub fn parse_assignment(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, _)) if key.is_empty() => Err(format!("empty key in `{s}`")),
        Some((key, value)) => Ok((key.to_string(), value.to_string())),
        None => Err(format!("expected KEY=VALUE, got `{s}`")),
    }
}
