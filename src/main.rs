use clap::Parser;
use site::cli::{Cli, Commands};
use site::cli_handlers;
use site::config::Config;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    let mut config = match Config::resolve(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };
    if let Some(db) = cli.db {
        config.db.path = db;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Init => cli_handlers::handle_init(&config),
        Commands::Exec { sql } => cli_handlers::handle_exec(&config, &sql),
        Commands::Fetch { sql } => cli_handlers::handle_fetch(&config, &sql),
        Commands::Create { table, set } => cli_handlers::handle_create(&config, &table, &set),
        Commands::Read { table, id } => cli_handlers::handle_read(&config, &table, id),
        Commands::Update { table, id, set } => {
            cli_handlers::handle_update(&config, &table, id, &set)
        }
        Commands::Delete { table, id } => cli_handlers::handle_delete(&config, &table, id),
        Commands::Count { table } => cli_handlers::handle_count(&config, &table),
        Commands::Render { template, set } => cli_handlers::handle_render(&template, &set),
        Commands::Check => cli_handlers::handle_check(&config),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
