//! RAX DICT Client - Entry Point
//!
//! Command-line front end for querying DICT (RFC 2229) servers.

use clap::{Parser, Subcommand};
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;

use rax_dict_client::config::{ClientConfig, database_named};
use rax_dict_client::error::handlers::{error_to_exit_code, handle_error};
use rax_dict_client::{Connection, MatchingStrategy, Result, ServerAddress};

#[derive(Debug, Parser)]
#[command(name = "rax-dict", version, about = "Query DICT protocol dictionary servers")]
struct Cli {
    /// Server as host[:port], overriding the configuration
    #[arg(short, long)]
    server: Option<ServerAddress>,

    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Action,
}

#[derive(Debug, Subcommand)]
enum Action {
    /// List the databases offered by the server
    Databases,
    /// List the matching strategies offered by the server
    Strategies,
    /// Show information about a database
    Info { database: String },
    /// Look up the definitions of a word
    Define {
        word: String,
        #[arg(short, long)]
        database: Option<String>,
    },
    /// List words matching a pattern
    Match {
        word: String,
        #[arg(short, long)]
        strategy: Option<String>,
        #[arg(short, long)]
        database: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize the logger (env_logger picks up RUST_LOG environment variable)
    env_logger::init();

    let cli = Cli::parse();

    let config = match ClientConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            eprintln!("rax-dict: invalid configuration: {e}");
            return ExitCode::from(78);
        }
    };
    let address = cli.server.unwrap_or_else(|| config.server_address());

    info!("Launching DICT client against {}...", address);

    let connection = match Connection::connect_to(&address).await {
        Ok(connection) => connection,
        Err(e) => return fail(&e),
    };

    let outcome = run(&connection, &config, cli.command).await;
    connection.close().await;

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(&e),
    }
}

async fn run(connection: &Connection, config: &ClientConfig, action: Action) -> Result<()> {
    match action {
        Action::Databases => {
            for db in &connection.get_database_list().await? {
                println!("{:<12} {}", db.name(), db.description());
            }
        }
        Action::Strategies => {
            for strategy in &connection.get_strategy_list().await? {
                println!("{:<12} {}", strategy.name(), strategy.description());
            }
        }
        Action::Info { database } => {
            println!("{}", connection.get_database_info(&database_named(&database)).await?);
        }
        Action::Define { word, database } => {
            let database = database
                .as_deref()
                .map(database_named)
                .unwrap_or_else(|| config.default_database());
            let definitions = connection.get_definitions(&word, &database).await?;
            if definitions.is_empty() {
                println!("No definitions found for \"{word}\"");
            }
            for definition in definitions {
                println!("From [{}]:\n{}\n", definition.database(), definition.text());
            }
        }
        Action::Match {
            word,
            strategy,
            database,
        } => {
            let strategy = strategy
                .map(|name| MatchingStrategy::new(name.clone(), name))
                .unwrap_or_else(|| config.default_strategy());
            let database = database
                .as_deref()
                .map(database_named)
                .unwrap_or_else(|| config.default_database());
            for matched in &connection.get_match_list(&word, &strategy, &database).await? {
                println!("{matched}");
            }
        }
    }
    Ok(())
}

fn fail(err: &rax_dict_client::DictError) -> ExitCode {
    handle_error(err);
    eprintln!("rax-dict: {err}");
    ExitCode::from(error_to_exit_code(err))
}
