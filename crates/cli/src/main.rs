//! History examiner CLI — the main entry point.
//!
//! Commands:
//! - `serve`    — Start the HTTP gateway
//! - `ask`      — Answer one question in the terminal
//! - `context`  — Show the context block a question would receive
//! - `import`   — Merge past-paper mark schemes into the knowledge file
//! - `status`   — Show providers, models and knowledge statistics

use clap::{Parser, Subcommand};
use examiner_config::AppConfig;
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "examiner",
    about = "Cambridge O-Level History examiner (2059/01)",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config.toml (defaults to ~/.examiner/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Answer a single question and print it
    Ask {
        /// The exam question
        query: String,

        /// Target mark value (4, 7 or 14)
        #[arg(
            short,
            long,
            default_value_t = examiner_gateway::DEFAULT_MARKS,
            allow_negative_numbers = true
        )]
        marks: i64,
    },

    /// Print the context block selected for a question
    Context {
        /// The exam question
        query: String,
    },

    /// Merge a past-papers JSON file into the knowledge file
    Import {
        /// JSON document with a `past_papers` mapping, or the bare mapping
        file: PathBuf,
    },

    /// Show configuration and knowledge store status
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // A .env file is optional; real environment variables still win.
    dotenvy::dotenv().ok();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let config = AppConfig::load(cli.config.as_deref())
        .map_err(|e| format!("Failed to load config: {e}"))?;

    match cli.command {
        Commands::Serve { port } => commands::serve::run(config, port).await?,
        Commands::Ask { query, marks } => commands::ask::run(&config, &query, marks).await?,
        Commands::Context { query } => commands::context::run(&config, &query)?,
        Commands::Import { file } => commands::import::run(&config, &file)?,
        Commands::Status => commands::status::run(&config)?,
    }

    Ok(())
}
