//! Bijoux CLI - data migration tools.
//!
//! # Usage
//!
//! ```bash
//! # Copy the file backend's JSON trees into MongoDB
//! bijoux-cli migrate --url mongodb://localhost:27017/bijoux
//!
//! # Read from a non-default data directory
//! bijoux-cli migrate --data-dir /srv/bijoux/data --url mongodb://localhost:27017
//! ```
//!
//! # Commands
//!
//! - `migrate` - Copy products and orders from the file backend to MongoDB

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "bijoux-cli")]
#[command(author, version, about = "Bijoux CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy file-backend data into MongoDB
    Migrate {
        /// Directory holding the file backend's JSON trees
        #[arg(long, default_value = "data")]
        data_dir: std::path::PathBuf,

        /// MongoDB connection string (defaults to `BIJOUX_MONGODB_URL`)
        #[arg(long)]
        url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bijoux_cli=info,bijoux_server=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Migrate { data_dir, url } => commands::migrate::run(&data_dir, url).await,
    };

    match result {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            std::process::ExitCode::FAILURE
        }
    }
}
