//! CLI module for the authentication service
//!
//! - `serve`: run the HTTP API
//! - `migrate`: apply pending database migrations, or report them with `--status`

pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

/// Car rental user authentication service
#[derive(Parser)]
#[command(name = "carrental-auth")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Apply pending database migrations and exit
    Migrate(migrate::MigrateArgs),
}
