//! CLI argument definitions (clap derive).

use clap::{Parser, Subcommand};

use crate::config::{DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT};

/// placeshare - REST backend for sharing places
#[derive(Parser, Debug)]
#[command(name = "placeshare")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug-level logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Manage database migrations
    Migrate(MigrateArgs),
}

#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(short = 'H', long, default_value = DEFAULT_SERVER_HOST, env = "SERVER_HOST")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_SERVER_PORT, env = "SERVER_PORT")]
    pub port: u16,
}

#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: MigrateAction,
}

#[derive(Subcommand, Debug)]
pub enum MigrateAction {
    /// Apply pending migrations
    Up,
    /// Roll back the last migration
    Down,
    /// Show which migrations are applied
    Status,
    /// Drop everything and reapply all migrations
    Fresh,
}
