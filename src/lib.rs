//! rMealTicket library root.
//! Exposes the CLI parser, the high-level run() function, the attendance
//! ingestion pipeline (`core`) and its collaborators (`db`, `printer`,
//! `server`).

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod models;
pub mod printer;
pub mod server;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init { force } => cli::commands::init::handle(cli, cfg, *force),
        Commands::Serve { .. } => cli::commands::serve::handle(&cli.command, cfg),
        Commands::Meals { .. } => cli::commands::meals::handle(&cli.command, cfg),
        Commands::Employees { action } => cli::commands::employees::handle(action, cfg),
        Commands::Log => cli::commands::log::handle(cfg),
        Commands::PrintTest { printer } => cli::commands::print_test::handle(printer, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    let mut cfg = Config::load(cli.config.as_deref())?;

    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }

    dispatch(&cli, &cfg)
}
