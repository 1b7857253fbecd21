//! CLI module for the employee directory
//!
//! - `serve`: run the HTTP API
//! - `check-config`: print the effective configuration and exit

pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;

/// Employee directory - employee records API with view-based field visibility
#[derive(Parser)]
#[command(name = "employee-directory")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Load configuration from files and environment and print it
    CheckConfig,
}

/// Print the effective configuration
pub fn check_config() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    println!("{:#?}", config);

    Ok(())
}
