//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Pulsegrid using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Pulsegrid - Real-time vitals monitoring engine
#[derive(Parser, Debug)]
#[command(name = "pulsegrid")]
#[command(version, about, long_about = None)]
#[command(author = "Pulsegrid Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "pulsegrid.toml", env = "PULSEGRID_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "PULSEGRID_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Monitor live patients: snapshot bootstrap plus the event stream
    Monitor(commands::monitor::MonitorArgs),

    /// Run the offline demo feed with synthetic patients
    Demo(commands::demo::DemoArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
