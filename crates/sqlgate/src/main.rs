//! sqlgate command line interface.
//!
//! Resolves the connection profiles an application hands to its driver,
//! exports the admin browser configuration, and probes the proxy
//! endpoint and its read/write paths.

use clap::{Parser, Subcommand};
use sqlgate_logging::LogConfig;
use std::process::ExitCode;

mod cli;

#[derive(Parser, Debug)]
#[command(
    name = "sqlgate",
    about = "Resolve and probe database connection profiles behind a proxy tier"
)]
struct Cli {
    /// Enable verbose logging (info/debug to stderr)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Inspect resolved connection profiles
    Profile {
        #[command(subcommand)]
        action: cli::profile::ProfileAction,
    },
    /// Show the environment keys resolution consults
    Env(cli::env::EnvArgs),
    /// Admin browser configuration
    Admin {
        #[command(subcommand)]
        action: cli::admin::AdminAction,
    },
    /// Open a connection with a resolved profile and run a trivial query
    Ping(cli::ping::PingArgs),
    /// Probe every path and grade the cluster
    Status(cli::status::StatusArgs),
}

/// Whether stdout carries machine-readable output that console logging
/// would corrupt.
fn command_wants_machine_output(command: &Commands) -> bool {
    match command {
        Commands::Profile { action } => action.wants_json(),
        Commands::Env(args) => args.json,
        // Export writes file content to stdout unless --out is given.
        Commands::Admin { .. } => true,
        Commands::Ping(_) => false,
        Commands::Status(args) => args.json,
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let quiet_console = command_wants_machine_output(&cli.command);
    if let Err(err) = sqlgate_logging::init_logging(LogConfig {
        app_name: "sqlgate",
        verbose: cli.verbose,
        quiet_console,
    }) {
        eprintln!("Warning: failed to initialize logging: {:#}", err);
    }

    let result = match cli.command {
        Commands::Profile { action } => cli::profile::run(action),
        Commands::Env(args) => cli::env::run(args),
        Commands::Admin { action } => cli::admin::run(action),
        Commands::Ping(args) => cli::ping::run(args),
        Commands::Status(args) => cli::status::run(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
