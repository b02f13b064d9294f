//! CLI commands for sqlgate.
//!
//! One module per subcommand, plus shared output helpers. Commands take
//! a clap args struct and return `anyhow::Result`; the binary boundary
//! in `main` turns errors into exit codes.

pub mod admin;
pub mod env;
pub mod output;
pub mod ping;
pub mod profile;
pub mod status;
