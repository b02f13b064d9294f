//! Admin browser configuration commands.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use sqlgate_config::{AdminBrowserConfig, ProcessEnv};
use tracing::info;

#[derive(Subcommand, Debug)]
pub enum AdminAction {
    /// Write the configuration file for the database-browsing tool
    Export(ExportArgs),
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = ExportFormat::Toml)]
    pub format: ExportFormat,

    /// Write to a file instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum ExportFormat {
    Toml,
    Json,
}

pub fn run(action: AdminAction) -> Result<()> {
    match action {
        AdminAction::Export(args) => export(args),
    }
}

fn export(args: ExportArgs) -> Result<()> {
    let config = AdminBrowserConfig::resolve(&ProcessEnv);

    let rendered = match args.format {
        ExportFormat::Toml => {
            toml::to_string_pretty(&config).context("Failed to render configuration as TOML")?
        }
        ExportFormat::Json => serde_json::to_string_pretty(&config)
            .context("Failed to render configuration as JSON")?,
    };

    match args.out {
        Some(path) => {
            fs::write(&path, &rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "Wrote admin browser configuration");
            println!("Wrote {}", path.display());
        }
        None => println!("{}", rendered),
    }

    Ok(())
}
