//! Show the environment keys resolution consults.
//!
//! Useful when a deployment disagrees with expectations: every key, its
//! presence in the current environment, and the value resolution would
//! see. Secrets are masked; use `profile show --reveal` when the real
//! value is needed.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use sqlgate_config::{EnvSource, ProcessEnv};

use super::output::print_table;

/// Keys consulted across both configuration surfaces.
const KEYS: [&str; 13] = [
    sqlgate_config::ENV_CONNECTION,
    sqlgate_config::ENV_HOST,
    sqlgate_config::ENV_PORT,
    sqlgate_config::ENV_DATABASE,
    sqlgate_config::ENV_USERNAME,
    sqlgate_config::ENV_PASSWORD,
    sqlgate_config::ENV_SOCKET,
    sqlgate_config::ENV_WRITE_HOST,
    sqlgate_config::ENV_WRITE_PORT,
    sqlgate_config::ENV_READ_HOST,
    sqlgate_config::ENV_READ_PORT,
    sqlgate_config::ENV_SSL_CA,
    sqlgate_config::ENV_COOKIE_SECRET,
];

const SECRET_KEYS: [&str; 2] = [
    sqlgate_config::ENV_PASSWORD,
    sqlgate_config::ENV_COOKIE_SECRET,
];

#[derive(Args, Debug)]
pub struct EnvArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct KeyReport {
    key: &'static str,
    set: bool,
    value: Option<String>,
}

pub fn run(args: EnvArgs) -> Result<()> {
    let reports: Vec<KeyReport> = KEYS
        .iter()
        .map(|&key| {
            let value = ProcessEnv.get(key).map(|value| {
                if SECRET_KEYS.contains(&key) {
                    "********".to_string()
                } else {
                    value
                }
            });
            KeyReport {
                key,
                set: value.is_some(),
                value,
            }
        })
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        let rows = reports
            .iter()
            .map(|report| {
                vec![
                    report.key.to_string(),
                    if report.set { "yes" } else { "" }.to_string(),
                    report.value.clone().unwrap_or_else(|| "(default)".to_string()),
                ]
            })
            .collect();
        print_table(&["Key", "Set", "Value"], rows);
    }

    Ok(())
}
