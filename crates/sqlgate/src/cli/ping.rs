//! Connectivity check for a single profile.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::Args;
use sqlgate_config::{ProcessEnv, ProfileKind, ProfileRegistry};

#[derive(Args, Debug)]
pub struct PingArgs {
    /// Profile to ping (default: the DB_CONNECTION selection)
    pub profile: Option<ProfileKind>,

    /// Give up after this many seconds
    #[arg(long, default_value_t = 5)]
    pub timeout_secs: u64,
}

pub fn run(args: PingArgs) -> Result<()> {
    let registry = ProfileRegistry::from_env(&ProcessEnv, sqlgate_db::driver_capabilities());
    let profile = match args.profile {
        Some(kind) => registry.get(kind),
        None => registry.default_profile(),
    };
    let timeout = Duration::from_secs(args.timeout_secs);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let elapsed = runtime
        .block_on(async {
            tokio::time::timeout(timeout, sqlgate_db::ping(profile))
                .await
                .map_err(|_| anyhow!("timed out after {}s", args.timeout_secs))?
                .map_err(anyhow::Error::from)
        })
        .with_context(|| format!("Failed to reach {} ({})", profile.kind, profile.endpoint()))?;

    println!(
        "{}: ok in {} ms ({})",
        profile.kind,
        elapsed.as_millis(),
        profile.endpoint()
    );

    Ok(())
}
