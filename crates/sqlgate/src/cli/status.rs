//! Cluster status across every resolved path.
//!
//! Probes each profile's endpoint with a short-lived single-connection
//! pool, asks the read path about replication, and prints a weighted
//! grade. A path that cannot be reached is reported, not fatal; the
//! command only fails on output errors.

use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::Args;
use serde::Serialize;
use sqlgate_config::{ConnectionProfile, ProcessEnv, ProfileKind, ProfileRegistry};
use sqlgate_db::{
    create_pool, probe_endpoint, probe_replication, EndpointHealth, HealthGrade, MySqlPool,
    ReplicationHealth,
};
use tracing::warn;

use super::output::{format_uptime, print_table};

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Per-path probe timeout in seconds
    #[arg(long, default_value_t = 5)]
    pub timeout_secs: u64,
}

#[derive(Debug, Serialize)]
struct PathReport {
    profile: ProfileKind,
    endpoint: String,
    online: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    health: Option<EndpointHealth>,
}

#[derive(Debug, Serialize)]
struct StatusReport {
    generated_at: String,
    paths: Vec<PathReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    replication: Option<ReplicationHealth>,
    grade: HealthGrade,
}

pub fn run(args: StatusArgs) -> Result<()> {
    let registry = ProfileRegistry::from_env(&ProcessEnv, sqlgate_db::driver_capabilities());
    let timeout = Duration::from_secs(args.timeout_secs);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let report = runtime.block_on(collect(&registry, timeout));

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_human(&report);
    }

    Ok(())
}

async fn collect(registry: &ProfileRegistry, timeout: Duration) -> StatusReport {
    let mut paths = Vec::new();
    let mut replication = None;

    for kind in ProfileKind::ALL {
        let profile = registry.get(kind);
        match probe_path(profile, timeout).await {
            Ok((health, pool)) => {
                if kind == ProfileKind::Read {
                    replication = match probe_replication(&pool).await {
                        Ok(state) => state,
                        Err(err) => {
                            warn!(error = %err, "Replication probe failed");
                            None
                        }
                    };
                }
                pool.close().await;
                paths.push(PathReport {
                    profile: kind,
                    endpoint: profile.endpoint(),
                    online: true,
                    error: None,
                    health: Some(health),
                });
            }
            Err(err) => paths.push(PathReport {
                profile: kind,
                endpoint: profile.endpoint(),
                online: false,
                error: Some(format!("{:#}", err)),
                health: None,
            }),
        }
    }

    let online = |kind: ProfileKind| {
        paths
            .iter()
            .find(|p| p.profile == kind)
            .map(|p| p.online)
            .unwrap_or(false)
    };
    let grade = sqlgate_db::grade(
        online(ProfileKind::Primary),
        online(ProfileKind::Write),
        online(ProfileKind::Read),
        replication
            .as_ref()
            .map(ReplicationHealth::threads_running)
            .unwrap_or(false),
    );

    StatusReport {
        generated_at: chrono::Utc::now().to_rfc3339(),
        paths,
        replication,
        grade,
    }
}

async fn probe_path(
    profile: &ConnectionProfile,
    timeout: Duration,
) -> Result<(EndpointHealth, MySqlPool)> {
    let pool = tokio::time::timeout(timeout, create_pool(profile, 1))
        .await
        .map_err(|_| anyhow!("connect timed out"))??;
    let health = tokio::time::timeout(timeout, probe_endpoint(&pool))
        .await
        .map_err(|_| anyhow!("probe timed out"))??;
    Ok((health, pool))
}

fn print_human(report: &StatusReport) {
    let rows = report
        .paths
        .iter()
        .map(|path| {
            let (status, uptime, threads, queries) = match &path.health {
                Some(health) => (
                    "online".to_string(),
                    format_uptime(health.uptime_secs),
                    health.threads_connected.to_string(),
                    health.queries.to_string(),
                ),
                None => (
                    path.error.clone().unwrap_or_else(|| "offline".to_string()),
                    "-".to_string(),
                    "-".to_string(),
                    "-".to_string(),
                ),
            };
            vec![
                path.profile.to_string(),
                path.endpoint.clone(),
                status,
                uptime,
                threads,
                queries,
            ]
        })
        .collect();
    print_table(
        &["Profile", "Endpoint", "Status", "Uptime", "Threads", "Queries"],
        rows,
    );

    if let Some(replication) = &report.replication {
        println!();
        println!(
            "Replication: io={} sql={} behind={}",
            if replication.io_running { "yes" } else { "no" },
            if replication.sql_running { "yes" } else { "no" },
            replication
                .seconds_behind_source
                .map(|s| format!("{}s", s))
                .unwrap_or_else(|| "unknown".to_string()),
        );
        if let Some(error) = &replication.last_error {
            println!("Last error:  {}", error);
        }
    }

    println!();
    println!(
        "Cluster: {} (score {}/100)",
        report.grade.status.as_str(),
        report.grade.score
    );
}
