//! Endpoint and replication probes.
//!
//! Light SQL-level checks against an open pool: server counters for any
//! endpoint, replica thread state for the read path. The weighted grade
//! mirrors how operators of this cluster already score it: reachability
//! of the proxy endpoint, then the write path, then the read path, then
//! replica thread health.

use serde::Serialize;
use sqlx::mysql::MySqlPool;
use sqlx::Row;

use crate::error::Result;

/// Counters reported by any reachable endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointHealth {
    pub uptime_secs: u64,
    pub threads_connected: u64,
    pub queries: u64,
}

/// Replica thread state for the read path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplicationHealth {
    pub io_running: bool,
    pub sql_running: bool,
    pub seconds_behind_source: Option<i64>,
    pub source_host: Option<String>,
    pub last_error: Option<String>,
}

impl ReplicationHealth {
    /// Both replica threads are running.
    pub fn threads_running(&self) -> bool {
        self.io_running && self.sql_running
    }
}

/// Probe server counters over an open pool.
pub async fn probe_endpoint(pool: &MySqlPool) -> Result<EndpointHealth> {
    Ok(EndpointHealth {
        uptime_secs: status_counter(pool, "Uptime").await?,
        threads_connected: status_counter(pool, "Threads_connected").await?,
        queries: status_counter(pool, "Queries").await?,
    })
}

/// Probe replica state. `None` when the endpoint is not replicating,
/// which is the expected answer from the proxy itself and from a
/// primary node.
pub async fn probe_replication(pool: &MySqlPool) -> Result<Option<ReplicationHealth>> {
    let Some(row) = sqlx::query("SHOW REPLICA STATUS")
        .fetch_optional(pool)
        .await?
    else {
        return Ok(None);
    };

    // Column names changed in MySQL 8.0.22; accept both generations.
    let io_running = first_string(&row, &["Replica_IO_Running", "Slave_IO_Running"]);
    let sql_running = first_string(&row, &["Replica_SQL_Running", "Slave_SQL_Running"]);
    let behind = first_int(&row, &["Seconds_Behind_Source", "Seconds_Behind_Master"]);
    let source_host = first_string(&row, &["Source_Host", "Master_Host"]);
    let last_error = first_string(&row, &["Last_Error"]).filter(|e| !e.is_empty());

    Ok(Some(ReplicationHealth {
        io_running: io_running.as_deref() == Some("Yes"),
        sql_running: sql_running.as_deref() == Some("Yes"),
        seconds_behind_source: behind,
        source_host,
        last_error,
    }))
}

async fn status_counter(pool: &MySqlPool, name: &str) -> Result<u64> {
    // `name` is one of our own constants, never user input.
    let row = sqlx::query(&format!("SHOW STATUS LIKE '{}'", name))
        .fetch_optional(pool)
        .await?;
    Ok(row
        .and_then(|row| row.try_get::<String, _>("Value").ok())
        .and_then(|value| value.parse().ok())
        .unwrap_or(0))
}

fn first_string(row: &sqlx::mysql::MySqlRow, names: &[&str]) -> Option<String> {
    names
        .iter()
        .find_map(|name| row.try_get::<String, _>(*name).ok())
}

fn first_int(row: &sqlx::mysql::MySqlRow, names: &[&str]) -> Option<i64> {
    names
        .iter()
        .find_map(|name| row.try_get::<Option<i64>, _>(*name).ok().flatten())
}

/// Overall cluster state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Warning,
    Critical,
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Warning => "warning",
            HealthStatus::Critical => "critical",
        }
    }
}

/// Weighted cluster score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HealthGrade {
    pub score: u8,
    pub status: HealthStatus,
}

/// Grade the cluster from path reachability and replica thread state.
///
/// Weights: proxy endpoint 30, write path 40, read path 20, replica
/// threads 10. Bands: healthy at 80, warning at 60, critical below.
pub fn grade(
    proxy_online: bool,
    write_online: bool,
    read_online: bool,
    replication_running: bool,
) -> HealthGrade {
    let mut score = 0u8;
    if proxy_online {
        score += 30;
    }
    if write_online {
        score += 40;
    }
    if read_online {
        score += 20;
    }
    if replication_running {
        score += 10;
    }

    let status = if score >= 80 {
        HealthStatus::Healthy
    } else if score >= 60 {
        HealthStatus::Warning
    } else {
        HealthStatus::Critical
    };

    HealthGrade { score, status }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_paths_online_is_healthy() {
        let result = grade(true, true, true, true);
        assert_eq!(result.score, 100);
        assert_eq!(result.status, HealthStatus::Healthy);
    }

    #[test]
    fn dead_replica_is_still_healthy_at_the_band_edge() {
        // Proxy + write + read without replica threads lands exactly on
        // the healthy band.
        let result = grade(true, true, true, false);
        assert_eq!(result.score, 90);
        assert_eq!(result.status, HealthStatus::Healthy);
    }

    #[test]
    fn lost_read_path_is_a_warning() {
        let result = grade(true, true, false, false);
        assert_eq!(result.score, 70);
        assert_eq!(result.status, HealthStatus::Warning);
    }

    #[test]
    fn lost_write_path_degrades_to_critical() {
        let result = grade(true, false, true, true);
        assert_eq!(result.score, 60);
        assert_eq!(result.status, HealthStatus::Warning);

        let result = grade(true, false, true, false);
        assert_eq!(result.score, 50);
        assert_eq!(result.status, HealthStatus::Critical);
    }

    #[test]
    fn everything_down_is_critical() {
        let result = grade(false, false, false, false);
        assert_eq!(result.score, 0);
        assert_eq!(result.status, HealthStatus::Critical);
    }

    #[test]
    fn replication_threads_running() {
        let health = ReplicationHealth {
            io_running: true,
            sql_running: false,
            seconds_behind_source: Some(3),
            source_host: Some("192.168.11.120".to_string()),
            last_error: None,
        };
        assert!(!health.threads_running());
    }
}
