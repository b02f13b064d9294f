//! Profile to driver-options handoff.
//!
//! This is where the verbatim strings in a resolved profile meet the
//! driver's real types. Anything malformed is rejected here, not during
//! resolution.

use std::time::{Duration, Instant};

use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions, MySqlSslMode};
use sqlgate_config::{ConnectionProfile, DriverCapabilities, Transport, OPTION_SSL_CA};
use tracing::info;

use crate::error::{DbError, Result};

/// What this build of the driver layer can honor.
///
/// Resolution takes this as an explicit input; it is derived from
/// compile-time features, never probed at runtime.
pub fn driver_capabilities() -> DriverCapabilities {
    DriverCapabilities {
        tls: cfg!(feature = "tls"),
    }
}

/// Convert a resolved profile into driver connect options.
///
/// Transport follows the profile's precedence: a socket path wins over
/// host/port. The port string is parsed here; a profile resolved from a
/// malformed `DB_PORT` fails at this boundary.
pub fn connect_options(profile: &ConnectionProfile) -> Result<MySqlConnectOptions> {
    let mut opts = MySqlConnectOptions::new()
        .username(&profile.username)
        .password(&profile.password)
        .database(&profile.database)
        .charset(&profile.charset)
        .collation(&profile.collation);

    match profile.transport() {
        Transport::Socket(path) => {
            opts = opts.socket(path);
        }
        Transport::Tcp { host, port } => {
            let port: u16 = port
                .parse()
                .ok()
                .filter(|p| *p != 0)
                .ok_or_else(|| DbError::InvalidPort(port.to_string()))?;
            opts = opts.host(host).port(port);
        }
    }

    if let Some(ca) = profile.options.get(OPTION_SSL_CA) {
        opts = opts.ssl_mode(MySqlSslMode::VerifyCa).ssl_ca(ca);
    }

    Ok(opts)
}

/// Create a connection pool for a profile.
pub async fn create_pool(profile: &ConnectionProfile, max_connections: u32) -> Result<MySqlPool> {
    let opts = connect_options(profile)?;
    let pool = MySqlPoolOptions::new()
        .max_connections(max_connections)
        .connect_with(opts)
        .await?;

    info!(
        profile = profile.kind.as_str(),
        endpoint = %profile.endpoint(),
        database = %profile.database,
        "Connected through proxy endpoint"
    );

    Ok(pool)
}

/// Open a single connection, run a trivial query, and report the round
/// trip.
pub async fn ping(profile: &ConnectionProfile) -> Result<Duration> {
    let started = Instant::now();
    let pool = create_pool(profile, 1).await?;
    sqlx::query("SELECT 1").execute(&pool).await?;
    let elapsed = started.elapsed();
    pool.close().await;
    Ok(elapsed)
}
