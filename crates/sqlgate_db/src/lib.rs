//! Driver handoff layer for sqlgate.
//!
//! Takes the resolved profiles from `sqlgate_config` and turns them into
//! working driver objects: connect options, pools, and SQL-level health
//! probes. This is the single place where profile strings are parsed and
//! judged; resolution upstream stays total.
//!
//! ```rust,ignore
//! use sqlgate_config::{ProcessEnv, ProfileRegistry};
//!
//! let registry = ProfileRegistry::from_env(&ProcessEnv, sqlgate_db::driver_capabilities());
//! let pool = sqlgate_db::create_pool(registry.default_profile(), 5).await?;
//! ```

mod error;
mod health;
mod options;

pub use error::{DbError, Result};
pub use health::{
    grade, probe_endpoint, probe_replication, EndpointHealth, HealthGrade, HealthStatus,
    ReplicationHealth,
};
pub use options::{connect_options, create_pool, driver_capabilities, ping};

// Re-exported so CLI callers can hold pools without depending on the
// driver crate directly.
pub use sqlx::mysql::MySqlPool;
