//! Configuration layer for sqlgate.
//!
//! Two independent surfaces, both resolved from an environment snapshot
//! with compiled-in defaults:
//!
//! - [`ProfileRegistry`]: the named connection profiles (`primary`,
//!   `write`, `read`) an application hands to its database driver.
//! - [`AdminBrowserConfig`]: the configuration file for the external
//!   database-browsing UI pointed at the same proxy endpoint.
//!
//! Resolution is pure and total. There is no validation here; whatever
//! the environment supplies is stored verbatim and judged later by the
//! driver layer.
//!
//! ```rust
//! use sqlgate_config::{DriverCapabilities, MapEnv, ProfileKind, ProfileRegistry};
//!
//! let env = MapEnv::new().set("DB_READ_HOST", "10.1.1.5");
//! let registry = ProfileRegistry::from_env(&env, DriverCapabilities::with_tls());
//! assert_eq!(registry.get(ProfileKind::Read).host, "10.1.1.5");
//! ```

mod admin;
mod env;
mod profile;

pub use admin::{AdminBrowserConfig, ConnectType, ENV_COOKIE_SECRET};
pub use env::{EnvSource, MapEnv, ProcessEnv};
pub use profile::{
    ConnectionProfile, DriverCapabilities, ProfileKind, ProfileRegistry, Transport,
    ENV_CONNECTION, ENV_DATABASE, ENV_HOST, ENV_PASSWORD, ENV_PORT, ENV_READ_HOST, ENV_READ_PORT,
    ENV_SOCKET, ENV_SSL_CA, ENV_USERNAME, ENV_WRITE_HOST, ENV_WRITE_PORT, OPTION_SSL_CA,
};
