//! Connection profile resolution.
//!
//! A profile names everything the driver needs to open one kind of
//! connection through the proxy tier: endpoint, credentials, schema and
//! encoding directives. Every attribute resolves from a dedicated
//! environment key with a compiled-in fallback, so resolution is total.
//! Nothing is validated here. A malformed port is stored verbatim and
//! rejected later by the driver layer, which is the one place that knows
//! what the driver will actually accept.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::env::EnvSource;

/// Selects which profile the application uses by default.
pub const ENV_CONNECTION: &str = "DB_CONNECTION";
/// Primary endpoint host (the proxy tier, not a database node).
pub const ENV_HOST: &str = "DB_HOST";
/// Primary endpoint port (the proxy's listener, not the engine's 3306).
pub const ENV_PORT: &str = "DB_PORT";
/// Logical schema name, shared by all profiles.
pub const ENV_DATABASE: &str = "DB_DATABASE";
/// Credentials, shared by all profiles.
pub const ENV_USERNAME: &str = "DB_USERNAME";
pub const ENV_PASSWORD: &str = "DB_PASSWORD";
/// Unix socket path alternative to host/port, shared by all profiles.
pub const ENV_SOCKET: &str = "DB_SOCKET";
/// Write-path endpoint overrides.
pub const ENV_WRITE_HOST: &str = "DB_WRITE_HOST";
pub const ENV_WRITE_PORT: &str = "DB_WRITE_PORT";
/// Read-path endpoint overrides.
pub const ENV_READ_HOST: &str = "DB_READ_HOST";
pub const ENV_READ_PORT: &str = "DB_READ_PORT";
/// TLS certificate-authority path, emitted only when the driver can honor it.
pub const ENV_SSL_CA: &str = "MYSQL_ATTR_SSL_CA";

/// Key under which the CA path lands in [`ConnectionProfile::options`].
pub const OPTION_SSL_CA: &str = "ssl_ca";

const DEFAULT_HOST: &str = "192.168.11.122";
const DEFAULT_PORT: &str = "6033";
const DEFAULT_DATABASE: &str = "appdb";
const DEFAULT_USERNAME: &str = "appuser";
const DEFAULT_PASSWORD: &str = "AppPass123!";
const DEFAULT_CHARSET: &str = "utf8mb4";
const DEFAULT_COLLATION: &str = "utf8mb4_unicode_ci";

const REDACTED_PASSWORD: &str = "********";

/// The fixed set of profile names.
///
/// `Primary` is the generally-used profile. `Write` and `Read` exist for
/// applications that route statements manually instead of letting the
/// proxy tier split traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileKind {
    Primary,
    Write,
    Read,
}

impl ProfileKind {
    /// All profile kinds, in registry order.
    pub const ALL: [ProfileKind; 3] = [ProfileKind::Primary, ProfileKind::Write, ProfileKind::Read];

    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileKind::Primary => "primary",
            ProfileKind::Write => "write",
            ProfileKind::Read => "read",
        }
    }

    /// Endpoint keys for this kind. Non-endpoint attributes share keys
    /// across kinds.
    fn endpoint_keys(&self) -> (&'static str, &'static str) {
        match self {
            ProfileKind::Primary => (ENV_HOST, ENV_PORT),
            ProfileKind::Write => (ENV_WRITE_HOST, ENV_WRITE_PORT),
            ProfileKind::Read => (ENV_READ_HOST, ENV_READ_PORT),
        }
    }
}

impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileKind {
    type Err = String;

    /// Accepts the canonical names plus the legacy `mysql*` aliases used
    /// in `DB_CONNECTION` values.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "primary" | "mysql" => Ok(ProfileKind::Primary),
            "write" | "mysql_write" => Ok(ProfileKind::Write),
            "read" | "mysql_read" => Ok(ProfileKind::Read),
            other => Err(format!(
                "unknown profile '{}', expected one of: primary, write, read",
                other
            )),
        }
    }
}

/// What the consuming driver build is able to honor.
///
/// Resolution consults this instead of probing the runtime, so the same
/// environment snapshot always yields the same profile for a given
/// capability set. The driver layer constructs one from its compile-time
/// features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DriverCapabilities {
    /// The driver can verify a server certificate against a CA file.
    pub tls: bool,
}

impl DriverCapabilities {
    /// Capabilities with TLS support.
    pub fn with_tls() -> Self {
        Self { tls: true }
    }
}

/// The effective transport for a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport<'a> {
    /// Unix domain socket path.
    Socket(&'a str),
    /// TCP endpoint. `port` is the raw resolved string.
    Tcp { host: &'a str, port: &'a str },
}

/// A fully resolved set of parameters for one kind of connection.
///
/// Immutable once resolved. All fields are stored as resolved, including
/// the ones that kept their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionProfile {
    pub kind: ProfileKind,
    pub host: String,
    /// Stored verbatim. The driver layer parses it at handoff time.
    pub port: String,
    pub database: String,
    pub username: String,
    pub password: String,
    /// Present only when `DB_SOCKET` is set and non-empty.
    pub socket: Option<String>,
    pub charset: String,
    pub collation: String,
    /// Driver options the runtime can honor. Currently only
    /// [`OPTION_SSL_CA`].
    pub options: BTreeMap<String, String>,
}

impl ConnectionProfile {
    /// Resolve a profile from an environment snapshot.
    ///
    /// Every lookup that misses falls back to a compiled-in default, so
    /// this cannot fail and an empty environment yields a usable profile.
    pub fn resolve(kind: ProfileKind, env: &dyn EnvSource, caps: DriverCapabilities) -> Self {
        let (host_key, port_key) = kind.endpoint_keys();

        let mut options = BTreeMap::new();
        if caps.tls {
            // Empty string means unset, same as the socket path below.
            if let Some(ca) = env.get(ENV_SSL_CA).filter(|v| !v.is_empty()) {
                options.insert(OPTION_SSL_CA.to_string(), ca);
            }
        }

        Self {
            kind,
            host: env
                .get(host_key)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: env
                .get(port_key)
                .unwrap_or_else(|| DEFAULT_PORT.to_string()),
            database: env
                .get(ENV_DATABASE)
                .unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
            username: env
                .get(ENV_USERNAME)
                .unwrap_or_else(|| DEFAULT_USERNAME.to_string()),
            password: env
                .get(ENV_PASSWORD)
                .unwrap_or_else(|| DEFAULT_PASSWORD.to_string()),
            socket: env.get(ENV_SOCKET).filter(|v| !v.is_empty()),
            charset: DEFAULT_CHARSET.to_string(),
            collation: DEFAULT_COLLATION.to_string(),
            options,
        }
    }

    /// The effective transport. A non-empty socket path wins over
    /// host/port; unsetting `DB_SOCKET` switches back to TCP.
    pub fn transport(&self) -> Transport<'_> {
        match &self.socket {
            Some(path) => Transport::Socket(path),
            None => Transport::Tcp {
                host: &self.host,
                port: &self.port,
            },
        }
    }

    /// Human-readable endpoint for logs and tables. Never includes
    /// credentials.
    pub fn endpoint(&self) -> String {
        match self.transport() {
            Transport::Socket(path) => format!("socket:{}", path),
            Transport::Tcp { host, port } => format!("{}:{}", host, port),
        }
    }

    /// A copy safe to print or serialize for display.
    pub fn redacted(&self) -> Self {
        Self {
            password: REDACTED_PASSWORD.to_string(),
            ..self.clone()
        }
    }
}

/// The full set of named profiles, resolved once at startup.
///
/// Construction is the only mutation; afterwards the registry is handed
/// by reference to whatever opens connections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileRegistry {
    default_kind: ProfileKind,
    profiles: Vec<ConnectionProfile>,
}

impl ProfileRegistry {
    /// Resolve every profile kind against one environment snapshot.
    pub fn from_env(env: &dyn EnvSource, caps: DriverCapabilities) -> Self {
        let default_kind = env
            .get(ENV_CONNECTION)
            .and_then(|v| v.parse().ok())
            .unwrap_or(ProfileKind::Primary);

        let profiles = ProfileKind::ALL
            .iter()
            .map(|kind| ConnectionProfile::resolve(*kind, env, caps))
            .collect();

        Self {
            default_kind,
            profiles,
        }
    }

    /// The profile selected by `DB_CONNECTION` (`primary` when unset or
    /// unrecognized).
    pub fn default_kind(&self) -> ProfileKind {
        self.default_kind
    }

    /// Look up a profile by kind.
    pub fn get(&self, kind: ProfileKind) -> &ConnectionProfile {
        self.profiles
            .iter()
            .find(|p| p.kind == kind)
            .unwrap_or(&self.profiles[0])
    }

    /// The default profile.
    pub fn default_profile(&self) -> &ConnectionProfile {
        self.get(self.default_kind)
    }

    /// All profiles in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &ConnectionProfile> {
        self.profiles.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MapEnv;

    fn caps() -> DriverCapabilities {
        DriverCapabilities::with_tls()
    }

    #[test]
    fn empty_env_yields_full_defaults() {
        let env = MapEnv::new();
        for kind in ProfileKind::ALL {
            let profile = ConnectionProfile::resolve(kind, &env, caps());
            assert_eq!(profile.host, "192.168.11.122");
            assert_eq!(profile.port, "6033");
            assert_eq!(profile.database, "appdb");
            assert_eq!(profile.username, "appuser");
            assert_eq!(profile.charset, "utf8mb4");
            assert_eq!(profile.collation, "utf8mb4_unicode_ci");
            assert_eq!(profile.socket, None);
            assert!(profile.options.is_empty());
        }
    }

    #[test]
    fn override_propagates_exactly() {
        let env = MapEnv::new().set("DB_HOST", "10.0.0.9");
        let profile = ConnectionProfile::resolve(ProfileKind::Primary, &env, caps());
        assert_eq!(profile.host, "10.0.0.9");
        assert_eq!(profile.port, "6033");
    }

    #[test]
    fn read_overrides_touch_only_the_read_profile() {
        let env = MapEnv::new()
            .set("DB_READ_HOST", "10.1.1.5")
            .set("DB_READ_PORT", "6034");

        let read = ConnectionProfile::resolve(ProfileKind::Read, &env, caps());
        assert_eq!(read.host, "10.1.1.5");
        assert_eq!(read.port, "6034");
        assert_eq!(read.database, "appdb");

        let write = ConnectionProfile::resolve(ProfileKind::Write, &env, caps());
        assert_eq!(write.host, "192.168.11.122");
        assert_eq!(write.port, "6033");

        let primary = ConnectionProfile::resolve(ProfileKind::Primary, &env, caps());
        assert_eq!(primary.host, "192.168.11.122");
    }

    #[test]
    fn malformed_port_is_stored_verbatim() {
        let env = MapEnv::new().set("DB_PORT", "not-a-port");
        let profile = ConnectionProfile::resolve(ProfileKind::Primary, &env, caps());
        assert_eq!(profile.port, "not-a-port");
    }

    #[test]
    fn ssl_ca_requires_capability_and_key() {
        let with_ca = MapEnv::new().set("MYSQL_ATTR_SSL_CA", "/etc/ssl/proxy-ca.pem");

        let no_tls = ConnectionProfile::resolve(
            ProfileKind::Primary,
            &with_ca,
            DriverCapabilities::default(),
        );
        assert!(no_tls.options.is_empty());

        let tls = ConnectionProfile::resolve(ProfileKind::Primary, &with_ca, caps());
        assert_eq!(tls.options.len(), 1);
        assert_eq!(
            tls.options.get(OPTION_SSL_CA).map(String::as_str),
            Some("/etc/ssl/proxy-ca.pem")
        );

        let unset = ConnectionProfile::resolve(ProfileKind::Primary, &MapEnv::new(), caps());
        assert!(!unset.options.contains_key(OPTION_SSL_CA));
    }

    #[test]
    fn empty_ssl_ca_is_treated_as_unset() {
        let env = MapEnv::new().set("MYSQL_ATTR_SSL_CA", "");
        let profile = ConnectionProfile::resolve(ProfileKind::Primary, &env, caps());
        assert!(profile.options.is_empty());
    }

    #[test]
    fn resolution_is_idempotent() {
        let env = MapEnv::new()
            .set("DB_HOST", "10.0.0.9")
            .set("DB_PASSWORD", "s3cret");
        let first = ConnectionProfile::resolve(ProfileKind::Primary, &env, caps());
        let second = ConnectionProfile::resolve(ProfileKind::Primary, &env, caps());
        assert_eq!(first, second);
    }

    #[test]
    fn socket_takes_precedence_when_set() {
        let env = MapEnv::new().set("DB_SOCKET", "/var/run/proxysql.sock");
        let profile = ConnectionProfile::resolve(ProfileKind::Primary, &env, caps());
        assert_eq!(
            profile.transport(),
            Transport::Socket("/var/run/proxysql.sock")
        );
        assert_eq!(profile.endpoint(), "socket:/var/run/proxysql.sock");
    }

    #[test]
    fn empty_socket_falls_back_to_tcp() {
        let env = MapEnv::new().set("DB_SOCKET", "");
        let profile = ConnectionProfile::resolve(ProfileKind::Primary, &env, caps());
        assert_eq!(
            profile.transport(),
            Transport::Tcp {
                host: "192.168.11.122",
                port: "6033"
            }
        );
    }

    #[test]
    fn registry_resolves_all_kinds() {
        let registry = ProfileRegistry::from_env(&MapEnv::new(), caps());
        assert_eq!(registry.iter().count(), 3);
        assert_eq!(registry.default_kind(), ProfileKind::Primary);
        assert_eq!(registry.default_profile().kind, ProfileKind::Primary);
        assert_eq!(registry.get(ProfileKind::Read).kind, ProfileKind::Read);
    }

    #[test]
    fn db_connection_selects_default_profile() {
        let env = MapEnv::new().set("DB_CONNECTION", "mysql_read");
        let registry = ProfileRegistry::from_env(&env, caps());
        assert_eq!(registry.default_kind(), ProfileKind::Read);

        let env = MapEnv::new().set("DB_CONNECTION", "write");
        let registry = ProfileRegistry::from_env(&env, caps());
        assert_eq!(registry.default_kind(), ProfileKind::Write);
    }

    #[test]
    fn unrecognized_db_connection_falls_back_to_primary() {
        let env = MapEnv::new().set("DB_CONNECTION", "postgres");
        let registry = ProfileRegistry::from_env(&env, caps());
        assert_eq!(registry.default_kind(), ProfileKind::Primary);
    }

    #[test]
    fn redacted_masks_only_the_password() {
        let env = MapEnv::new().set("DB_PASSWORD", "s3cret");
        let profile = ConnectionProfile::resolve(ProfileKind::Primary, &env, caps());
        let redacted = profile.redacted();
        assert_eq!(redacted.password, "********");
        assert_eq!(redacted.host, profile.host);
        assert_eq!(redacted.username, profile.username);
    }
}
