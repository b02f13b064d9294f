//! Admin browser configuration.
//!
//! A database-browsing UI sits next to the application and points at the
//! same proxy endpoint. Its configuration is a separate surface: it
//! re-reads the endpoint keys itself rather than borrowing a resolved
//! profile, so the two only agree by convention. Display limits and the
//! schema visibility filter are compiled-in; only the endpoint and the
//! cookie secret come from the environment.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::env::EnvSource;
use crate::profile::{ENV_HOST, ENV_PORT, ENV_SOCKET};

/// Secret for the browser's session-cookie authentication.
pub const ENV_COOKIE_SECRET: &str = "SQLGATE_COOKIE_SECRET";

const DEFAULT_HOST: &str = "192.168.11.122";
const DEFAULT_PORT: &str = "6033";
const DEFAULT_HIDE_DATABASES: &str = "^(information_schema|performance_schema|mysql|sys)$";
const DEFAULT_VERBOSE_NAME: &str = "MySQL Cluster via ProxySQL";
const DEFAULT_COOKIE_SECRET: &str = "your-secret-key-here-32-chars-long!";

fn default_only_databases() -> Vec<String> {
    vec!["appdb".to_string(), "db-mpp".to_string()]
}

fn default_hide_databases() -> String {
    DEFAULT_HIDE_DATABASES.to_string()
}

fn default_true() -> bool {
    true
}

fn default_query_history_max() -> u32 {
    25
}

fn default_max_navigation_items() -> u32 {
    50
}

/// How the browser reaches the endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectType {
    Tcp,
    Socket,
}

/// Configuration emitted for the external database-browsing tool.
///
/// Serializable as TOML or JSON so the CLI can write the file the tool
/// expects. Credentials stay empty: the tool authenticates the operator
/// per session with a cookie, not with stored credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminBrowserConfig {
    pub host: String,
    pub port: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socket: Option<String>,
    pub connect_type: ConnectType,
    /// Per-session cookie authentication; no stored user.
    pub auth_type: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub allow_no_password: bool,
    #[serde(default)]
    pub compress: bool,
    /// Databases offered at login.
    #[serde(default = "default_only_databases")]
    pub only_databases: Vec<String>,
    /// Regex hiding system schemas from navigation.
    #[serde(default = "default_hide_databases")]
    pub hide_databases: String,
    /// The proxy tier does not answer INFORMATION_SCHEMA queries the way
    /// a bare server does, so the browser must not rely on them.
    #[serde(default = "default_true")]
    pub disable_info_schema: bool,
    pub verbose_name: String,
    pub default_lang: String,
    #[serde(default = "default_max_navigation_items")]
    pub max_navigation_items: u32,
    #[serde(default)]
    pub navigation_tree_grouping: bool,
    #[serde(default)]
    pub query_history_db: bool,
    #[serde(default = "default_query_history_max")]
    pub query_history_max: u32,
    pub cookie_secret: String,
}

impl AdminBrowserConfig {
    /// Resolve from an environment snapshot. Total, like profile
    /// resolution: every miss falls back to a compiled-in default.
    pub fn resolve(env: &dyn EnvSource) -> Self {
        let socket = env.get(ENV_SOCKET).filter(|v| !v.is_empty());
        let connect_type = if socket.is_some() {
            ConnectType::Socket
        } else {
            ConnectType::Tcp
        };

        Self {
            host: env
                .get(ENV_HOST)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: env
                .get(ENV_PORT)
                .unwrap_or_else(|| DEFAULT_PORT.to_string()),
            socket,
            connect_type,
            auth_type: "cookie".to_string(),
            user: String::new(),
            password: String::new(),
            allow_no_password: false,
            compress: false,
            only_databases: default_only_databases(),
            hide_databases: default_hide_databases(),
            disable_info_schema: true,
            verbose_name: DEFAULT_VERBOSE_NAME.to_string(),
            default_lang: "en".to_string(),
            max_navigation_items: default_max_navigation_items(),
            navigation_tree_grouping: false,
            query_history_db: false,
            query_history_max: default_query_history_max(),
            cookie_secret: env
                .get(ENV_COOKIE_SECRET)
                .unwrap_or_else(|| DEFAULT_COOKIE_SECRET.to_string()),
        }
    }

    /// Compile the visibility filter.
    pub fn hidden_database_matcher(&self) -> Result<Regex, regex::Error> {
        Regex::new(&self.hide_databases)
    }

    /// Whether a database is hidden from navigation. An uncompilable
    /// pattern hides nothing.
    pub fn is_hidden(&self, database: &str) -> bool {
        self.hidden_database_matcher()
            .map(|re| re.is_match(database))
            .unwrap_or(false)
    }
}
