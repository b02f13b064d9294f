mod cli_support;

use cli_support::{assert_cli_success, run_cli, run_cli_json};
use std::fs;
use tempfile::TempDir;

#[test]
fn admin_export_json_to_stdout() {
    let home = TempDir::new().expect("create temp home");
    let home_str = home.path().to_string_lossy().to_string();
    let envs = [("SQLGATE_HOME", home_str.as_str())];

    let config: serde_json::Value =
        run_cli_json(&["admin", "export", "--format", "json"], &envs);

    assert_eq!(config["host"], "192.168.11.122");
    assert_eq!(config["port"], "6033");
    assert_eq!(config["connect_type"], "tcp");
    assert_eq!(config["auth_type"], "cookie");
    assert_eq!(config["allow_no_password"], false);
    assert_eq!(config["disable_info_schema"], true);
    assert_eq!(config["max_navigation_items"], 50);
    assert_eq!(config["query_history_max"], 25);
    assert_eq!(
        config["hide_databases"],
        "^(information_schema|performance_schema|mysql|sys)$"
    );
    let only = config["only_databases"].as_array().expect("array");
    assert_eq!(only.len(), 2);
    assert_eq!(only[0], "appdb");
}

#[test]
fn admin_export_endpoint_follows_environment() {
    let home = TempDir::new().expect("create temp home");
    let home_str = home.path().to_string_lossy().to_string();
    let envs = [
        ("SQLGATE_HOME", home_str.as_str()),
        ("DB_HOST", "proxy.internal"),
        ("DB_PORT", "6035"),
        ("SQLGATE_COOKIE_SECRET", "0123456789abcdef0123456789abcdef"),
    ];

    let config: serde_json::Value =
        run_cli_json(&["admin", "export", "--format", "json"], &envs);
    assert_eq!(config["host"], "proxy.internal");
    assert_eq!(config["port"], "6035");
    assert_eq!(config["cookie_secret"], "0123456789abcdef0123456789abcdef");
}

#[test]
fn admin_export_toml_to_file() {
    let home = TempDir::new().expect("create temp home");
    let home_str = home.path().to_string_lossy().to_string();
    let out_path = home.path().join("admin.toml");
    let out_str = out_path.to_string_lossy().to_string();
    let envs = [("SQLGATE_HOME", home_str.as_str())];

    let args = ["admin", "export", "--out", out_str.as_str()];
    let output = run_cli(&args, &envs);
    assert_cli_success(&output, &args);

    let rendered = fs::read_to_string(&out_path).expect("read exported file");
    let parsed: toml::Value = toml::from_str(&rendered).expect("valid TOML");
    assert_eq!(
        parsed["host"].as_str(),
        Some("192.168.11.122")
    );
    assert_eq!(parsed["connect_type"].as_str(), Some("tcp"));
    assert_eq!(parsed["verbose_name"].as_str(), Some("MySQL Cluster via ProxySQL"));
}
