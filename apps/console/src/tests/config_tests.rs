use super::{apply_env, apply_file, load_settings, Settings};

use std::{
    collections::HashMap,
    env, fs,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| vars.get(key).cloned()
}

#[test]
fn defaults_match_browser_behavior() {
    let settings = Settings::default();
    assert_eq!(settings.server_url, "http://127.0.0.1:8000");
    assert_eq!(settings.reload_delay(), Duration::from_millis(800));
    assert_eq!(settings.request_timeout(), None);
    assert!(settings.tables.is_empty());
}

#[test]
fn file_values_override_defaults() {
    let mut settings = Settings::default();
    apply_file(
        &mut settings,
        r#"
server_url = "http://sheets.internal:9000"
reload_delay_ms = 250
request_timeout_secs = 30
tables = ["orders", " ", "users"]
"#,
    )
    .expect("valid file");

    assert_eq!(settings.server_url, "http://sheets.internal:9000");
    assert_eq!(settings.reload_delay_ms, 250);
    assert_eq!(settings.request_timeout(), Some(Duration::from_secs(30)));
    let names: Vec<String> = settings
        .table_names()
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(names, vec!["orders", "users"]);
}

#[test]
fn unknown_file_keys_are_rejected() {
    let mut settings = Settings::default();
    assert!(apply_file(&mut settings, "server = \"x\"").is_err());
}

#[test]
fn app_prefixed_env_wins_over_short_name() {
    let mut settings = Settings::default();
    apply_env(
        &mut settings,
        env_of(&[
            ("SHEET2API_URL", "http://short:1"),
            ("APP__SERVER_URL", "http://prefixed:2"),
            ("APP__RELOAD_DELAY_MS", "100"),
            ("APP__REQUEST_TIMEOUT_SECS", " 7 "),
        ]),
    )
    .expect("env");

    assert_eq!(settings.server_url, "http://prefixed:2");
    assert_eq!(settings.reload_delay_ms, 100);
    assert_eq!(settings.request_timeout_secs, Some(7));
}

#[test]
fn malformed_env_numbers_are_errors() {
    let mut settings = Settings::default();
    let err = apply_env(&mut settings, env_of(&[("APP__RELOAD_DELAY_MS", "soon")]))
        .expect_err("bad delay");
    assert!(err.to_string().contains("APP__RELOAD_DELAY_MS"));
}

#[test]
fn explicit_config_file_must_exist() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let missing = env::temp_dir().join(format!("sheet2api_missing_{suffix}.toml"));
    let err = load_settings(Some(missing.as_path())).expect_err("missing file");
    assert!(err.to_string().contains("failed to read config file"));
}

#[test]
fn explicit_config_file_is_loaded() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("sheet2api_config_{suffix}.toml"));
    fs::write(&path, "tables = [\"orders\"]\n").expect("write config");

    let settings = load_settings(Some(path.as_path())).expect("load");
    assert_eq!(settings.tables, vec!["orders".to_string()]);

    fs::remove_file(path).expect("cleanup");
}
