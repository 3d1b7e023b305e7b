use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use serde::Deserialize;
use shared::{domain::TableName, protocol::DEFAULT_SERVER_URL};

pub const DEFAULT_CONFIG_FILE: &str = "sheet2api.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_url: String,
    pub reload_delay_ms: u64,
    pub request_timeout_secs: Option<u64>,
    pub tables: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.into(),
            reload_delay_ms: 800,
            request_timeout_secs: None,
            tables: Vec::new(),
        }
    }
}

impl Settings {
    pub fn reload_delay(&self) -> Duration {
        Duration::from_millis(self.reload_delay_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Blank entries are skipped.
    pub fn table_names(&self) -> Vec<TableName> {
        self.tables
            .iter()
            .filter_map(|raw| TableName::parse(raw).ok())
            .collect()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    server_url: Option<String>,
    reload_delay_ms: Option<u64>,
    request_timeout_secs: Option<u64>,
    tables: Option<Vec<String>>,
}

/// Defaults, then the config file, then environment variables. An explicit
/// `config_path` must exist; the default file is optional.
pub fn load_settings(config_path: Option<&Path>) -> Result<Settings> {
    let mut settings = Settings::default();

    let (path, required) = match config_path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };
    if required || path.exists() {
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        apply_file(&mut settings, &raw)
            .with_context(|| format!("invalid config file '{}'", path.display()))?;
    }

    apply_env(&mut settings, |key| std::env::var(key).ok())?;
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw)?;
    if let Some(v) = file_cfg.server_url {
        settings.server_url = v;
    }
    if let Some(v) = file_cfg.reload_delay_ms {
        settings.reload_delay_ms = v;
    }
    if let Some(v) = file_cfg.request_timeout_secs {
        settings.request_timeout_secs = Some(v);
    }
    if let Some(v) = file_cfg.tables {
        settings.tables = v;
    }
    Ok(())
}

fn apply_env(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) -> Result<()> {
    if let Some(v) = var("SHEET2API_URL") {
        settings.server_url = v;
    }
    if let Some(v) = var("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Some(v) = var("APP__RELOAD_DELAY_MS") {
        settings.reload_delay_ms = v
            .trim()
            .parse()
            .with_context(|| format!("APP__RELOAD_DELAY_MS must be milliseconds, got '{v}'"))?;
    }

    if let Some(v) = var("APP__REQUEST_TIMEOUT_SECS") {
        settings.request_timeout_secs = Some(
            v.trim()
                .parse()
                .with_context(|| format!("APP__REQUEST_TIMEOUT_SECS must be seconds, got '{v}'"))?,
        );
    }

    Ok(())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
