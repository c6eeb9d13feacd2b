use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context};
use serde::Deserialize;
use tracing::debug;
use url::Url;

pub const CONFIG_FILE_NAME: &str = "recipe-client.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub base_url: String,
    pub session_path: PathBuf,
    pub log_level: String,
    pub request_timeout_secs: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".into(),
            session_path: default_session_path(),
            log_level: "info".into(),
            request_timeout_secs: 15,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    base_url: Option<String>,
    session_path: Option<PathBuf>,
    log_level: Option<String>,
    request_timeout_secs: Option<u64>,
}

fn default_session_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("recipe-client")
        .join("token")
}

/// Config file used when none is given explicitly: the working directory
/// first, then the user's config directory.
pub fn default_config_path() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }
    dirs::config_dir()
        .map(|dir| dir.join("recipe-client").join("config.toml"))
        .filter(|path| path.exists())
}

/// Defaults, then the config file, then `RECIPE_*` environment variables.
pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<ClientSettings> {
    let mut settings = ClientSettings::default();

    let path = config_path
        .map(Path::to_path_buf)
        .or_else(default_config_path);
    if let Some(path) = path {
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        apply_file(&mut settings, &raw)
            .with_context(|| format!("invalid config file '{}'", path.display()))?;
        debug!(path = %path.display(), "config: file loaded");
    }

    apply_env(&mut settings, |key| std::env::var(key).ok())?;
    validate_base_url(&settings.base_url)?;
    Ok(settings)
}

fn apply_file(settings: &mut ClientSettings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw)?;
    if let Some(v) = file_cfg.base_url {
        settings.base_url = v;
    }
    if let Some(v) = file_cfg.session_path {
        settings.session_path = v;
    }
    if let Some(v) = file_cfg.log_level {
        settings.log_level = v;
    }
    if let Some(v) = file_cfg.request_timeout_secs {
        settings.request_timeout_secs =
            nonzero_timeout(v).context("request_timeout_secs must be at least 1 second")?;
    }
    Ok(())
}

fn apply_env(
    settings: &mut ClientSettings,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<()> {
    if let Some(v) = lookup("RECIPE_BASE_URL") {
        settings.base_url = v;
    }
    if let Some(v) = lookup("RECIPE_SESSION_PATH") {
        settings.session_path = PathBuf::from(v);
    }
    if let Some(v) = lookup("RECIPE_LOG_LEVEL") {
        settings.log_level = v;
    }
    if let Some(v) = lookup("RECIPE_TIMEOUT_SECS") {
        settings.request_timeout_secs = v
            .trim()
            .parse::<u64>()
            .map_err(anyhow::Error::from)
            .and_then(nonzero_timeout)
            .with_context(|| {
                format!("RECIPE_TIMEOUT_SECS must be a positive number of seconds, got '{v}'")
            })?;
    }
    Ok(())
}

fn nonzero_timeout(secs: u64) -> anyhow::Result<u64> {
    if secs == 0 {
        bail!("a zero timeout would fail every request");
    }
    Ok(secs)
}

pub fn validate_base_url(raw: &str) -> anyhow::Result<()> {
    let url = Url::parse(raw).with_context(|| format!("invalid base url '{raw}'"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("base url must start with http:// or https://, got '{raw}'");
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
