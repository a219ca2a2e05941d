use std::{fs, path::Path};

use anyhow::{bail, Context};
use client_core::DEFAULT_BASE_URL;
use serde::Deserialize;
use shared::domain::DEFAULT_DEBUG_TAG;
use url::Url;

pub const DEFAULT_CONFIG_PATH: &str = "console.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub request_timeout_secs: Option<u64>,
    pub debug_tag: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            request_timeout_secs: None,
            debug_tag: DEFAULT_DEBUG_TAG.into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    base_url: Option<String>,
    request_timeout_secs: Option<u64>,
    debug_tag: Option<String>,
}

/// Defaults, then the TOML file (when present), then the environment.
pub fn load_settings(config_path: &Path) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if config_path.exists() {
        let raw = fs::read_to_string(config_path)
            .with_context(|| format!("failed to read config file '{}'", config_path.display()))?;
        apply_file(&mut settings, &raw)
            .with_context(|| format!("invalid config file '{}'", config_path.display()))?;
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw)?;
    if let Some(v) = file_cfg.base_url {
        settings.base_url = v;
    }
    if let Some(v) = file_cfg.request_timeout_secs {
        settings.request_timeout_secs = Some(v);
    }
    if let Some(v) = file_cfg.debug_tag {
        settings.debug_tag = v;
    }
    Ok(())
}

fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("CHATBOT_BASE_URL") {
        settings.base_url = v;
    }
    if let Some(v) = lookup("APP__BASE_URL") {
        settings.base_url = v;
    }

    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
        match v.parse::<u64>() {
            Ok(parsed) => settings.request_timeout_secs = Some(parsed),
            Err(err) => tracing::warn!("ignoring APP__REQUEST_TIMEOUT_SECS={v:?}: {err}"),
        }
    }
}

/// Backend URLs must be absolute http(s) URLs; the returned form has no
/// trailing slash.
pub fn validate_base_url(raw: &str) -> anyhow::Result<String> {
    let parsed = Url::parse(raw.trim()).with_context(|| format!("invalid base url '{raw}'"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        bail!("base url '{raw}' must use http or https");
    }
    if parsed.host_str().is_none() {
        bail!("base url '{raw}' has no host");
    }
    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
