use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::resolver::ResolverLimits;
use crate::validate::MAX_UPLOAD_BYTES;

/// Image fetch parameters (optional `[fetch]` section in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub connect_timeout_secs: u64,
    /// Whole-transfer timeout.
    pub timeout_secs: u64,
    pub max_redirections: u32,
    /// Largest body accepted before the transfer is aborted.
    pub max_bytes: u64,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10,
            timeout_secs: 30,
            max_redirections: 10,
            max_bytes: MAX_UPLOAD_BYTES,
            user_agent: format!("snout/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Global configuration loaded from `~/.config/snout/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnoutConfig {
    /// Maximum accepted upload size in bytes.
    pub max_upload_bytes: u64,
    /// Optional resolver bounds; if missing, built-in defaults are used.
    #[serde(default)]
    pub resolver: Option<ResolverLimits>,
    /// Optional fetch settings; if missing, built-in defaults are used.
    #[serde(default)]
    pub fetch: Option<FetchConfig>,
}

impl Default for SnoutConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: MAX_UPLOAD_BYTES,
            resolver: None,
            fetch: None,
        }
    }
}

impl SnoutConfig {
    pub fn resolver_limits(&self) -> ResolverLimits {
        self.resolver.unwrap_or_default()
    }

    pub fn fetch_config(&self) -> FetchConfig {
        self.fetch.clone().unwrap_or_default()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("snout")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<SnoutConfig> {
    load_or_init_at(&config_path()?)
}

/// Like [`load_or_init`] for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<SnoutConfig> {
    if !path.exists() {
        let default_cfg = SnoutConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("write config: {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data =
        fs::read_to_string(path).with_context(|| format!("read config: {}", path.display()))?;
    let cfg: SnoutConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}
