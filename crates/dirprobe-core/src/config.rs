use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::dispatcher::default_workers;
use crate::probe::{CurlOptions, DEFAULT_MAX_REDIRECTS};

fn default_user_agent() -> String {
    concat!("dirprobe/", env!("CARGO_PKG_VERSION")).to_string()
}

/// Global configuration loaded from `~/.config/dirprobe/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Worker pool size; if missing, `2 × logical cores + 1`.
    #[serde(default)]
    pub workers: Option<usize>,
    /// Per-request deadline in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Follow 3xx redirects and report the final status.
    #[serde(default = "default_follow_redirects")]
    pub follow_redirects: bool,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_follow_redirects() -> bool {
    true
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            workers: None,
            timeout_secs: default_timeout_secs(),
            follow_redirects: default_follow_redirects(),
            user_agent: default_user_agent(),
        }
    }
}

impl ProbeConfig {
    /// Worker count to run with (at least 1).
    pub fn effective_workers(&self) -> usize {
        self.workers.unwrap_or_else(default_workers).max(1)
    }

    pub fn curl_options(&self) -> CurlOptions {
        CurlOptions {
            timeout: Duration::from_secs(self.timeout_secs.max(1)),
            follow_redirects: self.follow_redirects,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            user_agent: self.user_agent.clone(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("dirprobe")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ProbeConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ProbeConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: ProbeConfig = toml::from_str(&data)?;
    Ok(cfg)
}
