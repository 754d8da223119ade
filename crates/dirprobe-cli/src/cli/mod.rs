//! CLI for the dirprobe web path discovery tool.

use anyhow::{Context, Result};
use clap::Parser;
use dirprobe_core::config::{self, ProbeConfig};
use dirprobe_core::probe::CurlTransport;
use dirprobe_core::scan;
use std::path::PathBuf;

/// Brute-force web paths on a target from a wordlist.
#[derive(Debug, Parser)]
#[command(name = "dirprobe")]
#[command(
    about = "Discover accessible paths on a web server from a wordlist",
    long_about = None
)]
pub struct Cli {
    /// The target URL. If no scheme is supplied, 'https://' is used.
    #[arg(short, long)]
    pub target: String,

    /// Path to a newline-delimited wordlist.
    #[arg(short, long)]
    pub wordlist: PathBuf,

    /// Maximum concurrent requests (default: 2 x logical cores + 1).
    #[arg(long, value_name = "N")]
    pub workers: Option<usize>,

    /// Per-request timeout in seconds (default 5).
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

impl Cli {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = match config::load_or_init() {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!("config unavailable, using defaults: {:#}", e);
                ProbeConfig::default()
            }
        };
        let cfg = cli.apply_overrides(cfg);
        tracing::debug!("effective config: {:?}", cfg);

        let workers = cfg.effective_workers();
        let transport = CurlTransport::new(cfg.curl_options());
        let Cli {
            target, wordlist, ..
        } = cli;

        let summary = tokio::task::spawn_blocking(move || {
            let stdout = std::io::stdout();
            scan::run_scan(&target, &wordlist, transport, workers, stdout.lock())
        })
        .await
        .context("scan task")??;

        tracing::info!("scan summary: {:?}", summary);
        Ok(())
    }

    /// Flags take precedence over config file values.
    pub fn apply_overrides(&self, mut cfg: ProbeConfig) -> ProbeConfig {
        if let Some(n) = self.workers {
            cfg.workers = Some(n);
        }
        if let Some(secs) = self.timeout {
            cfg.timeout_secs = secs;
        }
        cfg
    }
}
