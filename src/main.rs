mod attendance;
mod config;
mod dataset;
mod finance;
mod ipc;
mod model;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::io::{self, BufRead, Write};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing(filter: &str) -> Result<()> {
    let filter = EnvFilter::try_new(filter)
        .with_context(|| format!("invalid log filter {:?}", filter))?;
    // stdout carries responses; logs must stay on stderr.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("tracing init failed: {}", e))
}

fn main() -> Result<()> {
    let cfg = config::Config::from_args(config::Args::parse())?;
    init_tracing(&cfg.log)?;

    let mut state = ipc::AppState::new(cfg.clone());
    if let Some(path) = cfg.dataset.as_deref() {
        if let Err(e) = ipc::preload_dataset(&mut state, path) {
            warn!(error = %e.message, "continuing without dataset");
        }
    }
    info!(version = env!("CARGO_PKG_VERSION"), "schoold ready");

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "stdin closed");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: ipc::Request = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                // No id to echo back.
                let resp = ipc::err("", "bad_json", e.to_string(), None);
                writeln!(stdout, "{}", resp).context("write response")?;
                stdout.flush().context("flush response")?;
                continue;
            }
        };

        let resp = ipc::handle_request(&mut state, req);
        writeln!(stdout, "{}", resp).context("write response")?;
        stdout.flush().context("flush response")?;
    }
    Ok(())
}
