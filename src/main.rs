//! CLI entry point for the favicon service.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use favicon_core::config::ensure_secure_hash_key;
use favicon_core::{AppConfig, ConfigStore, FaviconService, web};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{Args, Command};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    let store = ConfigStore::discover(args.config.as_deref());
    let mut config = store.load().context("failed to load configuration")?;

    init_tracing(&args, &config)?;
    debug!(?args, config_path = ?store.path(), "CLI arguments parsed");

    config.validate().context("invalid configuration")?;
    ensure_secure_hash_key(&store, &mut config).context("failed to rotate hash_key")?;

    let service = Arc::new(
        FaviconService::from_config(&config).context("failed to initialize favicon service")?,
    );

    match args.command {
        Command::Serve { listen } => {
            let addr = listen.unwrap_or(config.listen_addr);
            info!(%addr, cache_dir = %config.cache_dir.display(), "favicon service starting");
            web::serve(service, addr)
                .await
                .with_context(|| format!("server on {addr} failed"))?;
            info!("favicon service stopped");
        }
        Command::Fetch {
            url,
            output,
            refresh,
        } => {
            let served = service.get_favicon(&url, refresh).await?;
            info!(
                source = served.source.as_deref().unwrap_or("-"),
                from_cache = served.from_cache,
                is_default = served.is_default,
                bytes = served.bytes.len(),
                "favicon fetched"
            );
            match output {
                Some(path) => std::fs::write(&path, &served.bytes)
                    .with_context(|| format!("cannot write {}", path.display()))?,
                None => {
                    let mut stdout = io::stdout().lock();
                    stdout.write_all(&served.bytes)?;
                    stdout.flush()?;
                }
            }
        }
    }

    Ok(())
}

/// Installs the global subscriber.
///
/// Priority: `RUST_LOG` env var > quiet flag > verbose flag > `debug_mode` > default (info).
/// With `debug_mode` and `log_file` both set, output is appended to that file.
fn init_tracing(args: &Args, config: &AppConfig) -> Result<()> {
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 if config.debug_mode => "debug",
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if config.debug_mode
        && let Some(path) = &config.log_file
    {
        let file: File = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("cannot open log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    }
    Ok(())
}
