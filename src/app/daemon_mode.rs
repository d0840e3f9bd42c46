// Author: Dustin Pilgrim
// License: MIT

use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::Args;
use crate::daemon::Daemon;
use crate::kiosk_log::{self, LogPolicy};

type AnyError = Box<dyn std::error::Error + Send + Sync>;

/// Console output only with `--verbose`; the log file always gets everything
/// at the selected level. `RUST_LOG` overrides the level.
fn init_logging(verbose: bool) -> Option<PathBuf> {
    let default_level = if verbose { "kiosk=debug,warn" } else { "kiosk=info,warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let log_path = crate::app::platform::default_log_path();
    let file = log_path.as_deref().and_then(|path| {
        kiosk_log::open_for_run(path, LogPolicy::default())
            .map_err(|e| eprintln!("kiosk: file logging disabled ({}): {e}", path.display()))
            .ok()
    });

    let file_layer = file.map(|f| fmt::layer().with_writer(Mutex::new(f)).with_ansi(false));
    let console_layer = verbose.then(|| fmt::layer().with_target(false));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    log_path
}

pub async fn run(args: Args) -> Result<(), AnyError> {
    // single-instance
    let _instance_lock = crate::app::platform::acquire_single_instance_lock().map_err(|e| {
        eprintln!("kiosk: {e}");
        io::Error::new(io::ErrorKind::AlreadyExists, e)
    })?;

    if let Some(path) = init_logging(args.verbose) {
        tracing::info!("file logging: {}", path.display());
    }
    tracing::debug!("debug logging enabled");
    tracing::info!("kiosk starting");

    let config_path: PathBuf = match args.config.as_deref() {
        Some(p) => p.to_path_buf(),
        None => crate::config::resolve_default_config_path(),
    };

    let cfg = crate::config::load_from_path(&config_path).map_err(|e| {
        tracing::error!("{e:#}");
        eprintln!("kiosk: {e:#}");
        io::Error::new(io::ErrorKind::InvalidData, format!("{e:#}"))
    })?;

    // shutdown
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

    let mut daemon = Daemon::new(cfg, config_path);

    let mut daemon_task = tokio::spawn({
        let shutdown_tx = shutdown_tx.clone();
        async move { daemon.run(shutdown_rx, shutdown_tx).await }
    });

    let res = tokio::select! {
        res = &mut daemon_task => res,

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("received Ctrl+C, shutting down");
            let _ = shutdown_tx.send(true);
            daemon_task.await
        }
    };

    match res {
        Ok(inner) => inner,
        Err(join_err) => Err(Box::new(join_err)),
    }
}
