// Author: Dustin Pilgrim
// License: MIT

mod handlers;
mod run;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::core::{
    catalog::{AvailabilityCache, Catalog},
    clock::{Clock, SystemClock},
    config::{CatalogConfig, KioskConfig},
    coordinator::ActivityCoordinator,
    detector::ActivityDetection,
    display::DisplayController,
    events::Event,
    input::InputBus,
    manager_msg::ManagerMsg,
    session::KioskSession,
    utils::{local_now, lock},
};

type AnyError = Box<dyn std::error::Error + Send + Sync>;

/// Owns the session, the display state and the input bus. Everything is
/// mutated from the message loop in [`Daemon::run`] only.
pub struct Daemon {
    session: KioskSession,
    display: DisplayController,
    bus: Arc<InputBus>,
    availability: Arc<Mutex<AvailabilityCache>>,

    config: KioskConfig,
    config_path: PathBuf,

    poll_ticker: Option<JoinHandle<()>>,
}

impl Daemon {
    pub fn new(config: KioskConfig, config_path: PathBuf) -> Self {
        let bus = Arc::new(InputBus::new());
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let detector = ActivityDetection::new(config.activity.clone(), clock, bus.clone());
        let catalog = load_catalog(&config.catalog);
        let session = KioskSession::new(ActivityCoordinator::new(detector), catalog);
        let display = DisplayController::new(config.schedule, local_now());
        let availability = Arc::new(Mutex::new(AvailabilityCache::new(
            config.catalog.media_root.clone(),
        )));

        let display_on = display.is_on();
        tracing::debug!(
            "daemon: tracks={}, display_on={}, schedule_enabled={}, config_path={}",
            session.catalog().len(),
            display_on,
            config.schedule.enabled,
            config_path.display(),
        );

        Self {
            session,
            display,
            bus,
            availability,
            config,
            config_path,
            poll_ticker: None,
        }
    }

    /// Check media files off the daemon task and report back as an event.
    fn spawn_availability_scan(&self, tx: &mpsc::Sender<ManagerMsg>) {
        let catalog = self.session.catalog().clone();
        let cache = Arc::clone(&self.availability);
        let tx = tx.clone();

        tokio::spawn(async move {
            let scan = tokio::task::spawn_blocking(move || {
                let mut cache = lock(&cache);
                cache.check_all(&catalog)
            });

            match scan.await {
                Ok(report) => {
                    let _ = tx.send(ManagerMsg::Event(Event::CatalogChecked(report))).await;
                }
                Err(e) => tracing::error!("catalog: availability scan failed: {e}"),
            }
        });
    }

    /// Forget cached file checks so the next scan sees the disk as it is now.
    fn invalidate_availability(&self) {
        let mut cache = lock(&self.availability);
        let root = &self.config.catalog.media_root;
        if cache.media_root() != root.as_path() {
            cache.set_media_root(root.clone());
        } else {
            cache.clear();
        }
    }

    fn restart_poll_ticker(&mut self, tx: &mpsc::Sender<ManagerMsg>) {
        if let Some(old) = self.poll_ticker.take() {
            old.abort();
        }
        self.poll_ticker = Some(tokio::spawn(crate::services::ticker::run_poll_ticker(
            tx.clone(),
            self.config.poll_interval_ms,
        )));
    }
}

fn load_catalog(cfg: &CatalogConfig) -> Catalog {
    Catalog::load(&cfg.path).unwrap_or_else(|e| {
        tracing::error!("catalog: {e:#}");
        Catalog::default()
    })
}
