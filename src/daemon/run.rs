// Author: Dustin Pilgrim
// License: MIT

use tokio::sync::{mpsc, watch};

use crate::core::{
    events::Event,
    info::InfoSnapshot,
    manager_msg::ManagerMsg,
};

use super::{AnyError, Daemon};

impl Daemon {
    pub async fn run(
        &mut self,
        mut shutdown: watch::Receiver<bool>,
        shutdown_tx: watch::Sender<bool>,
    ) -> Result<(), AnyError> {
        tracing::info!("daemon starting");

        let (tx, mut rx) = mpsc::channel::<ManagerMsg>(256);

        if let Err(e) = crate::ipc::server::spawn_ipc_server(tx.clone()).await {
            tracing::warn!("ipc: failed to start: {}", e);
        }

        self.restart_poll_ticker(&tx);
        tokio::spawn(crate::services::ticker::run_schedule_ticker(tx.clone()));
        self.invalidate_availability();
        self.spawn_availability_scan(&tx);

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        tracing::info!("daemon stopping (shutdown requested)");
                        break;
                    }
                }

                maybe = rx.recv() => {
                    let Some(msg) = maybe else {
                        tracing::info!("daemon stopping (event channel closed)");
                        break;
                    };

                    match msg {
                        ManagerMsg::Event(event) => self.handle_event(event),

                        ManagerMsg::Input { kind, reply } => {
                            let _ = reply.send(self.input(kind));
                        }
                        ManagerMsg::Continue { reply } => {
                            let _ = reply.send(self.continue_pressed());
                        }
                        ManagerMsg::Start { reply } => {
                            let _ = reply.send(self.start());
                        }
                        ManagerMsg::Home { reply } => {
                            let _ = reply.send(self.home());
                        }
                        ManagerMsg::Play { track_id, reply } => {
                            let _ = reply.send(self.play(track_id));
                        }
                        ManagerMsg::PauseAudio { reply } => {
                            self.session.pause_audio();
                            let _ = reply.send(Ok("Audio paused".to_string()));
                        }
                        ManagerMsg::AudioEnded { reply } => {
                            let _ = reply.send(self.audio_ended());
                        }
                        ManagerMsg::CloseLoading { reply } => {
                            let _ = reply.send(self.close_loading());
                        }
                        ManagerMsg::Step { forward, reply } => {
                            let _ = reply.send(self.step(forward));
                        }
                        ManagerMsg::Tracking { cmd, reply } => {
                            let _ = reply.send(self.tracking(cmd));
                        }
                        ManagerMsg::Wake { reply } => {
                            let _ = reply.send(self.wake());
                        }
                        ManagerMsg::GetInfo { reply } => {
                            let _ = reply.send(InfoSnapshot::capture(&self.session, &self.display));
                        }
                        ManagerMsg::Tracks { reply } => {
                            let _ = reply.send(Ok(self.list_tracks()));
                        }
                        ManagerMsg::ReloadConfig { reply } => {
                            let _ = reply.send(self.reload(&tx));
                        }
                        ManagerMsg::StopDaemon { reply } => {
                            tracing::info!("daemon stopping (stop requested via IPC)");
                            let _ = reply.send(Ok("Stopping kiosk daemon".to_string()));
                            let _ = shutdown_tx.send(true);
                            break;
                        }
                    }
                }
            }
        }

        if let Some(ticker) = self.poll_ticker.take() {
            ticker.abort();
        }
        self.session.shutdown();

        if let Ok(path) = crate::ipc::socket_path() {
            let _ = std::fs::remove_file(path);
        }

        Ok(())
    }

    pub(super) fn handle_event(&mut self, event: Event) {
        match event {
            Event::Poll => {
                self.session.tick();
            }
            Event::ScheduleCheck => {
                self.display.check(crate::core::utils::local_now());
            }
            Event::CatalogChecked(report) => {
                if self.session.loading_complete(report) {
                    tracing::info!("media check finished, loading screen can be closed");
                }
            }
        }
    }
}
