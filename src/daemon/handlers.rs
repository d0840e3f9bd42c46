// Author: Dustin Pilgrim
// License: MIT

use tokio::sync::mpsc;

use crate::core::{
    config::ActivityOverrides,
    error::Error,
    events::ActivityKind,
    manager_msg::{ManagerMsg, TrackingCmd},
    utils::local_now,
};

use super::{Daemon, load_catalog};

type Outcome = Result<String, String>;

impl Daemon {
    /// Raw input from the front end. A tap on the dark display also wakes it.
    pub(super) fn input(&mut self, kind: ActivityKind) -> Outcome {
        let tap = matches!(kind, ActivityKind::Click | ActivityKind::TouchStart);
        if tap && !self.display.is_on() {
            self.display.wake(local_now());
        }
        self.bus.emit(kind);
        Ok("ok".to_string())
    }

    pub(super) fn continue_pressed(&mut self) -> Outcome {
        self.session.continue_pressed();
        Ok("Continuing".to_string())
    }

    pub(super) fn close_loading(&mut self) -> Outcome {
        self.session
            .close_loading()
            .map_err(|e| Error::from(e).to_string())?;
        Ok("Start screen".to_string())
    }

    pub(super) fn start(&mut self) -> Outcome {
        if self.session.enter_player() {
            Ok("Player screen".to_string())
        } else {
            Err(format!("cannot open the player from the {} screen", self.session.screen()))
        }
    }

    pub(super) fn home(&mut self) -> Outcome {
        if self.session.leave_player() {
            Ok("Start screen".to_string())
        } else {
            Err(format!("already on the {} screen", self.session.screen()))
        }
    }

    pub(super) fn play(&mut self, track_id: u32) -> Outcome {
        self.session
            .play(track_id)
            .map_err(|e| Error::from(e).to_string())?;

        let title = self
            .session
            .catalog()
            .get(track_id)
            .map(|t| t.title.as_str())
            .unwrap_or_default();
        tracing::info!("playing track {track_id} ({title})");
        Ok(format!("Playing #{track_id} {title}"))
    }

    pub(super) fn step(&mut self, forward: bool) -> Outcome {
        let result = if forward {
            self.session.next_track()
        } else {
            self.session.prev_track()
        };
        let id = result.map_err(|e| Error::from(e).to_string())?;
        Ok(self.describe_current(id))
    }

    pub(super) fn audio_ended(&mut self) -> Outcome {
        match self.session.audio_ended() {
            Some(id) => Ok(self.describe_current(id)),
            None => Ok("Audio ended".to_string()),
        }
    }

    fn describe_current(&self, id: u32) -> String {
        let title = self
            .session
            .catalog()
            .get(id)
            .map(|t| t.title.as_str())
            .unwrap_or_default();
        if self.session.is_audio_playing() {
            format!("Playing #{id} {title}")
        } else {
            format!("Selected #{id} {title} (unavailable)")
        }
    }

    pub(super) fn tracking(&mut self, cmd: TrackingCmd) -> Outcome {
        match cmd {
            TrackingCmd::Pause => {
                self.session.pause_tracking();
                Ok("Activity tracking paused".to_string())
            }
            TrackingCmd::Resume => {
                self.session.resume_tracking();
                Ok("Activity tracking resumed".to_string())
            }
        }
    }

    pub(super) fn wake(&mut self) -> Outcome {
        if self.display.wake(local_now()) {
            Ok("Display on".to_string())
        } else {
            Ok("Display already on".to_string())
        }
    }

    pub(super) fn list_tracks(&self) -> String {
        let catalog = self.session.catalog();
        if catalog.is_empty() {
            return "No tracks\n".to_string();
        }

        let availability = self.session.availability();
        let mut out = String::new();

        for t in catalog.tracks() {
            let year = match t.year() {
                0 => "----".to_string(),
                y => y.to_string(),
            };
            let flags = availability.flags(t.id);
            let missing = if flags.is_empty() {
                String::new()
            } else {
                format!("  [{}]", flags.join(", "))
            };

            if t.composer.is_empty() {
                out.push_str(&format!("{:>3}  {year}  {}{missing}\n", t.id, t.title));
            } else {
                out.push_str(&format!("{:>3}  {year}  {} - {}{missing}\n", t.id, t.title, t.composer));
            }
        }

        out
    }

    /// Re-read the config file and apply it without dropping the session.
    pub(super) fn reload(&mut self, tx: &mpsc::Sender<ManagerMsg>) -> Outcome {
        let cfg = crate::config::load_from_path(&self.config_path).map_err(|e| format!("{e:#}"))?;

        self.session
            .reconfigure(&ActivityOverrides::from(&cfg.activity))
            .map_err(|e| Error::from(e).to_string())?;

        self.display.set_schedule(cfg.schedule, local_now());

        let poll_changed = cfg.poll_interval_ms != self.config.poll_interval_ms;
        let catalog_changed = cfg.catalog != self.config.catalog;
        self.config = cfg;

        if poll_changed {
            self.restart_poll_ticker(tx);
        }

        if catalog_changed {
            self.session.replace_catalog(load_catalog(&self.config.catalog));
        }
        // files may have appeared or vanished even if the paths did not change
        self.invalidate_availability();
        self.spawn_availability_scan(tx);

        tracing::info!("config reloaded from {}", self.config_path.display());
        Ok(format!("Reloaded {}", self.config_path.display()))
    }
}
