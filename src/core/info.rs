// Author: Dustin Pilgrim
// License: MIT

use serde::Serialize;

use crate::core::{
    detector::Thresholds,
    display::DisplayController,
    events::ActivityState,
    session::{KioskSession, Screen},
    utils::format_duration_ms,
    warning::WarningView,
};

/// Snapshot returned from the daemon for `kiosk info`.
///
/// The serialized form is the stable JSON contract; `pretty_text` is what
/// the CLI prints without `--json`.
#[derive(Debug, Clone, Serialize)]
pub struct InfoSnapshot {
    pub screen: Screen,
    pub activity_state: ActivityState,
    pub time_remaining_ms: u64,
    pub total_timeout_ms: u64,
    pub tracking_paused: bool,
    pub audio_playing: bool,
    pub now_playing: Option<u32>,
    pub thresholds: Thresholds,
    pub display_on: bool,
    /// Manual wake expiry, `YYYY-MM-DD HH:MM` local time.
    pub display_override_until: Option<String>,
    pub warning: WarningView,
    pub tracks: TrackCounts,

    #[serde(skip_serializing)]
    pub pretty_text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrackCounts {
    pub total: usize,
    pub unavailable: usize,
    pub missing_metadata: usize,
    pub missing_covers: usize,
}

impl InfoSnapshot {
    pub fn capture(session: &KioskSession, display: &DisplayController) -> Self {
        let snap = session.snapshot();
        let coordinator = session.coordinator();
        let report = session.availability();

        let mut info = Self {
            screen: session.screen(),
            activity_state: snap.activity_state,
            time_remaining_ms: snap.time_remaining_ms,
            total_timeout_ms: snap.total_timeout_ms,
            tracking_paused: coordinator.is_paused(),
            audio_playing: session.is_audio_playing(),
            now_playing: session.now_playing(),
            thresholds: coordinator.thresholds(),
            display_on: display.is_on(),
            display_override_until: display
                .override_until()
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string()),
            warning: session.warning(),
            tracks: TrackCounts {
                total: session.catalog().len(),
                unavailable: report.unavailable.len(),
                missing_metadata: report.missing_metadata.len(),
                missing_covers: report.missing_covers.len(),
            },
            pretty_text: String::new(),
        };

        let title = info
            .now_playing
            .and_then(|id| session.catalog().get(id))
            .map(|t| t.title.as_str());
        info.pretty_text = info.render(title);
        info
    }

    fn render(&self, now_playing_title: Option<&str>) -> String {
        let mut out = String::new();

        out.push_str(&format!("Screen:     {}\n", self.screen));
        match (&self.display_override_until, self.display_on) {
            (Some(until), _) => out.push_str(&format!("Display:    on (woken until {until})\n")),
            (None, true) => out.push_str("Display:    on\n"),
            (None, false) => out.push_str("Display:    off\n"),
        }

        let state = if self.tracking_paused {
            format!("{} (paused)", self.activity_state)
        } else {
            self.activity_state.to_string()
        };
        out.push_str(&format!("Activity:   {state}\n"));
        out.push_str(&format!(
            "Reset in:   {} of {}\n",
            format_duration_ms(self.time_remaining_ms),
            format_duration_ms(self.total_timeout_ms)
        ));
        out.push_str(&format!(
            "Thresholds: warning {}, final {}, reset {}\n",
            format_duration_ms(self.thresholds.warning_at_ms),
            format_duration_ms(self.thresholds.final_warning_at_ms),
            format_duration_ms(self.thresholds.reset_at_ms)
        ));

        match (self.now_playing, now_playing_title) {
            (Some(id), Some(title)) => {
                let status = if self.audio_playing { "playing" } else { "paused" };
                out.push_str(&format!("Audio:      #{id} {title} ({status})\n"));
            }
            (Some(id), None) => out.push_str(&format!("Audio:      #{id}\n")),
            (None, _) => out.push_str("Audio:      none\n"),
        }

        let t = &self.tracks;
        out.push_str(&format!(
            "Tracks:     {} ({} unavailable, {} missing metadata, {} missing covers)\n",
            t.total, t.unavailable, t.missing_metadata, t.missing_covers
        ));

        if self.warning.open {
            out.push_str(&format!("Warning:    {}\n", self.warning.title));
        }

        out
    }
}
