// Author: Dustin Pilgrim
// License: MIT

use serde::Serialize;

use crate::core::{
    coordinator::ActivitySnapshot,
    events::ActivityState,
    session::Screen,
};

/// What the inactivity dialog should show right now.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WarningView {
    pub open: bool,
    pub is_final: bool,
    /// Share of the total timeout still left, 0..=100.
    pub progress_percent: f64,
    pub remaining_seconds: u64,
    pub title: String,
    pub message: String,
}

impl WarningView {
    /// The dialog is only ever shown on the player screen.
    pub fn project(screen: Screen, snap: &ActivitySnapshot) -> Self {
        let open = screen == Screen::Player && snap.activity_state.is_warning();
        let is_final = snap.activity_state == ActivityState::FinalWarning;

        let progress_percent = if snap.total_timeout_ms == 0 {
            0.0
        } else {
            (snap.time_remaining_ms as f64 / snap.total_timeout_ms as f64 * 100.0).clamp(0.0, 100.0)
        };

        let remaining_seconds = snap.time_remaining_ms.div_ceil(1000);

        let (title, message) = if is_final {
            (
                "Final warning - inactivity detected".to_string(),
                format!("The kiosk will return to the start screen in {remaining_seconds} seconds."),
            )
        } else {
            (
                "Inactivity detected".to_string(),
                "Do you want to continue? If there is no further activity the kiosk will return to the start screen."
                    .to_string(),
            )
        };

        Self {
            open,
            is_final,
            progress_percent,
            remaining_seconds,
            title,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(state: ActivityState, remaining: u64, total: u64) -> ActivitySnapshot {
        ActivitySnapshot {
            activity_state: state,
            time_remaining_ms: remaining,
            total_timeout_ms: total,
        }
    }

    #[test]
    fn opens_only_on_player_during_warnings() {
        let w = snap(ActivityState::Warning, 20_000, 60_000);
        assert!(WarningView::project(Screen::Player, &w).open);
        assert!(!WarningView::project(Screen::Start, &w).open);
        assert!(!WarningView::project(Screen::Loading, &w).open);

        let a = snap(ActivityState::Active, 50_000, 60_000);
        assert!(!WarningView::project(Screen::Player, &a).open);

        let i = snap(ActivityState::Inactive, 0, 60_000);
        assert!(!WarningView::project(Screen::Player, &i).open);
    }

    #[test]
    fn final_warning_counts_down_whole_seconds() {
        let v = WarningView::project(Screen::Player, &snap(ActivityState::FinalWarning, 4_001, 60_000));
        assert!(v.open);
        assert!(v.is_final);
        assert_eq!(v.remaining_seconds, 5);
        assert_eq!(v.message, "The kiosk will return to the start screen in 5 seconds.");
    }

    #[test]
    fn progress_is_share_of_total() {
        let v = WarningView::project(Screen::Player, &snap(ActivityState::Warning, 15_000, 60_000));
        assert_eq!(v.progress_percent, 25.0);
        assert!(!v.is_final);

        let v = WarningView::project(Screen::Player, &snap(ActivityState::Warning, 90_000, 60_000));
        assert_eq!(v.progress_percent, 100.0);

        let v = WarningView::project(Screen::Player, &snap(ActivityState::Warning, 1_000, 0));
        assert_eq!(v.progress_percent, 0.0);
    }
}
