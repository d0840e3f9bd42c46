// Author: Dustin Pilgrim
// License: MIT

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::core::catalog::AvailabilityReport;

/// Input event kinds that count as user activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActivityKind {
    Click,
    TouchStart,
    TouchMove,
    MouseMove,
    MouseDown,
    KeyDown,
    Scroll,
}

impl ActivityKind {
    pub const ALL: [ActivityKind; 7] = [
        ActivityKind::Click,
        ActivityKind::TouchStart,
        ActivityKind::MouseMove,
        ActivityKind::KeyDown,
        ActivityKind::Scroll,
        ActivityKind::MouseDown,
        ActivityKind::TouchMove,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ActivityKind::Click => "click",
            ActivityKind::TouchStart => "touchstart",
            ActivityKind::TouchMove => "touchmove",
            ActivityKind::MouseMove => "mousemove",
            ActivityKind::MouseDown => "mousedown",
            ActivityKind::KeyDown => "keydown",
            ActivityKind::Scroll => "scroll",
        }
    }

    /// High-rate kinds whose per-event logging is throttled.
    pub fn is_continuous(self) -> bool {
        matches!(self, ActivityKind::MouseMove | ActivityKind::TouchMove)
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityKind {
    type Err = String;

    /// Accepts DOM spellings plus `touch-start` / `touch_start` variants.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n = s.trim().to_ascii_lowercase().replace(['-', '_'], "");
        match n.as_str() {
            "click" => Ok(ActivityKind::Click),
            "touchstart" => Ok(ActivityKind::TouchStart),
            "touchmove" => Ok(ActivityKind::TouchMove),
            "mousemove" => Ok(ActivityKind::MouseMove),
            "mousedown" => Ok(ActivityKind::MouseDown),
            "keydown" => Ok(ActivityKind::KeyDown),
            "scroll" => Ok(ActivityKind::Scroll),
            _ => Err(s.trim().to_string()),
        }
    }
}

/// Derived activity classification. Never stored by the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ActivityState {
    #[serde(rename = "active")]
    Active,
    #[serde(rename = "warning")]
    Warning,
    #[serde(rename = "finalWarning")]
    FinalWarning,
    #[serde(rename = "inactive")]
    Inactive,
}

impl ActivityState {
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityState::Active => "active",
            ActivityState::Warning => "warning",
            ActivityState::FinalWarning => "finalWarning",
            ActivityState::Inactive => "inactive",
        }
    }

    pub fn is_warning(self) -> bool {
        matches!(self, ActivityState::Warning | ActivityState::FinalWarning)
    }
}

impl fmt::Display for ActivityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fire-and-forget events delivered to the daemon loop by background services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Poll ticker fired.
    Poll,

    /// Display schedule ticker fired.
    ScheduleCheck,

    /// Startup availability scan of the catalog finished.
    CatalogChecked(AvailabilityReport),
}
