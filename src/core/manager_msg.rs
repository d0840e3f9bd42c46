// Author: Dustin Pilgrim
// License: MIT

use tokio::sync::oneshot;

use crate::core::{events::{ActivityKind, Event}, info::InfoSnapshot};

pub type Reply = oneshot::Sender<Result<String, String>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingCmd {
    Pause,
    Resume,
}

/// Everything the daemon loop consumes: service events plus IPC requests.
#[derive(Debug)]
pub enum ManagerMsg {
    Event(Event),

    Input { kind: ActivityKind, reply: Reply },

    /// "Continue" in the inactivity dialog.
    Continue { reply: Reply },

    /// Close button on the loading screen.
    CloseLoading { reply: Reply },

    /// Start screen -> player.
    Start { reply: Reply },

    /// Player -> start screen.
    Home { reply: Reply },

    Play { track_id: u32, reply: Reply },
    PauseAudio { reply: Reply },
    AudioEnded { reply: Reply },

    /// Next (`forward`) or previous track.
    Step { forward: bool, reply: Reply },

    Tracking { cmd: TrackingCmd, reply: Reply },

    /// Tap on the dark display.
    Wake { reply: Reply },

    GetInfo { reply: oneshot::Sender<InfoSnapshot> },
    Tracks { reply: Reply },

    ReloadConfig { reply: Reply },
    StopDaemon { reply: Reply },
}
