// Author: Dustin Pilgrim
// License: MIT

use crate::core::{events::ActivityKind, manager_msg::TrackingCmd};

/// One parsed line of the IPC protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    Input(ActivityKind),
    CloseLoading,
    Continue,
    Start,
    Home,
    Play(u32),
    PauseAudio,
    AudioEnded,
    Next,
    Prev,
    Tracking(TrackingCmd),
    Wake,
    Info { json: bool },
    Tracks,
    Reload,
    Stop,
}

impl Request {
    /// Requests sent many times per second are kept out of the debug log.
    pub fn is_chatty(&self) -> bool {
        matches!(self, Request::Input(_) | Request::Info { json: true })
    }
}

pub fn parse_request(line: &str) -> Result<Request, String> {
    let mut words = line.split_whitespace();
    let Some(cmd) = words.next() else {
        return Err("empty request".to_string());
    };
    let arg = words.next();

    if let Some(extra) = words.next() {
        return Err(format!("unexpected argument '{extra}' for '{cmd}'"));
    }

    let no_arg = |req: Request| match arg {
        None => Ok(req),
        Some(a) => Err(format!("'{cmd}' takes no argument (got '{a}')")),
    };

    match cmd {
        "input" => {
            let raw = arg.ok_or_else(|| "usage: input <event>".to_string())?;
            raw.parse::<ActivityKind>()
                .map(Request::Input)
                .map_err(|e| format!("unknown event '{e}'"))
        }
        "close-loading" | "close_loading" => no_arg(Request::CloseLoading),
        "continue" => no_arg(Request::Continue),
        "start" => no_arg(Request::Start),
        "home" => no_arg(Request::Home),
        "play" => {
            let raw = arg.ok_or_else(|| "usage: play <track-id>".to_string())?;
            raw.parse::<u32>()
                .map(Request::Play)
                .map_err(|_| format!("invalid track id '{raw}'"))
        }
        "pause-audio" | "pause_audio" => no_arg(Request::PauseAudio),
        "audio-ended" | "audio_ended" => no_arg(Request::AudioEnded),
        "next" => no_arg(Request::Next),
        "prev" | "previous" => no_arg(Request::Prev),
        "tracking" => match arg {
            Some("pause") => Ok(Request::Tracking(TrackingCmd::Pause)),
            Some("resume") => Ok(Request::Tracking(TrackingCmd::Resume)),
            _ => Err("usage: tracking pause|resume".to_string()),
        },
        "wake" => no_arg(Request::Wake),
        "info" => match arg {
            None => Ok(Request::Info { json: false }),
            Some("--json") => Ok(Request::Info { json: true }),
            Some(a) => Err(format!("unknown info option '{a}'")),
        },
        "tracks" => no_arg(Request::Tracks),
        "reload" => no_arg(Request::Reload),
        "stop" => no_arg(Request::Stop),
        other => Err(format!("unknown command '{other}'")),
    }
}
