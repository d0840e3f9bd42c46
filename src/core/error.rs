// Author: Dustin Pilgrim
// License: MIT

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Configuration was rejected at construction or reconfiguration.
    ///
    /// Examples:
    /// - final warning window not shorter than the reset time
    /// - audio multiplier zero or negative
    /// - unknown event name in `track_events`
    InvalidConfig(ConfigError),

    /// A request was rejected because it is invalid on the current screen.
    ///
    /// Examples:
    /// - play while on the start screen
    /// - play of a track whose file is missing
    InvalidState(SessionError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `final_warning_time` is zero.
    ZeroFinalWarning,

    /// `final_warning_time >= reset_time`.
    FinalWarningNotBeforeReset,

    /// `warning_time >= reset_time`.
    WarningNotBeforeReset,

    /// Multiplier is not a finite positive number.
    InvalidMultiplier,

    /// `track_events` resolved to an empty set.
    NoTrackedEvents,

    UnknownEvent(String),

    /// Schedule time not in `HH:MM` form.
    InvalidTime(String),

    ZeroPollInterval,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    NotOnPlayer,
    UnknownTrack(u32),
    TrackUnavailable(u32),
    EmptyCatalog,

    /// Loading screen closed before the first availability scan finished.
    ScanPending,
    LoadingClosed,
}

// ---------------- Display ----------------

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidConfig(e) => write!(f, "invalid config: {e}"),
            Error::InvalidState(e) => write!(f, "{e}"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroFinalWarning =>
                write!(f, "final_warning_time must be greater than zero"),
            ConfigError::FinalWarningNotBeforeReset =>
                write!(f, "final_warning_time must be less than reset_time"),
            ConfigError::WarningNotBeforeReset =>
                write!(f, "warning_time must be less than reset_time"),
            ConfigError::InvalidMultiplier =>
                write!(f, "audio_playback_multiplier must be a positive number"),
            ConfigError::NoTrackedEvents =>
                write!(f, "track_events must name at least one event"),
            ConfigError::UnknownEvent(name) =>
                write!(f, "unknown event '{name}' in track_events"),
            ConfigError::InvalidTime(raw) =>
                write!(f, "invalid time '{raw}' (expected HH:MM)"),
            ConfigError::ZeroPollInterval =>
                write!(f, "poll_interval_ms must be greater than zero"),
        }
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::NotOnPlayer =>
                write!(f, "not on the player screen"),
            SessionError::UnknownTrack(id) =>
                write!(f, "unknown track {id}"),
            SessionError::TrackUnavailable(id) =>
                write!(f, "track {id} is unavailable"),
            SessionError::EmptyCatalog =>
                write!(f, "the catalog has no tracks"),
            SessionError::ScanPending =>
                write!(f, "media files are still being checked"),
            SessionError::LoadingClosed =>
                write!(f, "the loading screen is already closed"),
        }
    }
}

impl std::error::Error for Error {}
impl std::error::Error for ConfigError {}
impl std::error::Error for SessionError {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::InvalidConfig(e)
    }
}

impl From<SessionError> for Error {
    fn from(e: SessionError) -> Self {
        Error::InvalidState(e)
    }
}
