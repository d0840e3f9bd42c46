// Author: Dustin Pilgrim
// License: MIT

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "kiosk",
    version = env!("CARGO_PKG_VERSION"),
    about = "Activity supervisor for museum listening kiosks"
)]
pub struct Args {
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Debug logging, mirrored to the console.
    #[arg(short, long, action)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    #[command(about = "Forward an input event (click, touchstart, mousemove, ...)")]
    Input { event: String },

    #[command(about = "Close the loading screen once media files are checked")]
    CloseLoading,

    #[command(about = "Answer the inactivity dialog with \"continue\"")]
    Continue,

    #[command(about = "Leave the start screen for the player")]
    Start,

    #[command(about = "Return from the player to the start screen")]
    Home,

    #[command(about = "Play a track by id")]
    Play { track: u32 },

    #[command(about = "Report that audio was paused")]
    PauseAudio,

    #[command(about = "Report that audio finished; moves on to the next track")]
    AudioEnded,

    #[command(about = "Skip to the next track")]
    Next,

    #[command(about = "Go back to the previous track")]
    Prev,

    #[command(about = "Freeze the activity countdown")]
    Pause,

    #[command(about = "Resume the activity countdown from a fresh timer")]
    Resume,

    #[command(about = "Turn the display on until the next scheduled switch")]
    Wake,

    #[command(about = "Display current session information")]
    Info {
        #[arg(long)]
        json: bool,
    },

    #[command(about = "List the track catalog")]
    Tracks,

    #[command(about = "Reload the configuration without restarting the daemon")]
    Reload,

    #[command(about = "Stop the running daemon")]
    Stop,
}
