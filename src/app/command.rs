// Author: Dustin Pilgrim
// License: MIT

use crate::cli::Command;

type AnyError = Box<dyn std::error::Error + Send + Sync>;

/// Request line sent to the daemon, plus what to print on an empty reply.
fn request_for(cmd: &Command) -> (String, Option<&'static str>) {
    match cmd {
        Command::Input { event } => (format!("input {event}"), None),
        Command::CloseLoading => ("close-loading".into(), None),
        Command::Continue => ("continue".into(), Some("Continuing")),
        Command::Start => ("start".into(), None),
        Command::Home => ("home".into(), None),
        Command::Play { track } => (format!("play {track}"), None),
        Command::PauseAudio => ("pause-audio".into(), Some("Audio paused")),
        Command::AudioEnded => ("audio-ended".into(), Some("Audio ended")),
        Command::Next => ("next".into(), None),
        Command::Prev => ("prev".into(), None),
        Command::Pause => ("tracking pause".into(), Some("Activity tracking paused")),
        Command::Resume => ("tracking resume".into(), Some("Activity tracking resumed")),
        Command::Wake => ("wake".into(), None),
        Command::Info { json: true } => ("info --json".into(), None),
        Command::Info { json: false } => ("info".into(), None),
        Command::Tracks => ("tracks".into(), None),
        Command::Reload => ("reload".into(), Some("Configuration reloaded")),
        Command::Stop => ("stop".into(), Some("Stopping kiosk daemon")),
    }
}

pub async fn run(cmd: Command) -> Result<(), AnyError> {
    let (msg, fallback) = request_for(&cmd);

    let resp = match crate::ipc::client::send_raw(&msg).await {
        Ok(resp) => resp,
        Err(e) => {
            if let Command::Info { json: true } = cmd {
                // status bars need valid JSON even when the daemon is down
                println!(r#"{{"screen":null,"running":false}}"#);
            } else {
                eprintln!("kiosk: {e}");
            }
            return Ok(());
        }
    };

    let out = resp.trim_end();
    if let Some(err) = out.strip_prefix("ERROR: ") {
        eprintln!("kiosk: {err}");
        std::process::exit(1);
    }

    match (out.is_empty(), fallback) {
        (false, _) => println!("{out}"),
        (true, Some(text)) => println!("{text}"),
        (true, None) => {}
    }
    Ok(())
}
