// Author: Dustin Pilgrim
// License: MIT

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{UnixListener, UnixStream},
    sync::{mpsc, oneshot},
    time::{Duration, timeout},
};

use crate::core::manager_msg::{ManagerMsg, Reply};

use super::request::{Request, parse_request};

const MAX_REQUEST_BYTES: u64 = 1024;
const CONNECTION_TIMEOUT: Duration = Duration::from_secs(10);

/// Binds the control socket and serves connections in the background.
pub async fn spawn_ipc_server(tx: mpsc::Sender<ManagerMsg>) -> std::io::Result<()> {
    let path = super::socket_path()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    // the single-instance lock guarantees nobody else is serving here
    if path.exists() {
        let _ = std::fs::remove_file(&path);
    }

    let listener = UnixListener::bind(&path)?;
    tracing::info!("ipc: listening on {}", path.display());

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut stream, _addr)) => {
                    let tx = tx.clone();

                    tokio::spawn(async move {
                        let result = timeout(CONNECTION_TIMEOUT, handle_connection(&mut stream, tx)).await;

                        match result {
                            Ok(Err(e)) => tracing::error!("ipc: connection failed: {e}"),
                            Err(_) => tracing::error!("ipc: connection timed out after 10 seconds"),
                            Ok(Ok(())) => {}
                        }

                        let _ = stream.shutdown().await;
                    });
                }
                Err(e) => tracing::error!("ipc: accept failed: {e}"),
            }
        }
    });

    Ok(())
}

async fn handle_connection(
    stream: &mut UnixStream,
    tx: mpsc::Sender<ManagerMsg>,
) -> std::io::Result<()> {
    let mut buf = Vec::new();
    (&mut *stream).take(MAX_REQUEST_BYTES).read_to_end(&mut buf).await?;

    if buf.is_empty() {
        return Ok(());
    }

    let line = String::from_utf8_lossy(&buf);
    let response = match parse_request(&line) {
        Ok(req) => {
            if !req.is_chatty() {
                tracing::debug!("ipc: request {:?}", req);
            }
            dispatch(req, &tx).await
        }
        Err(e) => {
            tracing::debug!("ipc: rejected '{}': {e}", line.trim());
            format!("ERROR: {e}")
        }
    };

    stream.write_all(response.as_bytes()).await?;
    stream.flush().await
}

pub async fn dispatch(req: Request, tx: &mpsc::Sender<ManagerMsg>) -> String {
    match req {
        Request::Info { json } => {
            let (reply, rx) = oneshot::channel();
            if tx.send(ManagerMsg::GetInfo { reply }).await.is_err() {
                return "ERROR: daemon is shutting down".to_string();
            }
            match rx.await {
                Ok(snap) if json => serde_json::to_string(&snap)
                    .unwrap_or_else(|e| format!("ERROR: failed to encode info: {e}")),
                Ok(snap) => snap.pretty_text,
                Err(_) => "ERROR: daemon dropped the request".to_string(),
            }
        }

        Request::Input(kind) => ask(tx, |reply| ManagerMsg::Input { kind, reply }).await,
        Request::CloseLoading => ask(tx, |reply| ManagerMsg::CloseLoading { reply }).await,
        Request::Continue => ask(tx, |reply| ManagerMsg::Continue { reply }).await,
        Request::Start => ask(tx, |reply| ManagerMsg::Start { reply }).await,
        Request::Home => ask(tx, |reply| ManagerMsg::Home { reply }).await,
        Request::Play(track_id) => ask(tx, |reply| ManagerMsg::Play { track_id, reply }).await,
        Request::PauseAudio => ask(tx, |reply| ManagerMsg::PauseAudio { reply }).await,
        Request::AudioEnded => ask(tx, |reply| ManagerMsg::AudioEnded { reply }).await,
        Request::Next => ask(tx, |reply| ManagerMsg::Step { forward: true, reply }).await,
        Request::Prev => ask(tx, |reply| ManagerMsg::Step { forward: false, reply }).await,
        Request::Tracking(cmd) => ask(tx, |reply| ManagerMsg::Tracking { cmd, reply }).await,
        Request::Wake => ask(tx, |reply| ManagerMsg::Wake { reply }).await,
        Request::Tracks => ask(tx, |reply| ManagerMsg::Tracks { reply }).await,
        Request::Reload => ask(tx, |reply| ManagerMsg::ReloadConfig { reply }).await,
        Request::Stop => ask(tx, |reply| ManagerMsg::StopDaemon { reply }).await,
    }
}

async fn ask(tx: &mpsc::Sender<ManagerMsg>, build: impl FnOnce(Reply) -> ManagerMsg) -> String {
    let (reply, rx) = oneshot::channel();

    if tx.send(build(reply)).await.is_err() {
        return "ERROR: daemon is shutting down".to_string();
    }

    match rx.await {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => format!("ERROR: {e}"),
        Err(_) => "ERROR: daemon dropped the request".to_string(),
    }
}
