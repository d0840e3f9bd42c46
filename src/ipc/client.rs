// Author: Dustin Pilgrim
// License: MIT

use std::future::Future;

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::UnixStream,
    time::{Duration, timeout},
};

const STEP_TIMEOUT: Duration = Duration::from_secs(2);

async fn step<T>(what: &str, fut: impl Future<Output = std::io::Result<T>>) -> Result<T, String> {
    match timeout(STEP_TIMEOUT, fut).await {
        Ok(Ok(v)) => Ok(v),
        Ok(Err(e)) => Err(format!("{what} failed: {e}")),
        Err(_) => Err(format!("timeout while {what}")),
    }
}

/// Send one request line and return the daemon's full response.
pub async fn send_raw(cmd: &str) -> Result<String, String> {
    let path = crate::ipc::socket_path()?;
    if !path.exists() {
        return Err("daemon not running".to_string());
    }

    let mut stream = step("connecting to daemon", UnixStream::connect(&path)).await?;
    step("writing request", stream.write_all(cmd.as_bytes())).await?;
    // half-close so the server sees the end of the request
    step("finishing request", stream.shutdown()).await?;

    let mut resp = Vec::new();
    step("reading response", stream.read_to_end(&mut resp)).await?;

    Ok(String::from_utf8_lossy(&resp).into_owned())
}
