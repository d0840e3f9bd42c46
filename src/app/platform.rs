// Author: Dustin Pilgrim
// License: MIT

use std::io;
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::PathBuf;

pub fn default_log_path() -> Option<PathBuf> {
    Some(dirs::cache_dir()?.join("kiosk").join("kiosk.log"))
}

// ---------------- single-instance lock ----------------

fn lock_path() -> Result<PathBuf, String> {
    crate::ipc::runtime_dir()
        .map(|dir| dir.join("kiosk").join("kiosk.lock"))
        .map_err(|e| format!("{e} (cannot create instance lock)"))
}

/// Holding the returned listener keeps other daemons out.
///
/// A lock socket left behind by a crashed daemon is not connectable and gets
/// replaced.
pub fn acquire_single_instance_lock() -> Result<UnixListener, String> {
    let path = lock_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("failed to create {}: {e}", parent.display()))?;
    }

    let bind = || {
        UnixListener::bind(&path)
            .map_err(|e| format!("failed to bind instance lock {}: {e}", path.display()))
    };

    match UnixListener::bind(&path) {
        Ok(l) => Ok(l),
        Err(e) if e.kind() == io::ErrorKind::AddrInUse => {
            if UnixStream::connect(&path).is_ok() {
                return Err(format!(
                    "kiosk is already running (another instance holds {})",
                    path.display()
                ));
            }
            let _ = std::fs::remove_file(&path);
            bind()
        }
        Err(e) => Err(format!("failed to bind instance lock {}: {e}", path.display())),
    }
}
