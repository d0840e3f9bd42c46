// Author: Dustin Pilgrim
// License: MIT

use std::sync::{Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};

pub fn now_ms() -> u64 {
    let d = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| std::time::Duration::from_secs(0));
    d.as_millis() as u64
}

/// Local wall-clock time, used by the display schedule.
pub fn local_now() -> chrono::NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// Lock ignoring poison; the guarded data is plain timestamps and flags.
pub fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

/// Scale a millisecond duration by a positive multiplier.
pub fn scale_ms(ms: u64, multiplier: f64) -> u64 {
    if multiplier == 1.0 {
        return ms;
    }
    (ms as f64 * multiplier).round() as u64
}

pub fn format_duration_ms(ms: u64) -> String {
    let secs = ms.div_ceil(1000);

    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}
