// Author: Dustin Pilgrim
// License: MIT

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const MAX_LOG_BYTES: u64 = 5 * 1024 * 1024;
const KEEP_BACKUPS: u32 = 5;

#[derive(Debug, Clone, Copy)]
pub struct LogPolicy {
    pub max_bytes: u64,
    pub keep_backups: u32,
}

impl Default for LogPolicy {
    fn default() -> Self {
        Self {
            max_bytes: MAX_LOG_BYTES,
            keep_backups: KEEP_BACKUPS,
        }
    }
}

/// Rotate the log if it grew past the limit, then open it for appending.
///
/// A blank separator line and a run header are written before returning, so
/// each daemon start is easy to spot in the file.
pub fn open_for_run(path: &Path, policy: LogPolicy) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let has_previous_run = match fs::metadata(path) {
        Ok(m) if m.len() >= policy.max_bytes => {
            rotate(path, policy.keep_backups)?;
            false
        }
        Ok(m) => m.len() > 0,
        Err(e) if e.kind() == io::ErrorKind::NotFound => false,
        Err(e) => return Err(e),
    };

    let mut f = OpenOptions::new().create(true).append(true).open(path)?;
    if has_previous_run {
        f.write_all(b"\n")?;
    }
    writeln!(f, "{}", run_header())?;
    f.flush()?;
    Ok(f)
}

pub fn run_header() -> String {
    let started = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    format!(
        "==================== kiosk daemon run start {started} (pid={}) ====================",
        std::process::id()
    )
}

/// `kiosk.log` -> `kiosk.log.1` -> ... -> `kiosk.log.N`, dropping the oldest.
fn rotate(path: &Path, keep_backups: u32) -> io::Result<()> {
    if keep_backups == 0 {
        return fs::remove_file(path);
    }

    let oldest = backup_name(path, keep_backups);
    if oldest.exists() {
        fs::remove_file(&oldest)?;
    }

    for i in (1..keep_backups).rev() {
        let from = backup_name(path, i);
        if from.exists() {
            fs::rename(&from, backup_name(path, i + 1))?;
        }
    }

    fs::rename(path, backup_name(path, 1))
}

fn backup_name(path: &Path, n: u32) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(format!(".{n}"));
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(path: &Path) -> String {
        fs::read_to_string(path).unwrap()
    }

    #[test]
    fn first_run_writes_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs/kiosk.log");

        drop(open_for_run(&path, LogPolicy::default()).unwrap());

        let text = read(&path);
        assert!(text.starts_with("===================="));
        assert!(text.contains("kiosk daemon run start"));
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn later_runs_are_separated_by_blank_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kiosk.log");

        drop(open_for_run(&path, LogPolicy::default()).unwrap());
        drop(open_for_run(&path, LogPolicy::default()).unwrap());

        let text = read(&path);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "");
    }

    #[test]
    fn oversized_log_is_rotated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kiosk.log");
        let policy = LogPolicy { max_bytes: 8, keep_backups: 2 };

        fs::write(&path, "first run\n").unwrap();
        drop(open_for_run(&path, policy).unwrap());
        assert_eq!(read(&backup_name(&path, 1)), "first run\n");

        fs::write(&path, "second run\n").unwrap();
        drop(open_for_run(&path, policy).unwrap());
        assert_eq!(read(&backup_name(&path, 1)), "second run\n");
        assert_eq!(read(&backup_name(&path, 2)), "first run\n");

        fs::write(&path, "third run\n").unwrap();
        drop(open_for_run(&path, policy).unwrap());
        assert_eq!(read(&backup_name(&path, 2)), "second run\n");
        assert!(!backup_name(&path, 3).exists());
        assert!(read(&path).contains("kiosk daemon run start"));
    }
}
