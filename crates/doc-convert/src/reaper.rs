//! Retention sweep over the storage directories.
//!
//! A [`Reaper`] deletes regular files whose modification time is older than
//! the retention window. `sweep` runs once; `spawn` repeats it on a
//! background thread until the returned handle is stopped.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, SystemTime};

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> SystemTime;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Outcome of one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub removed: usize,
    pub kept: usize,
    pub failed: usize,
}

#[derive(Clone)]
pub struct Reaper {
    dirs: Vec<PathBuf>,
    retention: Duration,
    clock: Arc<dyn Clock>,
}

impl Reaper {
    pub fn new(dirs: Vec<PathBuf>, retention: Duration) -> Self {
        Self::with_clock(dirs, retention, Arc::new(SystemClock))
    }

    pub fn with_clock(dirs: Vec<PathBuf>, retention: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            dirs,
            retention,
            clock,
        }
    }

    /// Delete expired files in every directory. Missing directories are
    /// skipped; per-file failures are counted and the sweep moves on.
    pub fn sweep(&self) -> SweepReport {
        let now = self.clock.now();
        let mut report = SweepReport::default();
        for dir in &self.dirs {
            self.sweep_dir(dir, now, &mut report);
        }
        log::info!(
            "Retention sweep: removed {}, kept {}, failed {}",
            report.removed,
            report.kept,
            report.failed
        );
        report
    }

    fn sweep_dir(&self, dir: &Path, now: SystemTime, report: &mut SweepReport) {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return,
            Err(e) => {
                log::warn!("Cannot list {}: {}", dir.display(), e);
                report.failed += 1;
                return;
            }
        };

        for entry in entries {
            let path = match entry {
                Ok(entry) => entry.path(),
                Err(e) => {
                    log::warn!("Cannot read entry in {}: {}", dir.display(), e);
                    report.failed += 1;
                    continue;
                }
            };
            match self.expired(&path, now) {
                Ok(Some(true)) => match fs::remove_file(&path) {
                    Ok(()) => {
                        log::debug!("Removed expired {}", path.display());
                        report.removed += 1;
                    }
                    Err(e) => {
                        log::warn!("Failed to remove {}: {}", path.display(), e);
                        report.failed += 1;
                    }
                },
                Ok(Some(false)) => report.kept += 1,
                Ok(None) => {}
                Err(e) => {
                    log::warn!("Cannot stat {}: {}", path.display(), e);
                    report.failed += 1;
                }
            }
        }
    }

    /// `None` for anything that is not a regular file.
    fn expired(&self, path: &Path, now: SystemTime) -> std::io::Result<Option<bool>> {
        let meta = fs::metadata(path)?;
        if !meta.is_file() {
            return Ok(None);
        }
        let age = now
            .duration_since(meta.modified()?)
            .unwrap_or(Duration::ZERO);
        Ok(Some(age > self.retention))
    }

    /// Sweep every `interval` on a background thread.
    pub fn spawn(self, interval: Duration) -> std::io::Result<ReaperHandle> {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let thread = std::thread::Builder::new()
            .name("reaper".to_string())
            .spawn(move || loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        self.sweep();
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            })?;
        Ok(ReaperHandle {
            stop_tx: Some(stop_tx),
            thread: Some(thread),
        })
    }
}

/// Stops the background reaper when asked or when dropped.
pub struct ReaperHandle {
    stop_tx: Option<Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl ReaperHandle {
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::warn!("Reaper thread panicked");
            }
        }
    }
}

impl Drop for ReaperHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
