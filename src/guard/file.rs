//! Filesystem-visible instance lock using a kernel advisory lock.

use crate::error::{Result, SoloError};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

/// Instance lock held as an exclusive advisory lock on a file.
///
/// The kernel holds the lock against the open descriptor, so the guard (and
/// with it the `File`) must live for as long as the lock is needed; closing
/// the descriptor releases the lock as a side effect. The file's content is
/// the holder's PID, one decimal line, written purely for external inspection
/// (`cat`-debuggable). The lock decision never consults the content.
///
/// # Known limitation
///
/// Arbitration is by path. If an external actor deletes the lock file while
/// it is held, a second acquire creates a fresh inode at the same path and
/// locks that, yielding two simultaneous holders. This is an accepted
/// property of path-based arbitration; the socket backend exists for callers
/// that need deletion immunity.
#[derive(Debug)]
pub struct FileLockGuard {
    /// The locked descriptor. Must stay open for the life of the lock.
    file: File,

    /// Path to the lock artifact.
    path: PathBuf,

    /// Whether the lock has been released manually.
    released: bool,
}

impl FileLockGuard {
    /// Acquire the lock with a single non-blocking attempt.
    ///
    /// Opens or creates the file at `path` (mode 0644), takes an exclusive
    /// advisory lock on the descriptor, truncates, and writes the current
    /// PID as diagnostic text.
    ///
    /// # Returns
    ///
    /// * `Ok(FileLockGuard)` - Lock acquired; hold the guard for the life of the process
    /// * `Err(SoloError::AlreadyRunning)` - Another process holds the lock
    /// * `Err(SoloError::Acquire)` - The file could not be opened or written
    pub fn acquire(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .mode(0o644)
            .open(path)
            .map_err(|e| {
                SoloError::Acquire(format!(
                    "could not open lock file '{}': {}",
                    path.display(),
                    e
                ))
            })?;

        file.try_lock_exclusive().map_err(|e| {
            if e.raw_os_error() == fs2::lock_contended_error().raw_os_error() {
                SoloError::AlreadyRunning(path.display().to_string())
            } else {
                SoloError::Acquire(format!(
                    "could not lock file '{}': {}",
                    path.display(),
                    e
                ))
            }
        })?;

        // We hold the lock from here on. Truncate away any stale holder's PID
        // before writing our own; on error the descriptor drops and the
        // kernel releases the lock again.
        write_pid(&file).map_err(|e| {
            SoloError::Acquire(format!(
                "could not write PID to lock file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Ok(Self {
            file,
            path: path.to_path_buf(),
            released: false,
        })
    }

    /// Get the path to the lock artifact.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Manually release the lock: unlock, delete the artifact, close.
    ///
    /// Deletion is hygiene only. A stale artifact never blocks the next
    /// acquire, because the next acquire locks whatever inode is at the path
    /// and the kernel no longer holds a lock on it.
    pub fn release(mut self) -> Result<()> {
        self.released = true;

        self.file.unlock().map_err(|e| {
            SoloError::Release(format!(
                "failed to unlock '{}': {}",
                self.path.display(),
                e
            ))
        })?;

        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            // Already gone is fine; the artifact is not authoritative.
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SoloError::Release(format!(
                "failed to remove lock file '{}': {}",
                self.path.display(),
                e
            ))),
        }
        // The descriptor closes as `self.file` drops.
    }

    /// Read the PID recorded in the lock artifact at `path`, if any.
    ///
    /// Diagnostic only; never consulted for the lock decision.
    pub fn read_pid(path: &Path) -> Option<u32> {
        let mut content = String::new();
        File::open(path).ok()?.read_to_string(&mut content).ok()?;
        content.trim().parse().ok()
    }

    /// Probe whether the lock at `path` is currently held.
    ///
    /// Tries a non-blocking lock on the file: contention means a live holder
    /// (whose PID is read from the artifact), success means the lock is free
    /// and is dropped again immediately. A live holder is never disturbed.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(pid))` - Held; `pid` is the holder recorded in the artifact
    /// * `Ok(None)` - Not held (no file, or a stale file with no kernel lock)
    /// * `Err(SoloError::Acquire)` - The file exists but could not be probed
    pub fn holder(path: &Path) -> Result<Option<u32>> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(SoloError::Acquire(format!(
                    "could not open lock file '{}': {}",
                    path.display(),
                    e
                )));
            }
        };

        match file.try_lock_exclusive() {
            Ok(()) => {
                let _ = file.unlock();
                Ok(None)
            }
            Err(e) if e.raw_os_error() == fs2::lock_contended_error().raw_os_error() => {
                Ok(Self::read_pid(path))
            }
            Err(e) => Err(SoloError::Acquire(format!(
                "could not probe lock file '{}': {}",
                path.display(),
                e
            ))),
        }
    }
}

impl Drop for FileLockGuard {
    fn drop(&mut self) {
        if !self.released {
            let _ = self.file.unlock();
            if let Err(e) = fs::remove_file(&self.path)
                && e.kind() != ErrorKind::NotFound
            {
                eprintln!(
                    "Warning: failed to remove lock file '{}': {}",
                    self.path.display(),
                    e
                );
            }
        }
    }
}

/// Truncate the file and write the current PID as a single decimal line.
fn write_pid(mut file: &File) -> std::io::Result<()> {
    file.set_len(0)?;
    writeln!(file, "{}", std::process::id())
}
