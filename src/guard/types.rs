//! Lock backend selection and target definitions.

use super::file::FileLockGuard;
use super::socket::NamespaceLockGuard;
use crate::error::Result;
use clap::ValueEnum;
use std::path::PathBuf;

/// Default lock file path for the file backend.
pub fn default_lock_path() -> PathBuf {
    std::env::temp_dir().join("solo.lock")
}

/// Default abstract-namespace name for the socket backend.
pub const DEFAULT_SOCKET_NAME: &str = "dev.solo.instance";

/// Which kernel primitive arbitrates the lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// Advisory lock on a filesystem path. Debuggable (`ls`/`cat` show the
    /// holder), but the artifact can be deleted out from under the holder.
    File,
    /// Abstract-namespace socket binding. Invisible to the filesystem and
    /// immune to deletion, but not inspectable with file tools.
    Socket,
}

impl Backend {
    /// Get the backend name as used in CLI flags and status output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::File => "file",
            Backend::Socket => "socket",
        }
    }
}

/// A fully resolved lock target: backend plus the identifier it locks on.
///
/// The identifier must be stable across launches of the same logical
/// application and distinct across unrelated applications. Callers select the
/// variant by configuration; both variants expose the same acquire contract.
#[derive(Debug, Clone)]
pub enum LockTarget {
    /// Lock on a filesystem path.
    File(PathBuf),
    /// Lock on an abstract-namespace socket name.
    Namespace(String),
}

impl LockTarget {
    /// Attempt to acquire the lock with a single non-blocking attempt.
    ///
    /// There is no waiting, queuing, or retrying: if the resource is held
    /// elsewhere this fails immediately with `AlreadyRunning`. Callers that
    /// want retry-with-backoff implement it as a policy layer around this
    /// call.
    pub fn acquire(&self) -> Result<InstanceGuard> {
        match self {
            LockTarget::File(path) => FileLockGuard::acquire(path).map(InstanceGuard::File),
            LockTarget::Namespace(name) => {
                NamespaceLockGuard::acquire(name).map(InstanceGuard::Namespace)
            }
        }
    }

    /// The identifier string, for diagnostics.
    pub fn identifier(&self) -> String {
        match self {
            LockTarget::File(path) => path.display().to_string(),
            LockTarget::Namespace(name) => name.clone(),
        }
    }
}

impl std::fmt::Display for LockTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LockTarget::File(path) => write!(f, "file:{}", path.display()),
            LockTarget::Namespace(name) => write!(f, "socket:{}", name),
        }
    }
}

/// A held instance lock, one variant per backend.
///
/// The guard exists only while the lock is held: it is constructed solely by
/// a successful acquire, and [`InstanceGuard::release`] consumes it. Dropping
/// the guard (early return, unwind) releases the lock too, and if the process
/// dies without either, the kernel reclaims the underlying descriptor on its
/// own.
#[derive(Debug)]
pub enum InstanceGuard {
    File(FileLockGuard),
    Namespace(NamespaceLockGuard),
}

impl InstanceGuard {
    /// Explicitly release the lock, surfacing cleanup errors.
    ///
    /// Failures here are never fatal to the holder: the kernel's implicit
    /// release on process exit makes explicit release purely cooperative.
    pub fn release(self) -> Result<()> {
        match self {
            InstanceGuard::File(guard) => guard.release(),
            InstanceGuard::Namespace(guard) => guard.release(),
        }
    }
}
