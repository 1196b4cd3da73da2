//! Namespace-only instance lock using an abstract Unix socket binding.

use crate::error::{Result, SoloError};
use std::io::ErrorKind;
use std::os::linux::net::SocketAddrExt;
use std::os::unix::net::{SocketAddr, UnixListener};

/// Instance lock held as a bound abstract-namespace socket address.
///
/// The address lives only in kernel memory for the lifetime of the bound
/// descriptor: nothing appears on the filesystem, so no userspace actor can
/// delete the lock out from under the holder. The trade-off against
/// [`FileLockGuard`](super::FileLockGuard) is inspectability: there is no
/// artifact to `ls` or `cat`.
///
/// The bind itself is the lock. The listener never accepts connections; its
/// only job is to keep the address claimed until the descriptor closes,
/// whether by explicit release or by the kernel tearing down the process.
#[derive(Debug)]
pub struct NamespaceLockGuard {
    /// The bound descriptor. Must stay open for the life of the lock.
    _listener: UnixListener,

    /// The abstract-namespace name the lock is bound to.
    name: String,
}

impl NamespaceLockGuard {
    /// Acquire the lock with a single non-blocking attempt.
    ///
    /// Binds a stream socket to the abstract address derived from `name`.
    ///
    /// # Returns
    ///
    /// * `Ok(NamespaceLockGuard)` - Lock acquired; hold the guard for the life of the process
    /// * `Err(SoloError::AlreadyRunning)` - Another process has the name bound
    /// * `Err(SoloError::Acquire)` - The socket could not be created
    pub fn acquire(name: &str) -> Result<Self> {
        let addr = SocketAddr::from_abstract_name(name).map_err(|e| {
            SoloError::Acquire(format!("invalid abstract socket name '{}': {}", name, e))
        })?;

        match UnixListener::bind_addr(&addr) {
            Ok(listener) => Ok(Self {
                _listener: listener,
                name: name.to_string(),
            }),
            Err(e) if e.kind() == ErrorKind::AddrInUse => {
                Err(SoloError::AlreadyRunning(name.to_string()))
            }
            Err(e) => Err(SoloError::Acquire(format!(
                "could not bind abstract socket '{}': {}",
                name, e
            ))),
        }
    }

    /// Get the abstract-namespace name this lock is bound to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Manually release the lock by closing the descriptor.
    ///
    /// The kernel frees the address immediately, making it available to the
    /// next acquire. There is no artifact, so there is no cleanup step that
    /// could fail.
    pub fn release(self) -> Result<()> {
        drop(self);
        Ok(())
    }

    /// Probe whether `name` is currently bound by some process.
    ///
    /// Attempts to bind the address: `AddrInUse` means a live holder, success
    /// means the name is free (the probe binding is dropped immediately).
    pub fn is_bound(name: &str) -> Result<bool> {
        match Self::acquire(name) {
            Ok(_guard) => Ok(false),
            Err(SoloError::AlreadyRunning(_)) => Ok(true),
            Err(e) => Err(e),
        }
    }
}
