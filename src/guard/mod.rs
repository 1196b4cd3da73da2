//! Instance-lock guards for enforcing a process singleton on one host.
//!
//! This module implements the lock model that lets a long-running process
//! guarantee it is the only instance of itself on the machine:
//! - [`FileLockGuard`]: kernel advisory lock on a filesystem path
//! - [`NamespaceLockGuard`]: abstract-namespace socket binding
//!
//! # Contract
//!
//! Both guards share one contract, exposed through [`LockTarget::acquire`]:
//! a single synchronous, non-blocking attempt that either returns a guard or
//! fails immediately. The successful caller keeps the guard alive for the
//! whole process lifetime; a second launch sees `AlreadyRunning` and is
//! expected to terminate without doing any work.
//!
//! # Crash safety
//!
//! Both locks are held by the kernel against an open descriptor. If the
//! holding process dies by any means - SIGKILL, panic, power loss - the
//! kernel releases the lock while tearing down the process's descriptor
//! table, with no cooperation from application code. The next acquire then
//! succeeds even though the dead process never released anything.
//!
//! # RAII Guards
//!
//! Locks are managed through RAII guard objects that release the lock when
//! dropped. If artifact cleanup fails during drop, a warning is printed but
//! the program does not crash.

mod file;
mod socket;
mod types;


// Re-export public API
pub use file::FileLockGuard;
pub use socket::NamespaceLockGuard;
pub use types::{default_lock_path, Backend, InstanceGuard, LockTarget, DEFAULT_SOCKET_NAME};
