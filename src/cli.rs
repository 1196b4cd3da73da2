//! CLI argument parsing for solo.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use crate::guard::{default_lock_path, Backend, LockTarget, DEFAULT_SOCKET_NAME};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Solo: single-instance process guard backed by kernel-arbitrated locks.
///
/// Ensures at most one instance of an application runs on this host:
/// - The `file` backend holds an advisory lock on a lock file (debuggable,
///   artifact can be deleted out from under it)
/// - The `socket` backend binds an abstract-namespace socket (invisible to
///   the filesystem, immune to deletion)
#[derive(Parser, Debug)]
#[command(name = "solo")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for solo.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run as the single instance.
    ///
    /// Acquires the lock, holds it while waiting for Enter on stdin, then
    /// releases and exits 0. Exits non-zero without doing any work if
    /// another instance already holds the lock.
    Run(RunArgs),

    /// Report whether the lock is currently held.
    ///
    /// Probes without disturbing an active holder. For the file backend,
    /// also reports the holder PID recorded in the lock file.
    Status(StatusArgs),
}

/// Backend and identifier selection, shared by all commands.
#[derive(Parser, Debug)]
pub struct TargetArgs {
    /// Which kernel primitive arbitrates the lock.
    #[arg(long, value_enum, default_value_t = Backend::File)]
    pub backend: Backend,

    /// Lock file path (file backend).
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// Abstract-namespace name (socket backend).
    #[arg(long)]
    pub name: Option<String>,
}

impl TargetArgs {
    /// Resolve the lock target from the selected backend and identifier.
    pub fn target(&self) -> LockTarget {
        match self.backend {
            Backend::File => {
                LockTarget::File(self.path.clone().unwrap_or_else(default_lock_path))
            }
            Backend::Socket => LockTarget::Namespace(
                self.name
                    .clone()
                    .unwrap_or_else(|| DEFAULT_SOCKET_NAME.to_string()),
            ),
        }
    }
}

/// Arguments for the `run` command.
#[derive(Parser, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

/// Arguments for the `status` command.
#[derive(Parser, Debug)]
pub struct StatusArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Emit machine-readable JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
