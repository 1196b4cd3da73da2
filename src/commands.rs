//! Command implementations for solo.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations. The commands are the policy layer over the guard
//! mechanism: the guard only reports success or failure, and the decision to
//! exit (and with which code) is made here.

use crate::cli::{Command, RunArgs, StatusArgs};
use crate::error::Result;
use crate::guard::{FileLockGuard, LockTarget, NamespaceLockGuard};
use serde_json::json;

/// Dispatch a command to its implementation.
pub fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Run(args) => cmd_run(args),
        Command::Status(args) => cmd_status(args),
    }
}

/// Acquire the lock, hold it until Enter is pressed, then release.
///
/// Acquisition failure propagates to main, which exits non-zero before any
/// work happens. Release failure is only a warning: the kernel releases the
/// lock on process exit regardless, so cleanup problems never change a clean
/// shutdown into a failed one.
fn cmd_run(args: RunArgs) -> Result<()> {
    let target = args.target.target();
    let guard = target.acquire()?;

    println!(
        "[solo] lock acquired ({}), pid {}",
        target,
        std::process::id()
    );
    println!("Press Enter to stop...");

    // Block until Enter (or stdin EOF). This stands in for the
    // application's actual workload.
    let mut line = String::new();
    let _ = std::io::stdin().read_line(&mut line);

    match guard.release() {
        Ok(()) => println!("[solo] lock released"),
        Err(e) => eprintln!("Warning: {}", e),
    }

    Ok(())
}

/// Probe the lock and report whether it is held, without disturbing a holder.
fn cmd_status(args: StatusArgs) -> Result<()> {
    let target = args.target.target();

    // PID is only knowable for the file backend, where the holder records it
    // in the artifact.
    let (running, pid) = match &target {
        LockTarget::File(path) => {
            let holder = FileLockGuard::holder(path)?;
            (holder.is_some(), holder)
        }
        LockTarget::Namespace(name) => (NamespaceLockGuard::is_bound(name)?, None),
    };

    if args.json {
        let report = json!({
            "target": target.identifier(),
            "backend": args.target.backend.as_str(),
            "running": running,
            "pid": pid,
        });
        println!("{}", report);
        return Ok(());
    }

    println!("Lock:    {}", target);
    match (running, pid) {
        (true, Some(pid)) => println!("Status:  running (pid {})", pid),
        (true, None) => println!("Status:  running"),
        (false, _) => println!("Status:  not running"),
    }

    Ok(())
}
