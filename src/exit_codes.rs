//! Exit code constants for the solo CLI.
//!
//! - 0: Success (clean shutdown after release)
//! - 1: Release cleanup failed (only if the caller chooses to surface it)
//! - 2: Another instance already holds the lock
//! - 3: Could not attempt the lock (environment/permission failure)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// Best-effort release cleanup failed. Commands normally log this as a
/// warning instead of exiting with it.
pub const RELEASE_FAILURE: i32 = 1;

/// Another instance of the application is already running.
pub const ALREADY_RUNNING: i32 = 2;

/// The lock could not even be attempted (open/create/bind failed).
pub const ACQUIRE_FAILURE: i32 = 3;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct() {
        let codes = [SUCCESS, RELEASE_FAILURE, ALREADY_RUNNING, ACQUIRE_FAILURE];
        for (i, &a) in codes.iter().enumerate() {
            for (j, &b) in codes.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b, "Exit codes must be distinct");
                }
            }
        }
    }

    #[test]
    fn success_is_zero() {
        assert_eq!(SUCCESS, 0);
    }
}
