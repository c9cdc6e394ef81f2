//! Exit code constants for the singleton-process CLI.
//!
//! - 0: Success (including a quiet `--or-exit` when another copy is running)
//! - 1: User error (bad args, invalid config, invalid name)
//! - 2: I/O failure on the marker or pid directory
//! - 3: Another process already holds the slot

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, invalid configuration, or an unusable slot name.
pub const USER_ERROR: i32 = 1;

/// I/O failure: opening, locking, writing, or syncing the marker failed.
pub const IO_FAILURE: i32 = 2;

/// The slot is held by another process.
pub const ALREADY_RUNNING: i32 = 3;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct() {
        let codes = [SUCCESS, USER_ERROR, IO_FAILURE, ALREADY_RUNNING];
        for (i, &a) in codes.iter().enumerate() {
            for (j, &b) in codes.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b, "Exit codes must be distinct");
                }
            }
        }
    }

    #[test]
    fn exit_codes_fit_in_a_byte() {
        for code in [SUCCESS, USER_ERROR, IO_FAILURE, ALREADY_RUNNING] {
            assert!((0..=255).contains(&code));
        }
    }
}
