//! singleton-process: refuse to start a second copy of a named process.
//!
//! This is the main entry point for the CLI. It parses arguments, dispatches
//! to the appropriate command handler, runs termination hooks, and maps
//! errors to exit codes.

mod cli;
mod commands;

use cli::Cli;
use singleton_process::process::CurrentProcess;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    let process = CurrentProcess::shared();

    let code = match commands::dispatch(cli, process.clone()) {
        Ok(code) => code,
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);
            err.exit_code()
        }
    };

    // Handles are gone by now; hooks only clean up markers they still own
    process.run_exit_hooks();

    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
