//! Implementation of the `run` command.

use super::Session;
use crate::cli::RunArgs;
use serde_json::json;
use singleton_process::error::{Result, SingletonError};
use singleton_process::events::{Event, EventAction};
use singleton_process::exit_codes;
use std::process::{Command, ExitStatus};

/// Execute the `run` command.
///
/// The child runs while the slot is held and the slot is released on every
/// exit path, including a failed spawn. The child's exit code becomes ours.
pub fn cmd_run(session: &Session, args: RunArgs) -> Result<i32> {
    let (program, program_args) = args
        .command
        .split_first()
        .ok_or_else(|| SingletonError::UserError("no command given".to_string()))?;

    let mut handle = session.handle(&args.name)?;

    let outcome = handle.run_exclusively(|| {
        session.record(
            Event::new(EventAction::Lock, &args.name)
                .with_details(json!({ "pid": session.pid(), "app": session.config.app_name })),
        );

        Command::new(program)
            .args(program_args)
            .status()
            .map_err(|e| SingletonError::UserError(format!("failed to run '{}': {}", program, e)))
    });

    match outcome {
        Ok(status) => {
            let code = exit_code_of(status);
            session.record(
                Event::new(EventAction::Run, &args.name)
                    .with_details(json!({ "command": args.command, "exit_code": code })),
            );
            Ok(code)
        }
        Err(err) if err.is_already_running() && args.or_exit => Ok(exit_codes::SUCCESS),
        Err(err) => {
            session.record_conflict(&args.name, &err);
            Err(err)
        }
    }
}

#[cfg(unix)]
fn exit_code_of(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;

    match (status.code(), status.signal()) {
        (Some(code), _) => code,
        (None, Some(signal)) => 128 + signal,
        (None, None) => exit_codes::USER_ERROR,
    }
}

#[cfg(not(unix))]
fn exit_code_of(status: ExitStatus) -> i32 {
    status.code().unwrap_or(exit_codes::USER_ERROR)
}
