//! Implementation of the `hold` command.
//!
//! Holds a slot for as long as stdin stays open. Supervisors use it as a
//! sidecar; the integration tests use it as the "other process".

use super::Session;
use crate::cli::HoldArgs;
use serde_json::json;
use singleton_process::error::{Result, SingletonError};
use singleton_process::events::{Event, EventAction};
use singleton_process::exit_codes;
use std::io::{self, Write};

/// Execute the `hold` command.
pub fn cmd_hold(session: &Session, args: HoldArgs) -> Result<i32> {
    let mut handle = session.handle(&args.name)?;

    let acquired = if args.or_exit {
        handle.lock_or_exit()
    } else {
        handle.acquire()
    };
    if let Err(err) = acquired {
        session.record_conflict(&args.name, &err);
        return Err(err);
    }

    session.record(
        Event::new(EventAction::Lock, &args.name)
            .with_details(json!({ "pid": session.pid(), "app": session.config.app_name })),
    );

    let mut stdout = io::stdout();
    writeln!(stdout, "{}", session.pid())
        .and_then(|()| stdout.flush())
        .map_err(|e| SingletonError::UserError(format!("failed to write to stdout: {}", e)))?;

    // Block until the supervisor closes our stdin
    io::copy(&mut io::stdin().lock(), &mut io::sink())
        .map_err(|e| SingletonError::UserError(format!("failed to read stdin: {}", e)))?;

    let released = handle.release()?;
    session.record(
        Event::new(EventAction::Unlock, &args.name).with_details(json!({ "released": released })),
    );

    Ok(exit_codes::SUCCESS)
}
