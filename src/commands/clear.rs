//! Implementation of the `clear` command.

use super::Session;
use crate::cli::ClearArgs;
use serde_json::json;
use singleton_process::error::Result;
use singleton_process::events::{Event, EventAction};
use singleton_process::exit_codes;
use singleton_process::locks;

/// Execute the `clear` command.
///
/// Refuses to touch a marker whose holder is alive.
pub fn cmd_clear(session: &Session, args: ClearArgs) -> Result<i32> {
    let info = locks::clear_stale_marker(&session.ctx, &args.name)?;

    session.record(
        Event::new(EventAction::Clear, &args.name)
            .with_details(json!({ "recorded_pid": info.pid, "age": info.age_string() })),
    );

    println!("Cleared stale marker: {}", info.path.display());
    Ok(exit_codes::SUCCESS)
}
