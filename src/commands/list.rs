//! Implementation of the `list` command.

use super::{Session, to_json};
use crate::cli::ListArgs;
use singleton_process::error::Result;
use singleton_process::exit_codes;
use singleton_process::locks;

/// Execute the `list` command.
pub fn cmd_list(session: &Session, args: ListArgs) -> Result<i32> {
    let markers = locks::list_markers(&session.ctx)?;

    if args.json {
        println!("{}", to_json(&markers)?);
        return Ok(exit_codes::SUCCESS);
    }

    if markers.is_empty() {
        println!("No markers in {}", session.ctx.pids_dir.display());
        return Ok(exit_codes::SUCCESS);
    }

    println!("Markers ({}):", markers.len());
    for marker in &markers {
        println!("  {}", marker);
    }

    let stale = markers.iter().filter(|m| m.is_stale()).count();
    if stale > 0 {
        println!();
        println!("{} stale marker(s); remove with `singleton-process clear <NAME>`.", stale);
    }

    Ok(exit_codes::SUCCESS)
}
