//! Implementation of the `path` command.

use super::Session;
use crate::cli::PathArgs;
use singleton_process::error::Result;
use singleton_process::exit_codes;

/// Execute the `path` command.
pub fn cmd_path(session: &Session, args: PathArgs) -> Result<i32> {
    let handle = session.handle(&args.name)?;
    println!("{}", handle.marker_path().display());
    Ok(exit_codes::SUCCESS)
}
