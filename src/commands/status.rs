//! Implementation of the `status` command.

use super::{Session, to_json};
use crate::cli::StatusArgs;
use serde::Serialize;
use singleton_process::error::Result;
use singleton_process::exit_codes;
use std::path::PathBuf;

#[derive(Debug, Serialize)]
struct StatusReport {
    name: String,
    running: bool,
    pid: Option<u32>,
    marker: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    app: Option<String>,
}

/// Execute the `status` command.
pub fn cmd_status(session: &Session, args: StatusArgs) -> Result<i32> {
    let handle = session.handle(&args.name)?;

    let running = handle.is_running()?;
    let pid = if running { handle.holder_pid()? } else { None };
    let report = StatusReport {
        name: args.name,
        running,
        pid,
        marker: handle.marker_path().to_path_buf(),
        app: session.config.app_name.clone(),
    };

    if args.json {
        println!("{}", to_json(&report)?);
        return Ok(exit_codes::SUCCESS);
    }

    if let Some(app) = &report.app {
        println!("{} | {}", app, report.name);
    }
    match (report.running, report.pid) {
        (true, Some(pid)) => println!("{}: running (pid {})", report.name, pid),
        (true, None) => println!("{}: running (pid unknown)", report.name),
        (false, _) => println!("{}: not running", report.name),
    }
    println!("Marker: {}", report.marker.display());

    Ok(exit_codes::SUCCESS)
}
