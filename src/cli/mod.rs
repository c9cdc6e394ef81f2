//! CLI argument parsing for singleton-process.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// singleton-process: keep at most one copy of a named process running on this host.
///
/// Each name maps to a marker file `<root>/<pid_dir>/<name>.pid` guarded by an
/// advisory lock. A crashed holder never blocks the next start.
#[derive(Parser, Debug)]
#[command(name = "singleton-process")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Application root holding the pid directory (default: current directory).
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Config file (default: `<root>/singleton.yaml` when present).
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Acquire a slot and hold it until stdin is closed.
    ///
    /// Prints the holder pid once the slot is held.
    Hold(HoldArgs),

    /// Run a command while holding a slot.
    ///
    /// The slot is released when the command exits; the exit code is passed through.
    Run(RunArgs),

    /// Show whether a slot is held and by which pid.
    Status(StatusArgs),

    /// List every marker in the pid directory.
    List(ListArgs),

    /// Remove a marker left behind by a dead holder.
    Clear(ClearArgs),

    /// Print the marker path for a slot.
    Path(PathArgs),
}

/// Arguments for the `hold` command.
#[derive(Parser, Debug)]
pub struct HoldArgs {
    /// Slot name.
    pub name: String,

    /// Exit quietly with status 0 if another process holds the slot.
    #[arg(long)]
    pub or_exit: bool,
}

/// Arguments for the `run` command.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Slot name.
    pub name: String,

    /// Exit quietly with status 0 if another process holds the slot.
    #[arg(long)]
    pub or_exit: bool,

    /// Command and arguments to run.
    #[arg(last = true, required = true, num_args = 1..)]
    pub command: Vec<String>,
}

/// Arguments for the `status` command.
#[derive(Parser, Debug)]
pub struct StatusArgs {
    /// Slot name.
    pub name: String,

    /// Emit JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `list` command.
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Emit JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `clear` command.
#[derive(Parser, Debug)]
pub struct ClearArgs {
    /// Slot name whose stale marker should be removed.
    pub name: String,
}

/// Arguments for the `path` command.
#[derive(Parser, Debug)]
pub struct PathArgs {
    /// Slot name.
    pub name: String,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_debug_assert() {
        // Verifies the CLI arguments configuration is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_hold() {
        let cli = Cli::try_parse_from(["singleton-process", "hold", "worker"]).unwrap();
        if let Command::Hold(args) = cli.command {
            assert_eq!(args.name, "worker");
            assert!(!args.or_exit);
        } else {
            panic!("Expected Hold command");
        }
    }

    #[test]
    fn parse_hold_or_exit_with_global_root() {
        let cli = Cli::try_parse_from([
            "singleton-process",
            "hold",
            "worker",
            "--or-exit",
            "--root",
            "/srv/app",
        ])
        .unwrap();
        assert_eq!(cli.root, Some(PathBuf::from("/srv/app")));
        if let Command::Hold(args) = cli.command {
            assert!(args.or_exit);
        } else {
            panic!("Expected Hold command");
        }
    }

    #[test]
    fn parse_run_with_trailing_command() {
        let cli = Cli::try_parse_from([
            "singleton-process",
            "run",
            "mailer",
            "--",
            "sh",
            "-c",
            "exit 3",
        ])
        .unwrap();
        if let Command::Run(args) = cli.command {
            assert_eq!(args.name, "mailer");
            assert_eq!(args.command, vec!["sh", "-c", "exit 3"]);
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn parse_run_requires_command() {
        assert!(Cli::try_parse_from(["singleton-process", "run", "mailer"]).is_err());
    }

    #[test]
    fn parse_status_json() {
        let cli = Cli::try_parse_from(["singleton-process", "status", "worker", "--json"]).unwrap();
        if let Command::Status(args) = cli.command {
            assert_eq!(args.name, "worker");
            assert!(args.json);
        } else {
            panic!("Expected Status command");
        }
    }

    #[test]
    fn parse_list_clear_path() {
        let cli = Cli::try_parse_from(["singleton-process", "list"]).unwrap();
        assert!(matches!(cli.command, Command::List(ListArgs { json: false })));

        let cli = Cli::try_parse_from(["singleton-process", "clear", "worker"]).unwrap();
        assert!(matches!(cli.command, Command::Clear(_)));

        let cli = Cli::try_parse_from([
            "singleton-process",
            "--config",
            "custom.yaml",
            "path",
            "worker",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("custom.yaml")));
        assert!(matches!(cli.command, Command::Path(_)));
    }

    #[test]
    fn parse_missing_name_fails() {
        assert!(Cli::try_parse_from(["singleton-process", "hold"]).is_err());
    }
}
