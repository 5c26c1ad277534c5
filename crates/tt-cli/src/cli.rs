//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Personal project time tracker.
///
/// Start and stop named projects; elapsed time is recorded to a local file.
#[derive(Debug, Parser)]
#[command(name = "tt", version, about, long_about = None)]
pub struct Cli {
    /// Suppress diagnostics (errors are still shown).
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the store file, overriding configuration.
    #[arg(long, global = true)]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start tracking a project, creating it if needed.
    Start(ProjectArgs),

    /// Stop tracking a project.
    Stop(ProjectArgs),

    /// Delete a project and all of its sessions.
    Rm(RmArgs),

    /// List all projects.
    List,

    /// Show running projects with total and current time.
    Status,

    /// Print the stored data.
    Dump,
}

/// A single project target.
#[derive(Debug, Args)]
pub struct ProjectArgs {
    /// Project name.
    #[arg(value_parser = project_name)]
    pub project: String,
}

#[derive(Debug, Args)]
pub struct RmArgs {
    /// Project to delete.
    #[arg(value_parser = project_name)]
    pub project: String,

    /// Delete without asking; required.
    #[arg(short, long)]
    pub force: bool,
}

/// Rejects blank names; any other name is kept exactly as typed.
fn project_name(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        return Err("project name cannot be empty".to_string());
    }
    Ok(s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["tt", "start", "writing", "--verbose"]).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Some(Commands::Start(args)) => assert_eq!(args.project, "writing"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_rm_force_flag() {
        let cli = Cli::try_parse_from(["tt", "rm", "old", "-f"]).unwrap();
        match cli.command {
            Some(Commands::Rm(args)) => {
                assert_eq!(args.project, "old");
                assert!(args.force);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_rejects_blank_project_names() {
        let err = Cli::try_parse_from(["tt", "start", "  "]).unwrap_err();
        assert!(err.to_string().contains("project name cannot be empty"));
    }

    #[test]
    fn test_keeps_surrounding_whitespace_in_project_names() {
        let cli = Cli::try_parse_from(["tt", "start", " foo "]).unwrap();
        match cli.command {
            Some(Commands::Start(args)) => assert_eq!(args.project, " foo "),
            other => panic!("expected start, got {other:?}"),
        }
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["tt", "-q", "-v", "list"]).is_err());
    }
}
