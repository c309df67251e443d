//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>`: Run as if in that directory
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::core::types::RootKind;

/// rtree - branches, tags and stashes of a repository as a tree
#[derive(Parser, Debug)]
#[command(name = "rtree")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if rtree was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load the repository and print its object tree
    Show {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,

        /// Print roots collapsed
        #[arg(long)]
        collapsed: bool,

        /// List branches flat instead of grouping by path segment
        #[arg(long)]
        flat: bool,
    },

    /// Activate a node, as a double-click would
    Activate {
        /// Region to look in: branches, tags or stashes
        #[arg(value_parser = parse_root)]
        root: RootKind,

        /// Label of the node to activate
        label: String,

        /// Report the action without performing it
        #[arg(long)]
        dry_run: bool,
    },
}

fn parse_root(value: &str) -> Result<RootKind, String> {
    RootKind::from_key(value).ok_or_else(|| {
        let known: Vec<_> = RootKind::ALL.iter().map(|k| k.key()).collect();
        format!("unknown region '{}' (expected one of: {})", value, known.join(", "))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_flags() {
        let cli = Cli::try_parse_from(["rtree", "show", "--json", "--collapsed"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Show {
                json: true,
                collapsed: true,
                flat: false
            }
        ));
    }

    #[test]
    fn activate_parses_region() {
        let cli = Cli::try_parse_from([
            "rtree",
            "--cwd",
            "/repo",
            "activate",
            "branches",
            "feature/x",
            "--dry-run",
        ])
        .unwrap();
        assert_eq!(cli.cwd, Some(PathBuf::from("/repo")));
        match cli.command {
            Command::Activate {
                root,
                label,
                dry_run,
            } => {
                assert_eq!(root, RootKind::Branches);
                assert_eq!(label, "feature/x");
                assert!(dry_run);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn unknown_region_rejected() {
        assert!(Cli::try_parse_from(["rtree", "activate", "remotes", "origin"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["rtree", "show", "--debug", "-q"]).unwrap();
        assert!(cli.debug);
        assert!(cli.quiet);
    }
}
