//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - sync: reconcile the local tree with the server
//! - pull: download scripts from the server
//! - logo: upload an icon for a tool
//! - whoami/logout: config introspection

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// toolsync - reconcile local tool definitions with a remote catalog
#[derive(Parser, Debug)]
#[command(name = "toolsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Synchronize local scripts with the catalog server
    Sync {
        /// Directory to sync scripts from
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// Base URL of the server
        #[arg(short, long)]
        url: Option<String>,

        /// Authentication token
        #[arg(short, long)]
        token: Option<String>,

        /// Delete tools on the server that are missing locally
        #[arg(short, long)]
        prune: bool,

        /// Trigger a build for new/updated tools
        #[arg(short, long)]
        build: bool,
    },

    /// Download scripts from the server to the local filesystem
    Pull {
        /// Directory to pull scripts into
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// Base URL of the server
        #[arg(short, long)]
        url: Option<String>,

        /// Authentication token
        #[arg(short, long)]
        token: Option<String>,
    },

    /// Upload an SVG icon for a tool
    Logo {
        /// Tool reference as category/name
        tool: String,

        /// Path to the SVG file
        file: PathBuf,

        /// Base URL of the server
        #[arg(short, long)]
        url: Option<String>,

        /// Authentication token
        #[arg(short, long)]
        token: Option<String>,
    },

    /// Show the active server context
    Whoami,

    /// Remove the saved configuration
    Logout,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_sync_defaults() {
        let cli = Cli::try_parse_from(["toolsync", "sync"]).unwrap();
        match cli.command {
            Commands::Sync {
                dir,
                url,
                token,
                prune,
                build,
            } => {
                assert_eq!(dir, PathBuf::from("."));
                assert!(url.is_none());
                assert!(token.is_none());
                assert!(!prune);
                assert!(!build);
            }
            _ => panic!("Expected sync command"),
        }
    }

    #[test]
    fn test_sync_all_flags() {
        let cli = Cli::try_parse_from([
            "toolsync", "sync", "-d", "./f", "-u", "http://localhost:9000", "-t", "tok", "-p",
            "-b",
        ])
        .unwrap();
        match cli.command {
            Commands::Sync {
                dir,
                url,
                token,
                prune,
                build,
            } => {
                assert_eq!(dir, PathBuf::from("./f"));
                assert_eq!(url, Some("http://localhost:9000".to_string()));
                assert_eq!(token, Some("tok".to_string()));
                assert!(prune);
                assert!(build);
            }
            _ => panic!("Expected sync command"),
        }
    }

    #[test]
    fn test_pull_command() {
        let cli = Cli::try_parse_from(["toolsync", "pull", "--dir", "./f_new"]).unwrap();
        match cli.command {
            Commands::Pull { dir, .. } => {
                assert_eq!(dir, PathBuf::from("./f_new"));
            }
            _ => panic!("Expected pull command"),
        }
    }

    #[test]
    fn test_logo_command() {
        let cli =
            Cli::try_parse_from(["toolsync", "logo", "Network/nmap", "icon.svg"]).unwrap();
        match cli.command {
            Commands::Logo { tool, file, .. } => {
                assert_eq!(tool, "Network/nmap");
                assert_eq!(file, PathBuf::from("icon.svg"));
            }
            _ => panic!("Expected logo command"),
        }
    }

    #[test]
    fn test_whoami_command() {
        let cli = Cli::try_parse_from(["toolsync", "whoami"]).unwrap();
        assert!(matches!(cli.command, Commands::Whoami));
    }

    #[test]
    fn test_logout_command() {
        let cli = Cli::try_parse_from(["toolsync", "logout"]).unwrap();
        assert!(matches!(cli.command, Commands::Logout));
    }

    #[test]
    fn test_missing_subcommand_is_an_error() {
        assert!(Cli::try_parse_from(["toolsync"]).is_err());
    }

    #[test]
    fn test_verbose_flag() {
        let cli = Cli::try_parse_from(["toolsync", "-v", "whoami"]).unwrap();
        assert!(cli.is_verbose());
    }

    #[test]
    fn test_config_option() {
        let cli = Cli::try_parse_from(["toolsync", "-c", "/path/to/config.yml", "whoami"]).unwrap();
        assert_eq!(cli.config.as_ref(), Some(&PathBuf::from("/path/to/config.yml")));
    }

    #[test]
    fn test_help_works() {
        // Verify help doesn't panic
        Cli::command().debug_assert();
    }

    #[test]
    fn test_version_flag() {
        let result = Cli::try_parse_from(["toolsync", "--version"]);
        // Version flag causes early exit with error (expected)
        assert!(result.is_err());
    }
}
