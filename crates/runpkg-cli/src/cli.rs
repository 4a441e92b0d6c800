//! CLI argument parsing using clap derive

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// runpkg - Package and launch games for any supported platform
#[derive(Parser, Debug)]
#[command(name = "runpkg")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration directory (default: $XDG_CONFIG_HOME/runpkg)
    #[arg(long, global = true, env = "RUNPKG_CONFIG_DIR", value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Load a package and launch it on its platform's backend
    ///
    /// Exits with the launched program's exit code.
    Run {
        /// Path to a .runpkg file
        package: PathBuf,
    },

    /// Show a package's manifest and effective configuration
    Inspect {
        /// Path to a .runpkg file
        package: PathBuf,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Create a package from a game directory
    ///
    /// Examples:
    ///   runpkg pack -g ./mygame -n MyGame -p linux -m start.sh
    ///   runpkg pack -g ./wingame -n WinGame --auto-detect
    ///   runpkg pack -g ./mygame -n MyGame --auto-detect -c fullscreen=false
    Pack {
        /// Directory holding the game files
        #[arg(short, long)]
        game_path: PathBuf,

        /// Package name, also the output file name
        #[arg(short, long)]
        name: String,

        /// Target platform identifier
        #[arg(short, long)]
        platform: Option<String>,

        /// Entry point, relative to the game directory
        #[arg(short, long)]
        main: Option<String>,

        /// Output directory (default: system default_output_directory, else .)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Short description stored in the manifest
        #[arg(short, long)]
        description: Option<String>,

        /// Config override embedded in the package
        #[arg(short, long = "config", value_name = "KEY=VALUE", value_parser = parse_key_value)]
        config: Vec<(String, String)>,

        /// Detect platform and entry point from the game files
        #[arg(long)]
        auto_detect: bool,
    },

    /// Inspect and edit system and platform configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Keep track of installed packages
    Library {
        #[command(subcommand)]
        action: LibraryAction,
    },

    /// List platforms with a registered backend
    Platforms,
}

/// Library subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum LibraryAction {
    /// Add a package, or refresh it if already present
    Add {
        /// Path to a .runpkg file
        package: PathBuf,
    },

    /// Forget a package without deleting it
    Remove {
        /// Path the package was added under
        package: PathBuf,
    },

    /// List every package in the library
    List {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Forget packages whose file no longer exists
    Prune,
}

/// Config subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    /// Print the configuration directory
    Path,

    /// Print every key of the system or a platform config
    Show {
        /// Platform identifier (default: system config)
        #[arg(short, long)]
        platform: Option<String>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Print one value
    Get {
        key: String,

        /// Platform identifier (default: system config)
        #[arg(short, long)]
        platform: Option<String>,
    },

    /// Set one value and save
    ///
    /// `true`/`false` are stored as booleans, integers as integers,
    /// anything else as a string.
    Set {
        key: String,
        value: String,

        /// Platform identifier (default: system config)
        #[arg(short, long)]
        platform: Option<String>,
    },

    /// Restore a platform's built-in defaults
    Reset {
        /// Platform identifier
        #[arg(short, long)]
        platform: String,
    },
}

fn parse_key_value(text: &str) -> Result<(String, String), String> {
    match text.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim().to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{text}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_no_args() {
        let cli = Cli::parse_from(["runpkg"]);
        assert!(!cli.verbose);
        assert!(cli.command.is_none());
    }

    #[test]
    fn parse_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["runpkg", "platforms", "-v", "--config-dir", "/tmp/cfg"]);
        assert!(cli.verbose);
        assert_eq!(cli.config_dir, Some(PathBuf::from("/tmp/cfg")));
        assert_eq!(cli.command, Some(Commands::Platforms));
    }

    #[test]
    fn parse_run() {
        let cli = Cli::parse_from(["runpkg", "run", "Foo.runpkg"]);
        assert_eq!(
            cli.command,
            Some(Commands::Run {
                package: PathBuf::from("Foo.runpkg")
            })
        );
    }

    #[test]
    fn parse_library_list() {
        let cli = Cli::parse_from(["runpkg", "library", "list", "--json"]);
        assert_eq!(
            cli.command,
            Some(Commands::Library {
                action: LibraryAction::List { json: true }
            })
        );
    }

    #[test]
    fn parse_pack_with_overrides() {
        let cli = Cli::parse_from([
            "runpkg", "pack", "-g", "./game", "-n", "Foo", "--auto-detect", "-c", "fullscreen=false", "-c",
            "wine_prefix=/p=q",
        ]);
        match cli.command {
            Some(Commands::Pack {
                name,
                config,
                auto_detect,
                platform,
                ..
            }) => {
                assert_eq!(name, "Foo");
                assert!(auto_detect);
                assert_eq!(platform, None);
                assert_eq!(
                    config,
                    vec![
                        ("fullscreen".to_string(), "false".to_string()),
                        ("wine_prefix".to_string(), "/p=q".to_string()),
                    ]
                );
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parse_pack_rejects_bad_override() {
        let result = Cli::try_parse_from(["runpkg", "pack", "-g", ".", "-n", "Foo", "-c", "novalue"]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_config_set() {
        let cli = Cli::parse_from(["runpkg", "config", "set", "fullscreen", "false", "-p", "linux"]);
        assert_eq!(
            cli.command,
            Some(Commands::Config {
                action: ConfigAction::Set {
                    key: "fullscreen".into(),
                    value: "false".into(),
                    platform: Some("linux".into()),
                }
            })
        );
    }
}
