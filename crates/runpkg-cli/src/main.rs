//! runpkg CLI
//!
//! Packages games into `.runpkg` files and launches them on the backend for
//! their platform.

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;
use runpkg_config::ConfigRegistry;

use cli::{Cli, Commands, ConfigAction, LibraryAction};
use commands::PackOptions;
use error::Result;

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{}: {}", "hint".cyan(), hint.dimmed());
            }
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("{} Package and launch games", "runpkg".green().bold());
        println!();
        println!("Run {} for available commands.", "runpkg --help".cyan());
        return Ok(0);
    };

    let log_handle = match logging::init(logging::startup_level(cli.verbose)) {
        Ok(handle) => Some(handle),
        Err(e) => {
            eprintln!("{}: failed to set up logging: {}", "warning".yellow().bold(), e);
            None
        }
    };

    let mut registry = match cli.config_dir {
        Some(dir) => ConfigRegistry::with_root(dir),
        None => ConfigRegistry::new(),
    };
    registry.initialize()?;

    let level = logging::level_for(cli.verbose, registry.system_config().get_int("logging_level", 1));
    if let Some(Err(e)) = log_handle.as_ref().map(|handle| handle.set_default(level)) {
        tracing::warn!(error = %e, "Failed to apply configured log level");
    }
    tracing::debug!(config_dir = %registry.config_dir().display(), "Configuration loaded");

    execute_command(&mut registry, command)
}

fn execute_command(registry: &mut ConfigRegistry, command: Commands) -> Result<i32> {
    match command {
        Commands::Run { package } => commands::run_package(registry, &package),
        Commands::Inspect { package, json } => commands::run_inspect(registry, &package, json).map(|()| 0),
        Commands::Pack {
            game_path,
            name,
            platform,
            main,
            output,
            description,
            config,
            auto_detect,
        } => {
            let options = PackOptions {
                game_path,
                name,
                platform,
                main,
                output,
                description,
                config,
                auto_detect,
            };
            commands::run_pack(registry, options).map(|_| 0)
        }
        Commands::Config { action } => cmd_config(registry, action).map(|()| 0),
        Commands::Library { action } => cmd_library(registry, action).map(|()| 0),
        Commands::Platforms => commands::run_platforms().map(|()| 0),
    }
}

fn cmd_library(registry: &ConfigRegistry, action: LibraryAction) -> Result<()> {
    let config_dir = registry.config_dir();
    match action {
        LibraryAction::Add { package } => commands::run_library_add(config_dir, &package),
        LibraryAction::Remove { package } => commands::run_library_remove(config_dir, &package),
        LibraryAction::List { json } => commands::run_library_list(config_dir, json),
        LibraryAction::Prune => commands::run_library_prune(config_dir),
    }
}

fn cmd_config(registry: &mut ConfigRegistry, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Path => commands::run_config_path(registry),
        ConfigAction::Show { platform, json } => commands::run_config_show(registry, platform.as_deref(), json),
        ConfigAction::Get { key, platform } => commands::run_config_get(registry, &key, platform.as_deref()),
        ConfigAction::Set { key, value, platform } => {
            commands::run_config_set(registry, &key, &value, platform.as_deref())
        }
        ConfigAction::Reset { platform } => commands::run_config_reset(registry, &platform),
    }
}
