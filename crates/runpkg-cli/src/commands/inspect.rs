//! Inspect command implementation

use std::path::Path;

use colored::Colorize;
use runpkg_config::ConfigRegistry;
use runpkg_core::Launcher;

use crate::error::{CliError, Result};

/// Load a package without launching it and print what would run.
pub fn run_inspect(registry: &mut ConfigRegistry, package: &Path, json: bool) -> Result<()> {
    let mut launcher = Launcher::new(registry);
    launcher.load_package(package)?;

    let (Some(loaded), Some(backend), Some(config)) =
        (launcher.package(), launcher.backend(), launcher.effective_config())
    else {
        return Err(CliError::user("package did not load"));
    };

    if json {
        let output = serde_json::json!({
            "package": loaded.package_path(),
            "name": loaded.name(),
            "platform": loaded.platform(),
            "main": loaded.main(),
            "version": loaded.version(),
            "description": loaded.description(),
            "backend": backend.name(),
            "config": config.to_json(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", loaded.name().bold());
    println!();
    println!("  {:<14} {}", "Platform:".dimmed(), loaded.platform());
    println!("  {:<14} {}", "Backend:".dimmed(), backend.name());
    println!("  {:<14} {}", "Entry point:".dimmed(), loaded.main());
    println!("  {:<14} {}", "Version:".dimmed(), loaded.version());
    if let Some(description) = loaded.description() {
        println!("  {:<14} {}", "Description:".dimmed(), description);
    }
    println!();

    println!("  {}:", "Effective config".dimmed());
    for (key, value) in config.iter() {
        let marker = if loaded.config().contains_key(key) {
            "*".yellow()
        } else {
            " ".normal()
        };
        println!("   {marker} {key} = {value}");
    }
    if !loaded.config().is_empty() {
        println!();
        println!("  {} {}", "*".yellow(), "set by the package".dimmed());
    }

    Ok(())
}
