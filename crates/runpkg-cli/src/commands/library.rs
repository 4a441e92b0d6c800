//! Library command implementation

use std::path::Path;

use colored::Colorize;
use runpkg_package::GameLibrary;

use crate::error::{CliError, Result};

pub fn run_library_add(config_dir: &Path, package: &Path) -> Result<()> {
    let mut library = GameLibrary::in_dir(config_dir)?;
    let entry = library.add(package)?;

    println!(
        "{} {} {}",
        "Added".green().bold(),
        entry.name.cyan(),
        format!("({})", entry.platform).dimmed()
    );
    Ok(())
}

pub fn run_library_remove(config_dir: &Path, package: &Path) -> Result<()> {
    let mut library = GameLibrary::in_dir(config_dir)?;
    match library.remove(package)? {
        Some(entry) => {
            println!("{} {}", "Removed".green().bold(), entry.name.cyan());
            Ok(())
        }
        None => Err(CliError::user(format!(
            "'{}' is not in the library",
            package.display()
        ))),
    }
}

/// Print the library, marking packages whose file has gone missing.
pub fn run_library_list(config_dir: &Path, json: bool) -> Result<()> {
    let library = GameLibrary::in_dir(config_dir)?;

    if json {
        let games: Vec<_> = library
            .iter()
            .map(|(path, entry)| {
                serde_json::json!({
                    "package": path,
                    "name": entry.name,
                    "platform": entry.platform,
                    "main": entry.main,
                    "version": entry.version,
                    "description": entry.description,
                    "added": entry.added.to_rfc3339(),
                    "available": path.is_file(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&games)?);
        return Ok(());
    }

    if library.is_empty() {
        println!("{}", "Library is empty.".dimmed());
        println!("Add a package with {}.", "runpkg library add <PACKAGE>".cyan());
        return Ok(());
    }

    println!("{}", "Game Library".bold());
    println!();
    for (path, entry) in library.iter() {
        let missing = if path.is_file() { "".normal() } else { " (missing)".red() };
        println!(
            "  {:<24} {:<14} {}{}",
            entry.name.cyan(),
            entry.platform,
            path.display().to_string().dimmed(),
            missing
        );
    }
    println!();
    println!("{} {}", library.len(), "games".dimmed());

    Ok(())
}

pub fn run_library_prune(config_dir: &Path) -> Result<()> {
    let mut library = GameLibrary::in_dir(config_dir)?;
    let pruned = library.prune_missing()?;
    for path in &pruned {
        println!("{} {}", "Pruned".yellow(), path.display());
    }
    println!("{} {}", pruned.len(), "entries removed".dimmed());
    Ok(())
}
