//! Platforms command implementation

use colored::Colorize;
use runpkg_backends::BackendRegistry;

use crate::error::Result;

/// List every platform with a backend.
pub fn run_platforms() -> Result<()> {
    let registry = BackendRegistry::with_builtins();

    println!("{}", "Supported Platforms".bold());
    println!();
    for platform in registry.platforms() {
        let backend = registry.create(platform).map_err(runpkg_core::Error::from)?;
        println!("  {:<14} {}", platform.cyan(), backend.name());
    }
    println!();
    println!("{} {}", registry.len(), "platforms".dimmed());

    Ok(())
}
