//! Run command implementation

use std::path::Path;

use colored::Colorize;
use runpkg_config::ConfigRegistry;
use runpkg_core::{Launcher, exit_code};

use crate::error::Result;

/// Load and launch a package, returning the process exit code.
///
/// Pipeline failures are errors; a cancelled launch is reported and mapped
/// to its exit code.
pub fn run_package(registry: &mut ConfigRegistry, package: &Path) -> Result<i32> {
    let mut launcher = Launcher::new(registry);

    let loaded = launcher.load_package(package)?;
    eprintln!(
        "{} {} {}",
        "Launching".green().bold(),
        loaded.name().cyan(),
        format!("({})", loaded.platform()).dimmed()
    );

    let outcome = launcher.run();
    if outcome.as_ref().is_err_and(|e| e.is_cancelled()) {
        eprintln!("{}", "Launch cancelled".yellow());
        return Ok(exit_code(&outcome));
    }
    Ok(outcome?)
}
