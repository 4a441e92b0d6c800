//! Pack command implementation

use std::path::PathBuf;

use colored::Colorize;
use runpkg_config::{ConfigRegistry, ConfigValue};
use runpkg_package::Packager;

use crate::error::Result;

/// Inputs of `runpkg pack`.
#[derive(Debug, Clone, Default)]
pub struct PackOptions {
    pub game_path: PathBuf,
    pub name: String,
    pub platform: Option<String>,
    pub main: Option<String>,
    pub output: Option<PathBuf>,
    pub description: Option<String>,
    pub config: Vec<(String, String)>,
    pub auto_detect: bool,
}

/// Create a package, printing its path.
pub fn run_pack(registry: &ConfigRegistry, options: PackOptions) -> Result<PathBuf> {
    let output = options
        .output
        .unwrap_or_else(|| default_output_dir(registry));

    let mut packager = Packager::new(options.game_path)
        .output_dir(output)
        .name(options.name)
        .auto_detect(options.auto_detect);
    if let Some(platform) = options.platform {
        packager = packager.platform(platform);
    }
    if let Some(main) = options.main {
        packager = packager.main(main);
    }
    if let Some(description) = options.description {
        packager = packager.description(description);
    }
    for (key, value) in &options.config {
        packager = packager.config_value(key.as_str(), ConfigValue::parse_literal(value));
    }

    let package = packager.create()?;
    println!("{} {}", "Created".green().bold(), package.display());
    Ok(package)
}

fn default_output_dir(registry: &ConfigRegistry) -> PathBuf {
    let configured = registry
        .system_config()
        .get_string("default_output_directory", "");
    if configured.is_empty() {
        PathBuf::from(".")
    } else {
        PathBuf::from(configured)
    }
}
