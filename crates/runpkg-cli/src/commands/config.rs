//! Config commands: path, show, get, set and reset

use colored::Colorize;
use runpkg_config::{ConfigRegistry, ConfigStore, ConfigValue};

use crate::error::{CliError, Result};

/// Print the configuration directory
pub fn run_config_path(registry: &ConfigRegistry) -> Result<()> {
    println!("{}", registry.config_dir().display());
    Ok(())
}

/// Display the system config, or a platform's config
pub fn run_config_show(registry: &mut ConfigRegistry, platform: Option<&str>, json: bool) -> Result<()> {
    let title = match platform {
        Some(platform) => format!("Platform Configuration: {platform}"),
        None => "System Configuration".to_string(),
    };
    let store = select(registry, platform)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&store.to_json())?);
        return Ok(());
    }

    println!("{}", title.bold());
    println!();
    if store.is_empty() {
        println!("  {}", "(empty)".dimmed());
    }
    for (key, value) in store.iter() {
        println!("  {} = {}", key.cyan(), value);
    }
    Ok(())
}

/// Print one value
pub fn run_config_get(registry: &mut ConfigRegistry, key: &str, platform: Option<&str>) -> Result<()> {
    let store = select(registry, platform)?;
    let value = store
        .get(key)
        .ok_or_else(|| CliError::user(format!("Key '{key}' is not set")))?;
    println!("{value}");
    Ok(())
}

/// Set one value and persist the store it belongs to
pub fn run_config_set(
    registry: &mut ConfigRegistry,
    key: &str,
    value: &str,
    platform: Option<&str>,
) -> Result<()> {
    if key.trim().is_empty() {
        return Err(CliError::user("Config key must not be empty"));
    }
    let value = ConfigValue::parse_literal(value);
    let kind = value.kind();

    select(registry, platform)?.set(key, value.clone());
    match platform {
        Some(platform) => registry.save_platform_config(platform)?,
        None => registry.save_system_config()?,
    }

    println!("{} {} = {} {}", "Set".green().bold(), key, value, format!("({kind})").dimmed());
    Ok(())
}

/// Restore a platform's defaults
pub fn run_config_reset(registry: &mut ConfigRegistry, platform: &str) -> Result<()> {
    let keys = registry.reset_platform_config(platform)?.len();
    println!(
        "{} {} {}",
        "Reset".green().bold(),
        platform,
        format!("({keys} keys)").dimmed()
    );
    Ok(())
}

fn select<'r>(registry: &'r mut ConfigRegistry, platform: Option<&str>) -> Result<&'r mut ConfigStore> {
    match platform {
        Some(platform) => Ok(registry.platform_config(platform)?),
        None => Ok(registry.system_config_mut()),
    }
}
