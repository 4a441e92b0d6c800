//! Built-in default configuration
//!
//! Defaults are pure data: a common set every platform receives plus a
//! per-platform table of additions. Files synthesized from this table stay
//! compatible with configs written by earlier releases.

use crate::store::ConfigStore;
use crate::value::ConfigValue;

/// Platforms that get a config file at registry initialization.
pub const SUPPORTED_PLATFORMS: &[&str] = &[
    "windows",
    "linux",
    "playstation4",
    "playstation5",
    "xbox",
    "xbox_series",
];

/// Check whether `platform` is one of the built-in platform identifiers.
pub fn is_supported_platform(platform: &str) -> bool {
    SUPPORTED_PLATFORMS.contains(&platform)
}

#[derive(Debug, Clone, Copy)]
enum Seed {
    Str(&'static str),
    Int(i64),
    Bool(bool),
}

impl Seed {
    fn value(self) -> ConfigValue {
        match self {
            Seed::Str(s) => ConfigValue::String(s.to_string()),
            Seed::Int(i) => ConfigValue::Int(i),
            Seed::Bool(b) => ConfigValue::Bool(b),
        }
    }
}

type Entries = &'static [(&'static str, Seed)];

const SYSTEM: Entries = &[
    ("temp_directory", Seed::Str("")),
    ("default_output_directory", Seed::Str("")),
    ("cleanup_temp_files", Seed::Bool(true)),
    // 0=off 1=error 2=warn 3=info 4=debug
    ("logging_level", Seed::Int(1)),
];

const COMMON: Entries = &[
    ("game_directory", Seed::Str("")),
    ("fullscreen", Seed::Bool(true)),
    ("resolution_width", Seed::Int(1920)),
    ("resolution_height", Seed::Int(1080)),
];

const WINDOWS: Entries = &[
    ("wine_prefix", Seed::Str("")),
    ("wine_version", Seed::Str("")),
    ("enable_dxvk", Seed::Bool(true)),
    ("windows_version", Seed::Int(10)),
];

const PLAYSTATION: Entries = &[
    ("bios_path", Seed::Str("")),
    ("rendering_resolution", Seed::Int(1080)),
    ("vsync", Seed::Bool(true)),
];

const XBOX: Entries = &[
    ("system_files_path", Seed::Str("")),
    ("enable_hw_acceleration", Seed::Bool(true)),
];

const PLATFORM_ADDITIONS: &[(&str, Entries)] = &[
    ("windows", WINDOWS),
    ("playstation4", PLAYSTATION),
    ("playstation5", PLAYSTATION),
    ("xbox", XBOX),
    ("xbox_series", XBOX),
];

fn seed(store: &mut ConfigStore, entries: Entries) {
    store.extend(entries.iter().map(|&(key, seed)| (key, seed.value())));
}

/// Process-wide defaults (temp/output directories, cleanup, logging).
pub fn system_defaults() -> ConfigStore {
    let mut store = ConfigStore::new();
    seed(&mut store, SYSTEM);
    store
}

/// Defaults for a platform.
///
/// Unknown platforms receive the common display settings only.
pub fn platform_defaults(platform: &str) -> ConfigStore {
    let mut store = ConfigStore::new();
    seed(&mut store, COMMON);

    if let Some((_, additions)) = PLATFORM_ADDITIONS.iter().find(|(id, _)| *id == platform) {
        seed(&mut store, *additions);
    }

    store
}
