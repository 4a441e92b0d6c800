//! Well-known directories
//!
//! The config root is discovered from the environment: the XDG config home
//! wins, then the per-user `~/.config`, and a local `./config` directory is
//! the last resort when neither is available.

use std::ffi::OsString;
use std::path::PathBuf;

/// Directory name used under the config home and the temp directory.
pub const APP_DIR_NAME: &str = "runpkg";

/// Resolve the config root from the current environment.
pub fn config_root() -> PathBuf {
    config_root_from(std::env::var_os("XDG_CONFIG_HOME"), dirs::home_dir())
}

/// Resolve the config root from explicit inputs.
///
/// Empty values are treated as unset, matching the XDG base directory rules.
pub fn config_root_from(xdg_config_home: Option<OsString>, home: Option<PathBuf>) -> PathBuf {
    if let Some(xdg) = xdg_config_home.filter(|v| !v.is_empty()) {
        return PathBuf::from(xdg).join(APP_DIR_NAME);
    }

    if let Some(home) = home.filter(|h| !h.as_os_str().is_empty()) {
        return home.join(".config").join(APP_DIR_NAME);
    }

    tracing::debug!("No config home available, falling back to ./config");
    PathBuf::from("./config")
}

/// Root under which packages are extracted.
pub fn extraction_root() -> PathBuf {
    std::env::temp_dir().join(APP_DIR_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xdg_config_home_takes_precedence() {
        let root = config_root_from(
            Some(OsString::from("/xdg")),
            Some(PathBuf::from("/home/user")),
        );
        assert_eq!(root, PathBuf::from("/xdg/runpkg"));
    }

    #[test]
    fn falls_back_to_home_dot_config() {
        let root = config_root_from(None, Some(PathBuf::from("/home/user")));
        assert_eq!(root, PathBuf::from("/home/user/.config/runpkg"));
    }

    #[test]
    fn empty_xdg_is_ignored() {
        let root = config_root_from(Some(OsString::new()), Some(PathBuf::from("/home/user")));
        assert_eq!(root, PathBuf::from("/home/user/.config/runpkg"));
    }

    #[test]
    fn last_resort_is_local_directory() {
        assert_eq!(config_root_from(None, None), PathBuf::from("./config"));
    }

    #[test]
    fn extraction_root_lives_under_temp() {
        let root = extraction_root();
        assert!(root.starts_with(std::env::temp_dir()));
        assert!(root.ends_with(APP_DIR_NAME));
    }
}
