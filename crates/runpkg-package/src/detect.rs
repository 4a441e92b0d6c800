//! Guessing a platform and entry point from a game directory

use std::path::Path;
use walkdir::WalkDir;

/// Result of platform auto-detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub platform: &'static str,
    /// Entry point relative to the game directory, `/`-separated.
    pub main: String,
}

/// Inspect `game_dir` for a recognizable entry point.
///
/// The first `.exe` in name order marks a Windows title. Failing that, on
/// unix the first extensionless file with the owner-exec bit marks a Linux
/// title.
pub fn detect_platform(game_dir: &Path) -> Option<Detection> {
    let files: Vec<_> = WalkDir::new(game_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .collect();

    let exe = files.iter().find(|entry| {
        entry
            .path()
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("exe"))
    });
    if let Some(entry) = exe {
        return Some(Detection {
            platform: "windows",
            main: relative_main(game_dir, entry.path())?,
        });
    }

    let native = files
        .iter()
        .find(|entry| entry.path().extension().is_none() && is_owner_executable(entry.path()))?;
    Some(Detection {
        platform: "linux",
        main: relative_main(game_dir, native.path())?,
    })
}

fn relative_main(game_dir: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(game_dir).ok()?;
    let parts: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}

#[cfg(unix)]
fn is_owner_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path).is_ok_and(|m| m.permissions().mode() & 0o100 != 0)
}

#[cfg(not(unix))]
fn is_owner_executable(_path: &Path) -> bool {
    false
}
