//! Console titles through an external emulator binary
//!
//! One [`EmulatorBackend`] type serves every console platform; what differs
//! between platforms is captured in an [`EmulatorProfile`].

use crate::backend::Backend;
use crate::cancel::CancelToken;
use crate::error::{Error, Result};
use crate::locate::find_program;
use crate::process::LaunchCommand;
use runpkg_config::ConfigStore;
use runpkg_package::PackageDescriptor;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// How an emulator expects its command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentStyle {
    /// `--bios <system_files_path>` and, when `hdd_enabled`, `--hdd <hdd_path>`
    Xemu,
    /// `--fullscreen` when fullscreen, `--bios <bios_path>` when set
    PlayStation,
    /// `--experimental`
    Experimental,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmulatorProfile {
    pub platform: &'static str,
    pub display_name: &'static str,
    /// Program name looked up on `PATH`.
    pub binary: &'static str,
    /// Well-known install locations tried after `PATH`.
    pub candidates: &'static [&'static str],
    pub style: ArgumentStyle,
}

pub const PROFILES: &[EmulatorProfile] = &[
    EmulatorProfile {
        platform: "playstation4",
        display_name: "PlayStation 4 (shadPS4)",
        binary: "shadps4",
        candidates: &["/usr/bin/shadps4", "/usr/local/bin/shadps4", "/opt/shadps4/shadps4"],
        style: ArgumentStyle::PlayStation,
    },
    EmulatorProfile {
        platform: "playstation5",
        display_name: "PlayStation 5",
        binary: "ps5_emu",
        candidates: &["/usr/bin/ps5_emu", "/usr/local/bin/ps5_emu", "/opt/ps5_emu/ps5_emu"],
        style: ArgumentStyle::PlayStation,
    },
    EmulatorProfile {
        platform: "xbox",
        display_name: "Xbox (xemu)",
        binary: "xemu",
        candidates: &["/usr/bin/xemu", "/usr/local/bin/xemu", "/opt/xemu/bin/xemu"],
        style: ArgumentStyle::Xemu,
    },
    EmulatorProfile {
        platform: "xbox_series",
        display_name: "Xbox Series",
        binary: "xbsx_emu",
        candidates: &["/usr/bin/xbsx_emu", "/usr/local/bin/xbsx_emu", "/opt/xbsx_emu/xbsx_emu"],
        style: ArgumentStyle::Experimental,
    },
];

impl EmulatorProfile {
    pub fn for_platform(platform: &str) -> Option<&'static EmulatorProfile> {
        PROFILES.iter().find(|p| p.platform == platform)
    }

    /// Emulator arguments for `game`, which is always last.
    pub fn arguments(&self, config: &ConfigStore, game: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::new();

        match self.style {
            ArgumentStyle::Xemu => {
                push_path_flag(&mut args, "--bios", config.get_string("system_files_path", ""));
                if config.get_bool("hdd_enabled", true) {
                    push_path_flag(&mut args, "--hdd", config.get_string("hdd_path", ""));
                }
            }
            ArgumentStyle::PlayStation => {
                if config.get_bool("fullscreen", true) {
                    args.push("--fullscreen".into());
                }
                push_path_flag(&mut args, "--bios", config.get_string("bios_path", ""));
            }
            ArgumentStyle::Experimental => args.push("--experimental".into()),
        }

        args.push(game.as_os_str().to_os_string());
        args
    }

    /// Config key holding the firmware path this profile needs, if any.
    fn firmware_key(&self) -> Option<&'static str> {
        match self.style {
            ArgumentStyle::Xemu => Some("system_files_path"),
            ArgumentStyle::PlayStation => Some("bios_path"),
            ArgumentStyle::Experimental => None,
        }
    }
}

fn push_path_flag(args: &mut Vec<OsString>, flag: &str, value: String) {
    if !value.is_empty() {
        args.push(flag.into());
        args.push(value.into());
    }
}

/// Starts titles with the emulator described by a profile.
///
/// The emulator binary is resolved from the `emulator_path` config key,
/// then `PATH`, then the profile's well-known locations.
#[derive(Debug)]
pub struct EmulatorBackend {
    profile: &'static EmulatorProfile,
    config: ConfigStore,
    binary: Option<PathBuf>,
}

impl EmulatorBackend {
    pub fn new(profile: &'static EmulatorProfile) -> Self {
        Self {
            profile,
            config: ConfigStore::new(),
            binary: None,
        }
    }

    pub fn for_platform(platform: &str) -> Option<Self> {
        EmulatorProfile::for_platform(platform).map(Self::new)
    }

    pub fn profile(&self) -> &'static EmulatorProfile {
        self.profile
    }

    pub fn binary(&self) -> Option<&Path> {
        self.binary.as_deref()
    }

    /// The command that would start `package`.
    pub fn command(&self, package: &PackageDescriptor) -> Result<LaunchCommand> {
        let binary = self.binary.as_ref().ok_or_else(|| Error::NotInitialized {
            backend: self.name().to_string(),
        })?;
        let game = package.entry_point();
        if !game.exists() {
            return Err(Error::EntryPointMissing { path: game });
        }

        Ok(LaunchCommand::new(binary)
            .args(self.profile.arguments(&self.config, &game))
            .current_dir(package.game_dir()))
    }
}

impl Backend for EmulatorBackend {
    fn name(&self) -> &str {
        self.profile.display_name
    }

    fn platform(&self) -> &str {
        self.profile.platform
    }

    fn initialize(&mut self) -> Result<()> {
        let configured = self.config.get_string("emulator_path", "");
        let binary = find_program(&configured, self.profile.binary, self.profile.candidates)
            .ok_or_else(|| Error::BinaryNotFound {
                binary: self.profile.binary.to_string(),
                hint: format!(
                    "install it or set 'emulator_path' in the {} platform config",
                    self.profile.platform
                ),
            })?;

        if let Some(key) = self.profile.firmware_key() {
            let firmware = self.config.get_string(key, "");
            if firmware.is_empty() {
                tracing::debug!(platform = self.profile.platform, key, "No firmware configured");
            } else if !Path::new(&firmware).exists() {
                tracing::warn!(platform = self.profile.platform, path = %firmware, "Configured firmware not found");
            }
        }

        tracing::debug!(emulator = %binary.display(), platform = self.profile.platform, "Using emulator");
        self.binary = Some(binary);
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.binary.is_some()
    }

    fn apply_config(&mut self, config: &ConfigStore) {
        self.config = config.clone();
    }

    fn config(&self) -> &ConfigStore {
        &self.config
    }

    fn launch(&mut self, package: &PackageDescriptor, cancel: &CancelToken) -> Result<i32> {
        self.command(package)?.run(cancel)
    }
}
