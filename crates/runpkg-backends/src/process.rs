//! Running external programs under a cancel token

use crate::cancel::CancelToken;
use crate::error::{Error, Result};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A fully resolved program invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    program: PathBuf,
    args: Vec<OsString>,
    envs: Vec<(OsString, OsString)>,
    current_dir: Option<PathBuf>,
}

impl LaunchCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            envs: Vec::new(),
            current_dir: None,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    pub fn env(mut self, key: impl AsRef<OsStr>, value: impl AsRef<OsStr>) -> Self {
        self.envs
            .push((key.as_ref().to_os_string(), value.as_ref().to_os_string()));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn get_args(&self) -> &[OsString] {
        &self.args
    }

    /// Value of an environment override, if set.
    pub fn get_env(&self, key: &str) -> Option<&OsStr> {
        self.envs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_os_str())
    }

    pub fn get_current_dir(&self) -> Option<&Path> {
        self.current_dir.as_deref()
    }

    /// Human-readable rendering for logs.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_os_str())
            .chain(self.args.iter().map(OsString::as_os_str))
            .map(|part| {
                let part = part.to_string_lossy();
                if part.contains(' ') {
                    format!("\"{part}\"")
                } else {
                    part.into_owned()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command.envs(self.envs.iter().map(|(k, v)| (k, v)));
        if let Some(dir) = &self.current_dir {
            command.current_dir(dir);
        }
        command
    }

    /// Spawn the program and block until it exits or `cancel` fires.
    ///
    /// The child inherits stdio. On cancellation the child is killed and
    /// reaped before [`Error::Cancelled`] is returned.
    pub fn run(&self, cancel: &CancelToken) -> Result<i32> {
        let program = self.program.display().to_string();
        tracing::info!(command = %self.display(), "Launching");

        let mut child = self
            .to_command()
            .spawn()
            .map_err(|source| Error::Spawn {
                program: program.clone(),
                source,
            })?;

        loop {
            let status = child.try_wait().map_err(|source| Error::Wait {
                program: program.clone(),
                source,
            })?;

            if let Some(status) = status {
                let code = exit_code(status);
                tracing::info!(program = %program, code, "Process exited");
                return Ok(code);
            }

            if cancel.is_cancelled() {
                tracing::warn!(program = %program, pid = child.id(), "Cancelling launch");
                if let Err(e) = child.kill() {
                    tracing::warn!(error = %e, "Failed to kill child process");
                }
                if let Err(e) = child.wait() {
                    tracing::warn!(program = %program, error = %e, "Failed to reap cancelled child process");
                }
                return Err(Error::Cancelled);
            }

            std::thread::sleep(POLL_INTERVAL);
        }
    }
}

/// Map an exit status to a shell-style exit code.
///
/// A child killed by a signal reports `128 + signal`.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}
