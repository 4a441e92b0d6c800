//! Tracing subscriber setup for the binary
//!
//! The subscriber goes in before the config registry loads so that problems
//! found while reading configuration reach stderr. Once `logging_level` is
//! known the filter is swapped through [`LogHandle`].

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*, reload};

/// Level used until the system config has been read.
pub fn startup_level(verbose: bool) -> LevelFilter {
    if verbose { LevelFilter::DEBUG } else { LevelFilter::WARN }
}

/// Default level from `--verbose` or the system `logging_level` key.
///
/// `logging_level` counts up from 0 (off) to 4 (debug).
pub fn level_for(verbose: bool, logging_level: i64) -> LevelFilter {
    if verbose {
        return LevelFilter::DEBUG;
    }
    match logging_level {
        i64::MIN..=0 => LevelFilter::OFF,
        1 => LevelFilter::ERROR,
        2 => LevelFilter::WARN,
        3 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    }
}

/// `RUST_LOG` directives on top of `default`.
fn env_filter(default: LevelFilter) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(default.into())
        .from_env_lossy()
}

/// Changes the default level of the installed subscriber.
#[derive(Clone)]
pub struct LogHandle(reload::Handle<EnvFilter, Registry>);

impl LogHandle {
    /// Replace the default level. `RUST_LOG` still takes precedence.
    pub fn set_default(&self, level: LevelFilter) -> Result<(), reload::Error> {
        self.0.reload(env_filter(level))
    }
}

/// Install a compact stderr subscriber. `RUST_LOG` overrides `default`.
pub fn init(default: LevelFilter) -> Result<LogHandle, Box<dyn std::error::Error + Send + Sync>> {
    let (filter_layer, handle) = reload::Layer::new(env_filter(default));

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact();

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()?;

    Ok(LogHandle(handle))
}
