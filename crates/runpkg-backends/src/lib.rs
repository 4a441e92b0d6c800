//! Platform backends for runpkg
//!
//! A [`Backend`] knows how to start a loaded package for one platform.
//! [`BackendRegistry`] maps platform identifiers to backend constructors;
//! new platforms are supported by registering another constructor.
//!
//! | Platform | Backend |
//! |----------|---------|
//! | `linux` | [`NativeBackend`] |
//! | `windows` | [`WineBackend`] |
//! | `playstation4`, `playstation5`, `xbox`, `xbox_series` | [`EmulatorBackend`] |

pub mod backend;
pub mod cancel;
pub mod emulator;
pub mod error;
pub mod locate;
pub mod native;
pub mod process;
pub mod registry;
pub mod wine;

pub use backend::Backend;
pub use cancel::CancelToken;
pub use emulator::{ArgumentStyle, EmulatorBackend, EmulatorProfile, PROFILES};
pub use error::{Error, Result};
pub use native::NativeBackend;
pub use process::LaunchCommand;
pub use registry::{BackendFactory, BackendRegistry};
pub use wine::WineBackend;
