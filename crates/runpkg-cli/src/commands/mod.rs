//! Command implementations for the runpkg CLI

pub mod config;
pub mod inspect;
pub mod library;
pub mod pack;
pub mod platforms;
pub mod run;

pub use config::{run_config_get, run_config_path, run_config_reset, run_config_set, run_config_show};
pub use inspect::run_inspect;
pub use library::{run_library_add, run_library_list, run_library_prune, run_library_remove};
pub use pack::{PackOptions, run_pack};
pub use platforms::run_platforms;
pub use run::run_package;
