//! Configuration file loading for noa
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `NOA_*` environment variables (`NOA_TRANSPORT__ENDPOINT`, ...)
//! 2. `--config <path>` specified file
//! 3. Project root: `./noa.toml` or `./.noa.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/noa/config.toml`
//! 5. Default values
//!
//! Command-line flags are applied on top by the binary.

mod file_config;
mod loader;
mod validation;

pub use file_config::{
    FileAssistantConfig, FileConfig, FileLoggingConfig, FileModeratorConfig, FileProviderConfig,
    FileTransportConfig,
};
pub use loader::ConfigLoader;
pub use validation::{ConfigIssue, ConfigIssueCode, Severity};
