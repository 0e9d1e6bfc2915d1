//! Configuration module for releasectl
//!
//! Resolution order:
//! 1. `--config` paths (repeatable, merged in order)
//! 2. `$RELEASECTL_CONFIG`
//! 3. User config (`<config dir>/releasectl/config.toml`), then
//!    `./releasectl.toml`
//!
//! `[default]` fills whatever an application leaves unset and
//! `[default.<type>]` does the same for repositories of that type.

mod loader;
mod resolve;
mod types;

pub use loader::{discover, load, load_str, merge_values, ConfigWarning, LoadedConfig, CONFIG_ENV};
pub use resolve::{
    resolve_application, DEFAULT_DATE_FORMAT, DEFAULT_GIT_EXECUTABLE, DEFAULT_MARKER_FILE,
    DEFAULT_SYMLINK,
};
pub use types::{
    ApplicationConfig, Config, DefaultsConfig, HooksConfig, RepositoryConfig, RepositoryDefaults,
    Settings,
};
