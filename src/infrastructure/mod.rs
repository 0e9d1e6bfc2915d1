//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `process` - CommandRunner backed by `std::process`
//! - `releases` - Release directories and the `current` symlink
//! - `hooks` - Lifecycle hook execution
//! - `vcs/` - Repository backends (git)
//! - `lock` - PID run lock

pub mod hooks;
pub mod lock;
pub mod process;
pub mod releases;
pub mod vcs;

// Re-export for convenience
pub use hooks::HookRunner;
pub use lock::{default_lock_path, RunLock};
pub use process::SystemCommandRunner;
pub use releases::ReleaseStore;
pub use vcs::{backend_available, build_source, GitRepository};
