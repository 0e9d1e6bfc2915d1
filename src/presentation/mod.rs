//! Presentation Layer
//!
//! This layer handles:
//! - CLI argument parsing (via clap)
//! - Wiring engines to their infrastructure
//! - Output formatting (text/JSON)
//!
//! ## Usage
//!
//! ```ignore
//! use releasectl::presentation::{factory, output};
//!
//! let engine = factory::create_engine(app);
//! let result = engine.deploy();
//! println!("{}", output::render_deploy_text(&name, &result));
//! ```

pub mod cli;
pub mod factory;
pub mod output;

pub use cli::{Cli, Commands, ALL_APPS};
pub use factory::{create_engine, create_engine_with_runner};
pub use output::OutputFormat;
