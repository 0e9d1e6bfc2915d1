//! Common test utilities for scenario and CLI tests.
//!
//! This module provides:
//! - `TestEnv`: isolated directory with a config file, plus CLI helpers
//! - `GitOrigin`: throwaway git repository to deploy from
//! - `require_git!`: skip a test when no git executable is installed

#![allow(dead_code)]

pub mod env;
pub mod git;

pub use env::*;
pub use git::*;
