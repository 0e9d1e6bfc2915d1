//! Domain Layer
//!
//! Deployment concepts without process or VCS dependencies.
//!
//! ## Structure
//!
//! - `entities/` - Application model and the deployed marker
//! - `value_objects/` - Revision ids, target refs, hook kinds, natural ordering
//! - `ports/` - Interface definitions for infrastructure

pub mod entities;
pub mod ports;
pub mod value_objects;
