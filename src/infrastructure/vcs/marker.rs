//! Marker file persistence shared by VCS backends

use std::fs;
use std::io;
use std::path::Path;

use crate::domain::entities::DeployedMarker;
use crate::error::{DeployError, DeployResult};

/// Read a marker; missing, unreadable or malformed files yield `None`
pub fn read_marker(path: &Path) -> Option<DeployedMarker> {
    let content = fs::read_to_string(path).ok()?;
    DeployedMarker::parse(&content)
}

pub fn write_marker(path: &Path, marker: &DeployedMarker) -> DeployResult<()> {
    let content = marker
        .to_toml()
        .map_err(|e| DeployError::filesystem(path, io::Error::other(e.to_string())))?;
    fs::write(path, content).map_err(|e| DeployError::filesystem(path, e))
}
