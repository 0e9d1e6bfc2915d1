//! Deployed marker entity
//!
//! Persisted per repository inside each release so later runs can tell what
//! is deployed without asking the VCS.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployedMarker {
    pub revision: String,
    pub deployed_at: DateTime<Utc>,
}

impl DeployedMarker {
    pub fn new(revision: impl Into<String>, deployed_at: DateTime<Utc>) -> Self {
        Self {
            revision: revision.into(),
            deployed_at,
        }
    }

    /// Parse marker content. Anything incomplete is treated as never deployed.
    pub fn parse(content: &str) -> Option<Self> {
        let marker: Self = toml::from_str(content).ok()?;
        if marker.revision.trim().is_empty() {
            return None;
        }
        Some(marker)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }
}
