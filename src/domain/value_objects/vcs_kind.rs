//! Closed set of supported version-control backends

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VcsKind {
    Git,
}

impl VcsKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Git => "git",
        }
    }
}

impl FromStr for VcsKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "git" => Ok(Self::Git),
            other => Err(format!(
                "invalid repository type '{}' (supported: git)",
                other
            )),
        }
    }
}

impl fmt::Display for VcsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
