//! What a repository deploys: a branch, or the newest tag matching a pattern.

use std::fmt;

use regex::Regex;

/// Tag matcher compiled from configuration
#[derive(Debug, Clone)]
pub struct TagPattern {
    source: String,
    regex: Regex,
}

impl TagPattern {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            source: pattern.to_string(),
            regex: Regex::new(pattern)?,
        })
    }

    pub fn is_match(&self, tag: &str) -> bool {
        self.regex.is_match(tag)
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl PartialEq for TagPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for TagPattern {}

/// Configured deployment target of a repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetRef {
    Branch(String),
    Tags(TagPattern),
}

/// A concrete ref after tag resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedRef {
    Branch(String),
    Tag(String),
}

impl ResolvedRef {
    /// Short name (branch or tag)
    pub fn name(&self) -> &str {
        match self {
            Self::Branch(name) | Self::Tag(name) => name,
        }
    }

    /// Fully qualified ref, e.g. `refs/heads/main`
    pub fn full_ref(&self) -> String {
        match self {
            Self::Branch(name) => format!("refs/heads/{}", name),
            Self::Tag(name) => format!("refs/tags/{}", name),
        }
    }
}

impl fmt::Display for ResolvedRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Branch(name) => write!(f, "branch {}", name),
            Self::Tag(name) => write!(f, "tag {}", name),
        }
    }
}
