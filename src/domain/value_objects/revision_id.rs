//! Revision id value object
//!
//! Releases are named `YYYY.MM.DD.HH.MM.SS.micro`. Every field is fixed width
//! and zero padded, most significant first, so plain string comparison
//! orders ids chronologically.

use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const FORMAT: &str = "%Y.%m.%d.%H.%M.%S.%6f";

/// Last issued id, in microseconds since the epoch.
static LAST_ISSUED_MICROS: AtomicI64 = AtomicI64::new(i64::MIN);

/// Name of one release directory
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RevisionId(String);

impl RevisionId {
    /// Generate a fresh id from the current UTC time.
    ///
    /// Ids are strictly increasing within the process: if the clock has not
    /// advanced (or went backwards) since the last call, the previous id is
    /// bumped by one microsecond.
    pub fn generate() -> Self {
        Self::next_after_clock(Utc::now().timestamp_micros())
    }

    fn next_after_clock(now_micros: i64) -> Self {
        let mut issued = now_micros;
        let _ = LAST_ISSUED_MICROS.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            issued = if now_micros > last { now_micros } else { last + 1 };
            Some(issued)
        });
        Self::from_micros(issued)
    }

    /// Build the id for an exact instant
    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        Self(at.format(FORMAT).to_string())
    }

    fn from_micros(micros: i64) -> Self {
        let at = DateTime::<Utc>::from_timestamp_micros(micros).unwrap_or_default();
        Self::from_datetime(at)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RevisionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<std::path::Path> for RevisionId {
    fn as_ref(&self) -> &std::path::Path {
        std::path::Path::new(&self.0)
    }
}
