//! Half-open time intervals and the overlap predicate.
//!
//! Intervals are value types: immutable once constructed, no identity beyond
//! their bounds. Adjacent intervals (where one ends exactly when another
//! starts) do NOT overlap.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A half-open time interval `[start, end)` in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        TimeInterval { start, end }
    }

    /// Build an interval from a start instant and a duration in minutes.
    ///
    /// This is how appointment intervals are derived from a treatment's
    /// duration when the caller supplies no explicit end time.
    pub fn from_start_minutes(start: DateTime<Utc>, minutes: u32) -> Self {
        TimeInterval {
            start,
            end: start + Duration::minutes(minutes as i64),
        }
    }

    /// A valid interval has a strictly positive extent.
    pub fn is_valid(&self) -> bool {
        self.start < self.end
    }

    /// Two intervals overlap iff `self.start < other.end && other.start < self.end`.
    ///
    /// The single inequality pair covers all four shapes (starts-during,
    /// ends-during, wraps, wrapped-by) and excludes the adjacent case where
    /// one interval ends exactly when the other starts.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}
