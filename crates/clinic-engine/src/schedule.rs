//! Slot availability checks and free-slot enumeration.
//!
//! Pure functions over caller-supplied intervals; nothing is stored or cached
//! between calls. Callers are expected to pre-filter the existing set
//! (cancelled appointments, and the appointment being moved when editing) —
//! that is the persistence layer's concern, not this module's.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;

use crate::error::{ClinicError, Result};
use crate::ingest::local_to_utc;
use crate::interval::TimeInterval;

/// Check whether a proposed interval is free of conflicts.
///
/// Returns `false` for a degenerate or inverted proposal (`start >= end`)
/// without comparing it against anything. Otherwise the proposal conflicts
/// iff it overlaps any existing interval; back-to-back intervals do not
/// conflict. O(n) over `existing`, which need not be sorted.
pub fn is_available(existing: &[TimeInterval], proposed: TimeInterval) -> bool {
    if !proposed.is_valid() {
        return false;
    }
    !existing.iter().any(|e| proposed.overlaps(e))
}

/// Enumerate all free fixed-length slots within `[range_start, range_end)`.
///
/// Candidate slots tile the range contiguously from `range_start` in
/// `slot_minutes` steps; a candidate is emitted iff it is available against
/// `existing`. A trailing candidate that would spill past `range_end` is
/// never emitted. The result is recomputed in full on every call.
///
/// # Errors
/// Returns `ClinicError::InvalidSlotDuration` when `slot_minutes` is zero.
pub fn find_available_slots(
    existing: &[TimeInterval],
    range_start: DateTime<Utc>,
    range_end: DateTime<Utc>,
    slot_minutes: u32,
) -> Result<Vec<TimeInterval>> {
    if slot_minutes == 0 {
        return Err(ClinicError::InvalidSlotDuration);
    }

    let step = Duration::minutes(slot_minutes as i64);
    let mut slots = Vec::new();
    let mut cursor = range_start;

    while cursor < range_end {
        let candidate = TimeInterval::new(cursor, cursor + step);

        // Partial trailing slot — stop rather than emit it.
        if candidate.end > range_end {
            break;
        }

        if is_available(existing, candidate) {
            slots.push(candidate);
        }

        cursor = candidate.end;
    }

    Ok(slots)
}

/// Clinic opening hours as local wall-clock times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClinicHours {
    pub open: NaiveTime,
    pub close: NaiveTime,
}

impl Default for ClinicHours {
    /// Standard working day: 09:00 to 18:00.
    fn default() -> Self {
        ClinicHours {
            open: NaiveTime::from_hms_opt(9, 0, 0).expect("09:00 is a valid wall time"),
            close: NaiveTime::from_hms_opt(18, 0, 0).expect("18:00 is a valid wall time"),
        }
    }
}

/// Enumerate the free slots of one working day in the clinic's timezone.
///
/// The day's opening and closing wall times are resolved to UTC instants in
/// `tz`, then delegated to [`find_available_slots`].
///
/// # Errors
/// Returns `ClinicError::InvalidSlotDuration` for a zero slot length, or
/// `ClinicError::InvalidTimestamp` when an opening hour does not exist (or
/// exists twice) on that date due to a DST transition.
pub fn slots_for_day(
    existing: &[TimeInterval],
    date: NaiveDate,
    hours: ClinicHours,
    slot_minutes: u32,
    tz: Tz,
) -> Result<Vec<TimeInterval>> {
    let range_start = local_to_utc(date.and_time(hours.open), tz)?;
    let range_end = local_to_utc(date.and_time(hours.close), tz)?;
    find_available_slots(existing, range_start, range_end, slot_minutes)
}
