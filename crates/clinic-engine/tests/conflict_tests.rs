//! Tests for availability checking against existing appointments.

use chrono::{TimeZone, Utc};
use clinic_engine::is_available;
use clinic_engine::TimeInterval;

/// Helper to create an interval from hour:minute ranges on a fixed day.
fn interval(start_hour: u32, start_min: u32, end_hour: u32, end_min: u32) -> TimeInterval {
    TimeInterval::new(
        Utc.with_ymd_and_hms(2025, 12, 13, start_hour, start_min, 0)
            .unwrap(),
        Utc.with_ymd_and_hms(2025, 12, 13, end_hour, end_min, 0)
            .unwrap(),
    )
}

#[test]
fn slot_is_available_when_no_existing_appointments() {
    let proposed = interval(10, 0, 11, 0);

    assert!(is_available(&[], proposed));
}

#[test]
fn detects_conflict_when_proposal_starts_during_existing() {
    // Existing: 10:00-11:00, Proposed: 10:30-11:30 → conflict
    let existing = vec![interval(10, 0, 11, 0)];
    let proposed = interval(10, 30, 11, 30);

    assert!(!is_available(&existing, proposed));
}

#[test]
fn detects_conflict_when_proposal_ends_during_existing() {
    // Existing: 10:00-11:00, Proposed: 09:30-10:30 → conflict
    let existing = vec![interval(10, 0, 11, 0)];
    let proposed = interval(9, 30, 10, 30);

    assert!(!is_available(&existing, proposed));
}

#[test]
fn detects_conflict_when_proposal_wraps_existing() {
    // Existing: 10:00-10:30, Proposed: 09:00-12:00 → conflict
    let existing = vec![interval(10, 0, 10, 30)];
    let proposed = interval(9, 0, 12, 0);

    assert!(!is_available(&existing, proposed));
}

#[test]
fn detects_conflict_when_existing_wraps_proposal() {
    // Existing: 09:00-12:00, Proposed: 10:00-10:30 → conflict
    let existing = vec![interval(9, 0, 12, 0)];
    let proposed = interval(10, 0, 10, 30);

    assert!(!is_available(&existing, proposed));
}

#[test]
fn back_to_back_appointments_do_not_conflict() {
    // Existing: 10:00-11:00, Proposed: 11:00-12:00 → intervals are
    // half-open, touching endpoints are fine
    let existing = vec![interval(10, 0, 11, 0)];
    let proposed = interval(11, 0, 12, 0);

    assert!(is_available(&existing, proposed));
}

#[test]
fn slot_before_existing_appointments_is_available() {
    let existing = vec![interval(10, 0, 11, 0)];
    let proposed = interval(8, 0, 9, 0);

    assert!(is_available(&existing, proposed));
}

#[test]
fn slot_after_existing_appointments_is_available() {
    let existing = vec![interval(10, 0, 11, 0)];
    let proposed = interval(12, 0, 13, 0);

    assert!(is_available(&existing, proposed));
}

#[test]
fn detects_conflict_among_multiple_existing_appointments() {
    let existing = vec![
        interval(9, 0, 10, 0),
        interval(11, 0, 12, 0),
        interval(14, 0, 15, 0),
    ];
    // Overlaps the second appointment only.
    let proposed = interval(11, 30, 12, 30);

    assert!(!is_available(&existing, proposed));
}

#[test]
fn inverted_proposal_is_never_available() {
    // end before start → rejected outright, even with no existing appointments
    let proposed = interval(11, 0, 10, 0);

    assert!(!is_available(&[], proposed));
}

#[test]
fn zero_duration_proposal_is_never_available() {
    let proposed = interval(10, 0, 10, 0);

    assert!(!is_available(&[], proposed));
}

#[test]
fn inverted_proposal_is_rejected_before_comparison() {
    // Even a proposal whose bounds straddle an existing appointment is
    // rejected for being inverted, not reported as a conflict result.
    let existing = vec![interval(10, 0, 11, 0)];
    let proposed = interval(12, 0, 9, 0);

    assert!(!is_available(&existing, proposed));
}

#[test]
fn unsorted_existing_appointments_are_handled() {
    let existing = vec![
        interval(14, 0, 15, 0),
        interval(9, 0, 10, 0),
        interval(11, 0, 12, 0),
    ];
    let proposed = interval(10, 0, 11, 0);

    assert!(is_available(&existing, proposed));
}
