//! Availability overlap calculation.
//!
//! Pure functions over stored slots; no repository access. Every slot pair
//! is compared independently, so a user's own overlapping slots produce
//! repeated entries.

use chrono::NaiveTime;
use swapmatch_types::availability::{AvailabilitySlot, CommonAvailability, DayBitmask, Weekday};

/// Shared days and time window of two slots, if any.
pub fn slot_overlap(
    a: &AvailabilitySlot,
    b: &AvailabilitySlot,
) -> Option<(DayBitmask, NaiveTime, NaiveTime)> {
    let days = a.day_bitmask.intersect(&b.day_bitmask)?;
    let start = a.start_time.max(b.start_time);
    let end = a.end_time.min(b.end_time);
    if start >= end {
        return None;
    }
    Some((days, start, end))
}

/// Every weekday/time intersection between two users' slots.
///
/// One entry per shared day per overlapping slot pair. Symmetric in its
/// arguments up to ordering.
pub fn common_availability(
    slots_a: &[AvailabilitySlot],
    slots_b: &[AvailabilitySlot],
) -> Vec<CommonAvailability> {
    let mut common = Vec::new();
    for a in slots_a {
        for b in slots_b {
            let Some((days, start, end)) = slot_overlap(a, b) else {
                continue;
            };
            let duration_minutes = (end - start).num_minutes();
            common.extend(days.days().map(|day| CommonAvailability {
                day,
                start_time: start,
                end_time: end,
                duration_minutes,
            }));
        }
    }
    common
}

/// Slots that apply on `day` and fully contain `[start, end)`.
pub fn slots_covering(
    slots: Vec<AvailabilitySlot>,
    day: Weekday,
    start: NaiveTime,
    end: NaiveTime,
) -> Vec<AvailabilitySlot> {
    slots
        .into_iter()
        .filter(|slot| slot.covers(day, start, end))
        .collect()
}
