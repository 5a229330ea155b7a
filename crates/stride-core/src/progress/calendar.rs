//! Calendar-day derivation.

use jiff::{tz::TimeZone, Timestamp};

const SECONDS_PER_CIVIL_DAY: i64 = 86_400;

/// Maps wall-clock time to the day number the user should be on.
///
/// Counts local-midnight boundaries between the creation date and `now`'s
/// date in `tz`, plus one, clamped to `[1, duration_days]`. A goal created
/// at 23:59 is on day 2 one minute later.
pub fn calculate_current_day(
    created_at: Timestamp,
    duration_days: u32,
    now: Timestamp,
    tz: &TimeZone,
) -> u32 {
    let start = created_at.to_zoned(tz.clone()).date();
    let today = now.to_zoned(tz.clone()).date();

    // civil dates carry no offset, so every day is exactly 86 400 seconds
    let elapsed_days = start.duration_until(today).as_secs() / SECONDS_PER_CIVIL_DAY;
    let day = elapsed_days.saturating_add(1).clamp(1, i64::from(u32::MAX));

    u32::try_from(day)
        .unwrap_or(u32::MAX)
        .clamp(1, duration_days.max(1))
}
