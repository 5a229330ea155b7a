//! DateTime display utilities.

use std::fmt;

use jiff::{tz::TimeZone, Timestamp, ToSpan};

/// Formats a timestamp as `YYYY-MM-DD HH:MM:SS TZ` in the system time zone.
pub struct LocalDateTime<'a>(pub &'a Timestamp);

impl fmt::Display for LocalDateTime<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0
                .to_zoned(TimeZone::system())
                .strftime("%Y-%m-%d %H:%M:%S %Z")
        )
    }
}

/// Calendar date on which a given day number of a goal falls.
///
/// Day 1 is the creation date in the system time zone; each following day
/// is one civil day later.
pub struct DayDate<'a> {
    pub created_at: &'a Timestamp,
    pub day: u32,
}

impl fmt::Display for DayDate<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let start = self.created_at.to_zoned(TimeZone::system()).date();
        let offset = i64::from(self.day.saturating_sub(1));
        match start.checked_add(offset.days()) {
            Ok(date) => write!(f, "{}", date.strftime("%a %Y-%m-%d")),
            Err(_) => write!(f, "day {}", self.day),
        }
    }
}
