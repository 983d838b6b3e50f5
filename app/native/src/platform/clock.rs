//! Wall-clock access.

use chrono::{Local, Timelike};

/// Source of local time of day.
pub trait Clock: Send + Sync {
    /// Current local hour of day, `0..=23`.
    fn hour(&self) -> u32;

    /// Milliseconds elapsed since local midnight.
    fn millis_since_midnight(&self) -> i64;
}

/// Clock backed by the system's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn hour(&self) -> u32 { Local::now().hour() }

    fn millis_since_midnight(&self) -> i64 {
        let now = Local::now();
        i64::from(now.num_seconds_from_midnight()) * 1000
            + i64::from(now.nanosecond() / 1_000_000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DAY_MILLIS;

    #[test]
    fn system_clock_hour_is_in_range() {
        assert!(SystemClock.hour() < 24);
    }

    #[test]
    fn system_clock_millis_within_one_day() {
        let millis = SystemClock.millis_since_midnight();
        assert!((0..DAY_MILLIS + 1000).contains(&millis));
    }
}
