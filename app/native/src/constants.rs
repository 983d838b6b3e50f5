//! Application-wide constants.

/// Application identifier, used for config and cache directory names.
pub const APP_ID: &str = "pixellwp";

/// Collection bootstrapped on first run when no selector is configured at all.
pub const FIRST_RUN_COLLECTION: &str = "Waterfall";

/// Milliseconds in one day.
pub const DAY_MILLIS: i64 = 24 * 60 * 60 * 1000;

/// Interval between hourly-tick checks. The check itself only fires once per hour.
pub const HOUR_TICK_INTERVAL_SECS: u64 = 60;
