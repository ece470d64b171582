//! Time Provider Abstraction
//!
//! Services read the clock through [`TimeProvider`] so that tests can pin or
//! step `created_at`/`updated_at` without sleeping. This module also owns the
//! text format timestamps are persisted in.
//!
//! # Examples
//!
//! ```rust
//! use mindmap_core::models::time::{TimeProvider, SystemTimeProvider};
//! use chrono::Utc;
//!
//! let provider = SystemTimeProvider;
//! let now = provider.now();
//! assert!(now <= Utc::now());
//! ```

use chrono::{DateTime, NaiveDateTime, SecondsFormat, SubsecRound, Utc};
use std::sync::Mutex;

/// Trait for providing current time
pub trait TimeProvider: Send + Sync {
    /// Get the current UTC time
    fn now(&self) -> DateTime<Utc>;
}

/// System time provider using actual system clock
///
/// Truncates to microseconds, the precision timestamps are stored with, so a
/// value handed back from a create call compares equal to the one read later.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        Utc::now().trunc_subsecs(6)
    }
}

/// Controllable clock for tests
///
/// Shared behind an `Arc` with the services under test; `advance` and
/// `set_time` take `&self` so the clock can be moved after it was handed out.
///
/// # Examples
///
/// ```rust
/// use mindmap_core::models::time::{TimeProvider, MockTimeProvider};
/// use chrono::Duration;
///
/// let provider = MockTimeProvider::new();
/// let time1 = provider.now();
///
/// provider.advance(Duration::hours(1));
/// let time2 = provider.now();
///
/// assert_eq!(time2 - time1, Duration::hours(1));
/// ```
#[derive(Debug)]
pub struct MockTimeProvider {
    current_time: Mutex<DateTime<Utc>>,
}

impl MockTimeProvider {
    /// Create a new mock time provider starting at the current time
    pub fn new() -> Self {
        Self::with_time(Utc::now())
    }

    /// Create a mock time provider with a specific starting time
    pub fn with_time(time: DateTime<Utc>) -> Self {
        Self {
            current_time: Mutex::new(time.trunc_subsecs(6)),
        }
    }

    /// Set the current time to a specific value
    pub fn set_time(&self, time: DateTime<Utc>) {
        *self.lock() = time.trunc_subsecs(6);
    }

    /// Advance time by the given duration
    pub fn advance(&self, duration: chrono::Duration) {
        *self.lock() += duration;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        // A poisoned clock still holds a valid timestamp
        self.current_time
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TimeProvider for MockTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        *self.lock()
    }
}

impl Default for MockTimeProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a timestamp in the fixed-width storage format
/// (`YYYY-MM-DDTHH:MM:SS.ffffffZ`), whose lexical order is chronological.
pub fn format_timestamp(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a stored timestamp
///
/// Accepts the RFC 3339 storage format and SQLite's `CURRENT_TIMESTAMP`
/// text (`YYYY-MM-DD HH:MM:SS`). Returns `None` for anything else.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_system_time_provider() {
        let provider = SystemTimeProvider;
        let now1 = provider.now();
        let now2 = Utc::now();

        assert!((now2 - now1).num_milliseconds().abs() < 1000);
        assert_eq!(now1.timestamp_subsec_nanos() % 1_000, 0);
    }

    #[test]
    fn test_mock_time_provider_with_time() {
        let specific_time = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let provider = MockTimeProvider::with_time(specific_time);

        assert_eq!(provider.now(), specific_time);
    }

    #[test]
    fn test_mock_time_provider_advance_through_shared_ref() {
        let provider = std::sync::Arc::new(MockTimeProvider::new());
        let start_time = provider.now();

        let shared = provider.clone();
        shared.advance(Duration::minutes(30));

        assert_eq!(provider.now() - start_time, Duration::minutes(30));
    }

    #[test]
    fn test_format_timestamp_is_fixed_width() {
        let whole = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(format_timestamp(&whole), "2024-03-01T12:00:00.000000Z");

        let later = whole + Duration::microseconds(42);
        assert_eq!(format_timestamp(&later), "2024-03-01T12:00:00.000042Z");
        assert!(format_timestamp(&later) > format_timestamp(&whole));
    }

    #[test]
    fn test_parse_timestamp_round_trip() {
        let time = SystemTimeProvider.now();
        assert_eq!(parse_timestamp(&format_timestamp(&time)), Some(time));
    }

    #[test]
    fn test_parse_sqlite_current_timestamp() {
        let parsed = parse_timestamp("2024-03-01 12:30:45").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 45).unwrap());
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_none());
    }
}
