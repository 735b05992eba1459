//! Wall-clock sources for the gate.

use chrono::{Duration, FixedOffset, Local, NaiveDateTime, Utc};
use parking_lot::Mutex;

/// Source of local wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// System clock.
///
/// Reads host local time unless a fixed UTC offset is configured, in which
/// case the gate behaves the same regardless of the host timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    offset: Option<FixedOffset>,
}

impl SystemClock {
    /// Host local time.
    pub fn local() -> Self {
        Self { offset: None }
    }

    /// Fixed offset from UTC, in minutes. Returns `None` when out of range.
    pub fn with_utc_offset_minutes(minutes: i32) -> Option<Self> {
        FixedOffset::east_opt(minutes.checked_mul(60)?).map(|offset| Self {
            offset: Some(offset),
        })
    }

    pub fn offset(&self) -> Option<FixedOffset> {
        self.offset
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        match self.offset {
            Some(offset) => Utc::now().with_timezone(&offset).naive_local(),
            None => Local::now().naive_local(),
        }
    }
}

/// Manually driven clock for tests and dry runs.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<NaiveDateTime>,
}

impl ManualClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: NaiveDateTime) {
        *self.now.lock() = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_manual_clock_advance() {
        let start = NaiveDate::from_ymd_opt(2026, 3, 10)
            .unwrap()
            .and_hms_opt(8, 59, 58)
            .unwrap();
        let clock = ManualClock::new(start);
        clock.advance(Duration::seconds(2));
        assert_eq!(clock.now(), start + Duration::seconds(2));
    }

    #[test]
    fn test_utc_offset_bounds() {
        assert!(SystemClock::with_utc_offset_minutes(60).is_some());
        assert!(SystemClock::with_utc_offset_minutes(-300).is_some());
        assert!(SystemClock::with_utc_offset_minutes(24 * 60).is_none());
        assert!(SystemClock::with_utc_offset_minutes(i32::MAX).is_none());
    }

    #[test]
    fn test_fixed_offset_clock_tracks_utc() {
        let clock = SystemClock::with_utc_offset_minutes(60).unwrap();
        let expected = Utc::now().naive_utc() + Duration::minutes(60);
        let diff = (clock.now() - expected).num_seconds().abs();
        assert!(diff <= 1);
    }
}
