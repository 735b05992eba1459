//! Daily submission windows.
//!
//! A window is a recurring interval inside a single hour of local wall-clock
//! time. Both ends are closed at minute granularity: the default morning
//! window `09:00-09:30` admits every instant from `09:00:00` through `09:30:59`.

use crate::error::{CoreError, CoreResult};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Morning window: 09:00-09:30.
pub const MORNING_WINDOW: TimeWindow = TimeWindow {
    start_hour: 9,
    start_minute: 0,
    end_minute: 30,
};

/// Evening window: 21:00-21:30.
pub const EVENING_WINDOW: TimeWindow = TimeWindow {
    start_hour: 21,
    start_minute: 0,
    end_minute: 30,
};

/// Recurring daily window within one hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start_hour: u32,
    pub start_minute: u32,
    /// Last admitted minute (inclusive, through second 59).
    pub end_minute: u32,
}

impl TimeWindow {
    /// Create a validated window.
    pub fn new(start_hour: u32, start_minute: u32, end_minute: u32) -> CoreResult<Self> {
        let window = Self {
            start_hour,
            start_minute,
            end_minute,
        };
        window.validate()?;
        Ok(window)
    }

    /// Check the single-hour invariants.
    pub fn validate(&self) -> CoreResult<()> {
        if self.start_hour > 23 {
            return Err(CoreError::InvalidWindow(format!(
                "start hour {} out of range",
                self.start_hour
            )));
        }
        if self.end_minute > 59 || self.start_minute > self.end_minute {
            return Err(CoreError::InvalidWindow(format!(
                "minutes {}..={} do not form a range within one hour",
                self.start_minute, self.end_minute
            )));
        }
        Ok(())
    }

    /// Whether the wall-clock time falls inside the window.
    #[must_use]
    pub fn contains(&self, time: NaiveTime) -> bool {
        time.hour() == self.start_hour
            && (self.start_minute..=self.end_minute).contains(&time.minute())
    }

    /// First admitted instant of the window.
    #[must_use]
    pub fn start_time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.start_hour, self.start_minute, 0).unwrap_or(NaiveTime::MIN)
    }

    /// Window start on a given day.
    #[must_use]
    pub fn start_on(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.start_time())
    }

    fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start_hour == other.start_hour
            && self.start_minute <= other.end_minute
            && other.start_minute <= self.end_minute
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}-{:02}:{:02}",
            self.start_hour, self.start_minute, self.start_hour, self.end_minute
        )
    }
}

/// Validated, start-ordered set of non-overlapping windows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowSchedule {
    windows: Vec<TimeWindow>,
}

impl WindowSchedule {
    /// Build a schedule. Windows are sorted by start; an empty set, a
    /// malformed window, or any overlap is rejected.
    pub fn new(mut windows: Vec<TimeWindow>) -> CoreResult<Self> {
        if windows.is_empty() {
            return Err(CoreError::InvalidWindow(
                "schedule needs at least one window".to_string(),
            ));
        }
        for window in &windows {
            window.validate()?;
        }
        windows.sort_by_key(|w| (w.start_hour, w.start_minute));
        for pair in windows.windows(2) {
            if pair[0].overlaps(&pair[1]) {
                return Err(CoreError::InvalidWindow(format!(
                    "{} overlaps {}",
                    pair[0], pair[1]
                )));
            }
        }
        Ok(Self { windows })
    }

    pub fn windows(&self) -> &[TimeWindow] {
        &self.windows
    }

    /// Whether submissions are admitted at `now`.
    #[must_use]
    pub fn is_open_at(&self, now: NaiveDateTime) -> bool {
        let time = now.time();
        self.windows.iter().any(|w| w.contains(time))
    }

    /// Start of the window that admits the next submission.
    ///
    /// Decision order:
    /// 1. inside a window: `now`
    /// 2. the earliest window starting later today
    /// 3. the first window of tomorrow
    #[must_use]
    pub fn next_open_at(&self, now: NaiveDateTime) -> NaiveDateTime {
        if self.is_open_at(now) {
            return now;
        }

        let today = now.date();
        if let Some(start) = self
            .windows
            .iter()
            .map(|w| w.start_on(today))
            .find(|start| *start > now)
        {
            return start;
        }

        let tomorrow = today + Duration::days(1);
        // Non-empty by construction.
        self.windows[0].start_on(tomorrow)
    }

    /// Human-readable list of windows, e.g. `09:00-09:30 and 21:00-21:30`.
    #[must_use]
    pub fn describe(&self) -> String {
        let parts: Vec<String> = self.windows.iter().map(ToString::to_string).collect();
        match parts.split_last() {
            Some((last, rest)) if !rest.is_empty() => format!("{} and {}", rest.join(", "), last),
            _ => parts.join(""),
        }
    }
}

impl Default for WindowSchedule {
    fn default() -> Self {
        Self {
            windows: vec![MORNING_WINDOW, EVENING_WINDOW],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(day: u32, hour: u32, min: u32, sec: u32) -> NaiveDateTime {
        // 2026-03-10 is a Tuesday; weekdays do not matter for windows.
        NaiveDate::from_ymd_opt(2026, 3, day)
            .unwrap()
            .and_hms_opt(hour, min, sec)
            .unwrap()
    }

    #[test]
    fn test_open_inside_morning_and_evening() {
        let schedule = WindowSchedule::default();
        for minute in 0..=30 {
            assert!(schedule.is_open_at(at(10, 9, minute, 0)), "09:{minute:02}");
            assert!(schedule.is_open_at(at(10, 21, minute, 59)), "21:{minute:02}");
        }
    }

    #[test]
    fn test_closed_after_minute_30() {
        let schedule = WindowSchedule::default();
        for minute in 31..=59 {
            assert!(!schedule.is_open_at(at(10, 9, minute, 0)));
            assert!(!schedule.is_open_at(at(10, 21, minute, 0)));
        }
    }

    #[test]
    fn test_closed_in_every_other_hour() {
        let schedule = WindowSchedule::default();
        for hour in (0..24).filter(|h| *h != 9 && *h != 21) {
            for minute in [0, 15, 30, 45, 59] {
                assert!(!schedule.is_open_at(at(10, hour, minute, 0)), "{hour}:{minute}");
            }
        }
    }

    #[test]
    fn test_boundary_seconds() {
        let schedule = WindowSchedule::default();
        assert!(!schedule.is_open_at(at(10, 8, 59, 59)));
        assert!(schedule.is_open_at(at(10, 9, 0, 0)));
        assert!(schedule.is_open_at(at(10, 9, 30, 59)));
        assert!(!schedule.is_open_at(at(10, 9, 31, 0)));
        assert!(schedule.is_open_at(at(10, 21, 30, 59)));
        assert!(!schedule.is_open_at(at(10, 21, 31, 0)));
    }

    #[test]
    fn test_next_open_before_morning() {
        let schedule = WindowSchedule::default();
        assert_eq!(schedule.next_open_at(at(10, 0, 0, 0)), at(10, 9, 0, 0));
        assert_eq!(schedule.next_open_at(at(10, 8, 59, 59)), at(10, 9, 0, 0));
    }

    #[test]
    fn test_next_open_between_windows() {
        let schedule = WindowSchedule::default();
        assert_eq!(schedule.next_open_at(at(10, 9, 31, 0)), at(10, 21, 0, 0));
        assert_eq!(schedule.next_open_at(at(10, 15, 0, 0)), at(10, 21, 0, 0));
        assert_eq!(schedule.next_open_at(at(10, 20, 59, 59)), at(10, 21, 0, 0));
    }

    #[test]
    fn test_next_open_rolls_to_tomorrow() {
        let schedule = WindowSchedule::default();
        assert_eq!(schedule.next_open_at(at(10, 21, 31, 0)), at(11, 9, 0, 0));
        assert_eq!(schedule.next_open_at(at(10, 21, 45, 0)), at(11, 9, 0, 0));
        assert_eq!(schedule.next_open_at(at(10, 23, 59, 59)), at(11, 9, 0, 0));
    }

    #[test]
    fn test_next_open_rolls_over_month_end() {
        let schedule = WindowSchedule::default();
        assert_eq!(schedule.next_open_at(at(31, 22, 0, 0)), {
            NaiveDate::from_ymd_opt(2026, 4, 1)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap()
        });
    }

    #[test]
    fn test_next_open_while_open_is_now() {
        let schedule = WindowSchedule::default();
        let now = at(10, 9, 15, 0);
        assert_eq!(schedule.next_open_at(now), now);
    }

    #[test]
    fn test_schedule_rejects_overlap() {
        let a = TimeWindow::new(9, 0, 30).unwrap();
        let b = TimeWindow::new(9, 30, 45).unwrap();
        assert!(matches!(
            WindowSchedule::new(vec![a, b]),
            Err(CoreError::InvalidWindow(_))
        ));
    }

    #[test]
    fn test_schedule_rejects_empty_and_malformed() {
        assert!(WindowSchedule::new(vec![]).is_err());
        assert!(TimeWindow::new(24, 0, 10).is_err());
        assert!(TimeWindow::new(9, 40, 10).is_err());
        assert!(TimeWindow::new(9, 0, 60).is_err());
    }

    #[test]
    fn test_schedule_sorts_windows() {
        let schedule = WindowSchedule::new(vec![EVENING_WINDOW, MORNING_WINDOW]).unwrap();
        assert_eq!(schedule.windows(), &[MORNING_WINDOW, EVENING_WINDOW]);
    }

    #[test]
    fn test_describe() {
        assert_eq!(
            WindowSchedule::default().describe(),
            "09:00-09:30 and 21:00-21:30"
        );
        let single = WindowSchedule::new(vec![MORNING_WINDOW]).unwrap();
        assert_eq!(single.describe(), "09:00-09:30");
    }
}
