//! Time-window gate for bid/ask submission.
//!
//! The gate is recomputed from the clock on every call; nothing is cached
//! between ticks.

use crate::clock::Clock;
use crate::window::WindowSchedule;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Whole-second wait until the next window opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Countdown(u64);

impl Countdown {
    pub const ZERO: Self = Self(0);

    pub fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    /// Countdown between two instants, rounded up to whole seconds so it
    /// only reads zero once `target` is reached. Never negative.
    pub fn between(now: NaiveDateTime, target: NaiveDateTime) -> Self {
        let millis = u64::try_from((target - now).num_milliseconds()).unwrap_or(0);
        Self(millis.div_ceil(1000))
    }

    #[inline]
    pub fn as_secs(&self) -> u64 {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = self.0 / 3600;
        let minutes = (self.0 % 3600) / 60;
        let seconds = self.0 % 60;
        write!(f, "{hours:02}:{minutes:02}:{seconds:02}")
    }
}

/// Gate state derived for one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GateState {
    pub is_open: bool,
    /// Start of the next admitting window; equal to `now` while open.
    pub next_open_at: NaiveDateTime,
    pub countdown: Countdown,
}

impl GateState {
    /// Evaluate the schedule at `now`.
    #[must_use]
    pub fn at(schedule: &WindowSchedule, now: NaiveDateTime) -> Self {
        if schedule.is_open_at(now) {
            return Self {
                is_open: true,
                next_open_at: now,
                countdown: Countdown::ZERO,
            };
        }

        let next_open_at = schedule.next_open_at(now);
        Self {
            is_open: false,
            next_open_at,
            countdown: Countdown::between(now, next_open_at),
        }
    }
}

/// Admission gate: a window schedule read against a clock.
#[derive(Clone)]
pub struct TimeGate {
    schedule: WindowSchedule,
    clock: Arc<dyn Clock>,
}

impl TimeGate {
    pub fn new(schedule: WindowSchedule, clock: Arc<dyn Clock>) -> Self {
        Self { schedule, clock }
    }

    pub fn schedule(&self) -> &WindowSchedule {
        &self.schedule
    }

    /// Current gate state.
    #[must_use]
    pub fn state(&self) -> GateState {
        GateState::at(&self.schedule, self.clock.now())
    }

    /// Whether a submission may proceed right now.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.schedule.is_open_at(self.clock.now())
    }
}

impl fmt::Debug for TimeGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimeGate")
            .field("schedule", &self.schedule)
            .finish_non_exhaustive()
    }
}
