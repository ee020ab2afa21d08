use std::cell::Cell;

use chrono::{NaiveDateTime, Timelike};

/// Source of the current wall-clock instant.
pub trait WallClock {
    /// Local wall-clock fields of "now".
    fn now(&self) -> NaiveDateTime;
}

/// The system clock in the local timezone.
#[derive(Debug, Default, Copy, Clone)]
pub struct SystemClock;

impl WallClock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

/// A wall clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
    now: Cell<NaiveDateTime>,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self { now: Cell::new(now) }
    }

    pub fn set(&self, now: NaiveDateTime) {
        self.now.set(now);
    }

    pub fn advance(&self, by: chrono::Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl WallClock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.now.get()
    }
}

/// Where the clock reads its time from.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum TimeSource {
    /// Follow the host wall clock.
    #[default]
    Wall,
    /// Pinned to an explicit instant.
    Pinned(NaiveDateTime),
}

impl TimeSource {
    /// `Some` pins, `None` returns to the wall clock.
    pub fn from_override(instant: Option<NaiveDateTime>) -> Self {
        instant.map_or(TimeSource::Wall, TimeSource::Pinned)
    }

    /// Resolves the instant to paint.
    ///
    /// `use_local_time` is accepted but does not change the result: wall time
    /// is always the host's local time and no timezone conversion is done.
    pub fn resolve(&self, wall: &dyn WallClock, _use_local_time: bool) -> NaiveDateTime {
        match *self {
            TimeSource::Pinned(t) => t,
            TimeSource::Wall => wall.now(),
        }
    }
}

/// Time-of-day fields the hands are computed from.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ClockTime {
    /// 0..24
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    /// 0..1000
    pub millisecond: u32,
}

impl ClockTime {
    pub fn new(hour: u32, minute: u32, second: u32, millisecond: u32) -> Self {
        Self { hour, minute, second, millisecond }
    }

    pub fn from_datetime(t: &NaiveDateTime) -> Self {
        // Leap seconds are reported as nanosecond >= 1e9.
        let millisecond = (t.nanosecond() / 1_000_000).min(999);
        Self { hour: t.hour(), minute: t.minute(), second: t.second(), millisecond }
    }
}
