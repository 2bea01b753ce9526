//! # Slot Generation
//!
//! Derives the start and end times that can be offered for a booking on a
//! given day. A slot is a boundary of the operating window's grid
//! (08:30, 08:45, ... 17:30 by default).
//!
//! ## Rules
//!
//! 1. Start candidates are grid boundaries in `[open, close)`.
//! 2. On the current day, boundaries strictly before "now rounded up to the
//!    next grid step" are dropped. Past days offer nothing.
//! 3. Boundaries inside any booking's half-open `[start, end)` are dropped,
//!    so a booking's end time is still offerable as a start.
//! 4. End candidates for a chosen start run from the next boundary up to the
//!    earliest booking that begins at or after the start, capped at `close`.
//!    Every booking of the day is considered, not just the nearest one.

use std::cmp::Ordering;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::{
    errors::{BookingError, BookingResult},
    models::booking::Booking,
    time::round_up_to_slot,
};

pub const DEFAULT_GRANULARITY_MINUTES: u32 = 15;

/// The daily span during which the room may be booked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatingWindow {
    open: NaiveTime,
    close: NaiveTime,
    granularity_minutes: u32,
}

impl OperatingWindow {
    pub fn new(open: NaiveTime, close: NaiveTime, granularity_minutes: u32) -> BookingResult<Self> {
        if open >= close {
            return Err(BookingError::Config(format!(
                "opening time {} must be before closing time {}",
                open.format("%H:%M"),
                close.format("%H:%M")
            )));
        }
        if granularity_minutes == 0 {
            return Err(BookingError::Config(
                "slot granularity must be at least one minute".to_string(),
            ));
        }
        if open.second() != 0 || close.second() != 0 {
            return Err(BookingError::Config(
                "operating window must be given in whole minutes".to_string(),
            ));
        }

        Ok(Self {
            open,
            close,
            granularity_minutes,
        })
    }

    pub fn open(&self) -> NaiveTime {
        self.open
    }

    pub fn close(&self) -> NaiveTime {
        self.close
    }

    pub fn granularity_minutes(&self) -> u32 {
        self.granularity_minutes
    }

    /// Every grid boundary from `open` through `close` inclusive.
    pub fn boundaries(&self) -> impl Iterator<Item = NaiveTime> + '_ {
        let step = Duration::minutes(i64::from(self.granularity_minutes));
        std::iter::successors(Some(self.open), move |time| {
            let (next, wrapped) = time.overflowing_add_signed(step);
            (wrapped == 0 && next <= self.close).then_some(next)
        })
    }
}

impl Default for OperatingWindow {
    fn default() -> Self {
        Self {
            open: NaiveTime::MIN + Duration::minutes(8 * 60 + 30),
            close: NaiveTime::MIN + Duration::minutes(17 * 60 + 30),
            granularity_minutes: DEFAULT_GRANULARITY_MINUTES,
        }
    }
}

/// What a picker should show. An empty list is never handed out: callers get
/// `NoneAvailable` instead and render a "no slots" message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotOptions {
    Available(Vec<NaiveTime>),
    NoneAvailable,
}

impl SlotOptions {
    pub fn as_slice(&self) -> &[NaiveTime] {
        match self {
            SlotOptions::Available(slots) => slots,
            SlotOptions::NoneAvailable => &[],
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, SlotOptions::Available(_))
    }
}

impl From<Vec<NaiveTime>> for SlotOptions {
    fn from(slots: Vec<NaiveTime>) -> Self {
        if slots.is_empty() {
            SlotOptions::NoneAvailable
        } else {
            SlotOptions::Available(slots)
        }
    }
}

/// Lower bound on start times for a given day.
enum StartBound {
    Any,
    From(NaiveTime),
    Closed,
}

fn start_bound(date: NaiveDate, now: NaiveDateTime, granularity_minutes: u32) -> StartBound {
    match date.cmp(&now.date()) {
        Ordering::Less => StartBound::Closed,
        Ordering::Equal => round_up_to_slot(now.time(), granularity_minutes)
            .map_or(StartBound::Closed, StartBound::From),
        Ordering::Greater => StartBound::Any,
    }
}

fn is_booked(bookings: &[Booking], date: NaiveDate, time: NaiveTime) -> bool {
    bookings
        .iter()
        .any(|booking| booking.date == date && booking.contains(time))
}

/// Candidate start times for `date`, earliest first.
pub fn available_start_slots(
    date: NaiveDate,
    now: NaiveDateTime,
    bookings: &[Booking],
    window: &OperatingWindow,
) -> Vec<NaiveTime> {
    let earliest = match start_bound(date, now, window.granularity_minutes) {
        StartBound::Closed => return Vec::new(),
        StartBound::From(bound) => Some(bound),
        StartBound::Any => None,
    };

    window
        .boundaries()
        .filter(|slot| *slot < window.close)
        .filter(|slot| earliest.is_none_or(|bound| *slot >= bound))
        .filter(|slot| !is_booked(bookings, date, *slot))
        .collect()
}

/// Candidate end times once `start` has been picked, earliest first.
pub fn available_end_slots(
    date: NaiveDate,
    start: NaiveTime,
    bookings: &[Booking],
    window: &OperatingWindow,
) -> Vec<NaiveTime> {
    if is_booked(bookings, date, start) {
        return Vec::new();
    }

    let limit = bookings
        .iter()
        .filter(|booking| booking.date == date && booking.start_time >= start)
        .map(|booking| booking.start_time)
        .min()
        .map_or(window.close, |next| next.min(window.close));

    window
        .boundaries()
        .filter(|slot| *slot > start && *slot <= limit)
        .collect()
}

/// The start time a new draft should be prefilled with: the rounded current
/// time today, 09:00 on other days, or the first offered slot if that
/// preference is not offered.
pub fn default_start(
    date: NaiveDate,
    now: NaiveDateTime,
    offered: &[NaiveTime],
    granularity_minutes: u32,
) -> Option<NaiveTime> {
    let preferred = if date == now.date() {
        round_up_to_slot(now.time(), granularity_minutes)
    } else {
        NaiveTime::from_hms_opt(9, 0, 0)
    };

    preferred
        .filter(|time| offered.contains(time))
        .or_else(|| offered.first().copied())
}
