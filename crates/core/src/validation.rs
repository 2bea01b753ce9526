//! # Draft Validation
//!
//! Rules are checked in a fixed order and the first failure wins:
//!
//! 1. title, start and end are present
//! 2. start and end are `HH:MM` clock times
//! 3. start is before end
//! 4. the start is not in the past
//! 5. the attendee count, if given, is a positive number within capacity
//! 6. the interval does not overlap any booking in the authoritative list
//!
//! The overlap rule runs even though the slot pickers never offer an
//! overlapping interval: a draft can be stale or filled in by hand.

use std::cmp::Ordering;

use chrono::{NaiveDateTime, NaiveTime};

use crate::{
    errors::ValidationError,
    models::{
        booking::{Booking, BookingDraft, NewBooking},
        room::Room,
    },
    slots::DEFAULT_GRANULARITY_MINUTES,
    time::{parse_draft_time, round_up_to_slot},
};

/// Everything a draft is checked against besides itself.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    pub room: &'a Room,
    pub now: NaiveDateTime,
    pub granularity_minutes: u32,
    /// Bookings as last fetched from the backend.
    pub bookings: &'a [Booking],
}

impl<'a> ValidationContext<'a> {
    pub fn new(room: &'a Room, now: NaiveDateTime, bookings: &'a [Booking]) -> Self {
        Self {
            room,
            now,
            granularity_minutes: DEFAULT_GRANULARITY_MINUTES,
            bookings,
        }
    }
}

/// Checks `draft` and, when every rule passes, turns it into the request
/// body for the backend.
pub fn validate_booking(
    draft: &BookingDraft,
    ctx: &ValidationContext<'_>,
) -> Result<NewBooking, ValidationError> {
    let title = draft.title.trim();
    let start_raw = draft.start_time.trim();
    let end_raw = draft.end_time.trim();

    if title.is_empty() || start_raw.is_empty() || end_raw.is_empty() {
        return Err(ValidationError::MissingFields);
    }

    let start_time = parse_draft_time(start_raw)?;
    let end_time = parse_draft_time(end_raw)?;

    if start_time >= end_time {
        return Err(ValidationError::EndBeforeStart);
    }

    if starts_in_past(draft, start_time, ctx) {
        return Err(ValidationError::InPast);
    }

    let attendees = parse_attendees(&draft.attendees)?;
    if let Some(count) = attendees {
        if count > ctx.room.capacity {
            return Err(ValidationError::ExceedsCapacity {
                capacity: ctx.room.capacity,
            });
        }
    }

    if let Some(conflict) = ctx
        .bookings
        .iter()
        .find(|booking| booking.date == draft.date && booking.overlaps(start_time, end_time))
    {
        return Err(ValidationError::Overlap(conflict.title.clone()));
    }

    let notes = draft.notes.trim();

    Ok(NewBooking {
        title: title.to_string(),
        start_time,
        end_time,
        attendees,
        notes: (!notes.is_empty()).then(|| notes.to_string()),
        date: draft.date,
    })
}

fn starts_in_past(draft: &BookingDraft, start: NaiveTime, ctx: &ValidationContext<'_>) -> bool {
    match draft.date.cmp(&ctx.now.date()) {
        Ordering::Less => true,
        Ordering::Equal => round_up_to_slot(ctx.now.time(), ctx.granularity_minutes)
            .is_none_or(|earliest| start < earliest),
        Ordering::Greater => false,
    }
}

fn parse_attendees(raw: &str) -> Result<Option<u32>, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidAttendees);
    }

    // Digits only, so a parse failure means the count overflowed.
    match raw.parse::<u32>() {
        Ok(0) => Err(ValidationError::InvalidAttendees),
        Ok(count) => Ok(Some(count)),
        Err(_) => Ok(Some(u32::MAX)),
    }
}
