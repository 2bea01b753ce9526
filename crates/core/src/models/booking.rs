use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Identifier assigned by the booking backend.
pub type BookingId = i64;

/// A reservation of the room on one day, as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: BookingId,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub title: String,
    #[serde(default)]
    pub attendees: Option<u32>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Booking {
    /// True when `time` falls in `[start_time, end_time)`.
    pub fn contains(&self, time: NaiveTime) -> bool {
        self.start_time <= time && time < self.end_time
    }

    /// True when `[start, end)` shares any instant with this booking.
    pub fn overlaps(&self, start: NaiveTime, end: NaiveTime) -> bool {
        start < self.end_time && self.start_time < end
    }
}

/// Body of `POST /bookings`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    pub title: String,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub attendees: Option<u32>,
    pub notes: Option<String>,
    pub date: NaiveDate,
}

/// Error payload the backend sends alongside a non-success status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

/// Booking form values exactly as entered. Nothing here is trusted until it
/// passes [`crate::validation::validate_booking`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingDraft {
    pub title: String,
    pub start_time: String,
    pub end_time: String,
    /// Optional numeric string; blank means "not given".
    pub attendees: String,
    pub notes: String,
    pub date: NaiveDate,
}

impl BookingDraft {
    /// An empty form for `date`.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            title: String::new(),
            start_time: String::new(),
            end_time: String::new(),
            attendees: String::new(),
            notes: String::new(),
            date,
        }
    }
}

/// Sorts bookings by start time, earliest first.
pub fn sort_by_start(bookings: &mut [Booking]) {
    bookings.sort_by(|a, b| a.start_time.cmp(&b.start_time));
}

mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::time::{clock_string, parse_clock_time};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&clock_string(*time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_clock_time(&raw).map_err(serde::de::Error::custom)
    }
}
