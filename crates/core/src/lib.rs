//! # RoomBook Core
//!
//! Pure booking logic for the single shared meeting room. Nothing in this
//! crate performs I/O or reads the system clock on its own: the current time
//! is always passed in, so every function here is deterministic.
//!
//! ## Modules
//!
//! - **models**: bookings, drafts, the static room description
//! - **slots**: the operating window and the start/end slot generators
//! - **validation**: the ordered rule check applied before submission
//! - **time**: clock-time parsing, quarter-hour rounding and the `Clock` seam
//! - **format**: human-readable time and date rendering

/// Error types shared by the client and the binary
pub mod errors;
/// Human-readable rendering of dates and clock times
pub mod format;
/// Booking records, drafts and the room description
pub mod models;
/// Operating window and slot generation
pub mod slots;
/// Clock-time parsing, rounding and time sources
pub mod time;
/// Draft validation
pub mod validation;
