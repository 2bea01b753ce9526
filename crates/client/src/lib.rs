//! # RoomBook Client
//!
//! Everything between the pure booking logic in `roombook-core` and a front
//! end: the REST adapter for the booking backend, the transient notification
//! channel, and the controller that owns the application state.
//!
//! ## Architecture
//!
//! - **Config**: environment-driven settings
//! - **Api**: the `BookingApi` seam and its `reqwest` implementation
//! - **Controller**: state, read-only views and the select/submit/cancel commands
//! - **Notification**: auto-dismissing success and error messages

/// Backend access
pub mod api;
/// Configuration loaded from the environment
pub mod config;
/// Application state and commands
pub mod controller;
/// Transient user-facing messages
pub mod notification;

use chrono::Duration;
use roombook_core::{errors::BookingResult, time::SystemClock};
use tracing::info;

use crate::{api::HttpBookingApi, controller::BookingController};

/// Builds a controller talking to the configured backend over HTTP and
/// reading the system clock.
pub fn connect(config: &config::ClientConfig) -> BookingResult<BookingController<HttpBookingApi>> {
    info!("Using booking API at {}", config.api_url);

    let api = HttpBookingApi::new(config)?;
    // Capped at one day.
    let ttl = Duration::seconds(config.notification_seconds.min(86_400) as i64);

    Ok(BookingController::new(api, SystemClock, config.window, ttl))
}
