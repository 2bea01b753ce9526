//! # Booking API Adapter
//!
//! The backend owns storage, conflict detection and ID assignment. This
//! module is the only place that talks to it:
//!
//! - `GET    {base}/bookings/{date}` lists a day's bookings
//! - `POST   {base}/bookings` creates one and echoes it back with its `id`
//! - `DELETE {base}/bookings/{id}` cancels one
//!
//! Every failure (bad status, network error, unreadable body) comes back as a
//! `BookingError` whose `Display` is the message the user should see.

use async_trait::async_trait;
use chrono::NaiveDate;
use eyre::WrapErr;
use roombook_core::{
    errors::{BookingError, BookingResult},
    models::booking::{ApiErrorBody, Booking, BookingId, NewBooking},
};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::ClientConfig;

pub const FETCH_FAILED: &str = "Failed to fetch bookings from the server.";
pub const BOOK_FAILED: &str = "Failed to book the room.";
pub const CANCEL_FAILED: &str = "Failed to cancel the booking.";

/// Remote operations the controller needs from the booking backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingApi: Send + Sync {
    async fn list_bookings(&self, date: NaiveDate) -> BookingResult<Vec<Booking>>;

    async fn create_booking(&self, request: &NewBooking) -> BookingResult<Booking>;

    async fn cancel_booking(&self, id: BookingId) -> BookingResult<()>;
}

/// `BookingApi` over HTTP with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpBookingApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBookingApi {
    pub fn new(config: &ClientConfig) -> BookingResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout))
            .build()
            .wrap_err("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

#[async_trait]
impl BookingApi for HttpBookingApi {
    async fn list_bookings(&self, date: NaiveDate) -> BookingResult<Vec<Booking>> {
        let url = self.url(&format!("bookings/{}", date.format("%Y-%m-%d")));
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await.wrap_err(FETCH_FAILED)?;

        let status = response.status();
        if !status.is_success() {
            warn!("Listing bookings for {} failed with {}", date, status);
            return Err(BookingError::Api {
                status: status.as_u16(),
                message: FETCH_FAILED.to_string(),
            });
        }

        let bookings = response
            .json::<Vec<Booking>>()
            .await
            .wrap_err(FETCH_FAILED)?;

        Ok(bookings)
    }

    async fn create_booking(&self, request: &NewBooking) -> BookingResult<Booking> {
        let url = self.url("bookings");
        debug!("POST {} for {} {}", url, request.date, request.title);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .wrap_err(BOOK_FAILED)?;

        let status = response.status();
        let body = response.text().await.wrap_err(BOOK_FAILED)?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .ok()
                .and_then(|payload| payload.error)
                .unwrap_or_else(|| BOOK_FAILED.to_string());
            warn!("Creating booking failed with {}: {}", status, message);
            return Err(BookingError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let booking = serde_json::from_str::<Booking>(&body).wrap_err(BOOK_FAILED)?;

        Ok(booking)
    }

    async fn cancel_booking(&self, id: BookingId) -> BookingResult<()> {
        let url = self.url(&format!("bookings/{}", id));
        debug!("DELETE {}", url);

        let response = self.client.delete(&url).send().await.wrap_err(CANCEL_FAILED)?;

        let status = response.status();
        if !status.is_success() {
            warn!("Cancelling booking {} failed with {}", id, status);
            return Err(BookingError::Api {
                status: status.as_u16(),
                message: CANCEL_FAILED.to_string(),
            });
        }

        Ok(())
    }
}
