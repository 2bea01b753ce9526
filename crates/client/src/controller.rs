//! # Booking Controller
//!
//! Owns the client's whole state: the selected date, the bookings last
//! fetched for it, the loading flag and the current notification.
//! Presentation code only reads through the view methods; the three
//! commands (`select_date`, `submit`, `cancel`) are the only way to change
//! anything.
//!
//! Every command takes `&mut self`, so at most one backend call is in flight
//! and a fetch can never resolve after the user has moved on to another date.

use chrono::{Duration, NaiveDate, NaiveTime};
use roombook_core::{
    errors::BookingResult,
    models::{
        booking::{sort_by_start, Booking, BookingDraft, BookingId},
        room::{Room, CONFERENCE_SUITE},
    },
    slots::{available_end_slots, available_start_slots, default_start, OperatingWindow, SlotOptions},
    time::{clock_string, Clock, SystemClock},
    validation::{validate_booking, ValidationContext},
};
use tracing::{error, info, warn};

use crate::{
    api::BookingApi,
    notification::{Notification, Notifier},
};

pub const BOOKED_MESSAGE: &str = "Meeting room booked successfully!";
pub const CANCELLED_MESSAGE: &str = "Booking cancelled successfully";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub selected_date: NaiveDate,
    /// Bookings from the last fetch, plus any created since. Unordered.
    pub bookings: Vec<Booking>,
    pub loading: bool,
}

pub struct BookingController<A, C = SystemClock> {
    api: A,
    clock: C,
    room: Room,
    window: OperatingWindow,
    state: AppState,
    notifier: Notifier,
}

impl<A: BookingApi, C: Clock> BookingController<A, C> {
    /// A controller with today selected and nothing fetched yet.
    pub fn new(api: A, clock: C, window: OperatingWindow, notification_ttl: Duration) -> Self {
        let selected_date = clock.now().date();
        Self {
            api,
            clock,
            room: CONFERENCE_SUITE,
            window,
            state: AppState {
                selected_date,
                bookings: Vec::new(),
                loading: false,
            },
            notifier: Notifier::new(notification_ttl),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn room(&self) -> &Room {
        &self.room
    }

    pub fn window(&self) -> &OperatingWindow {
        &self.window
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.state.selected_date
    }

    pub fn is_today_selected(&self) -> bool {
        self.state.selected_date == self.clock.now().date()
    }

    /// Bookings on the selected date, earliest first.
    pub fn bookings_for_selected_date(&self) -> Vec<&Booking> {
        self.bookings_on(self.state.selected_date)
    }

    /// Today's bookings among those loaded, earliest first.
    pub fn todays_bookings(&self) -> Vec<&Booking> {
        self.bookings_on(self.clock.now().date())
    }

    fn bookings_on(&self, date: NaiveDate) -> Vec<&Booking> {
        let mut on_date: Vec<&Booking> = self
            .state
            .bookings
            .iter()
            .filter(|booking| booking.date == date)
            .collect();
        on_date.sort_by(|a, b| a.start_time.cmp(&b.start_time));
        on_date
    }

    pub fn start_options(&self) -> SlotOptions {
        available_start_slots(
            self.state.selected_date,
            self.clock.now(),
            &self.state.bookings,
            &self.window,
        )
        .into()
    }

    pub fn end_options(&self, start: NaiveTime) -> SlotOptions {
        available_end_slots(
            self.state.selected_date,
            start,
            &self.state.bookings,
            &self.window,
        )
        .into()
    }

    /// An empty form for the selected date with the start time prefilled.
    pub fn new_draft(&self) -> BookingDraft {
        let now = self.clock.now();
        let offered = self.start_options();
        let mut draft = BookingDraft::new(self.state.selected_date);

        if let Some(start) = default_start(
            self.state.selected_date,
            now,
            offered.as_slice(),
            self.window.granularity_minutes(),
        ) {
            draft.start_time = clock_string(start);
        }

        draft
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notifier.current(self.clock.now())
    }

    pub fn dismiss_notification(&mut self) {
        self.notifier.dismiss();
    }

    /// Selects `date` and replaces the local list with the backend's.
    pub async fn select_date(&mut self, date: NaiveDate) -> BookingResult<()> {
        self.state.selected_date = date;
        self.refresh().await
    }

    /// Re-fetches the selected date.
    pub async fn refresh(&mut self) -> BookingResult<()> {
        let date = self.state.selected_date;
        let result = {
            let _loading = LoadingFlag::raise(&mut self.state.loading);
            self.api.list_bookings(date).await
        };

        match result {
            Ok(bookings) => {
                info!("Loaded {} bookings for {}", bookings.len(), date);
                self.state.bookings = bookings;
                Ok(())
            }
            Err(e) => {
                error!("Failed to load bookings for {}: {}", date, e);
                self.notifier.error(e.to_string(), self.clock.now());
                Err(e)
            }
        }
    }

    /// Validates `draft` against the loaded bookings and sends it.
    ///
    /// A draft for a date other than the selected one first switches to that
    /// date, so the overlap check always runs against that day's list.
    pub async fn submit(&mut self, draft: &BookingDraft) -> BookingResult<Booking> {
        if draft.date != self.state.selected_date {
            self.select_date(draft.date).await?;
        }

        let now = self.clock.now();
        let ctx = ValidationContext {
            granularity_minutes: self.window.granularity_minutes(),
            ..ValidationContext::new(&self.room, now, &self.state.bookings)
        };

        let request = match validate_booking(draft, &ctx) {
            Ok(request) => request,
            Err(e) => {
                warn!("Rejected booking draft: {}", e);
                self.notifier.error(e.to_string(), now);
                return Err(e.into());
            }
        };

        let result = {
            let _loading = LoadingFlag::raise(&mut self.state.loading);
            self.api.create_booking(&request).await
        };

        match result {
            Ok(created) => {
                info!(
                    "Booked {} on {} from {} to {} (id {})",
                    created.title, created.date, created.start_time, created.end_time, created.id
                );
                self.merge(created.clone());
                self.notifier.success(BOOKED_MESSAGE, self.clock.now());
                Ok(created)
            }
            Err(e) => {
                error!("Failed to create booking: {}", e);
                self.notifier.error(e.to_string(), self.clock.now());
                Err(e)
            }
        }
    }

    /// Cancels booking `id` and drops it from the local list.
    pub async fn cancel(&mut self, id: BookingId) -> BookingResult<()> {
        let result = {
            let _loading = LoadingFlag::raise(&mut self.state.loading);
            self.api.cancel_booking(id).await
        };

        match result {
            Ok(()) => {
                info!("Cancelled booking {}", id);
                self.state.bookings.retain(|booking| booking.id != id);
                self.notifier.success(CANCELLED_MESSAGE, self.clock.now());
                Ok(())
            }
            Err(e) => {
                error!("Failed to cancel booking {}: {}", id, e);
                self.notifier.error(e.to_string(), self.clock.now());
                Err(e)
            }
        }
    }

    fn merge(&mut self, booking: Booking) {
        self.state.bookings.retain(|existing| existing.id != booking.id);
        self.state.bookings.push(booking);
        sort_by_start(&mut self.state.bookings);
    }
}

/// Holds `AppState::loading` up for one backend call and lowers it when
/// dropped, including when the command future is dropped mid-call.
struct LoadingFlag<'a>(&'a mut bool);

impl<'a> LoadingFlag<'a> {
    fn raise(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for LoadingFlag<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockBookingApi;
    use crate::notification::NotificationKind;
    use chrono::NaiveDateTime;
    use mockall::predicate::eq;
    use pretty_assertions::assert_eq;
    use roombook_core::{
        errors::{BookingError, ValidationError},
        models::booking::NewBooking,
        time::FixedClock,
    };

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn tomorrow() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 20).unwrap()
    }

    fn now() -> NaiveDateTime {
        today().and_time(t(10, 5))
    }

    fn booking(id: BookingId, date: NaiveDate, start: NaiveTime, end: NaiveTime) -> Booking {
        Booking {
            id,
            date,
            start_time: start,
            end_time: end,
            title: format!("Booking {}", id),
            attendees: None,
            notes: None,
        }
    }

    fn controller(api: MockBookingApi) -> BookingController<MockBookingApi, FixedClock> {
        BookingController::new(
            api,
            FixedClock(now()),
            OperatingWindow::default(),
            Duration::seconds(3),
        )
    }

    fn draft(date: NaiveDate, start: &str, end: &str) -> BookingDraft {
        BookingDraft {
            title: "Sync".to_string(),
            start_time: start.to_string(),
            end_time: end.to_string(),
            attendees: "5".to_string(),
            notes: String::new(),
            date,
        }
    }

    #[tokio::test]
    async fn test_select_date_replaces_bookings() {
        let mut api = MockBookingApi::new();
        api.expect_list_bookings()
            .with(eq(tomorrow()))
            .times(1)
            .returning(|date| {
                Ok(vec![
                    booking(2, date, t(13, 0), t(14, 0)),
                    booking(1, date, t(9, 0), t(10, 0)),
                ])
            });

        let mut ctrl = controller(api);
        ctrl.select_date(tomorrow()).await.unwrap();

        let ids: Vec<_> = ctrl.bookings_for_selected_date().iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert!(!ctrl.state().loading);
        assert!(!ctrl.is_today_selected());
    }

    #[tokio::test]
    async fn test_fetch_failure_raises_error_notification() {
        let mut api = MockBookingApi::new();
        api.expect_list_bookings().returning(|_| {
            Err(BookingError::Api {
                status: 500,
                message: "Failed to fetch bookings from the server.".to_string(),
            })
        });

        let mut ctrl = controller(api);
        let result = ctrl.select_date(tomorrow()).await;

        assert!(result.is_err());
        let shown = ctrl.notification().expect("error notification");
        assert_eq!(shown.kind, NotificationKind::Error);
        assert_eq!(shown.message, "Failed to fetch bookings from the server.");
    }

    #[tokio::test]
    async fn test_submit_merges_created_booking_once_in_order() {
        let mut api = MockBookingApi::new();
        api.expect_list_bookings()
            .returning(|date| Ok(vec![booking(1, date, t(11, 0), t(12, 0))]));
        api.expect_create_booking()
            .times(1)
            .returning(|request: &NewBooking| {
                Ok(Booking {
                    id: 77,
                    date: request.date,
                    start_time: request.start_time,
                    end_time: request.end_time,
                    title: request.title.clone(),
                    attendees: request.attendees,
                    notes: request.notes.clone(),
                })
            });

        let mut ctrl = controller(api);
        ctrl.select_date(tomorrow()).await.unwrap();
        let created = ctrl.submit(&draft(tomorrow(), "09:00", "09:30")).await.unwrap();

        assert_eq!(created.id, 77);
        let listed = ctrl.bookings_for_selected_date();
        assert_eq!(listed.iter().filter(|b| b.id == 77).count(), 1);
        let ids: Vec<_> = listed.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![77, 1]);
        assert_eq!(ctrl.notification().unwrap().message, BOOKED_MESSAGE);
    }

    #[tokio::test]
    async fn test_submit_replaces_echoed_duplicate() {
        let mut api = MockBookingApi::new();
        api.expect_list_bookings()
            .returning(|date| Ok(vec![booking(5, date, t(9, 0), t(9, 30))]));
        api.expect_create_booking()
            .returning(|request: &NewBooking| Ok(booking(6, request.date, t(14, 0), t(15, 0))));

        let mut ctrl = controller(api);
        ctrl.select_date(tomorrow()).await.unwrap();
        ctrl.submit(&draft(tomorrow(), "14:00", "15:00")).await.unwrap();
        ctrl.submit(&draft(tomorrow(), "15:00", "16:00")).await.unwrap();

        assert_eq!(ctrl.bookings_for_selected_date().len(), 2);
    }

    #[tokio::test]
    async fn test_submit_rejects_overlap_without_calling_backend() {
        let mut api = MockBookingApi::new();
        api.expect_list_bookings()
            .returning(|date| Ok(vec![booking(1, date, t(11, 0), t(12, 0))]));
        api.expect_create_booking().times(0);

        let mut ctrl = controller(api);
        ctrl.select_date(tomorrow()).await.unwrap();
        let result = ctrl.submit(&draft(tomorrow(), "10:30", "12:30")).await;

        assert!(matches!(
            result,
            Err(BookingError::Validation(ValidationError::Overlap(_)))
        ));
        assert_eq!(
            ctrl.notification().unwrap().kind,
            NotificationKind::Error
        );
    }

    #[tokio::test]
    async fn test_submit_for_other_date_fetches_that_date_first() {
        let mut api = MockBookingApi::new();
        api.expect_list_bookings()
            .with(eq(tomorrow()))
            .times(1)
            .returning(|date| Ok(vec![booking(1, date, t(9, 0), t(10, 0))]));
        api.expect_create_booking().times(0);

        let mut ctrl = controller(api);
        assert_eq!(ctrl.selected_date(), today());

        let result = ctrl.submit(&draft(tomorrow(), "09:30", "10:30")).await;

        assert_eq!(ctrl.selected_date(), tomorrow());
        assert!(matches!(
            result,
            Err(BookingError::Validation(ValidationError::Overlap(_)))
        ));
    }

    #[tokio::test]
    async fn test_backend_rejection_surfaces_message() {
        let mut api = MockBookingApi::new();
        api.expect_list_bookings().returning(|_| Ok(Vec::new()));
        api.expect_create_booking().returning(|_| {
            Err(BookingError::Api {
                status: 409,
                message: "Room already booked".to_string(),
            })
        });

        let mut ctrl = controller(api);
        ctrl.select_date(tomorrow()).await.unwrap();
        let result = ctrl.submit(&draft(tomorrow(), "09:00", "10:00")).await;

        assert!(result.is_err());
        assert!(ctrl.bookings_for_selected_date().is_empty());
        assert_eq!(ctrl.notification().unwrap().message, "Room already booked");
    }

    #[tokio::test]
    async fn test_cancel_removes_booking() {
        let mut api = MockBookingApi::new();
        api.expect_list_bookings().returning(|date| {
            Ok(vec![
                booking(1, date, t(9, 0), t(10, 0)),
                booking(2, date, t(11, 0), t(12, 0)),
            ])
        });
        api.expect_cancel_booking()
            .with(eq(1))
            .times(1)
            .returning(|_| Ok(()));

        let mut ctrl = controller(api);
        ctrl.select_date(tomorrow()).await.unwrap();
        ctrl.cancel(1).await.unwrap();

        let ids: Vec<_> = ctrl.bookings_for_selected_date().iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![2]);
        assert_eq!(ctrl.notification().unwrap().message, CANCELLED_MESSAGE);
    }

    #[tokio::test]
    async fn test_cancel_failure_keeps_booking() {
        let mut api = MockBookingApi::new();
        api.expect_list_bookings()
            .returning(|date| Ok(vec![booking(1, date, t(9, 0), t(10, 0))]));
        api.expect_cancel_booking().returning(|_| {
            Err(BookingError::Api {
                status: 404,
                message: "Failed to cancel the booking.".to_string(),
            })
        });

        let mut ctrl = controller(api);
        ctrl.select_date(tomorrow()).await.unwrap();

        assert!(ctrl.cancel(1).await.is_err());
        assert_eq!(ctrl.bookings_for_selected_date().len(), 1);
    }

    #[tokio::test]
    async fn test_options_and_default_draft() {
        let mut api = MockBookingApi::new();
        api.expect_list_bookings()
            .returning(|date| Ok(vec![booking(1, date, t(10, 30), t(11, 0))]));

        let mut ctrl = controller(api);
        ctrl.select_date(today()).await.unwrap();

        let starts = ctrl.start_options();
        assert_eq!(starts.as_slice().first(), Some(&t(10, 15)));
        assert!(!starts.as_slice().contains(&t(10, 30)));

        assert_eq!(
            ctrl.end_options(t(10, 15)),
            SlotOptions::Available(vec![t(10, 30)])
        );
        assert_eq!(ctrl.new_draft().start_time, "10:15");
        assert_eq!(ctrl.todays_bookings().len(), 1);
    }

    /// Never answers, so callers can abandon a command mid-call.
    struct StalledApi;

    #[async_trait::async_trait]
    impl BookingApi for StalledApi {
        async fn list_bookings(&self, _date: NaiveDate) -> BookingResult<Vec<Booking>> {
            std::future::pending().await
        }

        async fn create_booking(&self, _request: &NewBooking) -> BookingResult<Booking> {
            std::future::pending().await
        }

        async fn cancel_booking(&self, _id: BookingId) -> BookingResult<()> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_loading_flag_cleared_when_command_abandoned() {
        let mut ctrl = BookingController::new(
            StalledApi,
            FixedClock(now()),
            OperatingWindow::default(),
            Duration::seconds(3),
        );
        let wait = std::time::Duration::from_millis(20);

        assert!(tokio::time::timeout(wait, ctrl.refresh()).await.is_err());
        assert!(!ctrl.state().loading);

        assert!(tokio::time::timeout(wait, ctrl.cancel(7)).await.is_err());
        assert!(!ctrl.state().loading);

        let pending = draft(today(), "11:00", "12:00");
        assert!(tokio::time::timeout(wait, ctrl.submit(&pending)).await.is_err());
        assert!(!ctrl.state().loading);
        assert!(ctrl.notification().is_none());
    }
}
