//! Court reservation form: local validation, submission and the timed reset
//! after a confirmed booking.

use std::fmt;

use chrono::NaiveDate;
use log::{info, warn};
use tokio::time::Duration;

use crate::api::ApiClient;
use crate::models::{ReservationReceipt, ReservationRequest, Session};

pub const RESET_DELAY: Duration = Duration::from_secs(3);
pub const BOOKING_CONFIRMED: &str = "Booking confirmed! Your court has been reserved.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Court {
    pub id: &'static str,
    pub name: &'static str,
    pub surface: &'static str,
    pub description: &'static str,
}

pub static COURTS: [Court; 3] = [
    Court {
        id: "1",
        name: "Center Court",
        surface: "Clay",
        description: "Premier clay court with stadium seating",
    },
    Court {
        id: "2",
        name: "Court 2",
        surface: "Hard",
        description: "All-weather hard court with lighting",
    },
    Court {
        id: "3",
        name: "Court 3",
        surface: "Grass",
        description: "Traditional grass court",
    },
];

pub fn find_court(id: &str) -> Option<&'static Court> {
    COURTS.iter().find(|court| court.id == id)
}

static SLOT_LABELS: [&str; 9] = [
    "08:00 - 09:30",
    "09:30 - 11:00",
    "11:00 - 12:30",
    "12:30 - 14:00",
    "14:00 - 15:30",
    "15:30 - 17:00",
    "17:00 - 18:30",
    "18:30 - 20:00",
    "20:00 - 21:30",
];

/// One of the bookable 90 minute slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservationSlot(&'static str);

impl ReservationSlot {
    pub fn all() -> impl Iterator<Item = ReservationSlot> {
        SLOT_LABELS.iter().copied().map(ReservationSlot)
    }

    /// Accepts the full label (`08:00 - 09:30`) or just its start (`08:00`).
    pub fn parse(value: &str) -> Option<ReservationSlot> {
        let value = value.trim();
        ReservationSlot::all().find(|slot| slot.0 == value || slot.start() == value)
    }

    pub fn label(&self) -> &'static str {
        self.0
    }

    pub fn start(&self) -> &'static str {
        self.0.split(" - ").next().unwrap_or(self.0)
    }
}

impl fmt::Display for ReservationSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.0)
    }
}

impl ReservationRequest {
    pub fn new(court_id: &str, date: NaiveDate, slot: ReservationSlot) -> ReservationRequest {
        ReservationRequest {
            court_id: court_id.to_string(),
            reservation_time: format!("{}T{}:00", date.format("%Y-%m-%d"), slot.start()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("You must be logged in to make a reservation")]
    NotLoggedIn,
    #[error("Please select a court")]
    UnknownCourt,
    #[error("Please select a date")]
    MissingDate,
    #[error("Please select a time slot")]
    MissingSlot,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormStatus {
    Idle,
    Submitting,
    Confirmed(ReservationReceipt),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Banner {
    Success(String),
    Error(String),
}

#[derive(Debug, Clone)]
pub struct ReservationForm {
    pub court_id: String,
    pub date: Option<NaiveDate>,
    pub slot: Option<ReservationSlot>,
    status: FormStatus,
}

impl Default for ReservationForm {
    fn default() -> Self {
        ReservationForm {
            court_id: COURTS[0].id.to_string(),
            date: None,
            slot: None,
            status: FormStatus::Idle,
        }
    }
}

impl ReservationForm {
    pub fn new() -> ReservationForm {
        ReservationForm::default()
    }

    pub fn status(&self) -> &FormStatus {
        &self.status
    }

    /// Checks run in order: login, court, date, slot.
    pub fn validate(&self, session: Option<&Session>) -> Result<ReservationRequest, FormError> {
        if session.is_none() {
            return Err(FormError::NotLoggedIn);
        }
        if find_court(&self.court_id).is_none() {
            return Err(FormError::UnknownCourt);
        }
        let date = self.date.ok_or(FormError::MissingDate)?;
        let slot = self.slot.ok_or(FormError::MissingSlot)?;
        Ok(ReservationRequest::new(&self.court_id, date, slot))
    }

    /// Validates and, only if that passes, sends the booking.
    pub async fn submit(&mut self, client: &ApiClient) -> &FormStatus {
        let session = client.session().get_session();
        let request = match self.validate(session.as_ref()) {
            Ok(request) => request,
            Err(e) => {
                self.status = FormStatus::Failed(e.to_string());
                return &self.status;
            }
        };

        self.status = FormStatus::Submitting;
        self.status = match client.create_reservation(&request).await {
            Ok(receipt) => {
                info!("reservation:: confirmed {}", request.reservation_time);
                FormStatus::Confirmed(receipt)
            }
            Err(e) => {
                warn!("reservation:: failed: {e}");
                FormStatus::Failed(e.to_string())
            }
        };
        &self.status
    }

    pub fn banner(&self) -> Option<Banner> {
        match &self.status {
            FormStatus::Confirmed(_) => Some(Banner::Success(BOOKING_CONFIRMED.to_string())),
            FormStatus::Failed(message) => Some(Banner::Error(message.clone())),
            FormStatus::Idle | FormStatus::Submitting => None,
        }
    }

    pub fn reset(&mut self) {
        self.date = None;
        self.slot = None;
        self.status = FormStatus::Idle;
    }

    /// Clears a confirmed form after `delay`; any other state is left alone.
    /// For callers that keep the form on screen between bookings; the
    /// one-shot `reserve` command exits instead.
    pub async fn reset_after(&mut self, delay: Duration) {
        tokio::time::sleep(delay).await;
        if matches!(self.status, FormStatus::Confirmed(_)) {
            self.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::models::{Role, UserProfile};
    use crate::session::{AdminSessionStore, SessionContext};
    use crate::storage::MemoryStorage;
    use crate::types::SharedStorage;

    fn session() -> Session {
        Session {
            token: "tok".into(),
            user: UserProfile {
                first_name: "Lina".into(),
                last_name: "Cherif".into(),
                phone_number: None,
                role: Role::Player,
            },
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    #[test]
    fn slots_parse_from_label_or_start() {
        let slot = ReservationSlot::parse("08:00 - 09:30").unwrap();
        assert_eq!(slot.start(), "08:00");
        assert_eq!(ReservationSlot::parse("20:00").unwrap().label(), "20:00 - 21:30");
        assert_eq!(ReservationSlot::parse("07:00"), None);
        assert_eq!(ReservationSlot::all().count(), 9);
    }

    #[test]
    fn request_time_is_date_plus_slot_start() {
        let request = ReservationRequest::new("2", date(), ReservationSlot::parse("14:00").unwrap());
        assert_eq!(request.court_id, "2");
        assert_eq!(request.reservation_time, "2025-03-01T14:00:00");
    }

    #[test]
    fn validation_order() {
        let mut form = ReservationForm::new();
        assert_eq!(form.validate(None), Err(FormError::NotLoggedIn));
        assert_eq!(form.validate(Some(&session())), Err(FormError::MissingDate));

        form.date = Some(date());
        assert_eq!(form.validate(Some(&session())), Err(FormError::MissingSlot));

        form.slot = ReservationSlot::parse("09:30");
        let request = form.validate(Some(&session())).unwrap();
        assert_eq!(request.reservation_time, "2025-03-01T09:30:00");

        form.court_id = "9".into();
        assert_eq!(form.validate(Some(&session())), Err(FormError::UnknownCourt));
    }

    #[tokio::test]
    async fn missing_date_never_reaches_the_network() {
        let storage: SharedStorage = Arc::new(MemoryStorage::new());
        let ctx = SessionContext::new(storage.clone());
        ctx.set_session(&session()).unwrap();
        // Nothing listens on the discard port; a request would fail as a network error.
        let client = ApiClient::new("http://127.0.0.1:9", ctx, AdminSessionStore::new(storage));

        let mut form = ReservationForm::new();
        form.slot = ReservationSlot::parse("09:30");
        assert_eq!(form.submit(&client).await, &FormStatus::Failed("Please select a date".into()));
        assert_eq!(form.banner(), Some(Banner::Error("Please select a date".into())));

        form.date = Some(date());
        form.slot = None;
        assert_eq!(form.submit(&client).await, &FormStatus::Failed("Please select a time slot".into()));
    }

    #[tokio::test(start_paused = true)]
    async fn confirmed_form_resets_after_delay() {
        let mut form = ReservationForm::new();
        form.date = Some(date());
        form.slot = ReservationSlot::parse("09:30");
        form.status = FormStatus::Confirmed(ReservationReceipt {
            message: None,
            reservation_id: None,
            extra: Default::default(),
        });
        assert_eq!(form.banner(), Some(Banner::Success(BOOKING_CONFIRMED.into())));

        form.reset_after(RESET_DELAY).await;
        assert_eq!(form.status(), &FormStatus::Idle);
        assert_eq!(form.date, None);
        assert_eq!(form.slot, None);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_form_keeps_its_fields() {
        let mut form = ReservationForm::new();
        form.date = Some(date());
        form.status = FormStatus::Failed("Court unavailable".into());

        form.reset_after(RESET_DELAY).await;
        assert_eq!(form.date, Some(date()));
        assert_eq!(form.banner(), Some(Banner::Error("Court unavailable".into())));
    }
}
