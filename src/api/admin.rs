use crate::api::{ApiClient, ApiResult, Auth, Call, Expect};
use crate::models::{
    AdminLoginRequest, AdminLoginResponse, AdminSession, CourtBooking, MessageResponse, Reservation,
};
use crate::schedule::ScheduleEntry;

impl ApiClient {
    /// Signs in to the admin console; stored apart from the member session.
    pub async fn admin_login(&self, username: &str, password: &str) -> ApiResult<AdminSession> {
        let response: AdminLoginResponse = self
            .send_json(
                Call::post("/admin/login")
                    .expect(Expect::Ok)
                    .fallback("Admin login failed!"),
                &AdminLoginRequest { username, password },
            )
            .await?;
        let session = AdminSession {
            token: response.token,
            role: response.role,
        };
        self.admin_session().set(&session)?;
        Ok(session)
    }

    pub async fn fetch_schedule(&self) -> ApiResult<Vec<ScheduleEntry>> {
        self.send(
            Call::get("/admin/schedule")
                .auth(Auth::Admin)
                .fallback("Failed to load schedule"),
        )
        .await
    }

    pub async fn save_schedule(&self, entries: &[ScheduleEntry]) -> ApiResult<MessageResponse> {
        self.send_json(
            Call::post("/admin/schedule")
                .auth(Auth::Admin)
                .fallback("Failed to save schedule"),
            entries,
        )
        .await
    }

    pub async fn manage_booking(&self, booking: &CourtBooking) -> ApiResult<MessageResponse> {
        self.send_json(
            Call::post("/admin/booking")
                .auth(Auth::Admin)
                .fallback("Booking failed!"),
            booking,
        )
        .await
    }

    pub async fn fetch_bookings(&self) -> ApiResult<Vec<Reservation>> {
        self.send(
            Call::get("/admin/bookings")
                .auth(Auth::Admin)
                .fallback("Failed to load bookings"),
        )
        .await
    }
}
