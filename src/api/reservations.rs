use log::info;

use crate::api::{ApiClient, ApiResult, Auth, Call, Expect};
use crate::models::{MessageResponse, Reservation, ReservationReceipt, ReservationRequest};

impl ApiClient {
    /// Succeeds only on `201 Created`.
    pub async fn create_reservation(&self, request: &ReservationRequest) -> ApiResult<ReservationReceipt> {
        info!(
            "reservations:: booking court {} at {}",
            request.court_id, request.reservation_time
        );
        self.send_json(
            Call::post("/reservations")
                .auth(Auth::Member)
                .expect(Expect::Created)
                .fallback("Reservation failed!"),
            request,
        )
        .await
    }

    pub async fn all_reservations(&self) -> ApiResult<Vec<Reservation>> {
        self.send(Call::get("/reservations").fallback("Failed to load reservations"))
            .await
    }

    pub async fn my_reservations(&self) -> ApiResult<Vec<Reservation>> {
        self.send(
            Call::get("/reservations/client")
                .auth(Auth::Member)
                .fallback("Failed to load user reservations"),
        )
        .await
    }

    pub async fn delete_reservation(&self, reservation_id: &str) -> ApiResult<MessageResponse> {
        self.send(
            Call::delete(format!("/reservations/{reservation_id}"))
                .auth(Auth::Member)
                .fallback("Failed to delete reservation"),
        )
        .await
    }
}
