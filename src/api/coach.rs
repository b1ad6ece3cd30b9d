use log::warn;

use crate::api::{ApiClient, ApiResult, Auth, Call, Expect};
use crate::models::{Availability, AvailabilityRequest, MessageResponse, UserRecord};

/// One row of the coach directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoachListing {
    pub coach: UserRecord,
    pub availability: Vec<Availability>,
}

impl ApiClient {
    pub async fn add_availability(&self, request: &AvailabilityRequest) -> ApiResult<MessageResponse> {
        self.send_json(
            Call::post("/coach/availability")
                .auth(Auth::Member)
                .expect(Expect::Created)
                .fallback("Failed to add availability!"),
            request,
        )
        .await
    }

    pub async fn availability(&self, coach_id: &str) -> ApiResult<Vec<Availability>> {
        self.send(
            Call::get(format!("/coach/availability/{coach_id}"))
                .fallback("Failed to fetch coach availability"),
        )
        .await
    }

    /// Every coach with their slots. A coach whose availability cannot be
    /// loaded is still listed, with no slots.
    pub async fn coach_directory(&self) -> ApiResult<Vec<CoachListing>> {
        let coaches = self.coaches().await?;
        let mut listings = Vec::with_capacity(coaches.len());
        for coach in coaches {
            let availability = match self.availability(&coach.id.to_string()).await {
                Ok(availability) => availability,
                Err(e) => {
                    warn!("coach:: no availability for coach {}: {}", coach.id, e);
                    Vec::new()
                }
            };
            listings.push(CoachListing { coach, availability });
        }
        Ok(listings)
    }
}
