use crate::api::{ApiClient, ApiResult, Auth, Call, Expect};
use crate::models::{MessageResponse, NewTeam, PlayerAssignment, Team, UserRecord};

impl ApiClient {
    pub async fn create_team(&self, team_name: &str, coach_id: &str) -> ApiResult<MessageResponse> {
        self.send_json(
            Call::post("/teams")
                .auth(Auth::Member)
                .expect(Expect::Created)
                .fallback("Team creation failed!"),
            &NewTeam { team_name, coach_id },
        )
        .await
    }

    pub async fn team(&self, team_id: &str) -> ApiResult<Team> {
        self.send(
            Call::get(format!("/teams/{team_id}"))
                .auth(Auth::Optional)
                .fallback("Failed to fetch team details"),
        )
        .await
    }

    pub async fn teams(&self) -> ApiResult<Vec<Team>> {
        self.send(
            Call::get("/teams")
                .auth(Auth::Optional)
                .fallback("Failed to fetch teams"),
        )
        .await
    }

    pub async fn assign_player(&self, team_id: &str, player_id: &str) -> ApiResult<MessageResponse> {
        self.send_json(
            Call::post(format!("/teams/{team_id}/players"))
                .auth(Auth::Member)
                .fallback("Failed to assign player to team!"),
            &PlayerAssignment { player_id },
        )
        .await
    }

    pub async fn team_members(&self, team_id: &str) -> ApiResult<Vec<UserRecord>> {
        self.send(Call::get(format!("/teams/{team_id}/players")).auth(Auth::Optional))
            .await
    }

    pub async fn remove_player(&self, team_id: &str, player_id: &str) -> ApiResult<MessageResponse> {
        self.send(
            Call::delete(format!("/teams/{team_id}/players/{player_id}"))
                .auth(Auth::Member)
                .fallback("Failed to remove player from team!"),
        )
        .await
    }
}
