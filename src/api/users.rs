use crate::api::{ApiClient, ApiResult, Auth, Call};
use crate::models::{MessageResponse, UserRecord, UserUpdate};

impl ApiClient {
    pub async fn players(&self) -> ApiResult<Vec<UserRecord>> {
        self.send(Call::get("/players").auth(Auth::Optional)).await
    }

    pub async fn coaches(&self) -> ApiResult<Vec<UserRecord>> {
        self.send(Call::get("/coaches").auth(Auth::Optional)).await
    }

    pub async fn update_user(&self, user_id: i64, update: &UserUpdate) -> ApiResult<MessageResponse> {
        self.send_json(
            Call::put(format!("/user/{user_id}"))
                .auth(Auth::Member)
                .fallback("Failed to update user"),
            update,
        )
        .await
    }

    pub async fn delete_user(&self, user_id: i64) -> ApiResult<MessageResponse> {
        self.send(
            Call::delete(format!("/user/{user_id}"))
                .auth(Auth::Member)
                .fallback("Failed to delete user"),
        )
        .await
    }
}
