use crate::api::{ApiClient, ApiResult, Auth, Call, Expect};
use crate::models::{Lesson, LessonRequest, MessageResponse};

impl ApiClient {
    pub async fn book_lesson(&self, request: &LessonRequest) -> ApiResult<MessageResponse> {
        self.send_json(
            Call::post("/lessons")
                .auth(Auth::Member)
                .expect(Expect::Created)
                .fallback("Lesson booking failed!"),
            request,
        )
        .await
    }

    pub async fn player_lessons(&self, user_id: &str) -> ApiResult<Vec<Lesson>> {
        self.send(
            Call::get(format!("/lessons/player/{user_id}"))
                .auth(Auth::Member)
                .fallback("Failed to fetch player lessons"),
        )
        .await
    }

    pub async fn coach_lessons(&self, coach_id: &str) -> ApiResult<Vec<Lesson>> {
        self.send(
            Call::get(format!("/lessons/coach/{coach_id}"))
                .auth(Auth::Member)
                .fallback("Failed to fetch coach lessons"),
        )
        .await
    }
}
