use log::info;

use crate::api::{ApiClient, ApiError, ApiResult, Auth, Call, Expect};
use crate::models::{
    LoginRequest, LoginResponse, MessageResponse, NewUser, ProfileError, Role, Session,
    UserProfile, UserRecord,
};
use crate::storage::StorageError;

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl ApiClient {
    /// Signs in and stores the session. The profile comes from the login
    /// response when it is complete, otherwise from `GET /user`.
    pub async fn login(&self, user_id: &str, password: &str) -> ApiResult<Session> {
        let response: LoginResponse = self
            .send_json(
                Call::post("/login").expect(Expect::Ok).fallback("Login failed!"),
                &LoginRequest { user_id, password },
            )
            .await?;

        let first_name = non_empty(response.first_name);
        let last_name = non_empty(response.last_name);
        let user = match (first_name, last_name, response.role) {
            (Some(first_name), Some(last_name), Some(role)) => UserProfile {
                first_name,
                last_name,
                phone_number: non_empty(response.phone_number),
                role,
            },
            (_, _, login_role) => {
                let record = self.fetch_user(Auth::Explicit(response.token.clone())).await?;
                profile_from_record(record, login_role)?
            }
        };

        let session = Session {
            token: response.token,
            user,
        };
        self.session().set_session(&session)?;
        Ok(session)
    }

    pub fn logout(&self) -> Result<(), StorageError> {
        self.session().clear_session()
    }

    /// Re-reads the member's record and refreshes the cached profile.
    pub async fn refresh_profile(&self) -> ApiResult<Session> {
        let token = self.session().token().ok_or(ApiError::MissingToken)?;
        let known_role = self.session().get_session().map(|s| s.user.role);
        let record = self.fetch_user(Auth::Member).await?;
        let session = Session {
            token,
            user: profile_from_record(record, known_role)?,
        };
        self.session().set_session(&session)?;
        info!("auth:: refreshed profile for {}", session.user.full_name());
        Ok(session)
    }

    /// Admin-only; the backend checks the role carried by the token.
    pub async fn register_user(&self, user: &NewUser) -> ApiResult<MessageResponse> {
        self.send_json(
            Call::post("/register")
                .auth(Auth::Member)
                .expect(Expect::Created)
                .fallback("Registration failed!"),
            user,
        )
        .await
    }

    async fn fetch_user(&self, auth: Auth) -> ApiResult<UserRecord> {
        self.send(Call::get("/user").auth(auth).fallback("Unauthorized"))
            .await
    }
}

fn profile_from_record(
    record: UserRecord,
    fallback_role: Option<Role>,
) -> ApiResult<UserProfile> {
    let role = record
        .role
        .or(fallback_role)
        .ok_or(ApiError::IncompleteProfile(ProfileError::MissingField("role")))?;
    let first_name = non_empty(Some(record.first_name))
        .ok_or(ApiError::IncompleteProfile(ProfileError::MissingField("firstName")))?;
    let last_name = non_empty(Some(record.last_name))
        .ok_or(ApiError::IncompleteProfile(ProfileError::MissingField("lastName")))?;
    Ok(UserProfile {
        first_name,
        last_name,
        phone_number: non_empty(record.phone_number),
        role,
    })
}
