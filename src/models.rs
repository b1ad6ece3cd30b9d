use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::util::UnknownLabel;

labelled_enum! {
    pub enum Role {
        Admin => "admin",
        Coach => "coach",
        Player => "player",
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("stored user record is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("stored user record is missing {0}")]
    MissingField(&'static str),
    #[error("stored user record has an invalid role: {0}")]
    UnknownRole(#[from] UnknownLabel),
}

/// Cached profile of the signed-in member, stored under `userData`.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub role: Role,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredUser {
    first_name: Option<String>,
    last_name: Option<String>,
    #[serde(alias = "phone_number")]
    phone_number: Option<String>,
    role: Option<String>,
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ProfileError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ProfileError::MissingField(field))
}

impl UserProfile {
    /// Validates a raw `userData` value. Anything short of a complete record
    /// is rejected rather than filled with defaults.
    pub fn from_stored(raw: &str) -> Result<UserProfile, ProfileError> {
        let stored: StoredUser = serde_json::from_str(raw)?;
        let role = required(stored.role, "role")?.parse::<Role>()?;
        Ok(UserProfile {
            first_name: required(stored.first_name, "firstName")?,
            last_name: required(stored.last_name, "lastName")?,
            phone_number: stored.phone_number.filter(|p| !p.trim().is_empty()),
            role,
        })
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn initials(&self) -> String {
        self.first_name
            .chars()
            .take(1)
            .chain(self.last_name.chars().take(1))
            .flat_map(char::to_uppercase)
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: UserProfile,
}

/// Parallel credentials for the admin console (`admin_token`, `admin_role`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdminSession {
    pub token: String,
    pub role: String,
}

/// Backend ids arrive as integers from some endpoints and strings from others.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(id) => write!(f, "{id}"),
            RecordId::Text(id) => f.write_str(id),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

/// Acknowledgement bodies like `{"message": "..."}`; other fields are kept.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize, Clone, Debug)]
pub struct LoginRequest<'a> {
    pub user_id: &'a str,
    pub password: &'a str,
}

#[derive(Deserialize, Clone, Debug)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default, alias = "firstName")]
    pub first_name: Option<String>,
    #[serde(default, alias = "lastName")]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

#[derive(Serialize, Clone, Debug)]
pub struct AdminLoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Deserialize, Clone, Debug)]
pub struct AdminLoginResponse {
    pub token: String,
    pub role: String,
}

/// A user as listed by `/user`, `/players`, `/coaches` and team rosters.
/// The backend sends camelCase names; snake_case is still accepted.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: RecordId,
    #[serde(alias = "first_name")]
    pub first_name: String,
    #[serde(alias = "last_name")]
    pub last_name: String,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default, alias = "phone_number")]
    pub phone_number: Option<String>,
}

impl UserRecord {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub role: Role,
}

#[derive(Serialize, Clone, Debug, Default)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_password: Option<String>,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ReservationRequest {
    pub court_id: String,
    pub reservation_time: String,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct ReservationReceipt {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, alias = "id")]
    pub reservation_id: Option<RecordId>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Reservation {
    #[serde(default)]
    pub id: Option<RecordId>,
    pub court_id: RecordId,
    pub reservation_time: String,
    #[serde(default)]
    pub client_phone: Option<String>,
}

/// Admin-side court booking, sent to `/admin/booking`.
#[derive(Serialize, Clone, Debug)]
pub struct CourtBooking {
    pub court_id: String,
    pub reservation_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_phone: Option<String>,
}

#[derive(Serialize, Clone, Debug)]
pub struct AvailabilityRequest {
    pub coach_id: String,
    pub day: String,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Availability {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub coach_id: Option<RecordId>,
    pub day: String,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Serialize, Clone, Debug)]
pub struct NewTeam<'a> {
    pub team_name: &'a str,
    pub coach_id: &'a str,
}

#[derive(Serialize, Clone, Debug)]
pub struct PlayerAssignment<'a> {
    pub player_id: &'a str,
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Team {
    pub id: RecordId,
    pub team_name: String,
    #[serde(default)]
    pub coach_id: Option<RecordId>,
    #[serde(default)]
    pub coach_name: Option<String>,
    #[serde(default)]
    pub members: Vec<UserRecord>,
}

#[derive(Serialize, Clone, Debug)]
pub struct LessonRequest {
    pub coach_id: String,
    pub lesson_date: String,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Lesson {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub coach_id: Option<RecordId>,
    #[serde(default)]
    pub player_id: Option<RecordId>,
    pub lesson_date: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub coach_name: Option<String>,
    #[serde(default)]
    pub player_name: Option<String>,
}
