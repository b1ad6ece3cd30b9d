//! Thin wrappers over the club backend. Every call resolves to the parsed body
//! or an [`ApiError`] whose display string is what the user should see.

mod admin;
mod auth;
mod coach;
mod lessons;
mod reservations;
mod teams;
mod users;

pub use coach::CoachListing;

use log::{debug, error, warn};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::models::{ErrorBody, ProfileError};
use crate::session::{AdminSessionStore, SessionContext};
use crate::storage::StorageError;
use crate::util::get_short_token;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Unauthorized: No token found")]
    MissingToken,
    #[error("Unauthorized: stored token is not a valid header value")]
    MalformedToken,
    #[error("Network error, please try again!")]
    Network(#[source] reqwest::Error),
    #[error("{message}")]
    Backend { status: StatusCode, message: String },
    #[error("Request failed with status {}", .0.as_u16())]
    Status(StatusCode),
    #[error("Unexpected response from server")]
    Decode(#[source] serde_json::Error),
    #[error("Failed to encode request")]
    Encode(#[source] serde_json::Error),
    #[error("Login response did not include a usable profile: {0}")]
    IncompleteProfile(#[source] ProfileError),
    #[error("Failed to save session: {0}")]
    Storage(#[from] StorageError),
}

impl ApiError {
    /// Whether the caller should send the user back to the login page.
    pub fn is_unauthorized(&self) -> bool {
        match self {
            ApiError::MissingToken | ApiError::MalformedToken => true,
            ApiError::Backend { status, .. } | ApiError::Status(status) => {
                *status == StatusCode::UNAUTHORIZED || *status == StatusCode::FORBIDDEN
            }
            _ => false,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Backend { status, .. } | ApiError::Status(status) => Some(*status),
            _ => None,
        }
    }

    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            error: self.to_string(),
        }
    }
}

/// Which bearer token, if any, a request carries.
#[derive(Clone, Debug)]
pub(crate) enum Auth {
    Public,
    /// Attached when the member is signed in.
    Optional,
    Member,
    Admin,
    Explicit(String),
}

/// Statuses counted as success.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Expect {
    Ok,
    Created,
    Success,
}

impl Expect {
    fn accepts(self, status: StatusCode) -> bool {
        match self {
            Expect::Ok => status == StatusCode::OK,
            Expect::Created => status == StatusCode::CREATED,
            Expect::Success => status.is_success(),
        }
    }
}

pub(crate) struct Call {
    method: Method,
    path: String,
    auth: Auth,
    expect: Expect,
    fallback: Option<&'static str>,
}

impl Call {
    fn new(method: Method, path: impl Into<String>) -> Call {
        Call {
            method,
            path: path.into(),
            auth: Auth::Public,
            expect: Expect::Success,
            fallback: None,
        }
    }

    pub(crate) fn get(path: impl Into<String>) -> Call {
        Call::new(Method::GET, path)
    }

    pub(crate) fn post(path: impl Into<String>) -> Call {
        Call::new(Method::POST, path)
    }

    pub(crate) fn put(path: impl Into<String>) -> Call {
        Call::new(Method::PUT, path)
    }

    pub(crate) fn delete(path: impl Into<String>) -> Call {
        Call::new(Method::DELETE, path)
    }

    pub(crate) fn auth(mut self, auth: Auth) -> Call {
        self.auth = auth;
        self
    }

    pub(crate) fn expect(mut self, expect: Expect) -> Call {
        self.expect = expect;
        self
    }

    /// Message shown when a failed response carries no `error` field.
    pub(crate) fn fallback(mut self, message: &'static str) -> Call {
        self.fallback = Some(message);
        self
    }
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionContext,
    admin: AdminSessionStore,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, session: SessionContext, admin: AdminSessionStore) -> ApiClient {
        let base_url: String = base_url.into();
        ApiClient {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
            admin,
        }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn admin_session(&self) -> &AdminSessionStore {
        &self.admin
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn headers(&self, auth: &Auth) -> ApiResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let token = match auth {
            Auth::Public => None,
            Auth::Optional => self.session.token(),
            Auth::Member => Some(self.session.token().ok_or(ApiError::MissingToken)?),
            Auth::Admin => Some(self.admin.token().ok_or(ApiError::MissingToken)?),
            Auth::Explicit(token) => Some(token.clone()),
        };
        if let Some(token) = token {
            debug!("api:: attaching bearer token ...{}", get_short_token(&token));
            let value = HeaderValue::from_str(format!("Bearer {}", token).as_str())
                .map_err(|_| ApiError::MalformedToken)?;
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }

    pub(crate) async fn send<T: DeserializeOwned>(&self, call: Call) -> ApiResult<T> {
        self.dispatch(call, None).await
    }

    pub(crate) async fn send_json<B, T>(&self, call: Call, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body).map_err(ApiError::Encode)?;
        self.dispatch(call, Some(body)).await
    }

    async fn dispatch<T: DeserializeOwned>(&self, call: Call, body: Option<Value>) -> ApiResult<T> {
        // Token checks happen before anything touches the network.
        let headers = self.headers(&call.auth)?;
        let url = format!("{}{}", self.base_url, call.path);
        debug!("api:: {} {}", call.method, url);

        let mut request = self.http.request(call.method.clone(), &url).headers(headers);
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            error!("api:: {} {} failed: {}", call.method, url, e);
            ApiError::Network(e)
        })?;
        let status = response.status();
        let text = response.text().await.map_err(ApiError::Network)?;
        debug!("api:: {} {} -> {}", call.method, url, status);

        if !call.expect.accepts(status) {
            let message = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .map(|body| body.error)
                .or(call.fallback.map(String::from));
            warn!("api:: {} {} rejected with {}: {:?}", call.method, url, status, message);
            return Err(match message {
                Some(message) => ApiError::Backend { status, message },
                None => ApiError::Status(status),
            });
        }

        // Acknowledgements may come back with no body at all.
        let body = if text.trim().is_empty() { "{}" } else { text.as_str() };
        serde_json::from_str(body).map_err(|e| {
            error!("api:: {} {} returned an unexpected body: {}", call.method, url, e);
            ApiError::Decode(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::storage::MemoryStorage;
    use crate::types::SharedStorage;

    fn client() -> ApiClient {
        let storage: SharedStorage = Arc::new(MemoryStorage::new());
        ApiClient::new(
            "http://127.0.0.1:5000/",
            SessionContext::new(storage.clone()),
            AdminSessionStore::new(storage),
        )
    }

    #[test]
    fn base_url_drops_trailing_slash() {
        assert_eq!(client().base_url(), "http://127.0.0.1:5000");
    }

    #[test]
    fn member_call_without_token_is_rejected_locally() {
        let err = client().headers(&Auth::Member).unwrap_err();
        assert!(matches!(err, ApiError::MissingToken));
        assert_eq!(err.to_body().error, "Unauthorized: No token found");
        assert!(err.is_unauthorized());
    }

    #[test]
    fn optional_call_without_token_has_no_authorization() {
        let headers = client().headers(&Auth::Optional).unwrap();
        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn explicit_token_is_sent_as_bearer() {
        let headers = client().headers(&Auth::Explicit("abc".into())).unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer abc");
    }

    #[test]
    fn token_with_newline_is_malformed() {
        let err = client().headers(&Auth::Explicit("a\nb".into())).unwrap_err();
        assert!(matches!(err, ApiError::MalformedToken));
    }

    #[test]
    fn expectations() {
        assert!(Expect::Created.accepts(StatusCode::CREATED));
        assert!(!Expect::Created.accepts(StatusCode::OK));
        assert!(Expect::Ok.accepts(StatusCode::OK));
        assert!(!Expect::Ok.accepts(StatusCode::NO_CONTENT));
        assert!(Expect::Success.accepts(StatusCode::NO_CONTENT));
        assert!(!Expect::Success.accepts(StatusCode::NOT_FOUND));
    }

    #[test]
    fn backend_messages_display_verbatim() {
        let err = ApiError::Backend {
            status: StatusCode::CONFLICT,
            message: "Court unavailable".into(),
        };
        assert_eq!(err.to_string(), "Court unavailable");
        assert!(!err.is_unauthorized());
        assert_eq!(
            ApiError::Status(StatusCode::NOT_FOUND).to_string(),
            "Request failed with status 404"
        );
    }
}
