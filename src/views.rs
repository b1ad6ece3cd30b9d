//! View models and route guards shared by the pages that need a signed-in
//! member.

use log::info;

use crate::api::ApiError;
use crate::models::{Role, Session};
use crate::navigation::{Route, LOGIN_PATH};
use crate::session::{SessionContext, SessionState};

/// Where a guarded page sends the user instead of rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub to: String,
    pub return_to: Option<String>,
}

impl Redirect {
    pub fn to_login(return_to: Option<&str>) -> Redirect {
        Redirect {
            to: LOGIN_PATH.to_string(),
            return_to: return_to.map(String::from),
        }
    }

    /// The full target, e.g. `/login?returnUrl=/reservation`.
    pub fn location(&self) -> String {
        match &self.return_to {
            Some(path) => format!("{}?returnUrl={}", self.to, path),
            None => self.to.clone(),
        }
    }

    /// A backend rejection of the member's token ends the visit at the
    /// login page; any other failure is shown in place.
    pub fn from_api_error(error: &ApiError, return_to: &str) -> Option<Redirect> {
        error
            .is_unauthorized()
            .then(|| Redirect::to_login(Some(return_to)))
    }
}

pub fn require_session(ctx: &SessionContext, return_path: &str) -> Result<Session, Redirect> {
    match ctx.inspect() {
        SessionState::Active(session) => Ok(session),
        SessionState::Invalid(reason) => {
            info!("views:: {return_path} needs a session, cached record rejected: {reason}");
            Err(Redirect::to_login(Some(return_path)))
        }
        SessionState::Absent => Err(Redirect::to_login(Some(return_path))),
    }
}

/// Like [`require_session`], but a member with another role is sent to
/// their own dashboard.
pub fn require_role(ctx: &SessionContext, role: Role, return_path: &str) -> Result<Session, Redirect> {
    let session = require_session(ctx, return_path)?;
    if session.user.role != role {
        return Err(Redirect {
            to: session.user.role.dashboard(),
            return_to: None,
        });
    }
    Ok(session)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileView {
    pub full_name: String,
    pub initials: String,
    pub phone_number: Option<String>,
    pub role: Role,
    pub menu: Vec<Route>,
}

impl From<&Session> for ProfileView {
    fn from(session: &Session) -> Self {
        let user = &session.user;
        ProfileView {
            full_name: user.full_name(),
            initials: user.initials(),
            phone_number: user.phone_number.clone(),
            role: user.role,
            menu: user.role.menu(),
        }
    }
}

pub fn profile_view(ctx: &SessionContext) -> Result<ProfileView, Redirect> {
    let session = require_session(ctx, &profile_return_path(ctx))?;
    Ok(ProfileView::from(&session))
}

fn profile_return_path(ctx: &SessionContext) -> String {
    ctx.get_session()
        .map(|s| s.user.role.profile_path())
        .unwrap_or_else(|| "/profile".to_string())
}
