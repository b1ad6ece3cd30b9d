use crate::models::Role;

pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub label: &'static str,
    pub path: String,
}

impl Route {
    fn new(label: &'static str, path: impl Into<String>) -> Route {
        Route {
            label,
            path: path.into(),
        }
    }

    /// Highlighted when the current path is this route or below it.
    pub fn is_active(&self, current: &str) -> bool {
        current == self.path
            || (self.path != "/" && current.starts_with(&format!("{}/", self.path)))
    }
}

/// Top bar entries shown to everyone, signed in or not.
pub fn public_routes() -> Vec<Route> {
    vec![
        Route::new("Home", "/"),
        Route::new("Courts", "/courts"),
        Route::new("Coaches", "/coaches"),
        Route::new("Reservation", "/reservation"),
        Route::new("Schedule", "/schedule"),
        Route::new("About", "/about"),
    ]
}

impl Role {
    pub fn dashboard(&self) -> String {
        format!("/{}/dashboard", self.label())
    }

    pub fn profile_path(&self) -> String {
        format!("/{}/profile", self.label())
    }

    pub fn can_edit_schedule(&self) -> bool {
        *self == Role::Admin
    }

    pub fn can_manage_announcements(&self) -> bool {
        matches!(self, Role::Admin | Role::Coach)
    }

    /// Sidebar for this role: dashboard and profile first, then the
    /// role's own pages.
    pub fn menu(&self) -> Vec<Route> {
        let mut routes = vec![
            Route::new("Dashboard", self.dashboard()),
            Route::new("Profile", self.profile_path()),
        ];
        let extra: &[(&'static str, &'static str)] = match self {
            Role::Admin => &[
                ("Register Users", "/admin/register"),
                ("Teams", "/admin/teams"),
                ("Schedule", "/admin/schedule"),
            ],
            Role::Coach => &[
                ("Availability", "/coach/availability"),
                ("Lessons", "/coach/lessons"),
                ("Teams", "/coach/teams"),
            ],
            Role::Player => &[
                ("Lessons", "/player/lessons"),
                ("Schedule", "/player/schedule"),
                ("Teams", "/player/teams"),
                ("Reservation", "/reservation"),
            ],
        };
        routes.extend(extra.iter().map(|&(label, path)| Route::new(label, path)));
        routes
    }
}
