//! Route gating for signed-out users.
//!
//! Views map onto paths (`/`, `/projects`, `/time`, `/clients`) so a blocked
//! visit can be remembered as `/login?redirect=<path>` and resumed after sign-in.

use records::RecordsError;

use crate::app::View;
use crate::types::Me;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    Projects,
    Time,
    Clients,
    Login { redirect: Option<String> },
}

impl Route {
    pub fn parse(raw: &str) -> Option<Self> {
        let (path, query) = match raw.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (raw, None),
        };
        match path {
            "/" | "" => Some(Route::Dashboard),
            "/projects" => Some(Route::Projects),
            "/time" => Some(Route::Time),
            "/clients" => Some(Route::Clients),
            "/login" => Some(Route::Login {
                redirect: query.and_then(redirect_param),
            }),
            _ => None,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Dashboard => "/".to_string(),
            Route::Projects => "/projects".to_string(),
            Route::Time => "/time".to_string(),
            Route::Clients => "/clients".to_string(),
            Route::Login { redirect: None } => "/login".to_string(),
            Route::Login {
                redirect: Some(target),
            } => format!("/login?redirect={}", urlencoding::encode(target)),
        }
    }

    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Login { .. })
    }

    pub fn view(&self) -> View {
        match self {
            Route::Dashboard => View::Dashboard,
            Route::Projects => View::Projects,
            Route::Time => View::Time,
            Route::Clients => View::Clients,
            Route::Login { .. } => View::Login,
        }
    }

    pub fn from_view(view: View) -> Self {
        match view {
            View::Dashboard => Route::Dashboard,
            View::Projects => Route::Projects,
            View::Time => Route::Time,
            View::Clients => Route::Clients,
            View::Login => Route::Login { redirect: None },
        }
    }

    /// Where a signed-out visit to `self` is sent.
    pub fn login_redirect(&self) -> Route {
        Route::Login {
            redirect: Some(self.path()),
        }
    }
}

fn redirect_param(query: &str) -> Option<String> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "redirect")
        .and_then(|(_, value)| urlencoding::decode(value).ok())
        .map(|value| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Where to go after signing in: the stored redirect, else the path the user
/// was on before, else the dashboard.
pub fn post_login_target(redirect: Option<&str>, previous: Option<&Route>) -> Route {
    redirect
        .and_then(Route::parse)
        .or_else(|| previous.cloned())
        .filter(Route::is_protected)
        .unwrap_or(Route::Dashboard)
}

pub fn is_auth_error(err: &RecordsError) -> bool {
    err.is_unauthorized()
}

#[derive(Debug, Clone, Default)]
pub struct AuthState {
    pub user: Option<Me>,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_redirect_round_trips_through_encoding() {
        let login = Route::Projects.login_redirect();
        assert_eq!(login.path(), "/login?redirect=%2Fprojects");

        let parsed = Route::parse(&login.path()).unwrap();
        assert_eq!(
            parsed,
            Route::Login {
                redirect: Some("/projects".to_string())
            }
        );
    }

    #[test]
    fn post_login_prefers_redirect_then_previous_then_root() {
        assert_eq!(
            post_login_target(Some("/time"), Some(&Route::Clients)),
            Route::Time
        );
        assert_eq!(post_login_target(None, Some(&Route::Clients)), Route::Clients);
        assert_eq!(post_login_target(None, None), Route::Dashboard);
        assert_eq!(
            post_login_target(Some("/nowhere"), None),
            Route::Dashboard
        );
    }

    #[test]
    fn only_login_is_public() {
        assert!(Route::Dashboard.is_protected());
        assert!(Route::Time.is_protected());
        assert!(!Route::Login { redirect: None }.is_protected());
    }

    #[test]
    fn unauthorized_is_an_auth_error() {
        assert!(is_auth_error(&RecordsError::Unauthorized));
        assert!(!is_auth_error(&RecordsError::Request("boom".to_string())));
    }
}
