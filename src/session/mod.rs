use serde::{Deserialize, Serialize};

use crate::permission::{self, Role, User};
use crate::types::Operation;

/// Authentication status of the console
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "user", rename_all = "snake_case")]
pub enum AuthState {
    /// Stored credential not checked yet
    Loading,
    Unauthenticated,
    Authenticated(User),
}

/// What a guarded page should do for the current session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Credential check still running
    Wait,
    RedirectToLogin,
    /// Signed in, but without the required role
    Forbidden,
    Render,
}

/// Session value passed explicitly to whatever needs auth state.
///
/// Each transition consumes the session and returns the next one; there is
/// no shared mutable auth state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    state: AuthState,
    token: Option<String>,
}

impl Session {
    /// Fresh session with a stored token still to be verified
    pub fn loading(token: Option<String>) -> Self {
        Self { state: AuthState::Loading, token }
    }

    pub fn unauthenticated() -> Self {
        Self { state: AuthState::Unauthenticated, token: None }
    }

    /// Finish the initial credential check.
    ///
    /// A resolved user authenticates the session. A missing token, a missing
    /// user or any error fails closed to `Unauthenticated`.
    pub fn resolve<E: std::fmt::Display>(self, result: Result<Option<User>, E>) -> Self {
        match (self.token, result) {
            (Some(token), Ok(Some(user))) => {
                tracing::debug!("session resolved for '{}' ({})", user.name, user.role);
                Self { state: AuthState::Authenticated(user), token: Some(token) }
            }
            (_, Err(e)) => {
                tracing::warn!("credential check failed, treating as signed out: {}", e);
                Self::unauthenticated()
            }
            _ => Self::unauthenticated(),
        }
    }

    pub fn login(self, token: impl Into<String>, user: User) -> Self {
        Self { state: AuthState::Authenticated(user), token: Some(token.into()) }
    }

    pub fn logout(self) -> Self {
        Self::unauthenticated()
    }

    /// The backend rejected the credential
    pub fn expire(self) -> Self {
        if self.is_authenticated() {
            tracing::warn!("credential rejected by server, signing out");
        }
        Self::unauthenticated()
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&User> {
        match &self.state {
            AuthState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, AuthState::Authenticated(_))
    }

    pub fn guard(&self, required: Option<Role>) -> RouteDecision {
        match (&self.state, required) {
            (AuthState::Loading, _) => RouteDecision::Wait,
            (AuthState::Unauthenticated, _) => RouteDecision::RedirectToLogin,
            (AuthState::Authenticated(user), Some(role)) if !permission::has_role(user, role) => {
                RouteDecision::Forbidden
            }
            (AuthState::Authenticated(_), _) => RouteDecision::Render,
        }
    }

    /// Permission check for action buttons; signed-out sessions can do nothing
    pub fn can(&self, resource: &str, operation: Operation) -> bool {
        self.user()
            .map(|user| permission::can(user, resource, operation))
            .unwrap_or(false)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::loading(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permission::PermissionSet;

    fn admin() -> User {
        User::new("u-1", "Ada", Role::Admin)
    }

    #[test]
    fn loading_waits() {
        assert_eq!(Session::loading(Some("t".into())).guard(None), RouteDecision::Wait);
    }

    #[test]
    fn valid_credential_authenticates() {
        let session = Session::loading(Some("t".into())).resolve::<String>(Ok(Some(admin())));
        assert!(session.is_authenticated());
        assert_eq!(session.token(), Some("t"));
        assert_eq!(session.guard(None), RouteDecision::Render);
    }

    #[test]
    fn missing_credential_redirects() {
        let session = Session::loading(None).resolve::<String>(Ok(Some(admin())));
        assert_eq!(session.guard(None), RouteDecision::RedirectToLogin);

        let session = Session::loading(Some("t".into())).resolve::<String>(Ok(None));
        assert_eq!(session.state(), &AuthState::Unauthenticated);
    }

    #[test]
    fn fetch_failure_fails_closed() {
        let session = Session::loading(Some("t".into())).resolve(Err("connection refused"));
        assert_eq!(session.state(), &AuthState::Unauthenticated);
        assert_eq!(session.token(), None);
    }

    #[test]
    fn logout_and_expiry_clear_the_token() {
        let session = Session::unauthenticated().login("t", admin());
        assert!(session.is_authenticated());
        let out = session.clone().logout();
        assert_eq!(out.token(), None);
        assert_eq!(out.guard(None), RouteDecision::RedirectToLogin);
        assert_eq!(session.expire().state(), &AuthState::Unauthenticated);
    }

    #[test]
    fn role_guard_forbids_other_roles() {
        let sub = User::new("u-2", "Sam", Role::SubAdmin)
            .with_permissions(PermissionSet::parse(["jobs:read"]).unwrap());
        let session = Session::unauthenticated().login("t", sub);
        assert_eq!(session.guard(Some(Role::Admin)), RouteDecision::Forbidden);
        assert_eq!(session.guard(Some(Role::SubAdmin)), RouteDecision::Render);
        assert!(session.can("jobs", Operation::Read));
        assert!(!session.can("jobs", Operation::Delete));
        assert!(!Session::unauthenticated().can("jobs", Operation::Read));
    }
}
