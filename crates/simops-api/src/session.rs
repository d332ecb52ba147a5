// Client-held session state
//
// Holds the bearer credential and lightweight profile fields for the
// lifetime of one client process. Created explicitly and passed by
// reference into `ApiClient` -- there are no module-level globals.
// Clearing the session is the observable "logout" side effect; the
// client also clears its response cache whenever this happens.

use std::sync::RwLock;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Which auth header style the client attaches.
///
/// Exactly one of the two is ever sent -- never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    /// `Authorization: Bearer <jwt>` -- primary, issued by the OTP flow.
    #[default]
    Jwt,
    /// `CF-Access-Client-Id: <token>` -- legacy service-token access.
    ServiceToken,
}

/// Profile fields returned alongside a JWT at login.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub role: Option<String>,
    pub tenant_name: Option<String>,
}

/// Serializable session state, for persistence across CLI invocations.
///
/// Carries the raw credential; callers own keeping the file private.
#[derive(Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub token: String,
    pub auth_method: AuthMethod,
    pub user: Option<UserProfile>,
    pub org: Option<String>,
}

#[derive(Default)]
struct SessionState {
    token: Option<SecretString>,
    auth_method: AuthMethod,
    user: Option<UserProfile>,
    org: Option<String>,
}

/// In-memory session store with explicit create/clear lifecycle.
///
/// Interior-mutable so a shared `Arc<Session>` can be torn down from
/// inside the API client's error handling (HTTP 401/403 forces logout
/// as a side effect, not merely a reported error).
#[derive(Default)]
pub struct Session {
    state: RwLock<SessionState>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a JWT session after a successful OTP verification.
    pub fn store_jwt(&self, token: SecretString, user: UserProfile) {
        let mut state = self.state.write().expect("session lock poisoned");
        state.org = user.tenant_name.clone();
        state.token = Some(token);
        state.auth_method = AuthMethod::Jwt;
        state.user = Some(user);
        debug!("session established (jwt)");
    }

    /// Store a legacy service-token session.
    pub fn store_service_token(&self, org: impl Into<String>, token: SecretString) {
        let mut state = self.state.write().expect("session lock poisoned");
        state.token = Some(token);
        state.auth_method = AuthMethod::ServiceToken;
        state.user = None;
        state.org = Some(org.into());
        debug!("session established (service token)");
    }

    /// Drop all session state. Idempotent.
    pub fn clear(&self) {
        let mut state = self.state.write().expect("session lock poisoned");
        if state.token.is_some() {
            debug!("session cleared");
        }
        *state = SessionState::default();
    }

    /// Snapshot the current state, or `None` when unauthenticated.
    pub fn snapshot(&self) -> Option<SessionSnapshot> {
        let state = self.state.read().expect("session lock poisoned");
        Some(SessionSnapshot {
            token: state.token.as_ref()?.expose_secret().to_owned(),
            auth_method: state.auth_method,
            user: state.user.clone(),
            org: state.org.clone(),
        })
    }

    /// Restore a previously snapshotted session.
    pub fn restore(&self, snapshot: SessionSnapshot) {
        let mut state = self.state.write().expect("session lock poisoned");
        *state = SessionState {
            token: Some(SecretString::from(snapshot.token)),
            auth_method: snapshot.auth_method,
            user: snapshot.user,
            org: snapshot.org,
        };
        debug!("session restored ({:?})", state.auth_method);
    }

    pub fn is_authenticated(&self) -> bool {
        self.state
            .read()
            .expect("session lock poisoned")
            .token
            .is_some()
    }

    /// The raw credential, exposed for header construction only.
    pub(crate) fn token_value(&self) -> Option<String> {
        self.state
            .read()
            .expect("session lock poisoned")
            .token
            .as_ref()
            .map(|t| t.expose_secret().to_owned())
    }

    pub fn auth_method(&self) -> AuthMethod {
        self.state.read().expect("session lock poisoned").auth_method
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.state.read().expect("session lock poisoned").user.clone()
    }

    /// Organization label: the profile's tenant name, else the label
    /// captured at service-token login, else `"Unknown"`.
    pub fn org(&self) -> String {
        let state = self.state.read().expect("session lock poisoned");
        state
            .user
            .as_ref()
            .and_then(|u| u.tenant_name.clone())
            .or_else(|| state.org.clone())
            .unwrap_or_else(|| "Unknown".to_owned())
    }

    /// Role claim from the profile; sessions without one are plain tenants.
    pub fn role(&self) -> String {
        self.state
            .read()
            .expect("session lock poisoned")
            .user
            .as_ref()
            .and_then(|u| u.role.clone())
            .unwrap_or_else(|| "tenant".to_owned())
    }

    pub fn is_admin(&self) -> bool {
        self.role() == "admin"
    }

    /// Two-letter initials for avatar display, derived from the display
    /// name or the organization label.
    pub fn initials(&self) -> String {
        let name = self
            .user()
            .and_then(|u| u.display_name)
            .unwrap_or_else(|| self.org());
        let words: Vec<&str> = name
            .split(|c: char| c.is_whitespace() || c == '_' || c == '-')
            .filter(|w| !w.is_empty())
            .collect();
        let initials = match (words.first(), words.get(1)) {
            (Some(a), Some(b)) => {
                format!("{}{}", first_char(a), first_char(b))
            }
            _ => name.chars().take(2).collect(),
        };
        initials.to_uppercase()
    }

    /// Short display name for headers: the profile name if present,
    /// else the organization label truncated to its first two words.
    pub fn short_name(&self) -> String {
        if let Some(name) = self.user().and_then(|u| u.display_name) {
            return name;
        }
        let org = self.org();
        if org.len() > 20 {
            return org
                .split(|c: char| c.is_whitespace() || c == '_' || c == '-')
                .filter(|w| !w.is_empty())
                .take(2)
                .collect::<Vec<_>>()
                .join(" ");
        }
        org
    }
}

fn first_char(word: &str) -> String {
    word.chars().next().map(String::from).unwrap_or_default()
}
