//! Session state - credentials restored at startup and mutated only
//! through the defined transitions.

use std::fs;
use std::io;
use std::path::PathBuf;

use quill_shared::dto::UserDto;
use serde::{Deserialize, Serialize};

/// Persisted credentials: the bearer token and the user it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub token: String,
    pub user: UserDto,
}

/// Where credentials survive between runs.
pub trait CredentialStore: Send + Sync {
    fn load(&self) -> Option<Credentials>;
    fn save(&self, credentials: &Credentials) -> io::Result<()>;
    fn clear(&self) -> io::Result<()>;
}

/// JSON file-backed credential store.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Option<Credentials> {
        let raw = fs::read_to_string(&self.path).ok()?;
        serde_json::from_str(&raw).ok()
    }

    fn save(&self, credentials: &Credentials) -> io::Result<()> {
        let raw = serde_json::to_string_pretty(credentials)?;
        fs::write(&self.path, raw)
    }

    fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

/// Authentication lifecycle states.
#[derive(Debug, Clone)]
pub enum SessionState {
    Anonymous,
    Authenticating,
    Authenticated(Credentials),
    Failed(String),
}

/// Process-wide session. The state is only reachable through the
/// transitions below; successful transitions keep the credential store
/// in sync.
pub struct Session<S: CredentialStore> {
    state: SessionState,
    store: S,
}

impl<S: CredentialStore> Session<S> {
    /// Restore the session from persisted credentials.
    pub fn restore(store: S) -> Self {
        let state = match store.load() {
            Some(credentials) => SessionState::Authenticated(credentials),
            None => SessionState::Anonymous,
        };
        Self { state, store }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn token(&self) -> Option<&str> {
        match &self.state {
            SessionState::Authenticated(credentials) => Some(credentials.token.as_str()),
            _ => None,
        }
    }

    /// A login or registration attempt has started.
    pub fn begin(&mut self) {
        self.state = SessionState::Authenticating;
    }

    /// The attempt succeeded; persist and switch to authenticated.
    pub fn succeed(&mut self, credentials: Credentials) {
        if let Err(err) = self.store.save(&credentials) {
            tracing::warn!("failed to persist credentials: {err}");
        }
        self.state = SessionState::Authenticated(credentials);
    }

    /// The attempt failed.
    pub fn fail(&mut self, error: impl Into<String>) {
        self.state = SessionState::Failed(error.into());
    }

    /// Refresh the stored user profile; a no-op unless authenticated.
    pub fn update_user(&mut self, user: UserDto) {
        if let SessionState::Authenticated(credentials) = &mut self.state {
            credentials.user = user;
            let snapshot = credentials.clone();
            if let Err(err) = self.store.save(&snapshot) {
                tracing::warn!("failed to persist credentials: {err}");
            }
        }
    }

    /// Drop credentials and return to anonymous.
    pub fn logout(&mut self) {
        if let Err(err) = self.store.clear() {
            tracing::warn!("failed to clear credentials: {err}");
        }
        self.state = SessionState::Anonymous;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::Utc;
    use uuid::Uuid;

    use super::*;

    #[derive(Default)]
    struct MemoryStore(Mutex<Option<Credentials>>);

    impl CredentialStore for MemoryStore {
        fn load(&self) -> Option<Credentials> {
            self.0.lock().unwrap().clone()
        }

        fn save(&self, credentials: &Credentials) -> io::Result<()> {
            *self.0.lock().unwrap() = Some(credentials.clone());
            Ok(())
        }

        fn clear(&self) -> io::Result<()> {
            *self.0.lock().unwrap() = None;
            Ok(())
        }
    }

    fn credentials(name: &str) -> Credentials {
        Credentials {
            token: "token".to_string(),
            user: UserDto {
                id: Uuid::new_v4(),
                name: name.to_string(),
                email: format!("{}@example.com", name.to_lowercase()),
                role: "user".to_string(),
                created_at: Utc::now(),
            },
        }
    }

    #[test]
    fn restore_without_credentials_is_anonymous() {
        let session = Session::restore(MemoryStore::default());

        assert!(matches!(session.state(), SessionState::Anonymous));
        assert!(session.token().is_none());
    }

    #[test]
    fn successful_login_persists_credentials() {
        let store = MemoryStore::default();
        let mut session = Session::restore(store);

        session.begin();
        assert!(matches!(session.state(), SessionState::Authenticating));

        session.succeed(credentials("Ada"));
        assert_eq!(session.token(), Some("token"));

        // A fresh session built on the same store picks the login up.
        let restored = Session::restore(MemoryStore(Mutex::new(
            session.store.load(),
        )));
        assert!(matches!(restored.state(), SessionState::Authenticated(_)));
    }

    #[test]
    fn failed_login_keeps_no_token() {
        let mut session = Session::restore(MemoryStore::default());

        session.begin();
        session.fail("Invalid credentials");

        assert!(matches!(session.state(), SessionState::Failed(_)));
        assert!(session.token().is_none());
    }

    #[test]
    fn logout_clears_persisted_credentials() {
        let mut session = Session::restore(MemoryStore::default());
        session.succeed(credentials("Ada"));

        session.logout();

        assert!(matches!(session.state(), SessionState::Anonymous));
        assert!(session.store.load().is_none());
    }

    #[test]
    fn update_user_is_noop_when_anonymous() {
        let mut session = Session::restore(MemoryStore::default());

        session.update_user(credentials("Eve").user);

        assert!(matches!(session.state(), SessionState::Anonymous));
        assert!(session.store.load().is_none());
    }

    #[test]
    fn update_user_refreshes_authenticated_profile() {
        let mut session = Session::restore(MemoryStore::default());
        session.succeed(credentials("Ada"));

        let mut updated = credentials("Ada").user;
        updated.name = "Ada Lovelace".to_string();
        session.update_user(updated);

        match session.state() {
            SessionState::Authenticated(c) => assert_eq!(c.user.name, "Ada Lovelace"),
            other => panic!("unexpected state: {other:?}"),
        }
    }
}
