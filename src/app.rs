//! Remote collaborators wired up from the loaded configuration.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use recipebook_core::{HttpTransport, IdentityToolkitAuth, Remote, Session};
use tracing::debug;

use crate::config::Config;
use crate::session::{self, SessionError};

/// Auth provider resumed from the session file, and that file's location.
///
/// Needs no database settings, so the auth commands work before the
/// remote database is configured.
pub struct AuthContext {
    auth: Arc<IdentityToolkitAuth>,
    session_path: PathBuf,
    saved: Option<Session>,
}

impl AuthContext {
    pub fn open(config: &Config) -> Result<Self, Box<dyn std::error::Error>> {
        let timeout = Duration::from_secs(config.timeout_secs.value);
        let session_path = config.session_path.value.clone();
        let saved = session::load(&session_path)?;

        // Sign-out and status never reach the server; callers that do
        // check for the key first.
        let api_key = config.api_key.value.clone().unwrap_or_default();
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let auth = Arc::new(
            IdentityToolkitAuth::new(api_key)
                .with_client(client)
                .with_endpoints(&config.auth_url.value, &config.token_url.value)
                .with_session(saved.clone()),
        );

        Ok(Self {
            auth,
            session_path,
            saved,
        })
    }

    pub fn auth(&self) -> &IdentityToolkitAuth {
        &self.auth
    }

    /// Write the session back if signing in, out, or a token refresh changed it.
    pub fn persist_session(&self) -> Result<(), SessionError> {
        let current = self.auth.session();
        if current == self.saved {
            return Ok(());
        }

        match &current {
            Some(session) => session::save(&self.session_path, session)?,
            None => {
                session::delete(&self.session_path)?;
            }
        }
        debug!(path = %self.session_path.display(), "Session file updated");
        Ok(())
    }
}

/// Everything a list command needs: the auth context plus the remote.
pub struct App {
    context: AuthContext,
    remote: Remote,
}

impl App {
    pub fn connect(config: &Config) -> Result<Self, Box<dyn std::error::Error>> {
        let database_url = config.require_database_url()?;
        config.require_api_key()?;

        let context = AuthContext::open(config)?;
        let timeout = Duration::from_secs(config.timeout_secs.value);
        let transport = Arc::new(HttpTransport::with_timeout(timeout)?);
        let remote = Remote::new(database_url, transport, context.auth.clone());

        Ok(Self { context, remote })
    }

    pub fn remote(&self) -> &Remote {
        &self.remote
    }

    pub fn persist_session(&self) -> Result<(), SessionError> {
        self.context.persist_session()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, Utc};
    use recipebook_core::AuthProvider;
    use std::io::Write;
    use std::path::Path;
    use tempfile::tempdir;

    fn config_with_session(dir: &Path) -> Config {
        let config_path = dir.join("config.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "session_path: session.yaml").unwrap();
        Config::load(Some(config_path)).unwrap()
    }

    fn session() -> Session {
        Session {
            uid: "user-1".to_string(),
            email: Some("cook@example.com".to_string()),
            id_token: "id-1".to_string(),
            refresh_token: "refresh-1".to_string(),
            expires_at: Utc::now() + ChronoDuration::hours(1),
        }
    }

    #[test]
    fn test_auth_context_without_remote_settings() {
        let temp_dir = tempdir().unwrap();
        let config = config_with_session(temp_dir.path());

        let context = AuthContext::open(&config).unwrap();
        assert!(context.auth().active_user().is_none());

        let err = App::connect(&config).err().unwrap();
        assert!(err.to_string().contains("remote.database_url"));
    }

    #[test]
    fn test_resumes_saved_session() {
        let temp_dir = tempdir().unwrap();
        let config = config_with_session(temp_dir.path());
        session::save(&config.session_path.value, &session()).unwrap();

        let context = AuthContext::open(&config).unwrap();

        assert_eq!(
            context.auth().active_user().map(|user| user.uid),
            Some("user-1".to_string())
        );
        context.persist_session().unwrap();
        assert!(config.session_path.value.exists());
    }

    #[test]
    fn test_sign_out_removes_session_file() {
        let temp_dir = tempdir().unwrap();
        let config = config_with_session(temp_dir.path());
        session::save(&config.session_path.value, &session()).unwrap();
        let context = AuthContext::open(&config).unwrap();

        context.auth().sign_out();
        context.persist_session().unwrap();

        assert!(context.auth().active_user().is_none());
        assert!(!config.session_path.value.exists());
    }
}
