use std::fs;

use serde::Serialize;
use tracing::{info, warn};

use crate::models::Session;
use crate::remote::{Remote, RemoteError};

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

impl Remote {
    /// Sign in with an email/password pair. On success the session is
    /// published to auth subscribers and persisted to the session file.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, RemoteError> {
        let response = self
            .http
            .post(format!("{}/auth/v1/token", self.base_url))
            .header("apikey", &self.anon_key)
            .query(&[("grant_type", "password")])
            .json(&PasswordGrant { email, password })
            .send()
            .await?;

        let session: Session = Self::check(response).await?.json().await?;
        info!(email, "signed in");

        self.persist_session(&session);
        self.auth_state.send_replace(Some(session.clone()));
        Ok(session)
    }

    /// Sign out. Local state is cleared even when the revocation call
    /// fails; the token then simply expires server-side.
    pub async fn sign_out(&self) {
        if let Some(session) = self.session() {
            let result = self
                .http
                .post(format!("{}/auth/v1/logout", self.base_url))
                .header("apikey", &self.anon_key)
                .bearer_auth(&session.access_token)
                .send()
                .await;
            if let Err(err) = result {
                warn!("logout request failed: {}", err);
            }
        }

        self.clear_session_file();
        self.auth_state.send_replace(None);
    }

    /// Session check on startup: load the persisted session, validate
    /// its token against the auth endpoint, and publish it if it still
    /// holds. Anything short of that lands in the logged-out state.
    pub async fn restore_session(&self) {
        let Some(session) = self.load_session_file() else {
            return;
        };

        let valid = self
            .http
            .get(format!("{}/auth/v1/user", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(&session.access_token)
            .send()
            .await
            .map(|response| response.status().is_success())
            .unwrap_or(false);

        if valid {
            info!("restored persisted session");
            self.auth_state.send_replace(Some(session));
        } else {
            warn!("persisted session is no longer valid");
            self.clear_session_file();
        }
    }

    fn load_session_file(&self) -> Option<Session> {
        let contents = fs::read_to_string(&self.session_file).ok()?;
        match serde_json::from_str(&contents) {
            Ok(session) => Some(session),
            Err(err) => {
                warn!("ignoring unreadable session file: {}", err);
                None
            }
        }
    }

    fn persist_session(&self, session: &Session) {
        // Best-effort; a failure here only forces a re-login next run
        match serde_json::to_string(session) {
            Ok(contents) => {
                if let Err(err) = fs::write(&self.session_file, contents) {
                    warn!("failed to persist session: {}", err);
                }
            }
            Err(err) => warn!("failed to serialize session: {}", err),
        }
    }

    fn clear_session_file(&self) {
        if self.session_file.exists() {
            if let Err(err) = fs::remove_file(&self.session_file) {
                warn!("failed to remove session file: {}", err);
            }
        }
    }
}
