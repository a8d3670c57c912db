use std::path::PathBuf;

use reqwest::{Client, Response, StatusCode};
use thiserror::Error;
use tokio::sync::watch;

use crate::config::Config;
use crate::models::Session;

mod auth;
mod projects;
mod storage;

pub use storage::object_key;

/// Errors from the remote data service boundary.
///
/// Both transport failures and backend rejections collapse into a single
/// message string; callers show it and do not retry.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("{0}")]
    Backend(String),
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// Client for the hosted backend: auth, the `projects` table, and the
/// `project-images` bucket. Every operation is a single round-trip.
pub struct Remote {
    http: Client,
    base_url: String,
    anon_key: String,
    auth_state: watch::Sender<Option<Session>>,
    session_file: PathBuf,
}

impl Remote {
    pub fn new(config: &Config) -> Self {
        let (auth_state, _) = watch::channel(None);
        Self {
            http: Client::new(),
            base_url: config.supabase_url().to_string(),
            anon_key: config.supabase_anon_key.clone(),
            auth_state,
            session_file: PathBuf::from(config.session_file()),
        }
    }

    /// Subscribe to auth-state changes. The receiver observes the
    /// current session immediately; dropping it is the unsubscribe.
    pub fn subscribe_auth(&self) -> watch::Receiver<Option<Session>> {
        self.auth_state.subscribe()
    }

    pub fn session(&self) -> Option<Session> {
        self.auth_state.borrow().clone()
    }

    /// Bearer token for data requests: the signed-in user's access token
    /// when present, the anon key otherwise.
    fn bearer(&self) -> String {
        self.auth_state
            .borrow()
            .as_ref()
            .map(|s| s.access_token.clone())
            .unwrap_or_else(|| self.anon_key.clone())
    }

    /// Surface non-2xx responses as the backend's message string.
    async fn check(response: Response) -> Result<Response, RemoteError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(RemoteError::Backend(error_message(status, &body)))
    }
}

/// Pull the human-readable message out of an error body. The service
/// uses different shapes per subsystem; fall back to the status line.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "msg", "error_description", "error"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                return text.to_string();
            }
        }
    }
    format!("request failed with status {}", status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_table_api_shape() {
        let body = r#"{"message":"duplicate key value","code":"23505"}"#;
        assert_eq!(
            error_message(StatusCode::CONFLICT, body),
            "duplicate key value"
        );
    }

    #[test]
    fn error_message_reads_auth_shapes() {
        let body = r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#;
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, body),
            "Invalid login credentials"
        );

        let body = r#"{"msg":"JWT expired"}"#;
        assert_eq!(error_message(StatusCode::UNAUTHORIZED, body), "JWT expired");
    }

    #[test]
    fn error_message_falls_back_to_status() {
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>"),
            "request failed with status 502 Bad Gateway"
        );
    }
}
