//! Authentication collaborator
//!
//! Password sign-in against the hosted identity service. On success the
//! returned session token is installed into the store handle and the app
//! navigates to the main console.

use crate::services::store::{RestStore, StoreError};
use serde::Deserialize;

/// An authenticated session
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub access_token: String,
    pub email: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    user: TokenUser,
}

#[derive(Deserialize, Default)]
struct TokenUser {
    #[serde(default)]
    email: String,
}

impl RestStore {
    /// Exchange email and password for a session
    ///
    /// Any non-200 answer (wrong credentials included) and any transport
    /// failure surface as a `StoreError`; the login screen turns both into a
    /// retryable message.
    pub fn sign_in(&self, email: &str, password: &str) -> Result<Session, StoreError> {
        let url = format!("{}/auth/v1/token?grant_type=password", self.base_url);
        let request = self
            .agent
            .post(&url)
            .set("apikey", &self.api_key)
            .set("Authorization", &format!("Bearer {}", self.api_key));

        let response = match request.send_json(serde_json::json!({
            "email": email,
            "password": password,
        })) {
            Ok(response) => response,
            Err(ureq::Error::Status(status, _)) => {
                return Err(StoreError::Unexpected { status });
            }
            Err(ureq::Error::Transport(t)) => {
                return Err(StoreError::Transport(t.to_string()));
            }
        };

        let token: TokenResponse = response
            .into_json()
            .map_err(|e| StoreError::Decode(e.to_string()))?;

        let email = if token.user.email.is_empty() {
            email.to_string()
        } else {
            token.user.email
        };

        Ok(Session {
            access_token: token.access_token,
            email,
        })
    }
}
