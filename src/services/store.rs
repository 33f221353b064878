//! Hosted relational store client
//!
//! PostgREST-style adapter over HTTP. The expected success statuses (`201`
//! for insert, `204` for update and delete) are checked here and mapped to an
//! explicit result, so no caller has to memorize status numbers. Everything
//! that is not the expected status, including transport failure, is a
//! `StoreError`; the distinction between causes is intentionally coarse.

use crate::services::auth::Session;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Mutex;

/// Failure at the store boundary
#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    /// The store answered with a status other than the expected one
    Unexpected { status: u16 },
    /// The request never completed (DNS, connect, broken pipe, ...)
    Transport(String),
    /// The response body did not decode into the expected shape
    Decode(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Unexpected { status } => {
                write!(f, "store returned unexpected status {}", status)
            }
            StoreError::Transport(msg) => write!(f, "store request failed: {}", msg),
            StoreError::Decode(msg) => write!(f, "store response invalid: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

/// Table operations used by dialogs and the table refresh
///
/// The seam between UI flows and the HTTP adapter; tests swap in a mock.
pub trait EntityStore: Send + Sync {
    fn insert(&self, table: &str, record: &Map<String, Value>) -> Result<(), StoreError>;
    fn update(&self, table: &str, id: &str, values: &Map<String, Value>)
        -> Result<(), StoreError>;
    fn delete(&self, table: &str, id: &str) -> Result<(), StoreError>;
    fn select(&self, table: &str) -> Result<Vec<Value>, StoreError>;
}

/// Fetch a table and decode every row into `T`
pub fn select_into<T: DeserializeOwned>(
    store: &dyn EntityStore,
    table: &str,
) -> Result<Vec<T>, StoreError> {
    store
        .select(table)?
        .into_iter()
        .map(|row| serde_json::from_value(row).map_err(|e| StoreError::Decode(e.to_string())))
        .collect()
}

/// Primary-key filter in PostgREST query syntax
pub(crate) fn eq_url(endpoint: &str, id: &str) -> String {
    format!("{}?id=eq.{}", endpoint, id)
}

/// The process-wide store client handle
///
/// Created once at startup and passed by reference; the session token is the
/// only mutable piece and lives behind a mutex so background submission
/// threads can share the handle.
pub struct RestStore {
    pub(crate) agent: ureq::Agent,
    pub(crate) base_url: String,
    pub(crate) api_key: String,
    session: Mutex<Option<Session>>,
}

impl RestStore {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().build(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            session: Mutex::new(None),
        }
    }

    pub fn set_session(&self, session: Session) {
        *self.lock_session() = Some(session);
    }

    pub fn session_email(&self) -> Option<String> {
        self.lock_session().as_ref().map(|s| s.email.clone())
    }

    fn lock_session(&self) -> std::sync::MutexGuard<'_, Option<Session>> {
        self.session.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn endpoint(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// Attach api key and bearer token headers
    pub(crate) fn authorize(&self, request: ureq::Request) -> ureq::Request {
        let token = self
            .lock_session()
            .as_ref()
            .map(|s| s.access_token.clone())
            .unwrap_or_else(|| self.api_key.clone());
        request
            .set("apikey", &self.api_key)
            .set("Authorization", &format!("Bearer {}", token))
    }

    /// Map a ureq result to the explicit outcome for one expected status
    fn expect_status(
        result: Result<ureq::Response, ureq::Error>,
        expected: u16,
    ) -> Result<(), StoreError> {
        match result {
            Ok(response) if response.status() == expected => Ok(()),
            Ok(response) => Err(StoreError::Unexpected {
                status: response.status(),
            }),
            Err(ureq::Error::Status(status, _)) => Err(StoreError::Unexpected { status }),
            Err(ureq::Error::Transport(t)) => Err(StoreError::Transport(t.to_string())),
        }
    }
}

impl EntityStore for RestStore {
    fn insert(&self, table: &str, record: &Map<String, Value>) -> Result<(), StoreError> {
        let request = self.authorize(self.agent.post(&self.endpoint(table)));
        Self::expect_status(request.send_json(Value::Object(record.clone())), 201)
    }

    fn update(
        &self,
        table: &str,
        id: &str,
        values: &Map<String, Value>,
    ) -> Result<(), StoreError> {
        let url = eq_url(&self.endpoint(table), id);
        let request = self.authorize(self.agent.request("PATCH", &url));
        Self::expect_status(request.send_json(Value::Object(values.clone())), 204)
    }

    fn delete(&self, table: &str, id: &str) -> Result<(), StoreError> {
        let url = eq_url(&self.endpoint(table), id);
        let request = self.authorize(self.agent.delete(&url));
        Self::expect_status(request.call(), 204)
    }

    fn select(&self, table: &str) -> Result<Vec<Value>, StoreError> {
        let url = format!("{}?select=*", self.endpoint(table));
        let request = self.authorize(self.agent.get(&url));
        match request.call() {
            Ok(response) => response
                .into_json::<Vec<Value>>()
                .map_err(|e| StoreError::Decode(e.to_string())),
            Err(ureq::Error::Status(status, _)) => Err(StoreError::Unexpected { status }),
            Err(ureq::Error::Transport(t)) => Err(StoreError::Transport(t.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eq_url() {
        assert_eq!(
            eq_url("https://db.example/rest/v1/subjects", "abc-123"),
            "https://db.example/rest/v1/subjects?id=eq.abc-123"
        );
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let store = RestStore::new("https://db.example/", "anon-key");
        assert_eq!(
            store.endpoint("subjects"),
            "https://db.example/rest/v1/subjects"
        );
    }

    #[test]
    fn test_store_error_display() {
        let err = StoreError::Unexpected { status: 400 };
        assert_eq!(err.to_string(), "store returned unexpected status 400");
    }
}
