use std::collections::BTreeMap;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::NaiveDateTime;
use warehouse_metadata::{
    CredentialLookup, ProviderError, SessionLookup, SessionProfile, WallClock,
};

pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    /// Parse a `YYYY-MM-DD HH:MM:SS` timestamp.
    pub fn at(text: &str) -> Self {
        let at = NaiveDateTime::parse_from_str(text, warehouse_metadata::TIMESTAMP_FORMAT)
            .unwrap_or_else(|e| panic!("bad fixed clock time {text:?}: {e}"));
        Self(at)
    }
}

impl WallClock for FixedClock {
    fn now(&self) -> Result<NaiveDateTime, ProviderError> {
        Ok(self.0)
    }
}

pub struct FailingClock;

impl WallClock for FailingClock {
    fn now(&self) -> Result<NaiveDateTime, ProviderError> {
        Err(ProviderError::Failed("clock unavailable".into()))
    }
}

#[derive(Default)]
pub struct StaticSession(pub Option<SessionProfile>);

impl StaticSession {
    pub fn new(full_name: Option<&str>, username: Option<&str>) -> Self {
        Self(Some(SessionProfile {
            full_name: full_name.map(str::to_string),
            username: username.map(str::to_string),
        }))
    }
}

impl SessionLookup for StaticSession {
    fn current_session(&self) -> Result<Option<SessionProfile>, ProviderError> {
        Ok(self.0.clone())
    }
}

/// A host with no session global at all.
pub struct FailingSession;

impl SessionLookup for FailingSession {
    fn current_session(&self) -> Result<Option<SessionProfile>, ProviderError> {
        Err(ProviderError::Unavailable("no session global".into()))
    }
}

/// Key/value credential storage.
#[derive(Default)]
pub struct StaticCredentials(BTreeMap<String, String>);

impl StaticCredentials {
    pub fn with(mut self, key: &str, token: impl Into<String>) -> Self {
        self.0.insert(key.to_string(), token.into());
        self
    }
}

impl CredentialLookup for StaticCredentials {
    fn credential(&self, key: &str) -> Result<Option<String>, ProviderError> {
        Ok(self.0.get(key).cloned())
    }
}

/// Unsigned three-segment token carrying `payload`.
pub fn make_token(payload: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("{header}.{body}.signature")
}
