use chrono::NaiveDateTime;
use serde_json::Value;

use crate::error::ProviderError;

/// A host callback producing a display label, such as the current time or
/// the signed-in user's name. Blank labels count as "no value".
pub trait LabelProvider: Send + Sync {
    fn label(&self) -> Result<String, ProviderError>;
}

impl<F> LabelProvider for F
where
    F: Fn() -> Result<String, ProviderError> + Send + Sync,
{
    fn label(&self) -> Result<String, ProviderError> {
        self()
    }
}

/// Local wall clock used when no time label provider is configured.
pub trait WallClock: Send + Sync {
    fn now(&self) -> Result<NaiveDateTime, ProviderError>;
}

/// The host's signed-in session, as far as labels are concerned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionProfile {
    pub full_name: Option<String>,
    pub username: Option<String>,
}

impl SessionProfile {
    /// Read a session object leniently: non-string fields count as absent.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let text = |key: &str| obj.get(key).and_then(Value::as_str).map(str::to_string);
        Some(Self {
            full_name: text("full_name"),
            username: text("username"),
        })
    }

    /// Display name, falling back to the username. Blank values are skipped.
    pub fn display_label(&self) -> Option<String> {
        first_label(&[self.full_name.as_deref(), self.username.as_deref()])
    }
}

/// Looks up the host's current session object.
pub trait SessionLookup: Send + Sync {
    fn current_session(&self) -> Result<Option<SessionProfile>, ProviderError>;
}

/// Reads a persisted credential (bearer token) by storage key.
pub trait CredentialLookup: Send + Sync {
    fn credential(&self, key: &str) -> Result<Option<String>, ProviderError>;
}

/// First candidate that is non-empty after trimming, trimmed.
pub(crate) fn first_label(candidates: &[Option<&str>]) -> Option<String> {
    candidates
        .iter()
        .flatten()
        .map(|s| s.trim())
        .find(|s| !s.is_empty())
        .map(str::to_string)
}
