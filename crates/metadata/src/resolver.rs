use std::sync::Arc;

use tracing::debug;

use crate::clock::{format_timestamp, LocalWallClock};
use crate::credential::{decode_credential_label, CREDENTIAL_STORAGE_KEY};
use crate::traits::{CredentialLookup, LabelProvider, SessionLookup, WallClock};

fn existing_value(existing: Option<&str>) -> Option<String> {
    existing.filter(|s| !s.is_empty()).map(str::to_string)
}

fn provider_label(provider: Option<&dyn LabelProvider>, stage: &'static str) -> Option<String> {
    let provider = provider?;
    match provider.label() {
        Ok(label) => {
            let trimmed = label.trim();
            if trimmed.is_empty() {
                debug!(stage, "provider returned a blank label");
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Err(e) => {
            debug!(stage, error = %e, "provider failed");
            None
        }
    }
}

/// Creation time for a record.
///
/// Returns `existing` untouched when it is non-empty. Otherwise tries the
/// injected label provider, then the wall clock, then gives `""`.
pub fn resolve_created_at(
    existing: Option<&str>,
    clock_label: Option<&dyn LabelProvider>,
    wall_clock: &dyn WallClock,
) -> String {
    if let Some(value) = existing_value(existing) {
        return value;
    }
    if let Some(label) = provider_label(clock_label, "now_label") {
        return label;
    }
    match wall_clock.now() {
        Ok(now) => format_timestamp(&now),
        Err(e) => {
            debug!(error = %e, "wall clock failed, leaving createdAt empty");
            String::new()
        }
    }
}

/// Creator label for a record.
///
/// Returns `existing` untouched when it is non-empty. Otherwise tries, in
/// order: the injected user label provider, the host session profile, the
/// stored credential's payload, and finally `""`.
pub fn resolve_created_by(
    existing: Option<&str>,
    user_label: Option<&dyn LabelProvider>,
    session: Option<&dyn SessionLookup>,
    credentials: Option<&dyn CredentialLookup>,
) -> String {
    if let Some(value) = existing_value(existing) {
        return value;
    }
    if let Some(label) = provider_label(user_label, "user_label") {
        return label;
    }
    if let Some(label) = session.and_then(session_label) {
        return label;
    }
    if let Some(label) = credentials.and_then(credential_label) {
        return label;
    }
    String::new()
}

fn session_label(session: &dyn SessionLookup) -> Option<String> {
    match session.current_session() {
        Ok(Some(profile)) => profile.display_label(),
        Ok(None) => None,
        Err(e) => {
            debug!(error = %e, "session lookup failed");
            None
        }
    }
}

fn credential_label(credentials: &dyn CredentialLookup) -> Option<String> {
    let token = match credentials.credential(CREDENTIAL_STORAGE_KEY) {
        Ok(Some(token)) => token,
        Ok(None) => return None,
        Err(e) => {
            debug!(error = %e, "credential lookup failed");
            return None;
        }
    };
    match decode_credential_label(&token) {
        Ok(label) => label,
        Err(e) => {
            debug!(error = %e, "stored credential unreadable, treating as absent");
            None
        }
    }
}

/// The optional host sources consulted when a record lacks provenance.
#[derive(Clone)]
pub struct ProvenanceSources {
    pub now_label: Option<Arc<dyn LabelProvider>>,
    pub user_label: Option<Arc<dyn LabelProvider>>,
    pub session: Option<Arc<dyn SessionLookup>>,
    pub credentials: Option<Arc<dyn CredentialLookup>>,
    pub wall_clock: Arc<dyn WallClock>,
}

impl Default for ProvenanceSources {
    fn default() -> Self {
        Self {
            now_label: None,
            user_label: None,
            session: None,
            credentials: None,
            wall_clock: Arc::new(LocalWallClock),
        }
    }
}

impl std::fmt::Debug for ProvenanceSources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProvenanceSources")
            .field("now_label", &self.now_label.is_some())
            .field("user_label", &self.user_label.is_some())
            .field("session", &self.session.is_some())
            .field("credentials", &self.credentials.is_some())
            .finish_non_exhaustive()
    }
}

impl ProvenanceSources {
    /// Resolve `(createdAt, createdBy)` in one pass.
    pub fn resolve(&self, created_at: Option<&str>, created_by: Option<&str>) -> (String, String) {
        let at = resolve_created_at(
            created_at,
            self.now_label.as_deref(),
            self.wall_clock.as_ref(),
        );
        let by = resolve_created_by(
            created_by,
            self.user_label.as_deref(),
            self.session.as_deref(),
            self.credentials.as_deref(),
        );
        (at, by)
    }
}
