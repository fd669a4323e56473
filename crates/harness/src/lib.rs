//! Test host for warehouse blocks: an in-memory view, recording notifier,
//! fake identity sources, and query stores.

pub mod identity;
pub mod query;
pub mod store;
pub mod view;

pub use identity::{make_token, FailingClock, FailingSession, FixedClock, StaticCredentials, StaticSession};
pub use query::{RecordingNotifier, ScriptedQuery};
pub use store::{SqliteRecordStore, StoreError};
pub use view::TestView;

/// Route `tracing` output through the test writer. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}
