pub mod clock;
pub mod credential;
pub mod error;
pub mod resolver;
pub mod traits;

pub use clock::{format_timestamp, LocalWallClock, TIMESTAMP_FORMAT};
pub use credential::{decode_credential_label, CREDENTIAL_STORAGE_KEY};
pub use error::{CredentialError, ProviderError};
pub use resolver::{resolve_created_at, resolve_created_by, ProvenanceSources};
pub use traits::*;
