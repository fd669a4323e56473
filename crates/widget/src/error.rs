use thiserror::Error;

/// Rejection from the host's record store. The only error signal a query has.
#[derive(Debug, Clone, Error)]
pub enum QueryError {
    #[error("query rejected: {0}")]
    Rejected(String),
}
