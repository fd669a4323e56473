pub mod error;
pub mod field;
pub mod ids;
pub mod query;
pub mod reconcile;
pub mod record;

pub use error::CoreError;
pub use field::Field;
pub use ids::BlockId;
pub use query::{QueryRequest, QueryResponse, QueryResultItem, DEFAULT_QUERY_LIMIT, RECORD_TYPE};
pub use reconcile::{reconcile, Reconciled, SchemaVersion};
pub use record::Record;
