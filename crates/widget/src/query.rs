use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use futures::FutureExt;
use warehouse_core::{QueryRequest, QueryResponse};

use crate::error::QueryError;

/// Searches the host's store of saved blocks.
///
/// No timeout or cancellation is applied by the chooser; an implementation
/// that wants bounded latency enforces it here.
#[async_trait]
pub trait RecordQuery: Send + Sync {
    async fn query_records(&self, request: QueryRequest) -> Result<QueryResponse, QueryError>;
}

/// One outstanding query of a chooser session. Released on drop.
#[derive(Debug)]
pub(crate) struct InFlightSlot(Arc<AtomicUsize>);

impl InFlightSlot {
    pub(crate) fn acquire(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for InFlightSlot {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// A query that has been issued but not awaited.
///
/// Owns its future, so several can be in flight at once. Feed the outcome
/// of `run` back to the block that issued it. Dropping it unrun abandons
/// the query and the chooser stops counting it as outstanding.
#[must_use = "a pending query does nothing unless run"]
pub struct PendingQuery {
    seq: u64,
    request: QueryRequest,
    future: BoxFuture<'static, Result<QueryResponse, QueryError>>,
    slot: InFlightSlot,
}

impl PendingQuery {
    pub(crate) fn issue(
        seq: u64,
        request: QueryRequest,
        query: Arc<dyn RecordQuery>,
        slot: InFlightSlot,
    ) -> Self {
        let req = request.clone();
        let future = async move { query.query_records(req).await }.boxed();
        Self {
            seq,
            request,
            future,
            slot,
        }
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn request(&self) -> &QueryRequest {
        &self.request
    }

    pub async fn run(self) -> QueryOutcome {
        let Self {
            seq, future, slot, ..
        } = self;
        let result = future.await;
        QueryOutcome {
            seq,
            result,
            slot: Some(slot),
        }
    }
}

impl fmt::Debug for PendingQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingQuery")
            .field("seq", &self.seq)
            .field("request", &self.request)
            .finish_non_exhaustive()
    }
}

/// A finished query. Stays outstanding until handed back to the chooser.
#[derive(Debug)]
#[must_use = "hand the outcome back with `finish_query`"]
pub struct QueryOutcome {
    pub seq: u64,
    pub result: Result<QueryResponse, QueryError>,
    pub(crate) slot: Option<InFlightSlot>,
}

impl QueryOutcome {
    #[cfg(test)]
    pub(crate) fn detached(seq: u64, result: Result<QueryResponse, QueryError>) -> Self {
        Self {
            seq,
            result,
            slot: None,
        }
    }
}
