use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use futures::channel::oneshot;
use warehouse_core::{QueryRequest, QueryResponse, QueryResultItem, Record, RECORD_TYPE};
use warehouse_widget::{Notice, Notifier, QueryError, RecordQuery};

type Reply = Result<QueryResponse, QueryError>;

enum Scripted {
    Now(Reply),
    Later(oneshot::Receiver<Reply>),
}

/// Query capability that answers from a script and records every request.
///
/// With nothing scripted it answers with an empty result set.
#[derive(Default)]
pub struct ScriptedQuery {
    requests: Mutex<Vec<QueryRequest>>,
    script: Mutex<VecDeque<Scripted>>,
}

impl ScriptedQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer the next query with these records.
    pub fn respond_with(&self, records: Vec<Record>) {
        self.push(Scripted::Now(Ok(response(records))));
    }

    /// Reject the next query.
    pub fn reject_next(&self, reason: &str) {
        self.push(Scripted::Now(Err(QueryError::Rejected(reason.to_string()))));
    }

    /// Hold the next query open until the returned sender fires.
    /// Dropping the sender rejects the query.
    pub fn defer_next(&self) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.push(Scripted::Later(rx));
        tx
    }

    pub fn requests(&self) -> Vec<QueryRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn push(&self, entry: Scripted) {
        self.script.lock().unwrap().push_back(entry);
    }
}

/// Wrap records the way the host store returns them.
pub fn response(records: Vec<Record>) -> QueryResponse {
    let items = records
        .into_iter()
        .enumerate()
        .map(|(i, data)| QueryResultItem {
            record_type: RECORD_TYPE.to_string(),
            container_id: 1,
            position_index: i as i64,
            data,
        })
        .collect();
    QueryResponse { items }
}

#[async_trait]
impl RecordQuery for ScriptedQuery {
    async fn query_records(&self, request: QueryRequest) -> Result<QueryResponse, QueryError> {
        self.requests.lock().unwrap().push(request);
        let next = self.script.lock().unwrap().pop_front();
        match next {
            None => Ok(QueryResponse::default()),
            Some(Scripted::Now(reply)) => reply,
            Some(Scripted::Later(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(QueryError::Rejected("reply dropped".into()))),
        }
    }
}

/// Notifier that keeps every notice for later assertions.
#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn show(&self, notice: &Notice) {
        self.notices.lock().unwrap().push(notice.clone());
    }
}
