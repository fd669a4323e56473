use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::{debug, warn};
use warehouse_core::{Field, QueryRequest, Record};

use crate::notice::{Notice, Notifier};
use crate::query::{InFlightSlot, PendingQuery, QueryOutcome, RecordQuery};
use crate::view::BlockView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryPhase {
    Idle,
    Querying,
}

impl QueryPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Querying => "querying",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChooserState {
    Closed,
    Open { visible: bool, phase: QueryPhase },
}

impl ChooserState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Open { .. } => "open",
        }
    }
}

/// How completions of overlapping queries are reconciled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QueryOrdering {
    /// Every completion is applied; whichever lands last is shown.
    #[default]
    LastCompletionWins,
    /// Completions older than the last applied one are dropped.
    LatestIssuedWins,
}

#[derive(Debug)]
#[must_use]
pub enum OpenOutcome {
    /// No query capability; a warning was shown and nothing changed.
    Unavailable,
    /// The chooser was already open; only its visibility flipped.
    Toggled { visible: bool },
    /// The chooser opened and issued its first query.
    Querying(PendingQuery),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryCompletion {
    /// Results replaced the list; carries the new row count.
    Applied(usize),
    /// The query was rejected; the previous rows were left alone.
    Failed,
    /// Superseded by a newer completion and dropped.
    Stale,
    /// Arrived after the chooser closed and dropped.
    Discarded,
}

/// State of the "choose from existing records" overlay.
///
/// Results are held only until the next query replaces them or the chooser
/// closes.
pub struct ChooserController {
    query: Option<Arc<dyn RecordQuery>>,
    notifier: Arc<dyn Notifier>,
    ordering: QueryOrdering,
    open: bool,
    visible: bool,
    field: Field,
    filter: String,
    results: Vec<Record>,
    next_seq: u64,
    /// First sequence number issued in the current open session.
    session_start: u64,
    last_applied: Option<u64>,
    /// Outstanding queries of the current open session.
    in_flight: Arc<AtomicUsize>,
}

impl ChooserController {
    pub fn new(
        query: Option<Arc<dyn RecordQuery>>,
        notifier: Arc<dyn Notifier>,
        ordering: QueryOrdering,
    ) -> Self {
        Self {
            query,
            notifier,
            ordering,
            open: false,
            visible: false,
            field: Field::QUERYABLE[0],
            filter: String::new(),
            results: Vec::new(),
            next_seq: 0,
            session_start: 0,
            last_applied: None,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn state(&self) -> ChooserState {
        if !self.open {
            return ChooserState::Closed;
        }
        ChooserState::Open {
            visible: self.visible,
            phase: self.phase(),
        }
    }

    fn phase(&self) -> QueryPhase {
        if self.in_flight.load(Ordering::SeqCst) > 0 {
            QueryPhase::Querying
        } else {
            QueryPhase::Idle
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_available(&self) -> bool {
        self.query.is_some()
    }

    pub fn field_options(&self) -> &'static [Field] {
        &Field::QUERYABLE
    }

    pub fn selected_field(&self) -> Field {
        self.field
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn results(&self) -> &[Record] {
        &self.results
    }

    pub fn row(&self, index: usize) -> Option<&Record> {
        self.results.get(index)
    }

    /// Open the overlay, seeded from the field the user last focused.
    pub fn open(
        &mut self,
        active_field: Option<Field>,
        active_text: Option<&str>,
        view: &mut dyn BlockView,
    ) -> OpenOutcome {
        if !self.is_available() {
            warn!("chooser opened without a query capability");
            self.notifier.show(&Notice::QUERY_UNAVAILABLE);
            return OpenOutcome::Unavailable;
        }

        if self.open {
            self.visible = !self.visible;
            if view.is_attached() {
                view.set_chooser_visible(self.visible);
            }
            return OpenOutcome::Toggled {
                visible: self.visible,
            };
        }

        self.open = true;
        self.visible = true;
        self.field = active_field
            .filter(Field::is_queryable)
            .unwrap_or(Field::QUERYABLE[0]);
        self.filter = active_text.map(str::trim).unwrap_or_default().to_string();
        self.results.clear();
        self.session_start = self.next_seq;
        self.last_applied = None;
        self.in_flight = Arc::new(AtomicUsize::new(0));
        if view.is_attached() {
            view.render_chooser_rows(&self.results);
            view.set_chooser_visible(true);
        }
        debug!(field = %self.field, filter = %self.filter, "chooser opened");

        let field = self.field;
        let prefix = self.filter.clone();
        match self.query(field, &prefix) {
            Some(pending) => OpenOutcome::Querying(pending),
            None => OpenOutcome::Unavailable,
        }
    }

    /// Change the field selector. Fields outside the selector are ignored.
    pub fn set_field(&mut self, field: Field) -> bool {
        if !field.is_queryable() {
            return false;
        }
        self.field = field;
        true
    }

    pub fn set_filter(&mut self, text: impl Into<String>) {
        self.filter = text.into();
    }

    /// Search again with the current selector and filter.
    pub fn rerun(&mut self) -> Option<PendingQuery> {
        let field = self.field;
        let prefix = self.filter.trim().to_string();
        self.query(field, &prefix)
    }

    /// Issue a prefix search. `None` if closed or no capability exists.
    pub fn query(&mut self, field: Field, prefix: &str) -> Option<PendingQuery> {
        if !self.open {
            return None;
        }
        let query = Arc::clone(self.query.as_ref()?);
        let seq = self.next_seq;
        self.next_seq += 1;
        let slot = InFlightSlot::acquire(&self.in_flight);
        let request = QueryRequest::prefix(field, prefix);
        debug!(seq, field = %field, q = prefix, "issuing chooser query");
        Some(PendingQuery::issue(seq, request, query, slot))
    }

    /// Apply a finished query to the result list and the rendered table.
    pub fn complete(&mut self, outcome: QueryOutcome, view: &mut dyn BlockView) -> QueryCompletion {
        let QueryOutcome { seq, result, slot } = outcome;
        drop(slot);

        if !self.open || seq < self.session_start {
            debug!(
                seq,
                state = self.state().as_str(),
                "query finished after its session ended, dropping"
            );
            return QueryCompletion::Discarded;
        }

        if self.ordering == QueryOrdering::LatestIssuedWins
            && self.last_applied.is_some_and(|applied| seq < applied)
        {
            debug!(seq, "stale query completion, dropping");
            return QueryCompletion::Stale;
        }

        match result {
            Ok(response) => {
                self.results = response.into_records();
                self.last_applied = Some(seq);
                if view.is_attached() {
                    view.render_chooser_rows(&self.results);
                }
                debug!(
                    seq,
                    rows = self.results.len(),
                    phase = self.phase().as_str(),
                    "chooser results applied"
                );
                QueryCompletion::Applied(self.results.len())
            }
            Err(e) => {
                warn!(seq, error = %e, "chooser query failed");
                self.notifier.show(&Notice::QUERY_FAILED);
                QueryCompletion::Failed
            }
        }
    }

    /// Take a row out as the user's choice and close the overlay.
    pub fn take_selection(&mut self, index: usize, view: &mut dyn BlockView) -> Option<Record> {
        let record = self.row(index)?.clone();
        self.close(view);
        Some(record)
    }

    pub fn close(&mut self, view: &mut dyn BlockView) {
        if !self.open {
            return;
        }
        self.open = false;
        self.visible = false;
        self.results.clear();
        self.in_flight = Arc::new(AtomicUsize::new(0));
        if view.is_attached() {
            view.set_chooser_visible(false);
        }
    }
}
