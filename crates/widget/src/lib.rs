pub mod chooser;
pub mod config;
pub mod error;
pub mod notice;
pub mod query;
pub mod view;

pub use chooser::{ChooserController, ChooserState, OpenOutcome, QueryCompletion, QueryOrdering, QueryPhase};
pub use config::{Placeholders, WidgetConfig};
pub use error::QueryError;
pub use notice::{LogNotifier, Notice, NoticeStyle, Notifier};
pub use query::{PendingQuery, QueryOutcome, RecordQuery};
pub use view::BlockView;

use serde_json::{json, Value};
use tracing::{debug, info_span, Instrument, Span};
use warehouse_core::{reconcile, BlockId, Field, Record};

/// Toolbox and capability flags the host registers the block with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolInfo {
    pub title: &'static str,
    pub read_only_supported: bool,
    pub contentless: bool,
    pub enable_line_breaks: bool,
}

pub const TOOL_INFO: ToolInfo = ToolInfo {
    title: "Warehouse",
    read_only_supported: true,
    contentless: true,
    enable_line_breaks: true,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormCell {
    pub field: Field,
    pub label: &'static str,
    pub value: String,
    pub placeholder: String,
    pub editable: bool,
}

/// What the host should draw for one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormLayout {
    pub cells: Vec<FormCell>,
    pub show_choose_button: bool,
}

/// One warehouse entry block mounted in a document.
pub struct WarehouseBlock {
    id: BlockId,
    span: Span,
    data: Record,
    config: WidgetConfig,
    read_only: bool,
    active_field: Option<Field>,
    chooser: ChooserController,
}

impl WarehouseBlock {
    /// Build a block from persisted data.
    ///
    /// Reconciles the stored shape, then resolves any missing provenance
    /// exactly once. Never fails.
    pub fn new(raw: &Value, config: WidgetConfig, read_only: bool) -> Self {
        let id = BlockId::new();
        let span = info_span!("warehouse_block", block = %id);
        let data = {
            let _guard = span.enter();
            let reconciled = reconcile(raw);
            let (created_at, created_by) = config
                .provenance
                .resolve(reconciled.created_at.as_deref(), reconciled.created_by.as_deref());
            debug!(schema = reconciled.schema.as_str(), "block constructed");
            reconciled.into_record(created_at, created_by)
        };
        let chooser = ChooserController::new(
            config.query.clone(),
            config.notifier.clone(),
            config.query_ordering,
        );
        Self {
            id,
            span,
            data,
            config,
            read_only,
            active_field: None,
            chooser,
        }
    }

    pub fn id(&self) -> BlockId {
        self.id
    }

    /// The in-memory record. Editable fields are only current as of the last
    /// `save` or chooser selection.
    pub fn data(&self) -> &Record {
        &self.data
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn active_field(&self) -> Option<Field> {
        self.active_field
    }

    pub fn chooser(&self) -> &ChooserController {
        &self.chooser
    }

    pub fn chooser_mut(&mut self) -> &mut ChooserController {
        &mut self.chooser
    }

    pub fn render(&self) -> FormLayout {
        let cells = Field::ALL
            .into_iter()
            .map(|field| FormCell {
                field,
                label: field.label(),
                value: self.data.get(field).to_string(),
                placeholder: self.config.placeholders.get(field).to_string(),
                editable: field.is_editable() && !self.read_only,
            })
            .collect();
        FormLayout {
            cells,
            show_choose_button: !self.read_only,
        }
    }

    /// Remember the field the user focused last; the chooser starts from it.
    pub fn focus(&mut self, field: Field) {
        self.active_field = Some(field);
    }

    /// Re-read the editable fields from the rendered view.
    ///
    /// Provenance comes from memory, never from the view. A missing element
    /// reads as `""`.
    pub fn save(&mut self, view: &dyn BlockView) -> Record {
        let mut record = Record {
            created_at: self.data.created_at.clone(),
            created_by: self.data.created_by.clone(),
            ..Record::default()
        };
        for field in Field::EDITABLE {
            record.set(field, view.field_markup(field).unwrap_or_default());
        }
        self.data = record.clone();
        record
    }

    /// Every record is accepted.
    pub fn validate(&self, _record: &Record) -> bool {
        true
    }

    /// Per-field sanitizer rules: only `<br>` survives.
    pub fn sanitize_config() -> Value {
        let mut rules = serde_json::Map::new();
        for field in Field::ALL {
            rules.insert(field.as_str().to_string(), json!({"br": true}));
        }
        Value::Object(rules)
    }

    pub fn tool_info() -> ToolInfo {
        TOOL_INFO
    }

    /// Open (or toggle) the chooser, seeded from the focused field.
    pub fn open_chooser(&mut self, view: &mut dyn BlockView) -> OpenOutcome {
        let _guard = self.span.enter();
        let active_text = match self.active_field {
            Some(field) if view.is_attached() => view.field_text(field),
            _ => None,
        };
        self.chooser
            .open(self.active_field, active_text.as_deref(), view)
    }

    /// Open the chooser and wait for its first query to land.
    pub async fn open_chooser_and_wait(&mut self, view: &mut dyn BlockView) -> Option<QueryCompletion> {
        let pending = match self.open_chooser(view) {
            OpenOutcome::Querying(pending) => pending,
            OpenOutcome::Unavailable | OpenOutcome::Toggled { .. } => return None,
        };
        let outcome = pending.run().instrument(self.span.clone()).await;
        Some(self.finish_query(outcome, view))
    }

    pub fn finish_query(&mut self, outcome: QueryOutcome, view: &mut dyn BlockView) -> QueryCompletion {
        let _guard = self.span.enter();
        self.chooser.complete(outcome, view)
    }

    /// Apply the chosen result row, replacing the whole record including
    /// provenance, and close the chooser.
    pub fn select_result(&mut self, index: usize, view: &mut dyn BlockView) -> Option<&Record> {
        let _guard = self.span.enter();
        let record = self.chooser.take_selection(index, view)?;
        debug!(row = index, sku = %record.sku, "applying chooser selection");
        self.data = record;
        if view.is_attached() {
            for field in Field::ALL {
                view.set_field_markup(field, self.data.get(field));
            }
        }
        Some(&self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_config_allows_br_everywhere() {
        let config = WarehouseBlock::sanitize_config();
        let obj = config.as_object().unwrap();
        assert_eq!(obj.len(), 10);
        assert!(obj.values().all(|rule| rule == &json!({"br": true})));
    }

    #[test]
    fn tool_info_flags() {
        let info = WarehouseBlock::tool_info();
        assert_eq!(info.title, "Warehouse");
        assert!(info.read_only_supported && info.contentless && info.enable_line_breaks);
    }

    #[test]
    fn read_only_render_has_no_editable_cells() {
        let block = WarehouseBlock::new(&json!({"sku": "X1"}), WidgetConfig::default(), true);
        let layout = block.render();
        assert!(!layout.show_choose_button);
        assert!(layout.cells.iter().all(|c| !c.editable));
        assert_eq!(layout.cells[7].field, Field::Sku);
        assert_eq!(layout.cells[7].value, "X1");
    }

    #[test]
    fn provenance_cells_are_never_editable() {
        let block = WarehouseBlock::new(&Value::Null, WidgetConfig::default(), false);
        let layout = block.render();
        assert!(layout.show_choose_button);
        for cell in &layout.cells {
            assert_eq!(cell.editable, cell.field.is_editable());
        }
    }

    #[test]
    fn validate_accepts_everything() {
        let block = WarehouseBlock::new(&Value::Null, WidgetConfig::default(), false);
        assert!(block.validate(&Record::default()));
    }
}
