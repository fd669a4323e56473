use std::collections::BTreeMap;

use warehouse_core::{Field, Record};
use warehouse_widget::{BlockView, FormLayout};

/// In-memory stand-in for a rendered block.
#[derive(Debug, Clone, Default)]
pub struct TestView {
    attached: bool,
    fields: BTreeMap<Field, String>,
    chooser_visible: bool,
    rows: Vec<Record>,
    row_renders: usize,
}

impl TestView {
    /// Draw every cell of `layout`.
    pub fn render(layout: &FormLayout) -> Self {
        let fields = layout
            .cells
            .iter()
            .map(|cell| (cell.field, cell.value.clone()))
            .collect();
        Self {
            attached: true,
            fields,
            ..Self::default()
        }
    }

    /// Replace a field's content the way a user edit would.
    pub fn type_markup(&mut self, field: Field, markup: &str) {
        if let Some(value) = self.fields.get_mut(&field) {
            *value = markup.to_string();
        }
    }

    pub fn remove_field(&mut self, field: Field) {
        self.fields.remove(&field);
    }

    /// Take the block out of the document.
    pub fn detach(&mut self) {
        self.attached = false;
    }

    pub fn markup(&self, field: Field) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    pub fn chooser_visible(&self) -> bool {
        self.chooser_visible
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn row_renders(&self) -> usize {
        self.row_renders
    }
}

fn markup_to_text(markup: &str) -> String {
    markup
        .replace("<br/>", "\n")
        .replace("<br />", "\n")
        .replace("<br>", "\n")
}

impl BlockView for TestView {
    fn is_attached(&self) -> bool {
        self.attached
    }

    fn field_markup(&self, field: Field) -> Option<String> {
        self.fields.get(&field).cloned()
    }

    fn field_text(&self, field: Field) -> Option<String> {
        self.fields.get(&field).map(|m| markup_to_text(m))
    }

    fn set_field_markup(&mut self, field: Field, markup: &str) -> bool {
        assert!(self.attached, "write to detached view");
        match self.fields.get_mut(&field) {
            Some(value) => {
                *value = markup.to_string();
                true
            }
            None => false,
        }
    }

    fn set_chooser_visible(&mut self, visible: bool) -> bool {
        assert!(self.attached, "write to detached view");
        self.chooser_visible = visible;
        true
    }

    fn render_chooser_rows(&mut self, rows: &[Record]) -> bool {
        assert!(self.attached, "write to detached view");
        self.rows = rows.to_vec();
        self.row_renders += 1;
        true
    }
}
