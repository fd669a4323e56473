use warehouse_core::{Field, Record};

/// The rendered form and its chooser overlay, as owned by the host.
///
/// A view can outlive the block it was rendered for, and a block can outlive
/// its view. Writers check `is_attached` first; element-level writes return
/// `false` when the element no longer exists.
pub trait BlockView {
    fn is_attached(&self) -> bool;

    /// Stored markup of a field's value element (plain text plus `<br>`).
    fn field_markup(&self, field: Field) -> Option<String>;

    /// Visible text of a field's value element.
    fn field_text(&self, field: Field) -> Option<String>;

    fn set_field_markup(&mut self, field: Field, markup: &str) -> bool;

    fn set_chooser_visible(&mut self, visible: bool) -> bool;

    /// Replace every row of the chooser's result table.
    fn render_chooser_rows(&mut self, rows: &[Record]) -> bool;
}
