use serde_json::{Map, Value};
use tracing::debug;

use crate::field::Field;
use crate::record::Record;

/// How one canonical field is read out of persisted data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMapping {
    pub field: Field,
    pub primary: &'static str,
    pub fallback: Option<&'static str>,
    pub default: &'static str,
}

const fn mapping(field: Field, primary: &'static str) -> FieldMapping {
    FieldMapping {
        field,
        primary,
        fallback: None,
        default: "",
    }
}

/// Editable fields, in canonical order. A new schema version adds aliases
/// here rather than branches in `reconcile`.
pub const FIELD_MAPPINGS: [FieldMapping; 8] = [
    mapping(Field::LibraryName, "libraryName"),
    mapping(Field::Category, "category"),
    mapping(Field::Name, "name"),
    FieldMapping {
        field: Field::UnitPriceWithTax,
        primary: "unitPriceWithTax",
        fallback: Some("unitPrice"),
        default: "",
    },
    mapping(Field::Quantity, "quantity"),
    mapping(Field::TaxRate, "taxRate"),
    mapping(Field::Supplier, "supplier"),
    mapping(Field::Sku, "sku"),
];

/// Keys only the five-field legacy shape uses.
const LEGACY_ONLY_KEYS: [&str; 1] = ["unitPrice"];

/// Keys only the ten-field shape uses.
const CURRENT_ONLY_KEYS: [&str; 6] = [
    "libraryName",
    "category",
    "unitPriceWithTax",
    "taxRate",
    "createdAt",
    "createdBy",
];

/// Shared keys both shapes carry.
const SHARED_KEYS: [&str; 4] = ["sku", "name", "quantity", "supplier"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaVersion {
    Current,
    Legacy,
    Unknown,
}

impl SchemaVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::Legacy => "legacy",
            Self::Unknown => "unknown",
        }
    }

    fn detect(obj: &Map<String, Value>) -> Self {
        let has = |key: &&str| obj.contains_key(*key);
        if CURRENT_ONLY_KEYS.iter().any(has) {
            Self::Current
        } else if LEGACY_ONLY_KEYS.iter().any(has) || SHARED_KEYS.iter().any(has) {
            Self::Legacy
        } else {
            Self::Unknown
        }
    }
}

/// Output of `reconcile`: editable fields are complete, provenance is only
/// present when the persisted data carried it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    pub record: Record,
    pub created_at: Option<String>,
    pub created_by: Option<String>,
    pub schema: SchemaVersion,
}

impl Reconciled {
    /// Complete the record with resolved provenance values.
    pub fn into_record(self, created_at: String, created_by: String) -> Record {
        let mut record = self.record;
        record.created_at = created_at;
        record.created_by = created_by;
        record
    }
}

fn string_at<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    obj.get(key).and_then(Value::as_str)
}

/// Map arbitrary persisted block data onto the canonical record.
///
/// Never fails: anything that is not an object, and any value that is not a
/// string, reads as absent.
pub fn reconcile(raw: &Value) -> Reconciled {
    let Some(obj) = raw.as_object() else {
        debug!(kind = json_kind(raw), "block data is not an object, starting empty");
        return Reconciled {
            record: Record::default(),
            created_at: None,
            created_by: None,
            schema: SchemaVersion::Unknown,
        };
    };

    let mut record = Record::default();
    for m in &FIELD_MAPPINGS {
        let value = string_at(obj, m.primary)
            .or_else(|| m.fallback.and_then(|alias| string_at(obj, alias)))
            .unwrap_or(m.default);
        record.set(m.field, value);
    }

    let schema = SchemaVersion::detect(obj);
    debug!(schema = schema.as_str(), "reconciled block data");

    Reconciled {
        record,
        created_at: string_at(obj, Field::CreatedAt.as_str()).map(str::to_string),
        created_by: string_at(obj, Field::CreatedBy.as_str()).map(str::to_string),
        schema,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn legacy_unit_price_fills_unit_price_with_tax() {
        let out = reconcile(&json!({
            "sku": "X1",
            "name": "Widget",
            "unitPrice": "9.99",
            "quantity": "3",
            "supplier": "Acme",
        }));
        assert_eq!(out.schema, SchemaVersion::Legacy);
        assert_eq!(out.record.unit_price_with_tax, "9.99");
        assert_eq!(out.record.sku, "X1");
        assert_eq!(out.record.name, "Widget");
        assert_eq!(out.record.quantity, "3");
        assert_eq!(out.record.supplier, "Acme");
        assert_eq!(out.record.library_name, "");
        assert_eq!(out.record.category, "");
        assert_eq!(out.record.tax_rate, "");
        assert_eq!(out.created_at, None);
        assert_eq!(out.created_by, None);
    }

    #[test]
    fn new_field_wins_over_legacy_alias() {
        let out = reconcile(&json!({"unitPriceWithTax": "11.30", "unitPrice": "10.00"}));
        assert_eq!(out.record.unit_price_with_tax, "11.30");
        assert_eq!(out.schema, SchemaVersion::Current);
    }

    #[test]
    fn empty_new_field_still_wins() {
        let out = reconcile(&json!({"unitPriceWithTax": "", "unitPrice": "10.00"}));
        assert_eq!(out.record.unit_price_with_tax, "");
    }

    #[test]
    fn non_string_primary_falls_back_to_alias() {
        let out = reconcile(&json!({"unitPriceWithTax": 12, "unitPrice": "10.00"}));
        assert_eq!(out.record.unit_price_with_tax, "10.00");
    }

    #[test]
    fn non_string_values_read_as_empty() {
        let out = reconcile(&json!({"sku": 42, "name": null, "createdAt": 1700000000}));
        assert_eq!(out.record.sku, "");
        assert_eq!(out.record.name, "");
        assert_eq!(out.created_at, None);
    }

    #[test]
    fn provenance_passes_through_verbatim() {
        let out = reconcile(&json!({"createdAt": "2023-01-01 00:00:00", "createdBy": ""}));
        assert_eq!(out.created_at.as_deref(), Some("2023-01-01 00:00:00"));
        assert_eq!(out.created_by.as_deref(), Some(""));
    }

    #[test]
    fn non_object_inputs_degrade_to_empty() {
        for raw in [json!(null), json!([1, 2]), json!("sku"), json!(3.5), json!(true)] {
            let out = reconcile(&raw);
            assert_eq!(out.record, Record::default());
            assert_eq!(out.schema, SchemaVersion::Unknown);
        }
    }

    #[test]
    fn unrelated_object_is_unknown_schema() {
        let out = reconcile(&json!({"text": "hello"}));
        assert_eq!(out.schema, SchemaVersion::Unknown);
        assert_eq!(out.record, Record::default());
    }

    #[test]
    fn into_record_sets_provenance() {
        let out = reconcile(&json!({"sku": "A"}));
        let record = out.into_record("2024-01-01 10:00:00".into(), "alice".into());
        assert_eq!(record.sku, "A");
        assert_eq!(record.created_at, "2024-01-01 10:00:00");
        assert_eq!(record.created_by, "alice");
    }

    #[test]
    fn line_breaks_are_kept() {
        let out = reconcile(&json!({"name": "Bolt<br>M8"}));
        assert_eq!(out.record.name, "Bolt<br>M8");
    }
}
