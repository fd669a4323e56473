use serde::{Deserialize, Serialize};

use crate::field::Field;
use crate::record::Record;

/// Record type tag the host store indexes warehouse blocks under.
pub const RECORD_TYPE: &str = "warehouse";

pub const DEFAULT_QUERY_LIMIT: u32 = 200;

/// Search request handed to the host's record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    #[serde(rename = "type")]
    pub record_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<Field>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl QueryRequest {
    /// Prefix search over one field, the way the chooser issues it.
    pub fn prefix(field: Field, prefix: impl Into<String>) -> Self {
        Self {
            record_type: RECORD_TYPE.to_string(),
            field: Some(field),
            q: Some(prefix.into()),
            limit: Some(DEFAULT_QUERY_LIMIT),
        }
    }
}

/// One stored block matching a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResultItem {
    #[serde(rename = "type", alias = "recordType")]
    pub record_type: String,
    #[serde(rename = "note_id", alias = "containerId")]
    pub container_id: i64,
    #[serde(rename = "block_index", alias = "positionIndex")]
    pub position_index: i64,
    #[serde(default)]
    pub data: Record,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub items: Vec<QueryResultItem>,
}

impl QueryResponse {
    pub fn into_records(self) -> Vec<Record> {
        self.items.into_iter().map(|item| item.data).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prefix_request_wire_shape() {
        let req = QueryRequest::prefix(Field::Sku, "AB12");
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"type": "warehouse", "field": "sku", "q": "AB12", "limit": 200})
        );
    }

    #[test]
    fn response_accepts_host_wire_names() {
        let resp: QueryResponse = serde_json::from_value(json!({
            "items": [
                {"type": "warehouse", "note_id": 7, "block_index": 2, "data": {"sku": "X1"}},
                {"recordType": "warehouse", "containerId": 8, "positionIndex": 0},
            ]
        }))
        .unwrap();
        assert_eq!(resp.items.len(), 2);
        assert_eq!(resp.items[0].container_id, 7);
        assert_eq!(resp.items[0].data.sku, "X1");
        assert_eq!(resp.items[1].position_index, 0);
        assert_eq!(resp.items[1].data, Record::default());
    }

    #[test]
    fn missing_items_is_empty_response() {
        let resp: QueryResponse = serde_json::from_value(json!({})).unwrap();
        assert!(resp.into_records().is_empty());
    }
}
