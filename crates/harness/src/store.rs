use std::sync::Mutex;

use async_trait::async_trait;
use rusqlite::{params, Connection};
use thiserror::Error;
use warehouse_core::{
    QueryRequest, QueryResponse, QueryResultItem, Record, DEFAULT_QUERY_LIMIT, RECORD_TYPE,
};
use warehouse_widget::{QueryError, RecordQuery};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(String),
}

const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS blocks (
    container_id INTEGER NOT NULL,
    position_index INTEGER NOT NULL,
    record_type TEXT NOT NULL,
    data BLOB NOT NULL,
    PRIMARY KEY (container_id, position_index)
);

CREATE TABLE IF NOT EXISTS block_fields (
    container_id INTEGER NOT NULL,
    position_index INTEGER NOT NULL,
    field_key TEXT NOT NULL,
    value TEXT NOT NULL,
    PRIMARY KEY (container_id, position_index, field_key),
    FOREIGN KEY (container_id, position_index) REFERENCES blocks (container_id, position_index) ON DELETE CASCADE
);
CREATE INDEX IF NOT EXISTS idx_block_fields_value ON block_fields (field_key, value);
";

/// Saved blocks indexed for prefix search, standing in for the host's
/// backend.
pub struct SqliteRecordStore {
    conn: Mutex<Connection>,
}

impl SqliteRecordStore {
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Save a warehouse block at `(container_id, position_index)`,
    /// replacing whatever was there.
    pub fn put(&self, container_id: i64, position_index: i64, record: &Record) -> Result<(), StoreError> {
        let data = rmp_serde::to_vec_named(record)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let mut conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        let tx = conn.transaction()?;
        tx.execute(
            "DELETE FROM block_fields WHERE container_id = ?1 AND position_index = ?2",
            params![container_id, position_index],
        )?;
        tx.execute(
            "INSERT OR REPLACE INTO blocks (container_id, position_index, record_type, data) VALUES (?1, ?2, ?3, ?4)",
            params![container_id, position_index, RECORD_TYPE, data],
        )?;
        for (field, value) in record.iter() {
            tx.execute(
                "INSERT INTO block_fields (container_id, position_index, field_key, value) VALUES (?1, ?2, ?3, ?4)",
                params![container_id, position_index, field.as_str(), value],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Prefix match on one field. A missing field or empty prefix matches
    /// every block of the requested type.
    pub fn search(&self, request: &QueryRequest) -> Result<QueryResponse, StoreError> {
        let limit = i64::from(request.limit.unwrap_or(DEFAULT_QUERY_LIMIT));
        let prefix = request.q.as_deref().unwrap_or("");
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());

        let rows: Vec<(i64, i64, String, Vec<u8>)> = match request.field {
            Some(field) if !prefix.is_empty() => {
                let mut stmt = conn.prepare(
                    "SELECT b.container_id, b.position_index, b.record_type, b.data
                     FROM blocks b
                     JOIN block_fields f
                       ON f.container_id = b.container_id AND f.position_index = b.position_index
                     WHERE b.record_type = ?1 AND f.field_key = ?2
                       AND substr(f.value, 1, length(?3)) = ?3
                     ORDER BY b.container_id, b.position_index
                     LIMIT ?4",
                )?;
                let mapped = stmt.query_map(
                    params![request.record_type, field.as_str(), prefix, limit],
                    |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
                )?;
                mapped.collect::<Result<_, _>>()?
            }
            _ => {
                let mut stmt = conn.prepare(
                    "SELECT container_id, position_index, record_type, data
                     FROM blocks
                     WHERE record_type = ?1
                     ORDER BY container_id, position_index
                     LIMIT ?2",
                )?;
                let mapped = stmt.query_map(params![request.record_type, limit], |row| {
                    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
                })?;
                mapped.collect::<Result<_, _>>()?
            }
        };

        let mut items = Vec::with_capacity(rows.len());
        for (container_id, position_index, record_type, data) in rows {
            let data: Record = rmp_serde::from_slice(&data)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            items.push(QueryResultItem {
                record_type,
                container_id,
                position_index,
                data,
            });
        }
        Ok(QueryResponse { items })
    }
}

#[async_trait]
impl RecordQuery for SqliteRecordStore {
    async fn query_records(&self, request: QueryRequest) -> Result<QueryResponse, QueryError> {
        self.search(&request)
            .map_err(|e| QueryError::Rejected(e.to_string()))
    }
}
