#![allow(dead_code)]

use std::cell::RefCell;

use relatable::{DoubleQuote, ExecuteBridge, FieldType, Result, Row, Source, TableTypes, Value};

/// The `models` table every test queries against.
pub fn models_source() -> Source {
    let types = TableTypes::new()
        .with("id", FieldType::Integer)
        .with("name", FieldType::Text)
        .with("age", FieldType::Integer)
        .with("active", FieldType::Boolean);
    Source::new("models", types, DoubleQuote)
}

/// A bridge that records every submitted statement and answers with canned
/// rows, so tests can assert exactly what SQL an operation sends.
#[derive(Default)]
pub struct RecordingBridge {
    pub rows: Vec<Row>,
    pub calls: RefCell<Vec<(String, Vec<Value>)>>,
}

impl RecordingBridge {
    pub fn returning(rows: Vec<Row>) -> Self {
        RecordingBridge {
            rows,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn last_sql(&self) -> String {
        self.calls
            .borrow()
            .last()
            .map(|(sql, _)| sql.clone())
            .unwrap_or_default()
    }

    pub fn last_params(&self) -> Vec<Value> {
        self.calls
            .borrow()
            .last()
            .map(|(_, params)| params.clone())
            .unwrap_or_default()
    }
}

impl ExecuteBridge for RecordingBridge {
    fn execute_prepared(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>> {
        self.calls
            .borrow_mut()
            .push((sql.to_string(), params.to_vec()));
        Ok(self.rows.clone())
    }
}

/// Builds a row mapping from `(column, value)` pairs.
pub fn row(cells: &[(&str, Value)]) -> Row {
    cells
        .iter()
        .map(|(column, value)| (column.to_string(), value.clone()))
        .collect()
}
