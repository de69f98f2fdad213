//! Database driver implementations of the execution bridge.

#[cfg(feature = "rusqlite")]
use hashbrown::HashMap;

#[cfg(feature = "rusqlite")]
use crate::bridge::{ExecuteBridge, Row};
#[cfg(feature = "rusqlite")]
use crate::error::Result;
#[cfg(feature = "rusqlite")]
use crate::value::Value;

//------------------------------------------------------------------------------
// rusqlite implementations
//------------------------------------------------------------------------------

#[cfg(feature = "rusqlite")]
impl ::rusqlite::ToSql for Value {
    fn to_sql(&self) -> ::rusqlite::Result<::rusqlite::types::ToSqlOutput<'_>> {
        match self {
            Value::Null => Ok(::rusqlite::types::ToSqlOutput::Owned(
                ::rusqlite::types::Value::Null,
            )),
            Value::Integer(i) => Ok(::rusqlite::types::ToSqlOutput::Owned(
                ::rusqlite::types::Value::Integer(*i),
            )),
            Value::Real(r) => Ok(::rusqlite::types::ToSqlOutput::Owned(
                ::rusqlite::types::Value::Real(*r),
            )),
            Value::Text(s) => Ok(::rusqlite::types::ToSqlOutput::Borrowed(
                ::rusqlite::types::ValueRef::Text(s.as_bytes()),
            )),
            Value::Blob(b) => Ok(::rusqlite::types::ToSqlOutput::Borrowed(
                ::rusqlite::types::ValueRef::Blob(b.as_slice()),
            )),
        }
    }
}

#[cfg(feature = "rusqlite")]
impl From<::rusqlite::types::ValueRef<'_>> for Value {
    fn from(value: ::rusqlite::types::ValueRef<'_>) -> Self {
        match value {
            ::rusqlite::types::ValueRef::Null => Value::Null,
            ::rusqlite::types::ValueRef::Integer(i) => Value::Integer(i),
            ::rusqlite::types::ValueRef::Real(r) => Value::Real(r),
            ::rusqlite::types::ValueRef::Text(bytes) => {
                Value::Text(String::from_utf8_lossy(bytes).into_owned())
            }
            ::rusqlite::types::ValueRef::Blob(bytes) => Value::Blob(bytes.to_vec()),
        }
    }
}

#[cfg(feature = "rusqlite")]
impl ExecuteBridge for ::rusqlite::Connection {
    fn execute_prepared(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>> {
        let mut statement = self.prepare(sql)?;
        let columns: Vec<String> = statement
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();

        let mut rows = statement.query(::rusqlite::params_from_iter(params.iter()))?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut mapped: Row = HashMap::with_capacity(columns.len());
            for (index, column) in columns.iter().enumerate() {
                mapped.insert(column.clone(), Value::from(row.get_ref(index)?));
            }
            out.push(mapped);
        }
        Ok(out)
    }
}
