//! Declared field types and the value casting they drive.
//!
//! A [`FieldTypes`] registry answers "what is this column stored as"; incoming
//! where-values are cast to that type before they are bound. Columns the
//! registry does not know pass through uncast.

use std::fmt;

use hashbrown::HashMap;

use crate::error::{Error, Result};
use crate::value::Value;

/// Declared storage type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Integer,
    Real,
    Text,
    Boolean,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::Integer => "integer",
            FieldType::Real => "real",
            FieldType::Text => "text",
            FieldType::Boolean => "boolean",
        };
        f.write_str(name)
    }
}

/// Lookup of declared column types.
///
/// Implementations must be deterministic and safe for concurrent reads;
/// returning `None` means the column is undeclared and its values pass
/// through uncast.
pub trait FieldTypes: Send + Sync {
    fn field_type(&self, column: &str) -> Option<FieldType>;
}

/// Map-backed [`FieldTypes`] implementation for a single table.
#[derive(Debug, Clone, Default)]
pub struct TableTypes {
    fields: HashMap<String, FieldType>,
}

impl TableTypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a column, replacing any previous declaration.
    pub fn with(mut self, column: impl Into<String>, ty: FieldType) -> Self {
        self.fields.insert(column.into(), ty);
        self
    }
}

impl FieldTypes for TableTypes {
    fn field_type(&self, column: &str) -> Option<FieldType> {
        self.fields.get(column).copied()
    }
}

/// Casts a where-value to the declared type of its column.
///
/// `Null` passes through for every type. Booleans normalize to
/// `Integer(0 | 1)`.
pub fn cast(column: &str, value: Value, ty: FieldType) -> Result<Value> {
    if value.is_null() {
        return Ok(value);
    }

    let cast_error = |value: Value| Error::Cast {
        column: column.to_string(),
        ty,
        value,
    };

    match ty {
        FieldType::Integer => match value {
            Value::Integer(_) => Ok(value),
            Value::Text(ref s) => match s.trim().parse::<i64>() {
                Ok(i) => Ok(Value::Integer(i)),
                Err(_) => Err(cast_error(value)),
            },
            Value::Real(r) if r.fract() == 0.0 && r.abs() < (i64::MAX as f64) => {
                Ok(Value::Integer(r as i64))
            }
            other => Err(cast_error(other)),
        },
        FieldType::Real => match value {
            Value::Real(_) => Ok(value),
            Value::Integer(i) => Ok(Value::Real(i as f64)),
            Value::Text(ref s) => match s.trim().parse::<f64>() {
                Ok(r) => Ok(Value::Real(r)),
                Err(_) => Err(cast_error(value)),
            },
            other => Err(cast_error(other)),
        },
        FieldType::Text => match value {
            Value::Text(_) => Ok(value),
            Value::Integer(i) => Ok(Value::Text(i.to_string())),
            Value::Real(r) => Ok(Value::Text(r.to_string())),
            other => Err(cast_error(other)),
        },
        FieldType::Boolean => match value {
            Value::Integer(0) | Value::Integer(1) => Ok(value),
            Value::Text(ref s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "t" | "1" => Ok(Value::Integer(1)),
                "false" | "f" | "0" => Ok(Value::Integer(0)),
                _ => Err(cast_error(value)),
            },
            other => Err(cast_error(other)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_accepts_numeric_text() {
        assert_eq!(
            cast("age", Value::Text("26".into()), FieldType::Integer).unwrap(),
            Value::Integer(26)
        );
    }

    #[test]
    fn integer_rejects_fractional_real() {
        assert!(cast("age", Value::Real(1.5), FieldType::Integer).is_err());
    }

    #[test]
    fn boolean_normalizes_text_spellings() {
        for (text, expected) in [("true", 1), ("T", 1), ("0", 0), ("False", 0)] {
            assert_eq!(
                cast("active", Value::Text(text.into()), FieldType::Boolean).unwrap(),
                Value::Integer(expected)
            );
        }
    }

    #[test]
    fn boolean_rejects_out_of_range_integer() {
        let err = cast("active", Value::Integer(2), FieldType::Boolean).unwrap_err();
        assert!(matches!(err, Error::Cast { .. }));
    }

    #[test]
    fn null_passes_through_every_type() {
        for ty in [
            FieldType::Integer,
            FieldType::Real,
            FieldType::Text,
            FieldType::Boolean,
        ] {
            assert_eq!(cast("col", Value::Null, ty).unwrap(), Value::Null);
        }
    }
}
