//! Where-clause normalization.
//!
//! Callers hand a [`WhereInput`] — an equality mapping, a raw SQL string, or
//! a raw string with bound values — and [`normalize`] reduces it to one
//! canonical [`WhereFragment`]: SQL text whose `?` placeholders line up
//! left-to-right with its bound values.

use compact_str::{CompactString, format_compact};
use smallvec::{SmallVec, smallvec};

use crate::error::Result;
use crate::relation::Source;
use crate::types::cast;
use crate::value::Value;

/// A where-value at an equality position: a single scalar or a list that
/// becomes an `IN(...)` group. Decided when the caller builds the mapping,
/// never by runtime inspection.
#[derive(Debug, Clone, PartialEq)]
pub enum EqValue {
    Scalar(Value),
    List(Vec<Value>),
}

impl From<Value> for EqValue {
    fn from(value: Value) -> Self {
        EqValue::Scalar(value)
    }
}

impl From<Vec<Value>> for EqValue {
    fn from(values: Vec<Value>) -> Self {
        EqValue::List(values)
    }
}

macro_rules! eq_value_from {
    ($($t:ty),+ $(,)?) => {$(
        impl From<$t> for EqValue {
            fn from(value: $t) -> Self {
                EqValue::Scalar(value.into())
            }
        }

        impl From<Vec<$t>> for EqValue {
            fn from(values: Vec<$t>) -> Self {
                EqValue::List(values.into_iter().map(Value::from).collect())
            }
        }
    )+};
}

eq_value_from!(i64, i32, u32, f64, bool, String, &str);

/// The three caller-facing where shapes, resolved once at the call boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum WhereInput {
    /// Column→value(s) pairs, normalized in the given order.
    Equalities(Vec<(String, EqValue)>),
    /// A literal SQL condition with no bound values.
    RawSql(String),
    /// A literal SQL condition with positional bound values.
    RawSqlBound(String, Vec<Value>),
}

impl From<&str> for WhereInput {
    fn from(sql: &str) -> Self {
        WhereInput::RawSql(sql.to_string())
    }
}

impl From<String> for WhereInput {
    fn from(sql: String) -> Self {
        WhereInput::RawSql(sql)
    }
}

impl From<Vec<(String, EqValue)>> for WhereInput {
    fn from(pairs: Vec<(String, EqValue)>) -> Self {
        WhereInput::Equalities(pairs)
    }
}

macro_rules! raw_bound_from {
    ($($t:ty),+ $(,)?) => {$(
        impl From<(&str, $t)> for WhereInput {
            fn from((sql, value): (&str, $t)) -> Self {
                // A bare scalar wraps into a one-element sequence.
                WhereInput::RawSqlBound(sql.to_string(), vec![value.into()])
            }
        }

        impl From<(&str, Vec<$t>)> for WhereInput {
            fn from((sql, values): (&str, Vec<$t>)) -> Self {
                WhereInput::RawSqlBound(
                    sql.to_string(),
                    values.into_iter().map(Value::from).collect(),
                )
            }
        }
    )+};
}

raw_bound_from!(i64, i32, u32, f64, bool, String, &str, Value);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PieceKind {
    /// `<table>.<column> = ?`, exactly one bind.
    Equality,
    /// `<table>.<column> IN(?)`, the group expands to one placeholder per
    /// bind at compile time.
    InList,
    /// Caller-supplied SQL, passed through unchanged. Placeholder/value
    /// agreement is the caller's responsibility.
    Raw,
}

/// One condition inside a fragment. Pieces after the first carry an
/// `"AND "` prefix in their text.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Piece {
    pub(crate) text: CompactString,
    pub(crate) binds: SmallVec<[Value; 2]>,
    pub(crate) kind: PieceKind,
}

/// A canonical where fragment: SQL text plus the values bound to its
/// placeholders, in placeholder order.
///
/// One `r#where` call yields one fragment. An equality mapping with several
/// entries keeps them inside a single fragment, AND-joined in the mapping's
/// original order.
#[derive(Debug, Clone, PartialEq)]
pub struct WhereFragment {
    pub(crate) pieces: SmallVec<[Piece; 2]>,
}

impl WhereFragment {
    /// Canonical SQL text of this fragment. List groups render as their
    /// unexpanded `IN(?)` form; expansion happens at compile time.
    pub fn sql(&self) -> String {
        let mut buf = CompactString::default();
        for (i, piece) in self.pieces.iter().enumerate() {
            if i > 0 {
                buf.push_str(" \n");
            }
            buf.push_str(&piece.text);
        }
        buf.into()
    }

    /// References to this fragment's bound values, in placeholder order.
    pub fn binds(&self) -> Vec<&Value> {
        self.pieces.iter().flat_map(|p| p.binds.iter()).collect()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }
}

/// Reduces one caller-facing where shape to its canonical fragment.
///
/// Equality entries are cast through the source's field-type registry and
/// qualified with the quoted table name; raw shapes pass through unchanged.
pub fn normalize(source: &Source, input: WhereInput) -> Result<WhereFragment> {
    let fragment = match input {
        WhereInput::Equalities(pairs) => {
            let mut pieces = SmallVec::with_capacity(pairs.len());
            for (index, (column, value)) in pairs.into_iter().enumerate() {
                pieces.push(equality_piece(source, index, &column, value)?);
            }
            WhereFragment { pieces }
        }
        WhereInput::RawSql(sql) => WhereFragment {
            pieces: smallvec![Piece {
                text: CompactString::from(sql),
                binds: SmallVec::new(),
                kind: PieceKind::Raw,
            }],
        },
        WhereInput::RawSqlBound(sql, values) => WhereFragment {
            pieces: smallvec![Piece {
                text: CompactString::from(sql),
                binds: values.into_iter().collect(),
                kind: PieceKind::Raw,
            }],
        },
    };

    Ok(fragment)
}

fn equality_piece(source: &Source, index: usize, column: &str, value: EqValue) -> Result<Piece> {
    let qualified = format_compact!(
        "{}.{}",
        source.quoter().quote_tablename(source.table()),
        source.quoter().quote_column(column)
    );
    let prefix = if index > 0 { "AND " } else { "" };

    let piece = match value {
        EqValue::Scalar(value) => Piece {
            text: format_compact!("{prefix}{qualified} = ?"),
            binds: smallvec![cast_declared(source, column, value)?],
            kind: PieceKind::Equality,
        },
        EqValue::List(values) => {
            let binds = values
                .into_iter()
                .map(|value| cast_declared(source, column, value))
                .collect::<Result<SmallVec<[Value; 2]>>>()?;
            Piece {
                text: format_compact!("{prefix}{qualified} IN(?)"),
                binds,
                kind: PieceKind::InList,
            }
        }
    };

    Ok(piece)
}

/// Casts through the registry when the column is declared; undeclared
/// columns pass through uncast.
fn cast_declared(source: &Source, column: &str, value: Value) -> Result<Value> {
    match source.types().field_type(column) {
        Some(ty) => cast(column, value, ty),
        None => Ok(value),
    }
}
