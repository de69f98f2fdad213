//! The relation processor: a pure function from a [`Relation`] to one
//! prepared-statement string plus its bound values in placeholder order.
//!
//! Compiling the same relation twice — or concurrently — produces identical
//! output; nothing here touches shared mutable state or performs I/O.

use std::fmt;

use compact_str::CompactString;

use crate::fragment::{Piece, PieceKind, WhereFragment};
use crate::relation::{Direction, Relation};
use crate::value::Value;

/// A compiled statement: SQL with `?` placeholders and the values bound to
/// them, left-to-right.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, r#"sql: "{}", params: {:?}"#, self.sql, self.params)
    }
}

/// Assembles a relation into a single statement.
///
/// Statement shape: count flag ⇒ `SELECT COUNT(*)` ignoring any projection;
/// otherwise the projected column or `*`. Where fragments are AND-joined in
/// stored order, `IN(?)` groups expand to one placeholder per value, and
/// every fragment's values flatten into `params` in fragment order.
pub fn compile(relation: &Relation) -> Statement {
    let quoter = relation.source().quoter();
    let table = quoter.quote_tablename(relation.table());

    let mut sql = CompactString::with_capacity(64);
    if relation.is_count() {
        sql.push_str("SELECT COUNT(*)");
    } else if let Some(column) = relation.selected() {
        sql.push_str("SELECT ");
        sql.push_str(&table);
        sql.push('.');
        sql.push_str(&quoter.quote_column(column));
    } else {
        sql.push_str("SELECT *");
    }

    sql.push_str(" FROM ");
    sql.push_str(&table);

    let mut params = Vec::new();
    if !relation.wheres().is_empty() {
        sql.push_str(" WHERE ");
        for (i, fragment) in relation.wheres().iter().enumerate() {
            if i > 0 {
                sql.push_str(" \nAND ");
            }
            write_fragment(&mut sql, fragment);
            params.extend(fragment.binds().into_iter().cloned());
        }
    }

    if let Some(column) = relation.order_column() {
        sql.push_str(" ORDER BY ");
        sql.push_str(&table);
        sql.push('.');
        sql.push_str(&quoter.quote_column(column));
        sql.push(' ');
        sql.push_str(relation.direction().unwrap_or(Direction::Asc).as_sql());
    }

    if let Some(limit) = relation.limit_value() {
        sql.push_str(" LIMIT ");
        sql.push_str(&limit.to_string());
    }
    if let Some(offset) = relation.offset_value() {
        sql.push_str(" OFFSET ");
        sql.push_str(&offset.to_string());
    }

    let statement = Statement {
        sql: sql.into(),
        params,
    };
    tracing::debug!(sql = %statement.sql, params = statement.params.len(), "compiled relation");
    statement
}

fn write_fragment(buf: &mut CompactString, fragment: &WhereFragment) {
    for (i, piece) in fragment.pieces.iter().enumerate() {
        if i > 0 {
            buf.push_str(" \n");
        }
        write_piece(buf, piece);
    }
}

/// Renders one piece, expanding `IN(?)` groups to their bind count. For
/// normalizer-generated pieces the rendered placeholder count must equal the
/// bind count; a mismatch is a compiler bug and aborts, it is never a user
/// input error. Raw pieces are exempt — their mismatches belong to the
/// execution bridge.
fn write_piece(buf: &mut CompactString, piece: &Piece) {
    let start = buf.len();
    match piece.kind {
        PieceKind::InList => {
            let base = piece
                .text
                .strip_suffix("IN(?)")
                .expect("IN-list piece must end with its placeholder group");
            buf.push_str(base);
            buf.push_str("IN(");
            for i in 0..piece.binds.len() {
                if i > 0 {
                    buf.push_str(", ");
                }
                buf.push('?');
            }
            buf.push(')');
        }
        PieceKind::Equality | PieceKind::Raw => buf.push_str(&piece.text),
    }

    if piece.kind != PieceKind::Raw {
        let placeholders = buf.as_str()[start..].matches('?').count();
        assert_eq!(
            placeholders,
            piece.binds.len(),
            "compiled placeholder count diverged from bound values in generated fragment {:?}",
            piece.text
        );
    }
}
