//! The relation intermediate representation and its chainable builder.
//!
//! A [`Relation`] is an immutable description of one query: filters,
//! projection, ordering, paging, count flag. Every builder method takes
//! `&self` and returns a new value, so relations held earlier in a chain
//! never change underneath the caller and are safe to share across threads.

use std::fmt;
use std::sync::Arc;

use crate::bridge::{ExecuteBridge, Row};
use crate::error::{Error, Result};
use crate::fragment::{WhereFragment, WhereInput, normalize};
use crate::processor::{Statement, compile};
use crate::quote::IdentifierQuoter;
use crate::types::FieldTypes;
use crate::value::Value;

/// Sort direction for `ORDER BY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    /// The opposite direction. Taking the head of an inverted order is how
    /// `last` works without a reverse-scan primitive.
    pub const fn invert(self) -> Direction {
        match self {
            Direction::Asc => Direction::Desc,
            Direction::Desc => Direction::Asc,
        }
    }

    pub const fn as_sql(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// An `order` argument: a column alone, or a column with a direction.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSpec {
    pub column: String,
    pub direction: Option<Direction>,
}

impl From<&str> for OrderSpec {
    fn from(column: &str) -> Self {
        OrderSpec {
            column: column.to_string(),
            direction: None,
        }
    }
}

impl From<String> for OrderSpec {
    fn from(column: String) -> Self {
        OrderSpec {
            column,
            direction: None,
        }
    }
}

impl From<(&str, Direction)> for OrderSpec {
    fn from((column, direction): (&str, Direction)) -> Self {
        OrderSpec {
            column: column.to_string(),
            direction: Some(direction),
        }
    }
}

impl From<(String, Direction)> for OrderSpec {
    fn from((column, direction): (String, Direction)) -> Self {
        OrderSpec {
            column,
            direction: Some(direction),
        }
    }
}

/// Per-model configuration: the table identifier plus the two read-only
/// collaborators every relation needs — the field-type registry and the
/// identifier-quoting adapter.
///
/// Cloning is cheap; the collaborators are shared behind `Arc`.
#[derive(Clone)]
pub struct Source {
    table: Arc<str>,
    types: Arc<dyn FieldTypes>,
    quoter: Arc<dyn IdentifierQuoter>,
}

impl Source {
    pub fn new(
        table: impl Into<String>,
        types: impl FieldTypes + 'static,
        quoter: impl IdentifierQuoter + 'static,
    ) -> Self {
        Source {
            table: Arc::from(table.into()),
            types: Arc::new(types),
            quoter: Arc::new(quoter),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn types(&self) -> &dyn FieldTypes {
        self.types.as_ref()
    }

    pub fn quoter(&self) -> &dyn IdentifierQuoter {
        self.quoter.as_ref()
    }

    /// A fresh base relation over this source.
    pub fn relation(&self) -> Relation {
        Relation::scoped(self.clone())
    }

    /// Implicit-base-relation entry point: `source.r#where(..)` is
    /// `source.relation().r#where(..)`.
    pub fn r#where(&self, input: impl Into<WhereInput>) -> Result<Relation> {
        self.relation().r#where(input)
    }

    pub fn order(&self, spec: impl Into<OrderSpec>) -> Relation {
        self.relation().order(spec)
    }

    pub fn select(&self, column: impl Into<String>) -> Relation {
        self.relation().select(column)
    }

    pub fn limit(&self, n: u64) -> Relation {
        self.relation().limit(n)
    }

    pub fn offset(&self, n: u64) -> Relation {
        self.relation().offset(n)
    }

    pub fn count(&self) -> Relation {
        self.relation().count()
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Source").field("table", &self.table).finish()
    }
}

/// Immutable description of one query, compiled on demand by
/// [`crate::processor::compile`].
#[derive(Debug, Clone)]
pub struct Relation {
    source: Source,
    wheres: Vec<WhereFragment>,
    select: Option<String>,
    includes: Vec<String>,
    joins: Vec<String>,
    limit: Option<u64>,
    offset: Option<u64>,
    order_by: Option<String>,
    order_direction: Option<Direction>,
    count: bool,
}

impl Relation {
    /// Creates the base relation for a source. Nothing is filtered,
    /// projected, ordered, or paged yet.
    pub fn scoped(source: Source) -> Relation {
        Relation {
            source,
            wheres: Vec::new(),
            select: None,
            includes: Vec::new(),
            joins: Vec::new(),
            limit: None,
            offset: None,
            order_by: None,
            order_direction: None,
            count: false,
        }
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn table(&self) -> &str {
        self.source.table()
    }

    /// The canonical where fragments accumulated so far, in append order.
    /// Order is both AND-join order and bind flattening order.
    pub fn wheres(&self) -> &[WhereFragment] {
        &self.wheres
    }

    pub fn selected(&self) -> Option<&str> {
        self.select.as_deref()
    }

    pub fn included(&self) -> &[String] {
        &self.includes
    }

    pub fn joined(&self) -> &[String] {
        &self.joins
    }

    pub fn limit_value(&self) -> Option<u64> {
        self.limit
    }

    pub fn offset_value(&self) -> Option<u64> {
        self.offset
    }

    pub fn order_column(&self) -> Option<&str> {
        self.order_by.as_deref()
    }

    pub fn direction(&self) -> Option<Direction> {
        self.order_direction
    }

    pub fn is_count(&self) -> bool {
        self.count
    }

    /// Appends one normalized where fragment. Cast failures surface here,
    /// never at execution time. An empty equality mapping is a no-op.
    pub fn r#where(&self, input: impl Into<WhereInput>) -> Result<Relation> {
        let fragment = normalize(&self.source, input.into())?;
        let mut next = self.clone();
        if !fragment.is_empty() {
            next.wheres.push(fragment);
        }
        Ok(next)
    }

    /// Sets the ordering column; a bare column leaves any prior direction
    /// untouched, a `(column, direction)` pair sets both.
    pub fn order(&self, spec: impl Into<OrderSpec>) -> Relation {
        let spec = spec.into();
        let mut next = self.clone();
        next.order_by = Some(spec.column);
        if let Some(direction) = spec.direction {
            next.order_direction = Some(direction);
        }
        next
    }

    /// Overwrites the ordering direction only.
    pub fn order_direction(&self, direction: Direction) -> Relation {
        let mut next = self.clone();
        next.order_direction = Some(direction);
        next
    }

    pub fn limit(&self, n: u64) -> Relation {
        let mut next = self.clone();
        next.limit = Some(n);
        next
    }

    pub fn offset(&self, n: u64) -> Relation {
        let mut next = self.clone();
        next.offset = Some(n);
        next
    }

    /// Restricts the projection to a single column.
    pub fn select(&self, column: impl Into<String>) -> Relation {
        let mut next = self.clone();
        next.select = Some(column.into());
        next
    }

    /// Switches the relation to a count statement. Count results are
    /// order-independent, and some dialects reject ORDER BY on a count
    /// whose ordered column is absent from the select list, so any
    /// ordering is cleared.
    pub fn count(&self) -> Relation {
        let mut next = self.clone();
        next.count = true;
        next.order_by = None;
        next.order_direction = None;
        next
    }

    /// Appends an eager-load descriptor. Opaque here: stored and exposed,
    /// never compiled.
    pub fn includes(&self, descriptor: impl Into<String>) -> Relation {
        let mut next = self.clone();
        next.includes.push(descriptor.into());
        next
    }

    /// Appends a join descriptor. Opaque here: stored and exposed, never
    /// compiled.
    pub fn joins(&self, descriptor: impl Into<String>) -> Relation {
        let mut next = self.clone();
        next.joins.push(descriptor.into());
        next
    }

    /// Compiles this relation to a prepared statement and its bound values.
    pub fn compile(&self) -> Statement {
        compile(self)
    }

    /// Compiles and executes through the bridge, returning every row.
    pub fn all(&self, bridge: &dyn ExecuteBridge) -> Result<Vec<Row>> {
        let statement = self.compile();
        tracing::debug!(sql = %statement.sql, params = statement.params.len(), "executing relation");
        bridge.execute_prepared(&statement.sql, &statement.params)
    }

    /// The head row of this relation, or `None` when it matches nothing.
    pub fn first(&self, bridge: &dyn ExecuteBridge) -> Result<Option<Row>> {
        let rows = self.limit(1).all(bridge)?;
        Ok(rows.into_iter().next())
    }

    /// The tail row of this relation: invert the order direction, take the
    /// head of the limited result. Without an explicit direction the
    /// inversion falls back to descending on the natural order.
    pub fn last(&self, bridge: &dyn ExecuteBridge) -> Result<Option<Row>> {
        let inverted = self
            .order_direction
            .map_or(Direction::Desc, Direction::invert);
        let rows = self.order_direction(inverted).limit(1).all(bridge)?;
        Ok(rows.into_iter().next())
    }

    /// Executes this relation as a count statement and reads the single
    /// count cell.
    pub fn count_rows(&self, bridge: &dyn ExecuteBridge) -> Result<i64> {
        let rows = self.count().all(bridge)?;
        let cell = rows
            .first()
            .and_then(|row| row.values().next())
            .cloned()
            .ok_or_else(|| Error::Execution("count statement returned no rows".to_string()))?;
        match cell {
            Value::Integer(n) => Ok(n),
            other => Err(Error::Execution(format!(
                "count statement returned a non-integer cell: {other:?}"
            ))),
        }
    }
}
