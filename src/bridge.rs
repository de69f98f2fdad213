//! The execution bridge boundary.
//!
//! The core compiles relations; something else runs them. A bridge takes a
//! compiled statement and its bound values and returns raw rows. Connection
//! lifecycle, retries, timeouts, and cancellation all live on the far side
//! of this trait.

use hashbrown::HashMap;

use crate::error::Result;
use crate::value::Value;

/// A raw result row: column name → value.
pub type Row = HashMap<String, Value>;

/// Executes one compiled statement against a datastore.
pub trait ExecuteBridge {
    /// Runs `sql` with `params` bound to its placeholders in order and
    /// returns the matching rows. Errors are opaque to the core and are
    /// forwarded to the caller uninterpreted.
    fn execute_prepared(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>>;
}
