//! Identifier quoting, delegated to the adapter so the compiler never
//! hardcodes quote characters.

/// Dialect-specific escaping of table and column identifiers.
///
/// Implementations must be pure lookups, safe for concurrent use.
pub trait IdentifierQuoter: Send + Sync {
    fn quote_column(&self, name: &str) -> String;
    fn quote_tablename(&self, name: &str) -> String;
}

/// ANSI double-quote style: `"name"`, embedded quotes doubled.
#[derive(Debug, Clone, Copy, Default)]
pub struct DoubleQuote;

impl IdentifierQuoter for DoubleQuote {
    fn quote_column(&self, name: &str) -> String {
        format!("\"{}\"", name.replace('"', "\"\""))
    }

    fn quote_tablename(&self, name: &str) -> String {
        self.quote_column(name)
    }
}

/// MySQL backtick style: `` `name` ``, embedded backticks doubled.
#[derive(Debug, Clone, Copy, Default)]
pub struct Backtick;

impl IdentifierQuoter for Backtick {
    fn quote_column(&self, name: &str) -> String {
        format!("`{}`", name.replace('`', "``"))
    }

    fn quote_tablename(&self, name: &str) -> String {
        self.quote_column(name)
    }
}
