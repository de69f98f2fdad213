//! Relatable: immutable relation values compiled to parameterized SQL.
//!
//! Callers describe a query through a chain of pure transformations —
//! filter, order, limit, offset, project, count — on an immutable
//! [`Relation`], then compile it into one prepared-statement string plus its
//! bound values, ready for any prepared-statement driver.
//!
//! ```
//! use relatable::{DoubleQuote, FieldType, Source, TableTypes, equalities};
//!
//! let types = TableTypes::new()
//!     .with("name", FieldType::Text)
//!     .with("age", FieldType::Integer);
//! let users = Source::new("users", types, DoubleQuote);
//!
//! let statement = users
//!     .r#where(equalities! { name: "chris", age: 26 })?
//!     .order("age")
//!     .limit(10)
//!     .compile();
//!
//! assert_eq!(
//!     statement.sql,
//!     "SELECT * FROM \"users\" WHERE \"users\".\"name\" = ? \nAND \"users\".\"age\" = ? ORDER BY \"users\".\"age\" ASC LIMIT 10"
//! );
//! # Ok::<(), relatable::Error>(())
//! ```

pub mod bridge;
pub mod drivers;
pub mod error;
pub mod fragment;
pub mod processor;
pub mod quote;
pub mod relation;
pub mod types;
pub mod value;

// Re-export key types and traits
pub use bridge::{ExecuteBridge, Row};
pub use error::{Error, Result};
pub use fragment::{EqValue, WhereFragment, WhereInput, normalize};
pub use processor::{Statement, compile};
pub use quote::{Backtick, DoubleQuote, IdentifierQuoter};
pub use relation::{Direction, OrderSpec, Relation, Source};
pub use types::{FieldType, FieldTypes, TableTypes, cast};
pub use value::Value;

/// Builds an equality-shape where input from `column: value` pairs, kept in
/// the order written.
///
/// A `Vec` value becomes an `IN(...)` group; anything else is a scalar
/// equality.
///
/// # Examples
///
/// ```
/// use relatable::equalities;
///
/// let filters = equalities! { name: "chris", age: 26 };
/// let lists = equalities! { active: vec![true, false] };
/// ```
#[macro_export]
macro_rules! equalities {
    { $($column:ident: $value:expr),+ $(,)? } => {
        $crate::WhereInput::Equalities(::std::vec![
            $(
                (
                    ::std::string::String::from(stringify!($column)),
                    $crate::EqValue::from($value),
                )
            ),+
        ])
    };
}
