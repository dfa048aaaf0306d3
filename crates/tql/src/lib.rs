//! # tql
//!
//! Injection-safe SQL templates.
//!
//! A template is a literal SQL skeleton with values interpolated between its
//! segments. tql turns it into SQL text with dialect-correct placeholders plus
//! an ordered parameter list. Interpolated values never become SQL text:
//! they are bound as parameters, or escaped as identifiers when explicitly
//! wrapped with [`identifier`]/[`identifiers`].
//!
//! ## Features
//!
//! - **Literal skeletons**: templates require `'static` segments, produced by
//!   [`template!`] at compile time
//! - **Composable**: [`fragment`]s nest inside queries and other fragments
//! - **Structured clauses**: [`values`] for INSERT, [`set`] for UPDATE,
//!   [`list`] for `IN (...)`
//! - **Dialects**: [`Postgres`], [`MySql`], [`Sqlite`], [`Snowflake`], or your
//!   own [`Dialect`]
//!
//! ## Cargo features
//!
//! - `macros` (default): [`template!`], [`query!`] and [`fragment!`]
//! - `tracing`: log every built query on target `tql.sql`. The logging tests
//!   need it: `cargo test -p tql --features tracing`
//!
//! ## Example
//!
//! ```ignore
//! use tql::{Tql, Postgres, values};
//!
//! let tql = Tql::new(Postgres);
//!
//! let user_id = 1234;
//! let q = tql::query!(tql, "SELECT * FROM users WHERE id = {user_id};")?;
//! // ("SELECT * FROM users WHERE id = $1;", [1234])
//!
//! let rows = serde_json::json!([
//!     {"name": "Alice", "age": 30},
//!     {"name": "Bob", "age": 40},
//! ]);
//! let q = tql::query!(tql, "INSERT INTO users {}", values(&rows)?)?;
//! // (r#"INSERT INTO users ("name", "age") VALUES ($1, $2), ($3, $4)"#,
//! //  ["Alice", 30, "Bob", 40])
//!
//! let active = tql::fragment!("status = {}", "active")?;
//! let q = tql::query!(tql, "SELECT * FROM users WHERE {active} LIMIT {}", 10)?;
//! // ("SELECT * FROM users WHERE status = $1 LIMIT $2", ["active", 10])
//! # Ok::<(), tql::TqlError>(())
//! ```

extern crate self as tql;

pub mod build;
pub mod builder;
pub mod compiler;
pub mod config;
pub mod dialect;
pub mod error;
pub mod node;
pub mod template;
mod value;

#[cfg(feature = "tracing")]
mod trace;

pub use builder::{CompiledQuery, QueryBuilder};
pub use compiler::Tql;
pub use config::TqlConfig;
pub use dialect::{Dialect, MySql, Postgres, Snowflake, Sqlite};
pub use error::{TqlError, TqlResult};
pub use node::{
    Fragment, Node, Query, Record, Values, identifier, identifiers, list, set, unsafe_raw, values,
};
pub use template::{Arg, Template, fragment, join, param};

/// Split a string literal into a [`Template`] at compile time.
///
/// Holes are written `{}` (filled from the arguments, in order) or `{name}`
/// (captures the variable `name`). `{{` and `}}` are literal braces.
///
/// ```ignore
/// let t = tql::template!("SELECT * FROM users WHERE id = {} AND org = {org_id}", user_id);
/// ```
#[cfg(feature = "macros")]
pub use tql_macros::template;

/// Build a query with a [`Tql`] instance from a template literal.
///
/// `query!(tql, "...", args...)` is `tql.query(template!("...", args...))`.
#[cfg(feature = "macros")]
#[macro_export]
macro_rules! query {
    ($tql:expr, $($template:tt)+) => {
        $tql.query($crate::template!($($template)+))
    };
}

/// Build a [`Fragment`] from a template literal.
///
/// `fragment!("...", args...)` is `fragment(template!("...", args...))`.
#[cfg(feature = "macros")]
#[macro_export]
macro_rules! fragment {
    ($($template:tt)+) => {
        $crate::fragment($crate::template!($($template)+))
    };
}
