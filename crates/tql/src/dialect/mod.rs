//! Dialects: per-target renderers for the node model.
//!
//! A [`Dialect`] has one method per node kind plus `preprocess`/`postprocess`
//! hooks. Each node method consumes one node and writes into the
//! [`QueryBuilder`]. The escaping and record-shape rules shared between
//! dialects live in [`common`] as free functions, so a new dialect is mostly a
//! choice of placeholder style and identifier escaping.
//!
//! | Dialect | Placeholder | Identifiers |
//! |---|---|---|
//! | [`Postgres`] | `$1, $2, ...` | `"a"."b"` |
//! | [`Sqlite`] | `?` | `"a"."b"` |
//! | [`MySql`] | `?` | `` `ab` `` (dots stripped) |
//! | [`Snowflake`] | `:1, :2, ...` | `IDENTIFIER(:1)` (bound) |

pub mod common;
mod quoted;
mod snowflake;

pub use common::PlaceholderStyle;
pub use quoted::{MySql, Postgres, Sqlite};
pub use snowflake::Snowflake;

use crate::builder::{CompiledQuery, QueryBuilder};
use crate::error::TqlResult;
use crate::node::{Query, Record, Values};
use serde_json::Value;

/// A target-system renderer.
pub trait Dialect {
    /// Stable name, used in logs.
    fn name(&self) -> &'static str;

    /// Rewrite the tree before it is built. Identity by default.
    fn preprocess(&self, query: Query) -> Query {
        query
    }

    /// Literal text: appended verbatim.
    fn template_string(&self, out: &mut QueryBuilder, text: &str) -> TqlResult<()> {
        out.append_text(text);
        Ok(())
    }

    /// A bound value: pushed to the params, placeholder appended to the text.
    fn parameter(&self, out: &mut QueryBuilder, value: &Value) -> TqlResult<()>;

    /// A single identifier.
    ///
    /// Dialects without a dedicated renderer for single identifiers can rely
    /// on this default, which renders it as a one-element
    /// [`identifiers`](Self::identifiers).
    fn identifier(&self, out: &mut QueryBuilder, name: &str) -> TqlResult<()> {
        self.identifiers(out, &[name.to_owned()])
    }

    /// Several identifiers, comma-separated.
    fn identifiers(&self, out: &mut QueryBuilder, names: &[String]) -> TqlResult<()>;

    /// `(p1, p2, ...)`
    fn list(&self, out: &mut QueryBuilder, values: &[Value]) -> TqlResult<()>;

    /// `(c1, c2) VALUES (p1, p2), (p3, p4)`
    fn values(&self, out: &mut QueryBuilder, values: &Values) -> TqlResult<()>;

    /// `SET c1 = p1, c2 = p2`
    fn set(&self, out: &mut QueryBuilder, record: &Record) -> TqlResult<()>;

    /// Transform the finished text and params. Identity by default.
    fn postprocess(&self, sql: String, params: Vec<Value>) -> CompiledQuery {
        CompiledQuery { sql, params }
    }
}

impl<D: Dialect + ?Sized> Dialect for &D {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn preprocess(&self, query: Query) -> Query {
        (**self).preprocess(query)
    }

    fn template_string(&self, out: &mut QueryBuilder, text: &str) -> TqlResult<()> {
        (**self).template_string(out, text)
    }

    fn parameter(&self, out: &mut QueryBuilder, value: &Value) -> TqlResult<()> {
        (**self).parameter(out, value)
    }

    fn identifier(&self, out: &mut QueryBuilder, name: &str) -> TqlResult<()> {
        (**self).identifier(out, name)
    }

    fn identifiers(&self, out: &mut QueryBuilder, names: &[String]) -> TqlResult<()> {
        (**self).identifiers(out, names)
    }

    fn list(&self, out: &mut QueryBuilder, values: &[Value]) -> TqlResult<()> {
        (**self).list(out, values)
    }

    fn values(&self, out: &mut QueryBuilder, values: &Values) -> TqlResult<()> {
        (**self).values(out, values)
    }

    fn set(&self, out: &mut QueryBuilder, record: &Record) -> TqlResult<()> {
        (**self).set(out, record)
    }

    fn postprocess(&self, sql: String, params: Vec<Value>) -> CompiledQuery {
        (**self).postprocess(sql, params)
    }
}

impl<D: Dialect + ?Sized> Dialect for Box<D> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn preprocess(&self, query: Query) -> Query {
        (**self).preprocess(query)
    }

    fn template_string(&self, out: &mut QueryBuilder, text: &str) -> TqlResult<()> {
        (**self).template_string(out, text)
    }

    fn parameter(&self, out: &mut QueryBuilder, value: &Value) -> TqlResult<()> {
        (**self).parameter(out, value)
    }

    fn identifier(&self, out: &mut QueryBuilder, name: &str) -> TqlResult<()> {
        (**self).identifier(out, name)
    }

    fn identifiers(&self, out: &mut QueryBuilder, names: &[String]) -> TqlResult<()> {
        (**self).identifiers(out, names)
    }

    fn list(&self, out: &mut QueryBuilder, values: &[Value]) -> TqlResult<()> {
        (**self).list(out, values)
    }

    fn values(&self, out: &mut QueryBuilder, values: &Values) -> TqlResult<()> {
        (**self).values(out, values)
    }

    fn set(&self, out: &mut QueryBuilder, record: &Record) -> TqlResult<()> {
        (**self).set(out, record)
    }

    fn postprocess(&self, sql: String, params: Vec<Value>) -> CompiledQuery {
        (**self).postprocess(sql, params)
    }
}
