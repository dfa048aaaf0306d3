//! Escaping and clause rendering shared by the built-in dialects.
//!
//! These are public so a custom [`Dialect`](super::Dialect) can reuse them and
//! only decide on its placeholder style and identifier escaping.

use crate::builder::QueryBuilder;
use crate::error::{TqlError, TqlResult};
use crate::node::{Record, Values};
use serde_json::Value;
use std::borrow::Cow;

/// How a dialect spells a bound parameter in SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// `?` for every parameter.
    Positional,
    /// A prefix followed by the 1-based ordinal: `$1`, `:1`, ...
    Numbered(char),
}

impl PlaceholderStyle {
    /// Render the placeholder for the parameter at `ordinal` (1-based).
    pub fn render(self, ordinal: usize) -> Cow<'static, str> {
        match self {
            Self::Positional => Cow::Borrowed("?"),
            Self::Numbered(prefix) => Cow::Owned(format!("{prefix}{ordinal}")),
        }
    }

    /// Push `value` as a parameter and return its placeholder.
    pub fn bind(self, out: &mut QueryBuilder, value: Value) -> Cow<'static, str> {
        let ordinal = out.append_param(value);
        self.render(ordinal)
    }
}

/// Quote `name` with `quote`, doubling embedded quotes, and split it on `.`
/// into independently quoted segments.
///
/// `public.users` → `"public"."users"`
pub fn escape_quote_split(name: &str, quote: char) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    out.push(quote);
    for ch in name.chars() {
        if ch == quote {
            out.push(quote);
            out.push(quote);
        } else if ch == '.' {
            out.push(quote);
            out.push('.');
            out.push(quote);
        } else {
            out.push(ch);
        }
    }
    out.push(quote);
    out
}

/// Quote `name` with `quote`, doubling embedded quotes and deleting every `.`.
///
/// `public.users` → `` `publicusers` ``
pub fn escape_quote_strip(name: &str, quote: char) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    out.push(quote);
    for ch in name.chars() {
        if ch == quote {
            out.push(quote);
            out.push(quote);
        } else if ch != '.' {
            out.push(ch);
        }
    }
    out.push(quote);
    out
}

/// Escape every name and join with `, `.
pub fn join_escaped<F>(names: impl IntoIterator<Item = impl AsRef<str>>, escape: F) -> String
where
    F: Fn(&str) -> String,
{
    let mut out = String::new();
    for (i, name) in names.into_iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&escape(name.as_ref()));
    }
    out
}

/// Columns shared by all `records`, in the first record's key order.
///
/// Every record must have exactly the first record's column set (key order may
/// differ). Nothing is written, so callers can validate before emitting.
pub fn record_columns(records: &[Record]) -> TqlResult<Vec<&str>> {
    let Some(first) = records.first() else {
        return Err(TqlError::EmptyRecords { clause: "VALUES" });
    };

    let columns: Vec<&str> = first.keys().map(String::as_str).collect();
    for (row, record) in records.iter().enumerate().skip(1) {
        let same = record.len() == columns.len() && columns.iter().all(|c| record.contains_key(*c));
        if !same {
            return Err(TqlError::ValuesRecordsMismatch {
                row,
                expected: columns.iter().map(|c| (*c).to_owned()).collect(),
                found: record.keys().cloned().collect(),
            });
        }
    }
    if columns.is_empty() {
        return Err(TqlError::EmptyRecords { clause: "VALUES" });
    }
    Ok(columns)
}

/// `(p1, p2, ...)`
pub fn write_list(out: &mut QueryBuilder, values: &[Value], style: PlaceholderStyle) {
    let mut sql = String::from("(");
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        sql.push_str(&style.bind(out, value.clone()));
    }
    sql.push(')');
    out.append_text(&sql);
}

/// `(c1, c2) VALUES (p1, p2), (p3, p4)`
///
/// Records are validated up front: on a mismatch nothing is written for this
/// clause.
pub fn write_values<F>(
    out: &mut QueryBuilder,
    values: &Values,
    escape: F,
    style: PlaceholderStyle,
) -> TqlResult<()>
where
    F: Fn(&str) -> String,
{
    let records = values.records();
    let columns = record_columns(records)?;

    let mut sql = String::from("(");
    sql.push_str(&join_escaped(columns.iter(), &escape));
    sql.push_str(") VALUES ");
    for (i, record) in records.iter().enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        sql.push('(');
        for (j, column) in columns.iter().enumerate() {
            if j > 0 {
                sql.push_str(", ");
            }
            let value = record.get(*column).cloned().unwrap_or(Value::Null);
            sql.push_str(&style.bind(out, value));
        }
        sql.push(')');
    }
    out.append_text(&sql);
    Ok(())
}

/// `SET c1 = p1, c2 = p2`
pub fn write_set<F>(
    out: &mut QueryBuilder,
    record: &Record,
    escape: F,
    style: PlaceholderStyle,
) -> TqlResult<()>
where
    F: Fn(&str) -> String,
{
    if record.is_empty() {
        return Err(TqlError::EmptyRecords { clause: "SET" });
    }

    let mut sql = String::from("SET ");
    for (i, (column, value)) in record.iter().enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        sql.push_str(&escape(column));
        sql.push_str(" = ");
        sql.push_str(&style.bind(out, value.clone()));
    }
    out.append_text(&sql);
    Ok(())
}
