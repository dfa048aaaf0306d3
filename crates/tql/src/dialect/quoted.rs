//! Dialects that inline identifiers as quoted names.
//!
//! They share every rule and differ only in the placeholder style and in how a
//! name is escaped.

use super::Dialect;
use super::common::{
    PlaceholderStyle, escape_quote_split, escape_quote_strip, join_escaped, write_list, write_set,
    write_values,
};
use crate::builder::QueryBuilder;
use crate::error::TqlResult;
use crate::node::{Record, Values};
use serde_json::Value;

macro_rules! quoted_dialect {
    (
        $(#[$meta:meta])*
        $dialect:ident {
            name: $name:literal,
            style: $style:expr,
            escape: $escape:expr $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $dialect;

        impl $dialect {
            const STYLE: PlaceholderStyle = $style;

            fn escape(name: &str) -> String {
                $escape(name)
            }
        }

        impl Dialect for $dialect {
            fn name(&self) -> &'static str {
                $name
            }

            fn parameter(&self, out: &mut QueryBuilder, value: &Value) -> TqlResult<()> {
                let placeholder = Self::STYLE.bind(out, value.clone());
                out.append_text(&placeholder);
                Ok(())
            }

            fn identifiers(&self, out: &mut QueryBuilder, names: &[String]) -> TqlResult<()> {
                out.append_text(&join_escaped(names, Self::escape));
                Ok(())
            }

            fn list(&self, out: &mut QueryBuilder, values: &[Value]) -> TqlResult<()> {
                write_list(out, values, Self::STYLE);
                Ok(())
            }

            fn values(&self, out: &mut QueryBuilder, values: &Values) -> TqlResult<()> {
                write_values(out, values, Self::escape, Self::STYLE)
            }

            fn set(&self, out: &mut QueryBuilder, record: &Record) -> TqlResult<()> {
                write_set(out, record, Self::escape, Self::STYLE)
            }
        }
    };
}

fn double_quoted(name: &str) -> String {
    escape_quote_split(name, '"')
}

// MySQL has no quoted dotted-name syntax here, so dots are stripped rather
// than split.
fn backticked(name: &str) -> String {
    escape_quote_strip(name, '`')
}

quoted_dialect! {
    /// PostgreSQL: `$N` placeholders, `"schema"."table"` identifiers.
    Postgres {
        name: "postgres",
        style: PlaceholderStyle::Numbered('$'),
        escape: double_quoted,
    }
}

quoted_dialect! {
    /// SQLite: `?` placeholders, `"schema"."table"` identifiers.
    Sqlite {
        name: "sqlite",
        style: PlaceholderStyle::Positional,
        escape: double_quoted,
    }
}

quoted_dialect! {
    /// MySQL: `?` placeholders, `` `identifier` `` identifiers.
    MySql {
        name: "mysql",
        style: PlaceholderStyle::Positional,
        escape: backticked,
    }
}
