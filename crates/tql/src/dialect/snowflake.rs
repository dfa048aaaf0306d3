use super::Dialect;
use super::common::{PlaceholderStyle, escape_quote_split, write_list, write_set, write_values};
use crate::builder::QueryBuilder;
use crate::error::TqlResult;
use crate::node::{Record, Values};
use serde_json::Value;

const STYLE: PlaceholderStyle = PlaceholderStyle::Numbered(':');

fn escape(name: &str) -> String {
    escape_quote_split(name, '"')
}

/// Snowflake: `:N` placeholders.
///
/// Identifier nodes are not inlined at all: the name is bound as a parameter
/// and referenced through `IDENTIFIER(:N)`. Column names inside VALUES and
/// SET clauses, where `IDENTIFIER()` is not accepted, are double-quoted.
#[derive(Debug, Clone, Copy, Default)]
pub struct Snowflake;

impl Dialect for Snowflake {
    fn name(&self) -> &'static str {
        "snowflake"
    }

    fn parameter(&self, out: &mut QueryBuilder, value: &Value) -> TqlResult<()> {
        let placeholder = STYLE.bind(out, value.clone());
        out.append_text(&placeholder);
        Ok(())
    }

    fn identifiers(&self, out: &mut QueryBuilder, names: &[String]) -> TqlResult<()> {
        let mut sql = String::new();
        for (i, name) in names.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            let placeholder = STYLE.bind(out, Value::String(name.clone()));
            sql.push_str("IDENTIFIER(");
            sql.push_str(&placeholder);
            sql.push(')');
        }
        out.append_text(&sql);
        Ok(())
    }

    fn list(&self, out: &mut QueryBuilder, values: &[Value]) -> TqlResult<()> {
        write_list(out, values, STYLE);
        Ok(())
    }

    fn values(&self, out: &mut QueryBuilder, values: &Values) -> TqlResult<()> {
        write_values(out, values, escape, STYLE)
    }

    fn set(&self, out: &mut QueryBuilder, record: &Record) -> TqlResult<()> {
        write_set(out, record, escape, STYLE)
    }
}
