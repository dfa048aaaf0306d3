//! The accumulator a dialect writes into during one build pass.

use serde_json::Value;

/// A finished query: SQL text plus its bound parameters, in placeholder order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompiledQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

impl CompiledQuery {
    pub fn new(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// Split into `(sql, params)`.
    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql, self.params)
    }
}

/// Growing SQL text and parameter list.
///
/// Every append returns a cursor: the new text length for
/// [`append_text`](Self::append_text), the new (1-based) parameter count for
/// [`append_param`](Self::append_param). Dialects with numbered placeholders
/// use the latter directly as the placeholder ordinal.
#[derive(Debug, Default)]
pub struct QueryBuilder {
    sql: String,
    params: Vec<Value>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append SQL text. Returns the new text length (in bytes).
    pub fn append_text(&mut self, text: &str) -> usize {
        self.sql.push_str(text);
        self.sql.len()
    }

    /// Append several pieces of SQL text. Returns the new text length.
    pub fn append_texts<'a, I>(&mut self, texts: I) -> usize
    where
        I: IntoIterator<Item = &'a str>,
    {
        for text in texts {
            self.sql.push_str(text);
        }
        self.sql.len()
    }

    /// Append a parameter. Returns the new parameter count, i.e. the 1-based
    /// ordinal of the value just pushed.
    pub fn append_param(&mut self, value: Value) -> usize {
        self.params.push(value);
        self.params.len()
    }

    /// Append several parameters. Returns the new parameter count.
    pub fn append_params<I>(&mut self, values: I) -> usize
    where
        I: IntoIterator<Item = Value>,
    {
        self.params.extend(values);
        self.params.len()
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    pub fn finish(self) -> CompiledQuery {
        CompiledQuery {
            sql: self.sql,
            params: self.params,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn append_text_returns_length() {
        let mut qb = QueryBuilder::new();
        assert_eq!(qb.append_text("hi"), 2);
        assert_eq!(qb.append_texts(["hi", " ", "mom"]), 8);
        assert_eq!(qb.sql(), "hihi mom");
    }

    #[test]
    fn append_param_returns_count() {
        let mut qb = QueryBuilder::new();
        assert_eq!(qb.append_param(json!(1)), 1);
        assert_eq!(qb.append_params([json!("a"), json!({"b": 2})]), 3);
        assert_eq!(qb.params(), &[json!(1), json!("a"), json!({"b": 2})]);
        assert!(qb.sql().is_empty());
    }

    #[test]
    fn finish_hands_over_both_parts() {
        let mut qb = QueryBuilder::new();
        qb.append_text("SELECT ");
        let n = qb.append_param(json!(true));
        qb.append_text(&format!("${n}"));
        let (sql, params) = qb.finish().into_parts();
        assert_eq!(sql, "SELECT $1");
        assert_eq!(params, vec![json!(true)]);
    }
}
