use crate::build::compile;
use crate::builder::CompiledQuery;
use crate::config::TqlConfig;
use crate::dialect::Dialect;
use crate::error::TqlResult;
use crate::node::Query;
use crate::template::Template;

/// A query entry point bound to one dialect.
///
/// # Example
///
/// ```ignore
/// use tql::{Tql, Postgres};
///
/// let tql = Tql::new(Postgres);
/// let user_id = 1234;
/// let compiled = tql::query!(tql, "SELECT * FROM users WHERE id = {user_id};")?;
/// assert_eq!(compiled.sql, "SELECT * FROM users WHERE id = $1;");
/// # Ok::<(), tql::TqlError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Tql<D> {
    dialect: D,
    config: TqlConfig,
}

impl<D: Dialect> Tql<D> {
    pub fn new(dialect: D) -> Self {
        Self {
            dialect,
            config: TqlConfig::default(),
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: TqlConfig) -> Self {
        self.config = config;
        self
    }

    pub fn dialect(&self) -> &D {
        &self.dialect
    }

    pub fn config(&self) -> &TqlConfig {
        &self.config
    }

    /// Parse a template as a root query and build it.
    pub fn query(&self, template: Template) -> TqlResult<CompiledQuery> {
        let query = template.into_query();
        self.finish(query.and_then(|query| compile(&self.dialect, query)))
    }

    /// Build an already-parsed query tree.
    pub fn build(&self, query: Query) -> TqlResult<CompiledQuery> {
        self.finish(compile(&self.dialect, query))
    }

    fn finish(&self, result: TqlResult<CompiledQuery>) -> TqlResult<CompiledQuery> {
        #[cfg(feature = "tracing")]
        match &result {
            Ok(compiled) => crate::trace::built(&self.config, self.dialect.name(), compiled),
            Err(err) => crate::trace::failed(self.dialect.name(), err),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{MySql, Postgres};
    use crate::node::{Fragment, Node};
    use crate::template::Arg;
    use serde_json::json;

    #[test]
    fn query_binds_values_in_order() {
        let tql = Tql::new(Postgres);
        let template = Template::new(
            &["SELECT * FROM users WHERE id = ", " AND name = ", ";"],
            vec![1234.into(), "alice".into()],
        )
        .unwrap();
        let compiled = tql.query(template).unwrap();
        assert_eq!(
            compiled.sql,
            "SELECT * FROM users WHERE id = $1 AND name = $2;"
        );
        assert_eq!(compiled.params, vec![json!(1234), json!("alice")]);
    }

    #[test]
    fn query_rejects_nested_queries() {
        let tql = Tql::new(MySql);
        let inner = Query::new(vec![Node::text("SELECT 1")]);
        let template = Template::new(&["SELECT (", ")"], vec![Arg::Query(inner)]).unwrap();
        assert!(tql.query(template).unwrap_err().is_query_recursion());
    }

    #[test]
    fn build_accepts_prebuilt_trees() {
        let tql = Tql::new(MySql);
        let query = Query::new(vec![
            Node::text("SELECT * FROM t WHERE "),
            Node::Fragment(Fragment::new(vec![Node::text("a = "), Node::param(true)])),
        ]);
        let compiled = tql.build(query).unwrap();
        assert_eq!(compiled.sql, "SELECT * FROM t WHERE a = ?");
        assert_eq!(compiled.params, vec![json!(true)]);
    }

    #[test]
    fn config_is_replaceable() {
        let tql = Tql::new(Postgres).with_config(TqlConfig::new().no_truncate());
        assert_eq!(tql.config().max_sql_length, None);
        assert_eq!(tql.dialect().name(), "postgres");
    }
}
