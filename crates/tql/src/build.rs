//! The build engine: walks a node tree and dispatches each node to a dialect.

use crate::builder::{CompiledQuery, QueryBuilder};
use crate::dialect::Dialect;
use crate::error::TqlResult;
use crate::node::{Node, Query};

/// Render `nodes` into `out`, recursing into fragments.
///
/// Stops at the first error. Text already written for earlier nodes is not
/// rolled back, so a failed build must be discarded as a whole.
pub fn build<D>(dialect: &D, out: &mut QueryBuilder, nodes: &[Node]) -> TqlResult<()>
where
    D: Dialect + ?Sized,
{
    for node in nodes {
        match node {
            Node::TemplateString(text) => dialect.template_string(out, text)?,
            Node::Parameter(value) => dialect.parameter(out, value)?,
            Node::Identifier(name) => dialect.identifier(out, name)?,
            Node::Identifiers(names) => dialect.identifiers(out, names)?,
            Node::List(values) => dialect.list(out, values)?,
            Node::Values(values) => dialect.values(out, values)?,
            Node::Set(record) => dialect.set(out, record)?,
            Node::Fragment(fragment) => build(dialect, out, fragment.nodes())?,
        }
    }
    Ok(())
}

/// Run the full pipeline for one query: `preprocess`, build into a fresh
/// accumulator, `postprocess`.
pub fn compile<D>(dialect: &D, query: Query) -> TqlResult<CompiledQuery>
where
    D: Dialect + ?Sized,
{
    let query = dialect.preprocess(query);
    let mut out = QueryBuilder::new();
    build(dialect, &mut out, query.nodes())?;
    let CompiledQuery { sql, params } = out.finish();
    Ok(dialect.postprocess(sql, params))
}
