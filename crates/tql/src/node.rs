//! The node model: the typed tree a template is parsed into.
//!
//! [`Node`] is a closed set of variants. [`Query`] is the root of a tree and is
//! deliberately *not* a node, so a query can never be spliced into another
//! query or fragment.
//!
//! Nodes (de)serialize as `{"type": "<kind>", "value": <payload>}`:
//!
//! ```json
//! {"type": "query", "value": [
//!   {"type": "template-string", "value": "SELECT * FROM users WHERE id = "},
//!   {"type": "parameter", "value": 1234}
//! ]}
//! ```

use crate::error::{TqlError, TqlResult};
use crate::value;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// A column name → value mapping. Key order is insertion order.
pub type Record = Map<String, Value>;

/// One typed unit of a query tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "kebab-case")]
pub enum Node {
    /// Literal SQL text, inserted verbatim.
    TemplateString(String),
    /// A value bound through the target system's parameter mechanism.
    Parameter(Value),
    /// A single identifier (column, table, ...).
    Identifier(String),
    /// Several identifiers, rendered comma-separated.
    Identifiers(Vec<String>),
    /// A parenthesized, comma-separated list of parameters.
    List(Vec<Value>),
    /// The payload of an INSERT-style `(...) VALUES (...)` clause.
    Values(Values),
    /// The payload of an UPDATE-style `SET` clause.
    Set(Record),
    /// A nested, reusable node sequence.
    Fragment(Fragment),
}

/// Records for a [`Node::Values`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Values {
    Many(Vec<Record>),
    Single(Record),
}

impl Values {
    /// The records as a slice, regardless of how many there are.
    pub fn records(&self) -> &[Record] {
        match self {
            Values::Many(records) => records,
            Values::Single(record) => std::slice::from_ref(record),
        }
    }
}

/// A reusable, immutable sequence of nodes.
///
/// Cloning is cheap (the nodes are shared), so the same fragment can be
/// interpolated into any number of queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fragment {
    nodes: Arc<[Node]>,
}

impl Fragment {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self {
            nodes: nodes.into(),
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// The root of a query tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "query")]
pub struct Query {
    #[serde(rename = "value")]
    nodes: Vec<Node>,
}

impl Query {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }

    /// Parse a query tree from untrusted JSON.
    ///
    /// Accepts either `{"type": "query", "value": [...]}` or a bare array of nodes.
    pub fn from_json(value: Value) -> TqlResult<Self> {
        let items = match value {
            Value::Array(items) => items,
            Value::Object(mut obj) if obj.get("type").and_then(Value::as_str) == Some("query") => {
                match obj.remove("value") {
                    Some(Value::Array(items)) => items,
                    other => {
                        return Err(TqlError::illegal_node(format!(
                            "query payload must be an array, got {}",
                            describe(other.as_ref().unwrap_or(&Value::Null))
                        )));
                    }
                }
            }
            other => return Err(TqlError::illegal_node(describe(&other))),
        };
        let nodes = items
            .into_iter()
            .map(Node::from_json)
            .collect::<TqlResult<Vec<_>>>()?;
        Ok(Self { nodes })
    }
}

impl Node {
    /// Literal text node.
    pub fn text(text: impl Into<String>) -> Self {
        Node::TemplateString(text.into())
    }

    /// Bound parameter node.
    pub fn param(value: impl Into<Value>) -> Self {
        Node::Parameter(value.into())
    }

    /// Kind name as it appears in the `type` field.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::TemplateString(_) => "template-string",
            Node::Parameter(_) => "parameter",
            Node::Identifier(_) => "identifier",
            Node::Identifiers(_) => "identifiers",
            Node::List(_) => "list",
            Node::Values(_) => "values",
            Node::Set(_) => "set",
            Node::Fragment(_) => "fragment",
        }
    }

    /// Parse a single node from untrusted JSON.
    ///
    /// Anything that is not a well-formed node is an
    /// [`IllegalNodeType`](TqlError::IllegalNodeType); an element tagged
    /// `query` (at any depth) is an
    /// [`IllegalQueryRecursion`](TqlError::IllegalQueryRecursion).
    pub fn from_json(value: Value) -> TqlResult<Self> {
        let mut obj = match value {
            Value::Object(obj) => obj,
            other => return Err(TqlError::illegal_node(describe(&other))),
        };
        let kind = match obj.get("type") {
            Some(Value::String(kind)) => kind.clone(),
            _ => return Err(TqlError::illegal_node(describe(&Value::Object(obj)))),
        };
        match kind.as_str() {
            "query" => Err(TqlError::IllegalQueryRecursion),
            "fragment" => {
                let Some(Value::Array(items)) = obj.remove("value") else {
                    return Err(TqlError::illegal_node(
                        "fragment payload must be an array of nodes",
                    ));
                };
                let nodes = items
                    .into_iter()
                    .map(Node::from_json)
                    .collect::<TqlResult<Vec<_>>>()?;
                Ok(Node::Fragment(Fragment::new(nodes)))
            }
            _ => serde_json::from_value(Value::Object(obj))
                .map_err(|e| TqlError::illegal_node(format!("{kind}: {e}"))),
        }
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(_) => "boolean".to_string(),
        Value::Number(_) => "number".to_string(),
        Value::String(_) => "string".to_string(),
        Value::Array(_) => "array".to_string(),
        Value::Object(obj) => match obj.get("type") {
            Some(Value::String(kind)) => format!("unknown node type '{kind}'"),
            _ => "object without a node type".to_string(),
        },
    }
}

impl From<Fragment> for Node {
    fn from(fragment: Fragment) -> Self {
        Node::Fragment(fragment)
    }
}

impl From<&Fragment> for Node {
    fn from(fragment: &Fragment) -> Self {
        Node::Fragment(fragment.clone())
    }
}

// ==================== Constructors ====================

/// A single escaped identifier.
pub fn identifier(name: impl Into<String>) -> Node {
    Node::Identifier(name.into())
}

/// Several escaped identifiers, rendered comma-separated.
pub fn identifiers<I, S>(names: I) -> Node
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Node::Identifiers(names.into_iter().map(Into::into).collect())
}

/// A parenthesized parameter list, e.g. for `IN (...)`.
pub fn list<I, V>(values: I) -> Node
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    Node::List(values.into_iter().map(Into::into).collect())
}

/// An INSERT-style `(...) VALUES (...)` payload.
///
/// `rows` must serialize to an object (one row) or an array of objects. Struct
/// fields keep their declaration order, which becomes the column order.
pub fn values<T>(rows: &T) -> TqlResult<Node>
where
    T: Serialize + ?Sized,
{
    match value::to_value(rows)? {
        Value::Object(record) => Ok(Node::Values(Values::Single(record))),
        Value::Array(items) => {
            let records = items
                .into_iter()
                .enumerate()
                .map(|(i, item)| match item {
                    Value::Object(record) => Ok(record),
                    other => Err(TqlError::serialization(format!(
                        "values: row {i} is a {}, expected a record",
                        describe(&other)
                    ))),
                })
                .collect::<TqlResult<Vec<_>>>()?;
            Ok(Node::Values(Values::Many(records)))
        }
        other => Err(TqlError::serialization(format!(
            "values: expected a record or a list of records, got {}",
            describe(&other)
        ))),
    }
}

/// An UPDATE-style `SET` payload. `record` must serialize to an object.
pub fn set<T>(record: &T) -> TqlResult<Node>
where
    T: Serialize + ?Sized,
{
    match value::to_value(record)? {
        Value::Object(record) => Ok(Node::Set(record)),
        other => Err(TqlError::serialization(format!(
            "set: expected a record, got {}",
            describe(&other)
        ))),
    }
}

/// Raw SQL text, inserted with **no escaping at all**.
///
/// Anything passed here becomes part of the SQL grammar. Never feed it
/// user-controlled input.
pub fn unsafe_raw(text: impl Into<String>) -> Node {
    Node::TemplateString(text.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_with_type_tags() {
        let query = Query::new(vec![
            Node::text("SELECT * FROM users WHERE id = "),
            Node::param(1234),
        ]);
        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({"type": "query", "value": [
                {"type": "template-string", "value": "SELECT * FROM users WHERE id = "},
                {"type": "parameter", "value": 1234},
            ]})
        );
    }

    #[test]
    fn json_round_trips_through_from_json() {
        let original = Query::new(vec![
            Node::text("INSERT INTO users "),
            values(&json!([{"name": "a"}, {"name": "b"}])).unwrap(),
            Node::Fragment(Fragment::new(vec![identifier("x"), list([1, 2])])),
        ]);
        let parsed = Query::from_json(serde_json::to_value(&original).unwrap()).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn from_json_rejects_unknown_kind() {
        let err = Node::from_json(json!({"type": "bogus", "value": 1})).unwrap_err();
        assert!(err.is_illegal_node());
        assert!(err.to_string().contains("bogus"));
    }

    #[test]
    fn from_json_rejects_raw_values() {
        let err = Query::from_json(json!([1234])).unwrap_err();
        assert_eq!(err, TqlError::illegal_node("number"));
    }

    #[test]
    fn from_json_rejects_nested_query() {
        let err = Query::from_json(json!([
            {"type": "fragment", "value": [{"type": "query", "value": []}]}
        ]))
        .unwrap_err();
        assert!(err.is_query_recursion());
    }

    #[test]
    fn from_json_rejects_malformed_payload() {
        let err = Node::from_json(json!({"type": "identifiers", "value": 3})).unwrap_err();
        assert!(err.is_illegal_node());
    }

    #[test]
    fn values_accepts_single_record_and_lists() {
        let single = values(&json!({"a": 1})).unwrap();
        assert!(matches!(single, Node::Values(Values::Single(_))));

        let many = values(&json!([{"a": 1}, {"a": 2}])).unwrap();
        let Node::Values(v) = many else {
            panic!("expected values node");
        };
        assert_eq!(v.records().len(), 2);
    }

    #[test]
    fn values_rejects_scalars() {
        assert!(values(&3).is_err());
        assert!(values(&json!([{"a": 1}, 2])).is_err());
        assert!(set(&"nope").is_err());
    }

    #[test]
    fn non_finite_floats_in_records_are_rejected() {
        let mut row = std::collections::BTreeMap::new();
        row.insert("score", f64::NAN);
        let err = values(&row).unwrap_err();
        assert_eq!(err.code(), "serialization");

        #[derive(Serialize)]
        struct Reading {
            sensor: &'static str,
            value: f32,
        }
        let err = set(&Reading {
            sensor: "a",
            value: f32::NEG_INFINITY,
        })
        .unwrap_err();
        assert!(err.to_string().contains("non-finite"));
    }

    #[test]
    fn struct_fields_keep_declaration_order() {
        #[derive(Serialize)]
        struct User {
            name: &'static str,
            email: &'static str,
            age: u32,
        }
        let Node::Set(record) = set(&User {
            name: "a",
            email: "b",
            age: 3,
        })
        .unwrap() else {
            panic!("expected set node");
        };
        let keys: Vec<_> = record.keys().map(String::as_str).collect();
        assert_eq!(keys, ["name", "email", "age"]);
    }

    #[test]
    fn fragment_clones_share_nodes() {
        let fragment = Fragment::new(vec![Node::text("a")]);
        let copy = fragment.clone();
        assert!(Arc::ptr_eq(&fragment.nodes, &copy.nodes));
    }
}
