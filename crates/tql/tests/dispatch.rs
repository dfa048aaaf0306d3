//! Dispatch contract between the build engine and a dialect.
//!
//! `Recorder` writes nothing useful; it records which dialect hook was called
//! with which payload, in order.

use serde_json::{Value, json};
use std::cell::RefCell;
use tql::{
    CompiledQuery, Dialect, Fragment, Node, Query, QueryBuilder, Record, Tql, TqlResult, Values,
    identifier, identifiers, list, set, values,
};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Preprocess(Query),
    TemplateString(String),
    Parameter(Value),
    Identifier(String),
    Identifiers(Vec<String>),
    List(Vec<Value>),
    Values(Values),
    Set(Record),
    Postprocess(String, Vec<Value>),
}

#[derive(Default)]
struct Recorder {
    calls: RefCell<Vec<Call>>,
}

impl Recorder {
    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| pred(c)).count()
    }
}

impl Dialect for Recorder {
    fn name(&self) -> &'static str {
        "recorder"
    }

    fn preprocess(&self, query: Query) -> Query {
        self.record(Call::Preprocess(query.clone()));
        query
    }

    fn template_string(&self, _out: &mut QueryBuilder, text: &str) -> TqlResult<()> {
        self.record(Call::TemplateString(text.to_owned()));
        Ok(())
    }

    fn parameter(&self, _out: &mut QueryBuilder, value: &Value) -> TqlResult<()> {
        self.record(Call::Parameter(value.clone()));
        Ok(())
    }

    fn identifier(&self, _out: &mut QueryBuilder, name: &str) -> TqlResult<()> {
        self.record(Call::Identifier(name.to_owned()));
        Ok(())
    }

    fn identifiers(&self, _out: &mut QueryBuilder, names: &[String]) -> TqlResult<()> {
        self.record(Call::Identifiers(names.to_vec()));
        Ok(())
    }

    fn list(&self, _out: &mut QueryBuilder, values: &[Value]) -> TqlResult<()> {
        self.record(Call::List(values.to_vec()));
        Ok(())
    }

    fn values(&self, _out: &mut QueryBuilder, values: &Values) -> TqlResult<()> {
        self.record(Call::Values(values.clone()));
        Ok(())
    }

    fn set(&self, _out: &mut QueryBuilder, record: &Record) -> TqlResult<()> {
        self.record(Call::Set(record.clone()));
        Ok(())
    }

    fn postprocess(&self, sql: String, params: Vec<Value>) -> CompiledQuery {
        self.record(Call::Postprocess(sql.clone(), params.clone()));
        CompiledQuery { sql, params }
    }
}

fn text(s: &str) -> Call {
    Call::TemplateString(s.to_owned())
}

#[test]
fn simple_query_only_calls_template_string() {
    let tql = Tql::new(Recorder::default());
    tql::query!(tql, "SELECT * FROM users").unwrap();

    assert_eq!(
        tql.dialect().calls(),
        vec![
            Call::Preprocess(Query::new(vec![Node::text("SELECT * FROM users")])),
            text("SELECT * FROM users"),
            Call::Postprocess(String::new(), vec![]),
        ]
    );
}

#[test]
fn arrays_of_fragments_and_values_flatten_in_order() {
    let tql = Tql::new(Recorder::default());
    let filters: Vec<tql::Arg> = vec![
        tql::fragment!("AND user_id = {}", 1234).unwrap().into(),
        tql::fragment!("AND user_name = {}", "retelliott").unwrap().into(),
        1234.into(),
    ];
    tql::query!(tql, "SELECT * FROM users WHERE 1=1 {}", filters).unwrap();

    let calls = tql.dialect().calls();
    assert_eq!(
        calls[0],
        Call::Preprocess(Query::new(vec![
            Node::text("SELECT * FROM users WHERE 1=1 "),
            Node::Fragment(Fragment::new(vec![
                Node::text("AND user_id = "),
                Node::param(1234),
                Node::text(""),
            ])),
            Node::Fragment(Fragment::new(vec![
                Node::text("AND user_name = "),
                Node::param("retelliott"),
                Node::text(""),
            ])),
            Node::param(1234),
            Node::text(""),
        ]))
    );
    assert_eq!(
        &calls[1..calls.len() - 1],
        &[
            text("SELECT * FROM users WHERE 1=1 "),
            text("AND user_id = "),
            Call::Parameter(json!(1234)),
            text(""),
            text("AND user_name = "),
            Call::Parameter(json!("retelliott")),
            text(""),
            Call::Parameter(json!(1234)),
            text(""),
        ]
    );
}

#[test]
fn fragments_are_visited_recursively() {
    let tql = Tql::new(Recorder::default());
    let inner = tql::fragment!("SELECT * FROM users WHERE user_id = {}", 1234).unwrap();
    tql::query!(tql, "SELECT * FROM ({inner});").unwrap();

    let recorder = tql.dialect();
    assert_eq!(recorder.count(|c| matches!(c, Call::TemplateString(_))), 4);
    assert_eq!(recorder.count(|c| matches!(c, Call::Parameter(_))), 1);
    assert_eq!(recorder.count(|c| matches!(c, Call::Preprocess(_))), 1);
    assert_eq!(recorder.count(|c| matches!(c, Call::Postprocess(..))), 1);
    assert_eq!(recorder.calls()[3], Call::Parameter(json!(1234)));
}

impl Call {
    fn kind(&self) -> &'static str {
        match self {
            Call::Preprocess(_) => "preprocess",
            Call::TemplateString(_) => "template-string",
            Call::Parameter(_) => "parameter",
            Call::Identifier(_) => "identifier",
            Call::Identifiers(_) => "identifiers",
            Call::List(_) => "list",
            Call::Values(_) => "values",
            Call::Set(_) => "set",
            Call::Postprocess(..) => "postprocess",
        }
    }
}

#[test]
fn each_node_kind_reaches_its_own_hook() {
    let nodes = vec![
        identifier("hello"),
        identifiers(["hello"]),
        list(["hello", "world"]),
        values(&json!({"hello": "world"})).unwrap(),
        set(&json!({"hello": "world"})).unwrap(),
        Node::text("hello"),
        Node::param("hello"),
    ];

    for node in nodes {
        let kind = node.kind();
        let tql = Tql::new(Recorder::default());
        tql.build(Query::new(vec![node])).unwrap();
        let calls: Vec<&str> = tql.dialect().calls().iter().map(Call::kind).collect();
        assert_eq!(calls, vec!["preprocess", kind, "postprocess"]);
    }
}

#[test]
fn nested_query_never_reaches_the_dialect() {
    let tql = Tql::new(Recorder::default());
    let inner = Query::new(vec![Node::text("SELECT 1")]);
    let err = tql::query!(tql, "SELECT * FROM ({})", inner).unwrap_err();

    assert_eq!(err.code(), "illegal_query_recursion");
    assert!(tql.dialect().calls().is_empty());
}
