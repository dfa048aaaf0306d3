//! Template parsing: skeleton + interpolated values → node sequence.
//!
//! A [`Template`] pairs a `'static` skeleton with the values interpolated
//! between its segments. The `'static` bound is what makes the skeleton
//! trustworthy: it has to come from a literal, so a value computed at run
//! time can only ever reach the query as a [`Node::Parameter`] (or through
//! one of the explicit node constructors).
//!
//! Use [`template!`](crate::template) rather than building one by hand:
//!
//! ```ignore
//! let t = tql::template!("SELECT * FROM users WHERE id = {}", user_id);
//! ```

use crate::error::{TqlError, TqlResult};
use crate::node::{Fragment, Node, Query};
use crate::value;
use serde::Serialize;
use serde_json::Value;

/// One interpolation slot.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// Spliced into the sequence as-is.
    Node(Node),
    /// Always rejected: queries cannot be nested.
    Query(Query),
    /// Flattened element by element.
    Many(Vec<Arg>),
    /// Bound as a single parameter.
    Value(Value),
    /// Bound as a single parameter once checked to be finite.
    Float(f64),
}

/// Bind any serializable value as exactly one parameter.
///
/// Unlike `Vec<T>`, which is flattened into one slot per element, this keeps
/// arrays and nested structures whole. NaN and infinities anywhere in `value`
/// are a [`Serialization`](TqlError::Serialization) error.
pub fn param<T>(value: &T) -> TqlResult<Arg>
where
    T: Serialize + ?Sized,
{
    Ok(Arg::Value(value::to_value(value)?))
}

/// A literal skeleton and its interpolated values.
#[derive(Debug, Clone)]
pub struct Template {
    segments: &'static [&'static str],
    args: Vec<Arg>,
}

impl Template {
    /// Pair a literal skeleton with its values.
    ///
    /// There must be exactly one more segment than there are values.
    pub fn new(segments: &'static [&'static str], args: Vec<Arg>) -> TqlResult<Self> {
        if segments.len() != args.len() + 1 {
            return Err(TqlError::UntemplatedCall {
                segments: segments.len(),
                args: args.len(),
            });
        }
        Ok(Self { segments, args })
    }

    #[doc(hidden)]
    pub fn __from_macro(segments: &'static [&'static str], args: Vec<Arg>) -> Self {
        debug_assert_eq!(segments.len(), args.len() + 1);
        Self { segments, args }
    }

    pub fn segments(&self) -> &'static [&'static str] {
        self.segments
    }

    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    /// Parse into a root [`Query`].
    pub fn into_query(self) -> TqlResult<Query> {
        self.parse().map(Query::new)
    }

    /// Parse into a reusable [`Fragment`].
    pub fn into_fragment(self) -> TqlResult<Fragment> {
        self.parse().map(Fragment::new)
    }

    fn parse(self) -> TqlResult<Vec<Node>> {
        if self.segments.len() != self.args.len() + 1 {
            return Err(TqlError::UntemplatedCall {
                segments: self.segments.len(),
                args: self.args.len(),
            });
        }

        let mut nodes = Vec::with_capacity(self.segments.len() + self.args.len());
        let mut args = self.args.into_iter();
        for segment in self.segments {
            nodes.push(Node::TemplateString((*segment).to_string()));
            if let Some(arg) = args.next() {
                flatten(arg, &mut nodes)?;
            }
        }
        Ok(nodes)
    }
}

fn flatten(arg: Arg, out: &mut Vec<Node>) -> TqlResult<()> {
    match arg {
        Arg::Node(node) => out.push(node),
        Arg::Query(_) => return Err(TqlError::IllegalQueryRecursion),
        Arg::Many(items) => {
            for item in items {
                flatten(item, out)?;
            }
        }
        Arg::Value(value) => out.push(Node::Parameter(value)),
        Arg::Float(f) => out.push(Node::Parameter(value::float(f)?)),
    }
    Ok(())
}

/// Parse a template into a reusable [`Fragment`].
pub fn fragment(template: Template) -> TqlResult<Fragment> {
    template.into_fragment()
}

/// Join items into one fragment, with `delimiter` between consecutive items.
///
/// Fragment items are unwrapped (their nodes are spliced in directly), other
/// nodes are kept, and plain values become parameters.
pub fn join<I>(delimiter: &Fragment, items: I) -> TqlResult<Fragment>
where
    I: IntoIterator,
    I::Item: Into<Arg>,
{
    let mut nodes = Vec::new();
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            nodes.extend_from_slice(delimiter.nodes());
        }
        match item.into() {
            Arg::Node(Node::Fragment(fragment)) => nodes.extend_from_slice(fragment.nodes()),
            other => flatten(other, &mut nodes)?,
        }
    }
    Ok(Fragment::new(nodes))
}

// ==================== Conversions ====================

impl From<Node> for Arg {
    fn from(node: Node) -> Self {
        Arg::Node(node)
    }
}

impl From<Fragment> for Arg {
    fn from(fragment: Fragment) -> Self {
        Arg::Node(Node::Fragment(fragment))
    }
}

impl From<&Fragment> for Arg {
    fn from(fragment: &Fragment) -> Self {
        Arg::Node(Node::Fragment(fragment.clone()))
    }
}

impl From<Query> for Arg {
    fn from(query: Query) -> Self {
        Arg::Query(query)
    }
}

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        Arg::Value(value)
    }
}

impl<T: Into<Arg>> From<Option<T>> for Arg {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Arg::Value(Value::Null),
        }
    }
}

impl<T: Into<Arg>> From<Vec<T>> for Arg {
    fn from(items: Vec<T>) -> Self {
        Arg::Many(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Arg>, const N: usize> From<[T; N]> for Arg {
    fn from(items: [T; N]) -> Self {
        Arg::Many(items.into_iter().map(Into::into).collect())
    }
}

macro_rules! impl_arg_from_value {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for Arg {
                fn from(value: $t) -> Self {
                    Arg::Value(Value::from(value))
                }
            }
        )*
    };
}

impl_arg_from_value!(
    bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, String, &str,
);

impl From<f64> for Arg {
    fn from(value: f64) -> Self {
        Arg::Float(value)
    }
}

impl From<f32> for Arg {
    fn from(value: f32) -> Self {
        Arg::Float(value::widen(value))
    }
}

impl From<&String> for Arg {
    fn from(value: &String) -> Self {
        Arg::Value(Value::String(value.clone()))
    }
}

impl From<char> for Arg {
    fn from(value: char) -> Self {
        Arg::Value(Value::String(value.to_string()))
    }
}

impl From<()> for Arg {
    fn from(_: ()) -> Self {
        Arg::Value(Value::Null)
    }
}
