//! Typed traversal builder
//!
//! Builds a Gremlin traversal step by step and renders it as a
//! Gremlin-Groovy [`Script`]. Every value argument is bound to a generated
//! name (`_0`, `_1`, ...) instead of being spliced into the text, so no
//! caller-supplied string can change the shape of the query.
//!
//! ```
//! use shopgraph_gremlin::traversal::{g, __, Order};
//!
//! let script = g().v()
//!     .has_label("product")
//!     .project(&["product", "purchaseCount"])
//!     .by(__().value_map(&["name"]))
//!     .by(__().in_("purchased").count())
//!     .order()
//!     .by_order(__().select(&["purchaseCount"]), Order::Desc)
//!     .limit(3)
//!     .build();
//!
//! assert!(script.text.starts_with("g.V().hasLabel(_0).project(_1, _2)"));
//! assert_eq!(script.bindings["_0"], "product");
//! ```

use serde_json::Value;

use crate::models::{Bindings, Script};

/// Sort direction for `order().by(...)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

impl Order {
    fn token(self) -> &'static str {
        match self {
            Order::Asc => "Order.asc",
            Order::Desc => "Order.desc",
        }
    }
}

/// A comparison predicate, e.g. `P.gte(4)`
#[derive(Debug, Clone, PartialEq)]
pub struct P {
    op: &'static str,
    value: Value,
}

impl P {
    fn new(op: &'static str, value: impl Into<Value>) -> Self {
        Self { op, value: value.into() }
    }

    pub fn eq(value: impl Into<Value>) -> Self {
        Self::new("eq", value)
    }

    pub fn neq(value: impl Into<Value>) -> Self {
        Self::new("neq", value)
    }

    pub fn gt(value: impl Into<Value>) -> Self {
        Self::new("gt", value)
    }

    pub fn gte(value: impl Into<Value>) -> Self {
        Self::new("gte", value)
    }

    pub fn lt(value: impl Into<Value>) -> Self {
        Self::new("lt", value)
    }

    pub fn lte(value: impl Into<Value>) -> Self {
        Self::new("lte", value)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Arg {
    /// Sent as a binding
    Value(Value),
    /// Rendered verbatim; only ever a fixed enum token
    Token(&'static str),
    Traversal(Traversal),
    Predicate(P),
}

#[derive(Debug, Clone, PartialEq)]
struct Step {
    name: &'static str,
    args: Vec<Arg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    /// `g`, the traversal source bound on the server
    Graph,
    /// `__`, an anonymous child traversal
    Anonymous,
}

/// A traversal under construction
#[derive(Debug, Clone, PartialEq)]
pub struct Traversal {
    source: Source,
    steps: Vec<Step>,
}

/// Start a traversal from the server-side `g` source
pub fn g() -> Traversal {
    Traversal {
        source: Source::Graph,
        steps: Vec::new(),
    }
}

/// Start an anonymous traversal, for use inside `by`, `where_`, `not` ...
pub fn __() -> Traversal {
    Traversal {
        source: Source::Anonymous,
        steps: Vec::new(),
    }
}

fn bound<I, T>(items: I) -> Vec<Arg>
where
    I: IntoIterator<Item = T>,
    T: Into<Value>,
{
    items.into_iter().map(|v| Arg::Value(v.into())).collect()
}

impl Traversal {
    fn step(mut self, name: &'static str, args: Vec<Arg>) -> Self {
        self.steps.push(Step { name, args });
        self
    }

    // ---- start steps ----

    pub fn v(self) -> Self {
        self.step("V", Vec::new())
    }

    pub fn e(self) -> Self {
        self.step("E", Vec::new())
    }

    pub fn add_v(self, label: &str) -> Self {
        self.step("addV", bound([label]))
    }

    pub fn add_e(self, label: &str) -> Self {
        self.step("addE", bound([label]))
    }

    // ---- filters ----

    pub fn has_label(self, label: &str) -> Self {
        self.step("hasLabel", bound([label]))
    }

    /// `has(key)`: the element carries the property at all
    pub fn has_key(self, key: &str) -> Self {
        self.step("has", bound([key]))
    }

    /// `has(key, value)`
    pub fn has(self, key: &str, value: impl Into<Value>) -> Self {
        self.step("has", vec![Arg::Value(key.into()), Arg::Value(value.into())])
    }

    /// `has(label, key, value)`
    pub fn has_labeled(self, label: &str, key: &str, value: impl Into<Value>) -> Self {
        self.step(
            "has",
            vec![Arg::Value(label.into()), Arg::Value(key.into()), Arg::Value(value.into())],
        )
    }

    /// `has(key, predicate)`
    pub fn has_pred(self, key: &str, predicate: P) -> Self {
        self.step("has", vec![Arg::Value(key.into()), Arg::Predicate(predicate)])
    }

    pub fn where_(self, inner: Traversal) -> Self {
        self.step("where", vec![Arg::Traversal(inner)])
    }

    pub fn not(self, inner: Traversal) -> Self {
        self.step("not", vec![Arg::Traversal(inner)])
    }

    pub fn dedup(self) -> Self {
        self.step("dedup", Vec::new())
    }

    pub fn limit(self, n: i64) -> Self {
        self.step("limit", bound([n]))
    }

    // ---- navigation ----

    pub fn out(self, label: &str) -> Self {
        self.step("out", bound([label]))
    }

    pub fn in_(self, label: &str) -> Self {
        self.step("in", bound([label]))
    }

    pub fn both(self, label: &str) -> Self {
        self.step("both", bound([label]))
    }

    pub fn in_v(self) -> Self {
        self.step("inV", Vec::new())
    }

    pub fn out_v(self) -> Self {
        self.step("outV", Vec::new())
    }

    // ---- step labels and edge endpoints ----

    pub fn as_(self, label: &str) -> Self {
        self.step("as", bound([label]))
    }

    pub fn from_(self, label: &str) -> Self {
        self.step("from", bound([label]))
    }

    pub fn to(self, label: &str) -> Self {
        self.step("to", bound([label]))
    }

    // ---- mutation ----

    pub fn property(self, key: &str, value: impl Into<Value>) -> Self {
        self.step("property", vec![Arg::Value(key.into()), Arg::Value(value.into())])
    }

    pub fn drop(self) -> Self {
        self.step("drop", Vec::new())
    }

    // ---- projection and aggregation ----

    /// `valueMap(keys...)`; an empty slice returns every property
    pub fn value_map(self, keys: &[&str]) -> Self {
        self.step("valueMap", bound(keys.iter().copied()))
    }

    pub fn values(self, keys: &[&str]) -> Self {
        self.step("values", bound(keys.iter().copied()))
    }

    pub fn project(self, keys: &[&str]) -> Self {
        self.step("project", bound(keys.iter().copied()))
    }

    pub fn select(self, keys: &[&str]) -> Self {
        self.step("select", bound(keys.iter().copied()))
    }

    /// `by(traversal)` modulator for `project`
    pub fn by(self, inner: Traversal) -> Self {
        self.step("by", vec![Arg::Traversal(inner)])
    }

    /// `by(traversal, order)` modulator for `order`
    pub fn by_order(self, inner: Traversal, order: Order) -> Self {
        self.step("by", vec![Arg::Traversal(inner), Arg::Token(order.token())])
    }

    pub fn order(self) -> Self {
        self.step("order", Vec::new())
    }

    pub fn count(self) -> Self {
        self.step("count", Vec::new())
    }

    pub fn mean(self) -> Self {
        self.step("mean", Vec::new())
    }

    pub fn unfold(self) -> Self {
        self.step("unfold", Vec::new())
    }

    /// Render to a script with bindings
    pub fn build(&self) -> Script {
        let mut renderer = Renderer::default();
        let text = renderer.traversal(self);
        Script {
            text,
            bindings: renderer.bindings,
        }
    }
}

#[derive(Default)]
struct Renderer {
    bindings: Bindings,
}

impl Renderer {
    fn bind(&mut self, value: &Value) -> String {
        let name = format!("_{}", self.bindings.len());
        self.bindings.insert(name.clone(), value.clone());
        name
    }

    fn traversal(&mut self, t: &Traversal) -> String {
        let mut out = String::from(match t.source {
            Source::Graph => "g",
            Source::Anonymous => "__",
        });
        for step in &t.steps {
            out.push('.');
            out.push_str(step.name);
            out.push('(');
            let args: Vec<String> = step.args.iter().map(|a| self.arg(a)).collect();
            out.push_str(&args.join(", "));
            out.push(')');
        }
        out
    }

    fn arg(&mut self, arg: &Arg) -> String {
        match arg {
            Arg::Value(v) => self.bind(v),
            Arg::Token(t) => (*t).to_string(),
            Arg::Traversal(t) => self.traversal(t),
            Arg::Predicate(p) => format!("P.{}({})", p.op, self.bind(&p.value)),
        }
    }
}
