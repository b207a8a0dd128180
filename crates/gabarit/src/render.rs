//! Renderer
//!
//! Rendering re-walks the compiled graph against a [`Context`] and yields
//! output nodes lazily: each node is handed out before its next sibling is
//! produced. Static subtrees are deep clones; dynamic elements are cloned
//! from their skeleton and then patched in place.
//!
//! The first error ends the output: nothing after it is rendered.

use crate::compile::{
    Compiled, Condition, ElementNode, Flow, ForNode, IfNode, Operand, SwitchNode, Template,
};
use crate::config::Options;
use crate::dom::{self, DomNode, Node};
use crate::error::{Error, Result};
use crate::eval::{Context, Entries, Value, ValueExt, Values, parse_number};
use crate::markup::parse_fragment;
use facet_value::VObject;
use std::iter;
use tracing::{instrument, trace};

/// Lazily rendered output nodes
pub type Nodes<'a, N> = Box<dyn Iterator<Item = Result<N>> + 'a>;

impl<N: DomNode> Template<N> {
    /// Render against `ctx`, yielding top-level nodes as they are produced.
    pub fn render(&self, ctx: &Context) -> Nodes<'_, N> {
        render_list(self.nodes(), ctx.clone())
    }

    /// Render straight into `parent`, attaching each node as soon as it is
    /// produced.
    #[instrument(level = "debug", skip_all)]
    pub fn render_into(&self, parent: &mut N, ctx: &Context) -> Result<()> {
        for node in self.render(ctx) {
            parent.append_child(node?);
        }
        Ok(())
    }
}

impl Template<Node> {
    /// Parse an HTML fragment and compile it with default options.
    pub fn parse(html: &str) -> Result<Self> {
        Self::parse_with(html, &Options::default())
    }

    pub fn parse_with(html: &str, options: &Options) -> Result<Self> {
        Self::compile(&parse_fragment(html), options)
    }

    pub fn render_to_html(&self, ctx: &Context) -> Result<String> {
        let nodes = self.render(ctx).collect::<Result<Vec<_>>>()?;
        Ok(dom::to_html(&nodes))
    }

    /// Render with a root mapping built from `(name, value)` pairs.
    pub fn render_with<I, K, V>(&self, data: I) -> Result<String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let root: VObject = data
            .into_iter()
            .map(|(k, v)| -> (String, Value) { (k.into(), v.into()) })
            .collect();
        self.render_to_html(&Context::new(root))
    }
}

fn render_list<N: DomNode>(nodes: &[Compiled<N>], ctx: Context) -> Nodes<'_, N> {
    until_error(nodes.iter().flat_map(move |node| node.render(&ctx)))
}

/// Pass nodes through up to and including the first error.
fn until_error<'a, N: 'a>(nodes: impl Iterator<Item = Result<N>> + 'a) -> Nodes<'a, N> {
    Box::new(nodes.scan(false, |failed, node| {
        if *failed {
            return None;
        }
        *failed = node.is_err();
        Some(node)
    }))
}

impl<N: DomNode> Compiled<N> {
    /// Render this node; a flow may produce any number of nodes.
    pub fn render(&self, ctx: &Context) -> Nodes<'_, N> {
        match self {
            Compiled::Static(node) => {
                Box::new(iter::once_with(move || -> Result<N> { Ok(node.clone_node(true)) }))
            }
            Compiled::Leaf(text) => {
                let ctx = ctx.clone();
                Box::new(iter::once_with(move || {
                    text.render(&ctx).map(|s| N::create_text(&s))
                }))
            }
            Compiled::Element(element) => {
                let ctx = ctx.clone();
                Box::new(iter::once_with(move || element.render(&ctx)))
            }
            Compiled::Flow(flow) => flow.render(ctx),
        }
    }
}

impl<N: DomNode> ElementNode<N> {
    pub fn render(&self, ctx: &Context) -> Result<N> {
        let mut out = self.skeleton.clone_node(true);
        self.patch(&mut out, ctx)?;
        Ok(out)
    }

    /// Fill in a fresh clone of this element's skeleton.
    ///
    /// Two cursors walk in step: one over the compiled children, one over the
    /// clone's children. Flow output is inserted at the clone cursor, which
    /// then moves past it.
    fn patch(&self, target: &mut N, ctx: &Context) -> Result<()> {
        for (name, text) in &self.attributes {
            target.set_attribute(name, &text.render(ctx)?);
        }

        let mut cursor = 0;
        for child in &self.children {
            if let Compiled::Flow(flow) = child {
                for node in flow.render(ctx) {
                    target.insert_before(node?, cursor);
                    cursor += 1;
                }
                continue;
            }

            let available = target.child_nodes().len();
            if cursor >= available {
                return Err(Error::alignment(
                    target.tag_name(),
                    format!("no skeleton child left at position {cursor} ({available} children)"),
                ));
            }

            match child {
                Compiled::Leaf(text) => {
                    let node = N::create_text(&text.render(ctx)?);
                    target.replace_child(cursor, node);
                }
                Compiled::Element(element) => {
                    let slot = target.child_mut(cursor).ok_or_else(|| {
                        Error::alignment(None, format!("child {cursor} vanished"))
                    })?;
                    element.patch(slot, ctx)?;
                }
                Compiled::Static(_) | Compiled::Flow(_) => {}
            }
            cursor += 1;
        }

        let len = target.child_nodes().len();
        if cursor != len {
            return Err(Error::alignment(
                target.tag_name(),
                format!("{} skeleton children left unmatched", len - cursor),
            ));
        }
        Ok(())
    }
}

impl<N: DomNode> Flow<N> {
    pub fn render(&self, ctx: &Context) -> Nodes<'_, N> {
        let nodes = match self {
            Flow::If(if_node) => if_node.select(ctx).map(|body| match body {
                Some(body) => render_list(body, ctx.clone()),
                None => Box::new(iter::empty()) as Nodes<'_, N>,
            }),
            Flow::For(for_node) => for_node.render(ctx),
            Flow::With(with) => with
                .bindings
                .iter()
                .map(|(name, path)| ctx.resolve(path).map(|value| (name.as_str(), value)))
                .collect::<Result<Vec<_>>>()
                .map(|bindings| render_list(&with.body, ctx.derive(bindings))),
            Flow::Switch(switch) => switch.select(ctx).map(|body| match body {
                Some(body) => render_list(body, ctx.clone()),
                None => Box::new(iter::empty()) as Nodes<'_, N>,
            }),
        };
        nodes.unwrap_or_else(|e| Box::new(iter::once(Err(e))))
    }
}

impl<N> IfNode<N> {
    /// The branch to render, if any
    fn select(&self, ctx: &Context) -> Result<Option<&[Compiled<N>]>> {
        if self.condition.evaluate(ctx)? {
            trace!(test = %self.condition.test, "if: then branch");
            return Ok(Some(self.then_body.as_slice()));
        }
        for (i, branch) in self.elif_branches.iter().enumerate() {
            if branch.condition.evaluate(ctx)? {
                trace!(test = %branch.condition.test, branch = i, "if: else-if branch");
                return Ok(Some(branch.body.as_slice()));
            }
        }
        trace!(test = %self.condition.test, has_else = self.else_body.is_some(), "if: fell through");
        Ok(self.else_body.as_deref())
    }
}

impl<N> SwitchNode<N> {
    /// The body of the first matching case, else the default
    fn select(&self, ctx: &Context) -> Result<Option<&[Compiled<N>]>> {
        for (i, case) in self.cases.iter().enumerate() {
            if equals(ctx, &self.value, &case.value)? {
                trace!(value = %self.value, case = i, "switch: case matched");
                return Ok(Some(case.body.as_slice()));
            }
        }
        trace!(value = %self.value, has_default = self.default.is_some(), "switch: no case matched");
        Ok(self.default.as_deref())
    }
}

impl<N: DomNode> ForNode<N> {
    fn render(&self, ctx: &Context) -> Result<Nodes<'_, N>> {
        let items = match &self.key_name {
            Some(_) => Items::Entries(ctx.iterate_with_key(&self.iterable)?),
            None => Items::Values(ctx.iterate(&self.iterable)?),
        };
        trace!(iterable = %self.iterable, iterations = items.len(), to_top = self.to_top, "for");

        if items.is_empty() {
            return Ok(match &self.empty_body {
                Some(body) => render_list(body, ctx.clone()),
                None => Box::new(iter::empty()),
            });
        }

        let scopes = Scopes {
            node: self,
            parent: ctx.clone(),
            items,
            position: 0,
        };

        if self.to_top {
            // Each block has to be complete before it can go in front of the last
            let mut blocks = Vec::with_capacity(scopes.items.len());
            for scope in scopes {
                blocks.push(render_list(&self.body, scope).collect::<Result<Vec<_>>>()?);
            }
            return Ok(Box::new(blocks.into_iter().rev().flatten().map(Ok)));
        }

        Ok(until_error(
            scopes.flat_map(move |scope| render_list(&self.body, scope)),
        ))
    }
}

enum Items {
    Values(Values),
    Entries(Entries),
}

impl Items {
    fn len(&self) -> usize {
        match self {
            Items::Values(values) => values.len(),
            Items::Entries(entries) => entries.len(),
        }
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One derived context per iteration of a `gb-for`
struct Scopes<'a, N> {
    node: &'a ForNode<N>,
    parent: Context,
    items: Items,
    position: usize,
}

impl<N> Iterator for Scopes<'_, N> {
    type Item = Context;

    fn next(&mut self) -> Option<Context> {
        let (key, value) = match &mut self.items {
            Items::Values(values) => (None, values.next()?),
            Items::Entries(entries) => {
                let (key, value) = entries.next()?;
                (Some(key), value)
            }
        };

        let mut bindings = vec![(self.node.value_name.as_str(), value)];
        if let (Some(name), Some(key)) = (&self.node.key_name, key) {
            bindings.push((name.as_str(), Value::from(key)));
        }
        if let Some(index) = &self.node.index {
            let i = index.start + self.position as f64 * index.step;
            bindings.push((index.name.as_str(), Value::from(i)));
        }
        self.position += 1;

        Some(self.parent.derive(bindings))
    }
}

impl Condition {
    /// Evaluate against `ctx`.
    ///
    /// `is-null` alone decides when present. Otherwise `eq` and the numeric
    /// comparisons are ANDed in order; with none of them the value's
    /// truthiness decides. `not` inverts the outcome.
    pub fn evaluate(&self, ctx: &Context) -> Result<bool> {
        let value = ctx.lookup(&self.test)?;

        let result = if self.is_null {
            value.is_null()
        } else {
            let mut result = None;

            if let Some(operand) = &self.eq {
                result = Some(equals(ctx, &self.test, operand)?);
            }

            for (comparison, operand) in &self.comparisons {
                if result == Some(false) {
                    break;
                }
                let lhs = ctx.as_number(&self.test)?;
                let rhs = match operand {
                    Operand::Literal(raw) => parse_number(raw),
                    Operand::Path(path) => ctx.as_number(path)?,
                };
                result = Some(comparison.apply(lhs, rhs));
            }

            result.unwrap_or_else(|| value.is_truthy())
        };

        Ok(result != self.not)
    }
}

/// `eq` semantics: numeric when both sides are numeric, string form otherwise
fn equals(ctx: &Context, path: &str, operand: &Operand) -> Result<bool> {
    let lhs_number = numeric(ctx.lookup(path)?);
    let lhs = ctx.as_string(path)?;
    let (rhs, rhs_number) = match operand {
        Operand::Literal(raw) => (raw.clone(), numeric_str(raw)),
        Operand::Path(path) => (ctx.as_string(path)?, numeric(ctx.lookup(path)?)),
    };
    Ok(match (lhs_number, rhs_number) {
        (Some(a), Some(b)) => a == b,
        _ => lhs == rhs,
    })
}

/// Numeric value of a number, or of a string that spells one
fn numeric(value: &Value) -> Option<f64> {
    if let Some(n) = value.as_number() {
        return Some(n.to_f64_lossy());
    }
    value.as_string().and_then(|s| numeric_str(s.as_str()))
}

fn numeric_str(s: &str) -> Option<f64> {
    if s.trim().is_empty() {
        return None;
    }
    let n = parse_number(s);
    (!n.is_nan()).then_some(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_value::VArray;

    fn list<T: Into<Value>, const N: usize>(items: [T; N]) -> Value {
        Value::from(VArray::from_iter(items))
    }

    fn map<const N: usize>(entries: [(&str, Value); N]) -> Value {
        Value::from(VObject::from_iter(entries))
    }

    #[test]
    fn test_simple_text() {
        let t = Template::parse("Hello, world!").unwrap();
        assert_eq!(t.render_with(Vec::<(String, Value)>::new()).unwrap(), "Hello, world!");
    }

    #[test]
    fn test_variable() {
        let t = Template::parse("Hello, {{name}}!").unwrap();
        let result = t.render_with([("name", Value::from("Alice"))]).unwrap();
        assert_eq!(result, "Hello, Alice!");
    }

    #[test]
    fn test_dynamic_attribute_goes_last() {
        let t = Template::parse(r#"<span id="elm-{{baz}}" class="mytype"></span>"#).unwrap();
        let result = t.render_with([("baz", "foo1234")]).unwrap();
        assert_eq!(result, r#"<span class="mytype" id="elm-foo1234"></span>"#);
    }

    #[test]
    fn test_static_and_dynamic_attribute() {
        let t = Template::parse(r#"<p class="hoge" id="{{uid}}">x</p>"#).unwrap();
        let result = t.render_with([("uid", "7")]).unwrap();
        assert_eq!(result, r#"<p class="hoge" id="7">x</p>"#);
    }

    #[test]
    fn test_for_with_empty_branch() {
        let t = Template::parse(
            r#"<gb-for in="xs" as="v">{{v}}-</gb-for><gb-for-else>none</gb-for-else>"#,
        )
        .unwrap();
        assert_eq!(t.render_with([("xs", list([10, 20, 30]))]).unwrap(), "10-20-30-");
        assert_eq!(t.render_with([("xs", list::<i32, 0>([]))]).unwrap(), "none");
    }

    #[test]
    fn test_for_without_empty_branch() {
        let t = Template::parse(r#"<gb-for in="xs" as="v">{{v}}</gb-for>"#).unwrap();
        assert_eq!(t.render_with([("xs", list::<i32, 0>([]))]).unwrap(), "");
    }

    #[test]
    fn test_for_over_mapping_with_key_and_index() {
        let t = Template::parse(
            r#"<gb-for in="m" as="v" key="k" index="i" index-start="1" index-step="10">[{{i}}:{{k}}={{v}}]</gb-for>"#,
        )
        .unwrap();
        let data = map([("b", Value::from(2)), ("a", Value::from(1))]);
        assert_eq!(t.render_with([("m", data)]).unwrap(), "[1:b=2][11:a=1]");
    }

    #[test]
    fn test_for_key_requires_mapping() {
        let t = Template::parse(r#"<gb-for in="xs" as="v" key="k">{{v}}</gb-for>"#).unwrap();
        let err = t.render_with([("xs", list([1]))]).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { expected: "mapping", .. }));
    }

    #[test]
    fn test_for_to_top_reverses_blocks() {
        let t = Template::parse(r#"<gb-for in="xs" as="v" to-top><i>{{v}}</i>,</gb-for>"#).unwrap();
        let result = t.render_with([("xs", list(["a", "b", "c"]))]).unwrap();
        assert_eq!(result, "<i>c</i>,<i>b</i>,<i>a</i>,");
    }

    #[test]
    fn test_nested_loops_see_outer_bindings() {
        let t = Template::parse(
            r#"<gb-for in="rows" as="row"><gb-for in="row.cells" as="c">{{row.name}}{{c}} </gb-for></gb-for>"#,
        )
        .unwrap();
        let rows = list([
            map([("name", Value::from("r")), ("cells", list([1, 2]))]),
            map([("name", Value::from("s")), ("cells", list([3]))]),
        ]);
        assert_eq!(t.render_with([("rows", rows)]).unwrap(), "r1 r2 s3 ");
    }

    #[test]
    fn test_if_gt() {
        let t = Template::parse(r#"<gb-if test="n" gt="5">big</gb-if>"#).unwrap();
        assert_eq!(t.render_with([("n", 3)]).unwrap(), "");
        assert_eq!(t.render_with([("n", 7)]).unwrap(), "big");
    }

    #[test]
    fn test_if_else_chain() {
        let t = Template::parse(
            r#"<gb-if test="n" ge="10">large</gb-if><gb-else-if test="n" ge="5">medium</gb-else-if><gb-else>small</gb-else>"#,
        )
        .unwrap();
        assert_eq!(t.render_with([("n", 12)]).unwrap(), "large");
        assert_eq!(t.render_with([("n", 5)]).unwrap(), "medium");
        assert_eq!(t.render_with([("n", 1)]).unwrap(), "small");
    }

    #[test]
    fn test_if_truthiness_and_not() {
        let t = Template::parse(r#"<gb-if test="s">yes</gb-if><gb-else>no</gb-else>"#).unwrap();
        assert_eq!(t.render_with([("s", "")]).unwrap(), "no");
        assert_eq!(t.render_with([("s", "x")]).unwrap(), "yes");

        let t = Template::parse(r#"<gb-if test="s" not>empty</gb-if>"#).unwrap();
        assert_eq!(t.render_with([("s", "")]).unwrap(), "empty");
    }

    #[test]
    fn test_if_range_is_anded() {
        let t = Template::parse(r#"<gb-if test="n" gt="1" lt="5">in</gb-if>"#).unwrap();
        assert_eq!(t.render_with([("n", 3)]).unwrap(), "in");
        assert_eq!(t.render_with([("n", 0)]).unwrap(), "");
        assert_eq!(t.render_with([("n", 9)]).unwrap(), "");
    }

    #[test]
    fn test_if_eq() {
        let t = Template::parse(r#"<gb-if test="v" eq="30">hit</gb-if>"#).unwrap();
        assert_eq!(t.render_with([("v", 30)]).unwrap(), "hit");
        assert_eq!(t.render_with([("v", 30.0)]).unwrap(), "hit");
        assert_eq!(t.render_with([("v", "30.0")]).unwrap(), "hit");
        assert_eq!(t.render_with([("v", 31)]).unwrap(), "");

        let t = Template::parse(r#"<gb-if test="v" eq="abc">hit</gb-if>"#).unwrap();
        assert_eq!(t.render_with([("v", "abc")]).unwrap(), "hit");
        assert_eq!(t.render_with([("v", "abd")]).unwrap(), "");
    }

    #[test]
    fn test_if_operand_from_path() {
        let t = Template::parse(r#"<gb-if test="a" lt="b" lt-v>less</gb-if>"#).unwrap();
        assert_eq!(
            t.render_with([("a", Value::from(1)), ("b", Value::from(2))]).unwrap(),
            "less"
        );
        assert_eq!(
            t.render_with([("a", Value::from(3)), ("b", Value::from(2))]).unwrap(),
            ""
        );
    }

    #[test]
    fn test_if_is_null() {
        let t = Template::parse(r#"<gb-if test="v" is-null>null</gb-if>"#).unwrap();
        assert_eq!(t.render_with([("v", Value::NULL)]).unwrap(), "null");
        assert_eq!(t.render_with([("v", 0)]).unwrap(), "");

        let t = Template::parse(r#"<gb-if test="v" is-null not>set</gb-if>"#).unwrap();
        assert_eq!(t.render_with([("v", 0)]).unwrap(), "set");
    }

    #[test]
    fn test_if_undefined_is_an_error() {
        let t = Template::parse(r#"<gb-if test="missing">x</gb-if>"#).unwrap();
        let err = t.render_with(Vec::<(String, Value)>::new()).unwrap_err();
        assert!(matches!(err, Error::UndefinedPath { .. }));
    }

    #[test]
    fn test_with_binds_resolved_values() {
        let t = Template::parse(r#"<gb-with u="data.user">{{u.name}}</gb-with>"#).unwrap();
        let data = map([("user", map([("name", Value::from("Ann"))]))]);
        assert_eq!(t.render_with([("data", data)]).unwrap(), "Ann");
    }

    #[test]
    fn test_flow_interleaves_with_static_children() {
        let t = Template::parse(
            r#"<ul><li>first</li><gb-for in="xs" as="x"><li>{{x}}</li></gb-for><li>{{last}}</li></ul>"#,
        )
        .unwrap();
        let result = t
            .render_with([("xs", list(["a", "b"])), ("last", Value::from("z"))])
            .unwrap();
        assert_eq!(result, "<ul><li>first</li><li>a</li><li>b</li><li>z</li></ul>");
    }

    #[test]
    fn test_flow_as_last_child() {
        let t = Template::parse(r#"<div id="{{id}}"><b>x</b><gb-if test="on"><i>on</i></gb-if></div>"#)
            .unwrap();
        let result = t
            .render_with([("id", Value::from(1)), ("on", Value::from(true))])
            .unwrap();
        assert_eq!(result, r#"<div id="1"><b>x</b><i>on</i></div>"#);
    }

    #[test]
    fn test_alignment_error_on_leftover_children() {
        let element = ElementNode {
            skeleton: Node::element(
                "div",
                Vec::<(String, String)>::new(),
                vec![Node::text("a"), Node::text("b")],
            ),
            attributes: Vec::new(),
            children: vec![Compiled::Static(Node::text("a"))],
        };
        let err = element.render(&Context::new(VObject::new())).unwrap_err();
        assert!(matches!(err, Error::Alignment { ref tag, .. } if tag == "div"));
    }

    #[test]
    fn test_alignment_error_on_missing_children() {
        let element = ElementNode {
            skeleton: Node::element("div", Vec::<(String, String)>::new(), vec![]),
            attributes: Vec::new(),
            children: vec![Compiled::Leaf(crate::text::CompiledText::compile("{{x}}"))],
        };
        let ctx = Context::new(map([("x", Value::from(1))]));
        assert!(matches!(element.render(&ctx), Err(Error::Alignment { .. })));
    }

    #[test]
    fn test_render_is_lazy() {
        let t = Template::parse(r#"<p>ok</p>{{missing}}"#).unwrap();
        let ctx = Context::new(VObject::new());
        let mut nodes = t.render(&ctx);
        assert_eq!(nodes.next().unwrap().unwrap().to_html(), "<p>ok</p>");
        assert!(matches!(nodes.next(), Some(Err(Error::UndefinedPath { .. }))));
    }

    #[test]
    fn test_render_stops_at_first_error() {
        let ctx = Context::new(map([(
            "xs",
            list([Value::from(1), map([("a", Value::from("A"))])]),
        )]));

        let t = Template::parse(r#"{{missing}}<p>ok</p><gb-for in="xs" as="v">{{v}}</gb-for>"#)
            .unwrap();
        let out: Vec<_> = t.render(&ctx).collect();
        assert_eq!(out.len(), 1);
        assert!(matches!(out[0], Err(Error::UndefinedPath { ref path, .. }) if path == "missing"));

        // a failing iteration ends the loop and everything after it
        let t = Template::parse(r#"<gb-for in="xs" as="v"><i>{{v.a}}</i></gb-for><p>after</p>"#)
            .unwrap();
        let out: Vec<_> = t.render(&ctx).collect();
        assert_eq!(out.len(), 1);
        assert!(matches!(out[0], Err(Error::UndefinedPath { ref path, .. }) if path == "v.a"));

        let t = Template::parse(r#"<gb-for in="xs" as="v" to-top><i>{{v.a}}</i></gb-for>"#)
            .unwrap();
        let out: Vec<_> = t.render(&ctx).collect();
        assert_eq!(out.len(), 1);
        assert!(out[0].is_err());
    }

    #[test]
    fn test_for_fractional_index() {
        let t = Template::parse(r#"<gb-for in="xs" as="v" index="i" index-step="0.5">{{i}},</gb-for>"#)
            .unwrap();
        assert_eq!(t.render_with([("xs", list([1, 2, 3]))]).unwrap(), "0,0.5,1,");
    }

    #[test]
    fn test_for_index_at_integer_limits() {
        let t = Template::parse(
            r#"<gb-for in="xs" as="v" index="i" index-start="9223372036854775807">{{i}},</gb-for>"#,
        )
        .unwrap();
        let result = t.render_with([("xs", list([1, 2]))]).unwrap();
        assert!(result.starts_with("922337203685477580"), "{result}");

        let t = Template::parse(
            r#"<gb-for in="xs" as="v" index="i" index-start="-9223372036854775808" index-step="-1e300">{{i}}</gb-for>"#,
        )
        .unwrap();
        assert!(t.render_with([("xs", list([1, 2]))]).is_ok());
    }

    #[test]
    fn test_switch_first_match_wins() {
        let t = Template::parse(
            r#"<gb-switch value="kind"><gb-case value="1">one</gb-case><gb-case value="1.0">also one</gb-case><gb-case value="b">bee</gb-case><gb-case-default>other</gb-case-default></gb-switch>"#,
        )
        .unwrap();
        assert_eq!(t.render_with([("kind", Value::from(1))]).unwrap(), "one");
        assert_eq!(t.render_with([("kind", Value::from("1"))]).unwrap(), "one");
        assert_eq!(t.render_with([("kind", Value::from("b"))]).unwrap(), "bee");
        assert_eq!(t.render_with([("kind", Value::from("c"))]).unwrap(), "other");
    }

    #[test]
    fn test_switch_without_default() {
        let t = Template::parse(
            r#"<p><gb-switch value="a"><gb-case value="b" value-v>same</gb-case></gb-switch></p>"#,
        )
        .unwrap();
        assert_eq!(t.render_with([("a", "x"), ("b", "x")]).unwrap(), "<p>same</p>");
        assert_eq!(t.render_with([("a", "x"), ("b", "y")]).unwrap(), "<p></p>");

        let err = t.render_with([("b", "y")]).unwrap_err();
        assert!(matches!(err, Error::UndefinedPath { ref path, .. } if path == "a"));
    }

    #[test]
    fn test_render_into_parent() {
        let t = Template::parse(r#"<li>{{a}}</li><li>b</li>"#).unwrap();
        let mut parent = Node::create_element("ul");
        t.render_into(&mut parent, &Context::new(map([("a", Value::from("A"))])))
            .unwrap();
        assert_eq!(parent.to_html(), "<ul><li>A</li><li>b</li></ul>");
    }

    #[test]
    fn test_template_is_reusable() {
        let t = Template::parse(r#"<b>{{n}}</b>"#).unwrap();
        for n in 0..3 {
            assert_eq!(t.render_with([("n", n)]).unwrap(), format!("<b>{n}</b>"));
        }
    }
}
