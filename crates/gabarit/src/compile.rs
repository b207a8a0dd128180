//! Node compiler
//!
//! Walks a source tree once and splits it into what never changes (baked into
//! skeleton nodes that are cloned at render time) and what depends on data
//! (placeholder text, dynamic attributes, directives).
//!
//! ```text
//! <ul class="list">                  Element { skeleton: <ul class="list"></ul>,
//!   <gb-for in="items" as="item">      children: [
//!     <li>{{item}}</li>                  Flow(For { body: [Element(<li>, [Leaf])] }),
//!   </gb-for>                          ] }
//! </ul>
//! ```

use crate::config::Options;
use crate::dom::DomNode;
use crate::error::{Error, Result};
use crate::text::CompiledText;
use tracing::{debug, instrument, trace};

/// A compiled node
#[derive(Debug)]
pub enum Compiled<N> {
    /// A subtree with nothing dynamic in it, cloned verbatim
    Static(N),
    /// A text node with placeholders
    Leaf(CompiledText),
    /// An element with dynamic attributes or dynamic descendants
    Element(ElementNode<N>),
    /// A directive; contributes any number of nodes and has no skeleton presence
    Flow(Flow<N>),
}

impl<N> Compiled<N> {
    pub fn is_static(&self) -> bool {
        matches!(self, Compiled::Static(_))
    }
}

/// An element that needs patching after its skeleton is cloned
#[derive(Debug)]
pub struct ElementNode<N> {
    /// The element with its static attributes and the skeletons of its
    /// non-flow children
    pub skeleton: N,
    /// Dynamic attributes, in source order
    pub attributes: Vec<(String, CompiledText)>,
    /// Non-flow entries line up one-to-one with the skeleton's children
    pub children: Vec<Compiled<N>>,
}

/// Control-flow directives
#[derive(Debug)]
pub enum Flow<N> {
    If(IfNode<N>),
    For(ForNode<N>),
    With(WithNode<N>),
    Switch(SwitchNode<N>),
}

/// `gb-if`, with any `gb-else-if` / `gb-else` attached
#[derive(Debug)]
pub struct IfNode<N> {
    /// The condition expression
    pub condition: Condition,
    /// Body if condition is true
    pub then_body: Vec<Compiled<N>>,
    /// `gb-else-if` branches, tried in order
    pub elif_branches: Vec<ElifBranch<N>>,
    /// Optional else body
    pub else_body: Option<Vec<Compiled<N>>>,
}

#[derive(Debug)]
pub struct ElifBranch<N> {
    pub condition: Condition,
    pub body: Vec<Compiled<N>>,
}

/// `gb-for`, with an optional `gb-for-else`
#[derive(Debug)]
pub struct ForNode<N> {
    /// Path of the sequence or mapping to iterate
    pub iterable: String,
    /// Name bound to each value
    pub value_name: String,
    /// Name bound to each key; iterating with a key requires a mapping
    pub key_name: Option<String>,
    pub index: Option<LoopIndex>,
    /// Emit each iteration ahead of the previous ones
    pub to_top: bool,
    pub body: Vec<Compiled<N>>,
    /// Rendered when there is nothing to iterate
    pub empty_body: Option<Vec<Compiled<N>>>,
}

/// Running counter bound as `start + i * step`
#[derive(Debug, Clone, PartialEq)]
pub struct LoopIndex {
    pub name: String,
    pub start: f64,
    pub step: f64,
}

/// `gb-with`: bind names to resolved paths for the body
#[derive(Debug)]
pub struct WithNode<N> {
    /// `(name, path)` pairs, in attribute order
    pub bindings: Vec<(String, String)>,
    pub body: Vec<Compiled<N>>,
}

/// `gb-switch`: the first `gb-case` whose value equals the switch value wins
#[derive(Debug)]
pub struct SwitchNode<N> {
    /// Path of the value to match
    pub value: String,
    pub cases: Vec<CaseBranch<N>>,
    /// `gb-case-default`, rendered when no case matches
    pub default: Option<Vec<Compiled<N>>>,
}

#[derive(Debug)]
pub struct CaseBranch<N> {
    pub value: Operand,
    pub body: Vec<Compiled<N>>,
}

/// The test of a `gb-if` or `gb-else-if`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    /// Path of the value under test
    pub test: String,
    pub eq: Option<Operand>,
    /// Numeric comparisons in `gt`, `ge`, `lt`, `le` order
    pub comparisons: Vec<(Comparison, Operand)>,
    pub is_null: bool,
    pub not: bool,
}

/// Right-hand side of a comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Literal(String),
    /// Marked with an `<op>-v` attribute: the operand is itself a path
    Path(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Gt,
    Ge,
    Lt,
    Le,
}

impl Comparison {
    const ALL: [(Comparison, &'static str); 4] = [
        (Comparison::Gt, "gt"),
        (Comparison::Ge, "ge"),
        (Comparison::Lt, "lt"),
        (Comparison::Le, "le"),
    ];

    pub fn apply(self, lhs: f64, rhs: f64) -> bool {
        match self {
            Comparison::Gt => lhs > rhs,
            Comparison::Ge => lhs >= rhs,
            Comparison::Lt => lhs < rhs,
            Comparison::Le => lhs <= rhs,
        }
    }
}

/// A compiled template: parse once, render many times.
#[derive(Debug)]
pub struct Template<N> {
    nodes: Vec<Compiled<N>>,
}

impl<N: DomNode> Template<N> {
    /// Compile a list of sibling nodes.
    #[instrument(level = "debug", skip_all, fields(roots = source.len()))]
    pub fn compile(source: &[N], options: &Options) -> Result<Self> {
        let mut compiler = Compiler {
            options,
            stats: Stats::default(),
        };
        let nodes = compiler.compile_children(source)?;
        debug!(
            compiled = nodes.len(),
            statics = compiler.stats.statics,
            elements = compiler.stats.elements,
            leaves = compiler.stats.leaves,
            flows = compiler.stats.flows,
            "template compiled"
        );
        Ok(Self { nodes })
    }

    pub fn nodes(&self) -> &[Compiled<N>] {
        &self.nodes
    }
}

#[derive(Debug, Default)]
struct Stats {
    statics: usize,
    elements: usize,
    leaves: usize,
    flows: usize,
}

struct Compiler<'o> {
    options: &'o Options,
    stats: Stats,
}

/// The directive a companion (`gb-else`, `gb-for-else`, ...) may attach to
#[derive(Debug, Clone, Copy)]
enum Open {
    If(usize),
    For(usize),
}

impl Compiler<'_> {
    fn compile_children<N: DomNode>(&mut self, source: &[N]) -> Result<Vec<Compiled<N>>> {
        let mut out = Vec::with_capacity(source.len());
        let mut open: Option<Open> = None;

        for node in source {
            if let Some(tag) = node.tag_name()
                && let Some(directive) = self.options.directive(tag)
            {
                open = self.compile_directive(node, tag, directive, open, &mut out)?;
                continue;
            }

            // Whitespace between a directive and its companion keeps the pairing open
            if !node.text().is_some_and(|t| t.trim().is_empty()) {
                open = None;
            }
            out.push(self.compile_node(node)?);
        }

        Ok(out)
    }

    /// Compile one directive into `out`, returning the directive left open for
    /// companions.
    fn compile_directive<N: DomNode>(
        &mut self,
        node: &N,
        tag: &str,
        directive: &str,
        open: Option<Open>,
        out: &mut Vec<Compiled<N>>,
    ) -> Result<Option<Open>> {
        match directive {
            "if" => {
                let condition = self.condition(node, tag)?;
                let then_body = self.compile_children(node.child_nodes())?;
                out.push(self.flow(Flow::If(IfNode {
                    condition,
                    then_body,
                    elif_branches: Vec::new(),
                    else_body: None,
                })));
                Ok(Some(Open::If(out.len() - 1)))
            }
            "else-if" => {
                let condition = self.condition(node, tag)?;
                let body = self.compile_children(node.child_nodes())?;
                let if_node = open_if(out, open, tag, "`if` or `else-if`")?;
                if_node.elif_branches.push(ElifBranch { condition, body });
                Ok(open)
            }
            "else" => {
                let body = self.compile_children(node.child_nodes())?;
                let if_node = open_if(out, open, tag, "`if` or `else-if`")?;
                if_node.else_body = Some(body);
                Ok(None)
            }
            "for" => {
                let for_node = self.for_node(node, tag)?;
                out.push(self.flow(Flow::For(for_node)));
                Ok(Some(Open::For(out.len() - 1)))
            }
            "for-else" => {
                let body = self.compile_children(node.child_nodes())?;
                let for_node = match open {
                    Some(Open::For(index)) => match out.get_mut(index) {
                        Some(Compiled::Flow(Flow::For(for_node))) => Some(for_node),
                        _ => None,
                    },
                    _ => None,
                };
                let for_node = for_node.ok_or_else(|| Error::MisplacedDirective {
                    tag: tag.to_string(),
                    expected: "`for`",
                })?;
                for_node.empty_body = Some(body);
                Ok(None)
            }
            "with" => {
                let bindings = node
                    .attribute_names()
                    .into_iter()
                    .filter_map(|name| {
                        let path = node.get_attribute(&name)?.to_string();
                        Some((name, path))
                    })
                    .collect();
                let body = self.compile_children(node.child_nodes())?;
                out.push(self.flow(Flow::With(WithNode { bindings, body })));
                Ok(None)
            }
            "switch" => {
                let switch = self.switch_node(node, tag)?;
                out.push(self.flow(Flow::Switch(switch)));
                Ok(None)
            }
            "case" | "case-default" => Err(Error::UnexpectedContent {
                tag: tag.to_string(),
                position: "outside a `switch`",
            }),
            "comment" => {
                trace!("dropping comment directive");
                Ok(open)
            }
            _ => Err(Error::UnknownDirective {
                tag: tag.to_string(),
            }),
        }
    }

    fn compile_node<N: DomNode>(&mut self, node: &N) -> Result<Compiled<N>> {
        if let Some(text) = node.text() {
            let compiled = CompiledText::compile_with(text, self.options.placeholder_regex());
            return Ok(if compiled.has_dynamic() {
                self.stats.leaves += 1;
                Compiled::Leaf(compiled)
            } else {
                self.stats.statics += 1;
                Compiled::Static(node.clone_node(true))
            });
        }

        let mut skeleton = node.clone_node(false);
        let mut attributes = Vec::new();
        for name in node.attribute_names() {
            let Some(raw) = node.get_attribute(&name) else {
                continue;
            };
            let compiled = CompiledText::compile_with(raw, self.options.placeholder_regex());
            if compiled.has_dynamic() {
                skeleton.remove_attribute(&name);
                attributes.push((name, compiled));
            }
        }

        let children = self.compile_children(node.child_nodes())?;
        let mut dynamic = !attributes.is_empty();
        for child in &children {
            match child {
                Compiled::Static(n) => skeleton.append_child(n.clone_node(true)),
                Compiled::Leaf(text) => skeleton.append_child(N::create_text(text.skeleton())),
                Compiled::Element(element) => {
                    skeleton.append_child(element.skeleton.clone_node(true))
                }
                Compiled::Flow(_) => {}
            }
            dynamic |= !child.is_static();
        }

        if !dynamic {
            // Statics were counted one by one; fold them into this node
            self.stats.statics = self.stats.statics.saturating_sub(children.len()) + 1;
            return Ok(Compiled::Static(skeleton));
        }

        self.stats.elements += 1;
        Ok(Compiled::Element(ElementNode {
            skeleton,
            attributes,
            children,
        }))
    }

    fn flow<N>(&mut self, flow: Flow<N>) -> Compiled<N> {
        self.stats.flows += 1;
        Compiled::Flow(flow)
    }

    fn condition<N: DomNode>(&self, node: &N, tag: &str) -> Result<Condition> {
        Ok(Condition {
            test: required(node, tag, "test")?,
            eq: operand(node, "eq"),
            comparisons: Comparison::ALL
                .iter()
                .filter_map(|&(cmp, name)| operand(node, name).map(|op| (cmp, op)))
                .collect(),
            is_null: node.has_attribute("is-null"),
            not: node.has_attribute("not"),
        })
    }

    fn for_node<N: DomNode>(&mut self, node: &N, tag: &str) -> Result<ForNode<N>> {
        let iterable = required(node, tag, "in")?;
        let value_name = required(node, tag, "as")?;
        let index = match node.get_attribute("index") {
            Some(name) => Some(LoopIndex {
                name: name.to_string(),
                start: number(node, tag, "index-start", 0.0)?,
                step: number(node, tag, "index-step", 1.0)?,
            }),
            None => None,
        };

        Ok(ForNode {
            iterable,
            value_name,
            key_name: node.get_attribute("key").map(str::to_string),
            index,
            to_top: node.has_attribute("to-top"),
            body: self.compile_children(node.child_nodes())?,
            empty_body: None,
        })
    }

    /// Only cases, a single default, comments and whitespace may sit
    /// directly inside a switch.
    fn switch_node<N: DomNode>(&mut self, node: &N, tag: &str) -> Result<SwitchNode<N>> {
        let mut switch = SwitchNode {
            value: required(node, tag, "value")?,
            cases: Vec::new(),
            default: None,
        };

        for child in node.child_nodes() {
            let directive = child
                .tag_name()
                .and_then(|t| self.options.directive(t).map(|d| (t, d)));
            match directive {
                Some((case_tag, "case")) => {
                    let value =
                        operand(child, "value").ok_or_else(|| Error::MissingAttribute {
                            tag: case_tag.to_string(),
                            attribute: "value",
                        })?;
                    let body = self.compile_children(child.child_nodes())?;
                    switch.cases.push(CaseBranch { value, body });
                }
                Some((case_tag, "case-default")) => {
                    if switch.default.is_some() {
                        return Err(Error::UnexpectedContent {
                            tag: case_tag.to_string(),
                            position: "twice in one `switch`",
                        });
                    }
                    switch.default = Some(self.compile_children(child.child_nodes())?);
                }
                Some((_, "comment")) => {}
                _ if child.text().is_some_and(|t| t.trim().is_empty()) => {}
                _ => {
                    return Err(Error::UnexpectedContent {
                        tag: child.tag_name().unwrap_or("#text").to_string(),
                        position: "inside a `switch`",
                    });
                }
            }
        }

        trace!(value = %switch.value, cases = switch.cases.len(), "switch compiled");
        Ok(switch)
    }
}

/// The `name` attribute as an operand; a `name-v` marker makes it a path
fn operand<N: DomNode>(node: &N, name: &str) -> Option<Operand> {
    node.get_attribute(name).map(|raw| {
        if node.has_attribute(&format!("{name}-v")) {
            Operand::Path(raw.to_string())
        } else {
            Operand::Literal(raw.to_string())
        }
    })
}

fn open_if<'o, N>(
    out: &'o mut [Compiled<N>],
    open: Option<Open>,
    tag: &str,
    expected: &'static str,
) -> Result<&'o mut IfNode<N>> {
    if let Some(Open::If(index)) = open
        && let Some(Compiled::Flow(Flow::If(if_node))) = out.get_mut(index)
    {
        return Ok(if_node);
    }
    Err(Error::MisplacedDirective {
        tag: tag.to_string(),
        expected,
    })
}

fn required<N: DomNode>(node: &N, tag: &str, attribute: &'static str) -> Result<String> {
    node.get_attribute(attribute)
        .map(str::to_string)
        .ok_or_else(|| Error::MissingAttribute {
            tag: tag.to_string(),
            attribute,
        })
}

fn number<N: DomNode>(node: &N, tag: &str, attribute: &'static str, default: f64) -> Result<f64> {
    let Some(raw) = node.get_attribute(attribute) else {
        return Ok(default);
    };
    match raw.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(Error::InvalidAttribute {
            tag: tag.to_string(),
            attribute,
            value: raw.to_string(),
        }),
    }
}
