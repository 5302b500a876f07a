//! Syntax trees produced by the parser
//!
//! Nodes live in one arena and refer to each other by `NodeId`. A terminal
//! node records the token it matched; a nonterminal node records the
//! right-hand side it was expanded with and one child per symbol of it. An
//! empty right-hand side is an ε expansion.
//!
//! Every traversal below uses an explicit stack, so tree depth is bounded by
//! memory rather than by the call stack.

use crate::utils::Span;
use serde::Serialize;
use std::fmt::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeKind {
    Terminal {
        value: Option<String>,
        span: Option<Span>,
    },
    Nonterminal {
        rhs: Option<Vec<String>>,
        children: Vec<NodeId>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    label: String,
    #[serde(flatten)]
    kind: NodeKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyntaxTree {
    root: NodeId,
    nodes: Vec<Node>,
}

impl SyntaxTree {
    /// Tree holding only an unexpanded (or unmatched) root
    pub(crate) fn with_root(label: &str, is_nonterminal: bool) -> Self {
        let mut tree = Self {
            root: NodeId(0),
            nodes: Vec::new(),
        };
        tree.root = tree.add_node(label, is_nonterminal);
        tree
    }

    pub(crate) fn add_node(&mut self, label: &str, is_nonterminal: bool) -> NodeId {
        let kind = if is_nonterminal {
            NodeKind::Nonterminal {
                rhs: None,
                children: Vec::new(),
            }
        } else {
            NodeKind::Terminal {
                value: None,
                span: None,
            }
        };
        self.nodes.push(Node {
            label: label.to_string(),
            kind,
        });
        NodeId(self.nodes.len() - 1)
    }

    /// Record the token text matched by a terminal node
    pub(crate) fn set_value(&mut self, id: NodeId, matched: String, matched_span: Span) {
        if let Some(Node {
            kind: NodeKind::Terminal { value, span },
            ..
        }) = self.nodes.get_mut(id.0)
        {
            *value = Some(matched);
            *span = Some(matched_span);
        }
    }

    /// Attach a production and its child nodes to a nonterminal node
    pub(crate) fn set_rhs_children(&mut self, id: NodeId, production: Vec<String>, kids: Vec<NodeId>) {
        if let Some(Node {
            kind: NodeKind::Nonterminal { rhs, children },
            ..
        }) = self.nodes.get_mut(id.0)
        {
            *rhs = Some(production);
            *children = kids;
        }
    }

    pub(crate) fn label_of(&self, id: NodeId) -> &str {
        &self.nodes[id.0].label
    }

    pub fn root(&self) -> NodeRef<'_> {
        NodeRef {
            tree: self,
            id: self.root,
        }
    }

    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_>> {
        (id.0 < self.nodes.len()).then_some(NodeRef { tree: self, id })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in depth-first, left-to-right order
    pub fn pre_order(&self) -> PreOrder<'_> {
        PreOrder {
            tree: self,
            stack: vec![self.root],
        }
    }

    /// Matched terminals left to right; their values spell the parsed input
    pub fn leaves(&self) -> impl Iterator<Item = NodeRef<'_>> {
        self.pre_order().filter(|node| node.value().is_some())
    }

    /// One-line bracketed form, e.g. `#S(EVEN="ab" #S() &&="&&" #S())`
    pub fn render(&self) -> String {
        enum Step {
            Node(NodeId),
            Text(&'static str),
        }

        let mut out = String::new();
        let mut stack = vec![Step::Node(self.root)];

        while let Some(step) = stack.pop() {
            let id = match step {
                Step::Text(text) => {
                    out.push_str(text);
                    continue;
                }
                Step::Node(id) => id,
            };
            let node = &self.nodes[id.0];
            out.push_str(&node.label);
            match &node.kind {
                NodeKind::Terminal {
                    value: Some(value), ..
                } => {
                    let _ = write!(out, "=\"{}\"", value);
                }
                NodeKind::Terminal { value: None, .. } => {}
                NodeKind::Nonterminal { rhs: None, .. } => {}
                NodeKind::Nonterminal {
                    rhs: Some(_),
                    children,
                } => {
                    out.push('(');
                    stack.push(Step::Text(")"));
                    for (i, child) in children.iter().enumerate().rev() {
                        stack.push(Step::Node(*child));
                        if i > 0 {
                            stack.push(Step::Text(" "));
                        }
                    }
                }
            }
        }

        out
    }

    /// Multi-line form, one node per line, indented two spaces per level
    pub fn render_indented(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![(self.root, 0usize)];

        while let Some((id, depth)) = stack.pop() {
            let node = &self.nodes[id.0];
            let _ = write!(out, "{:indent$}{}", "", node.label, indent = depth * 2);
            match &node.kind {
                NodeKind::Terminal {
                    value: Some(value), ..
                } => {
                    let _ = write!(out, " \"{}\"", value);
                }
                NodeKind::Nonterminal {
                    rhs: Some(rhs),
                    children,
                } => {
                    if rhs.is_empty() {
                        out.push_str(" ε");
                    }
                    for child in children.iter().rev() {
                        stack.push((*child, depth + 1));
                    }
                }
                _ => {}
            }
            out.push('\n');
        }

        out
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Read-only view of one node
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a SyntaxTree,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    fn node(&self) -> &'a Node {
        &self.tree.nodes[self.id.0]
    }

    /// Nonterminal symbol, or lexical class for a terminal
    pub fn label(&self) -> &'a str {
        &self.node().label
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.node().kind, NodeKind::Terminal { .. })
    }

    /// Matched token text; `None` for nonterminals
    pub fn value(&self) -> Option<&'a str> {
        match &self.node().kind {
            NodeKind::Terminal { value, .. } => value.as_deref(),
            NodeKind::Nonterminal { .. } => None,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match &self.node().kind {
            NodeKind::Terminal { span, .. } => *span,
            NodeKind::Nonterminal { .. } => None,
        }
    }

    /// Production this nonterminal was expanded with
    pub fn rhs(&self) -> Option<&'a [String]> {
        match &self.node().kind {
            NodeKind::Nonterminal { rhs, .. } => rhs.as_deref(),
            NodeKind::Terminal { .. } => None,
        }
    }

    pub fn is_epsilon(&self) -> bool {
        self.rhs().is_some_and(|rhs| rhs.is_empty())
    }

    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let tree = self.tree;
        let ids: &'a [NodeId] = match &self.node().kind {
            NodeKind::Nonterminal { children, .. } => children,
            NodeKind::Terminal { .. } => &[],
        };
        ids.iter().map(move |id| NodeRef { tree, id: *id })
    }

    pub fn child(&self, index: usize) -> Option<NodeRef<'a>> {
        self.children().nth(index)
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("label", &self.label())
            .field("value", &self.value())
            .finish()
    }
}

/// Iterator returned by `SyntaxTree::pre_order`
pub struct PreOrder<'a> {
    tree: &'a SyntaxTree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        if let NodeKind::Nonterminal { children, .. } = &self.tree.nodes[id.0].kind {
            self.stack.extend(children.iter().rev());
        }
        Some(NodeRef {
            tree: self.tree,
            id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Position;

    fn strings(symbols: &[&str]) -> Vec<String> {
        symbols.iter().map(|s| s.to_string()).collect()
    }

    /// `#S(EVEN="ab" #S() &&="&&" #S())`, built by hand
    fn sample_tree() -> SyntaxTree {
        let mut tree = SyntaxTree::with_root("#S", true);
        let root = tree.root().id();
        let rhs = strings(&["EVEN", "#S", "&&", "#S"]);
        let kids: Vec<NodeId> = rhs
            .iter()
            .map(|symbol| tree.add_node(symbol, symbol.starts_with('#')))
            .collect();
        tree.set_rhs_children(root, rhs, kids.clone());

        let ab = Span::new(Position::start(), Position::new(2, 1, 3));
        let and = Span::new(Position::new(2, 1, 3), Position::new(4, 1, 5));
        tree.set_value(kids[0], "ab".to_string(), ab);
        tree.set_value(kids[2], "&&".to_string(), and);
        tree.set_rhs_children(kids[1], Vec::new(), Vec::new());
        tree.set_rhs_children(kids[3], Vec::new(), Vec::new());
        tree
    }

    #[test]
    fn test_bracketed_rendering() {
        let tree = sample_tree();
        assert_eq!(tree.render(), r#"#S(EVEN="ab" #S() &&="&&" #S())"#);
        assert_eq!(tree.to_string(), tree.render());
    }

    #[test]
    fn test_unexpanded_nodes_render_bare() {
        let tree = SyntaxTree::with_root("#S", true);
        assert_eq!(tree.render(), "#S");
        assert!(tree.root().rhs().is_none());
        assert!(!tree.root().is_epsilon());
    }

    #[test]
    fn test_indented_rendering() {
        let tree = sample_tree();
        assert_eq!(
            tree.render_indented(),
            "#S\n  EVEN \"ab\"\n  #S ε\n  && \"&&\"\n  #S ε\n"
        );
    }

    #[test]
    fn test_node_views() {
        let tree = sample_tree();
        let root = tree.root();
        assert_eq!(root.label(), "#S");
        assert!(!root.is_terminal());
        assert_eq!(root.rhs().map(|r| r.len()), Some(4));
        assert_eq!(root.children().count(), 4);

        let even = root.child(0).unwrap();
        assert!(even.is_terminal());
        assert_eq!(even.value(), Some("ab"));
        assert_eq!(even.span().map(|s| s.len()), Some(2));
        assert_eq!(even.children().count(), 0);

        assert!(root.child(1).unwrap().is_epsilon());
        assert!(root.child(4).is_none());
    }

    #[test]
    fn test_pre_order_and_leaves() {
        let tree = sample_tree();
        let labels: Vec<&str> = tree.pre_order().map(|n| n.label()).collect();
        assert_eq!(labels, vec!["#S", "EVEN", "#S", "&&", "#S"]);

        let text: String = tree.leaves().filter_map(|n| n.value()).collect();
        assert_eq!(text, "ab&&");
        assert_eq!(tree.len(), 5);
    }

    #[test]
    fn test_deep_tree_traversal_does_not_recurse() {
        // A right spine 100k nodes deep
        let mut tree = SyntaxTree::with_root("#A", true);
        let mut current = tree.root().id();
        for _ in 0..100_000 {
            let child = tree.add_node("#A", true);
            tree.set_rhs_children(current, strings(&["#A"]), vec![child]);
            current = child;
        }
        tree.set_rhs_children(current, Vec::new(), Vec::new());

        assert_eq!(tree.pre_order().count(), 100_001);
        let rendered = tree.render();
        assert!(rendered.starts_with("#A(#A(#A("));
        assert!(rendered.ends_with(&format!("#A(){}", ")".repeat(100_000))));
        assert_eq!(rendered.matches('(').count(), 100_001);
    }

    #[test]
    fn test_json_export_is_flat() {
        let tree = sample_tree();
        let json = tree.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["root"], 0);
        assert_eq!(value["nodes"].as_array().map(Vec::len), Some(5));
        assert_eq!(value["nodes"][0]["kind"], "nonterminal");
        assert_eq!(value["nodes"][0]["children"][3], 4);
        assert_eq!(value["nodes"][1]["kind"], "terminal");
        assert_eq!(value["nodes"][1]["value"], "ab");
        assert_eq!(value["nodes"][1]["span"]["end"]["offset"], 2);
    }
}
