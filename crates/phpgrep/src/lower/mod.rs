//! Lowering from the Tree-sitter concrete syntax tree to [`Node`].
//!
//! Lowering is infallible: the parser rejects trees containing ERROR or
//! MISSING nodes before they get here, and any grammar construct without a
//! dedicated [`NodeKind`] becomes [`NodeKind::Unsupported`] with its children
//! lowered, so traversal still reaches code nested inside it.
//!
//! Nesting is capped at [`MAX_NESTING`] levels. A subtree below the cap is
//! kept as a childless [`NodeKind::Unsupported`] leaf, which never matches,
//! so pathological inputs cannot exhaust the stack in lowering or matching.

mod expressions;
mod statements;
mod strings;

use std::cell::Cell;

use tracing::debug;

use crate::ir::{DeclarationKind, Node, NodeKind};
use crate::position::Span;

pub(crate) type TsNode<'t> = tree_sitter::Node<'t>;

/// Kinds that never contribute to the lowered tree.
const TRIVIA: &[&str] = &["comment", "php_tag"];

/// Deepest nesting of lowered nodes.
const MAX_NESTING: usize = 128;

const LOWER_TARGET: &str = "phpgrep::lower";

/// Converts Tree-sitter nodes over `source` into [`Node`]s.
pub(crate) struct Lowerer<'s> {
    source: &'s str,
    depth: Cell<usize>,
}

impl<'s> Lowerer<'s> {
    pub(crate) const fn new(source: &'s str) -> Self {
        Self {
            source,
            depth: Cell::new(0),
        }
    }

    /// Lowers `node` and everything beneath it.
    pub(crate) fn lower(&self, node: TsNode<'_>) -> Node {
        let depth = self.depth.get();
        if depth >= MAX_NESTING {
            debug!(
                target: LOWER_TARGET,
                kind = node.kind(),
                line = node.start_position().row + 1,
                "nesting limit reached, subtree left opaque"
            );
            return self.make(
                node,
                NodeKind::Unsupported {
                    kind: node.kind().to_owned(),
                    children: Vec::new(),
                },
            );
        }
        self.depth.set(depth + 1);
        let kind = self.lower_kind(node);
        self.depth.set(depth);
        self.make(node, kind)
    }

    fn lower_kind(&self, node: TsNode<'_>) -> NodeKind {
        match node.kind() {
            "program" => NodeKind::Program {
                stmts: self.lower_all(node),
            },
            "compound_statement" | "colon_block" => NodeKind::StmtList {
                stmts: self.lower_all(node),
            },
            "function_definition" => self.declaration(node, DeclarationKind::Function),
            "method_declaration" => self.declaration(node, DeclarationKind::Method),
            "class_declaration" => self.declaration(node, DeclarationKind::Class),
            "interface_declaration" => self.declaration(node, DeclarationKind::Interface),
            "trait_declaration" => self.declaration(node, DeclarationKind::Trait),
            "enum_declaration" => self.declaration(node, DeclarationKind::Enum),
            "anonymous_class" => self.declaration(node, DeclarationKind::AnonymousClass),
            "namespace_definition" => self.declaration(node, DeclarationKind::Namespace),
            "namespace_use_declaration" => self.declaration(node, DeclarationKind::Use),
            "const_declaration" => self.declaration(node, DeclarationKind::Const),
            kind => self
                .lower_statement(node)
                .or_else(|| self.lower_expression(node))
                .unwrap_or_else(|| NodeKind::Unsupported {
                    kind: kind.to_owned(),
                    children: self.lower_all(node),
                }),
        }
    }

    /// Lowers every meaningful named child of `node`.
    fn lower_all(&self, node: TsNode<'_>) -> Vec<Node> {
        named_children(node)
            .into_iter()
            .map(|child| self.lower(child))
            .collect()
    }

    fn declaration(&self, node: TsNode<'_>, kind: DeclarationKind) -> NodeKind {
        NodeKind::Declaration {
            kind,
            name: node
                .child_by_field_name("name")
                .map(|name| self.text(name).to_owned()),
            children: self.lower_all(node),
        }
    }

    fn make(&self, node: TsNode<'_>, kind: NodeKind) -> Node {
        Node::new(kind, Span::new(node.start_byte(), node.end_byte()))
    }

    fn text(&self, node: TsNode<'_>) -> &'s str {
        self.source.get(node.byte_range()).unwrap_or_default()
    }

    fn boxed(&self, node: TsNode<'_>) -> Box<Node> {
        Box::new(self.lower(node))
    }

    /// Lowers a required field, falling back to the first named child.
    ///
    /// A grammar shape without either yields an unmatchable placeholder
    /// instead of failing the whole parse.
    fn required(&self, node: TsNode<'_>, field: &str) -> Box<Node> {
        node.child_by_field_name(field)
            .or_else(|| named_children(node).into_iter().next())
            .map_or_else(|| Box::new(missing(field)), |child| self.boxed(child))
    }

    fn optional(&self, node: TsNode<'_>, field: &str) -> Option<Box<Node>> {
        node.child_by_field_name(field).map(|child| self.boxed(child))
    }

    /// Lowers the first named child, if any.
    fn first(&self, node: TsNode<'_>) -> Option<Box<Node>> {
        named_children(node)
            .into_iter()
            .next()
            .map(|child| self.boxed(child))
    }

    /// Lowers a condition, dropping its parentheses.
    fn condition(&self, node: TsNode<'_>) -> Box<Node> {
        let Some(cond) = node.child_by_field_name("condition").or_else(|| {
            named_children(node)
                .into_iter()
                .find(|child| child.kind() == "parenthesized_expression")
        }) else {
            return Box::new(missing("condition"));
        };
        if cond.kind() == "parenthesized_expression" {
            return self.required(cond, "expression");
        }
        self.boxed(cond)
    }
}

/// Placeholder for a child the grammar did not provide.
fn missing(what: &str) -> Node {
    Node::synthetic(NodeKind::Unsupported {
        kind: format!("missing {what}"),
        children: Vec::new(),
    })
}

/// Named children of `node`, without comments and PHP tags.
pub(crate) fn named_children(node: TsNode<'_>) -> Vec<TsNode<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| !TRIVIA.contains(&child.kind()))
        .collect()
}

/// All direct children of `node`, tokens included, without trivia.
pub(crate) fn all_children(node: TsNode<'_>) -> Vec<TsNode<'_>> {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .filter(|child| !TRIVIA.contains(&child.kind()))
        .collect()
}

/// Returns `true` when a direct child of `node` is the token `token`.
pub(crate) fn has_token(node: TsNode<'_>, token: &str) -> bool {
    all_children(node)
        .iter()
        .any(|child| !child.is_named() && child.kind().eq_ignore_ascii_case(token))
}

/// Returns `true` when a direct child of `node` has kind `kind`.
pub(crate) fn has_child_kind(node: TsNode<'_>, kind: &str) -> bool {
    all_children(node).iter().any(|child| child.kind() == kind)
}
