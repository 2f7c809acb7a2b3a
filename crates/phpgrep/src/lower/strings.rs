//! Interpolated strings, heredocs and shell commands.
//!
//! Literal text is recovered from the gaps between embedded expressions
//! rather than from the grammar's content tokens, so two strings compare
//! equal exactly when their text and interpolations agree.

use super::{Lowerer, TsNode, named_children};
use crate::ir::{Node, NodeKind};
use crate::position::Span;

/// Grammar kinds that hold literal text inside a string.
const LITERAL_KINDS: &[&str] = &[
    "string_content",
    "string_value",
    "escape_sequence",
    "string",
    "text",
    "nowdoc_string",
    "heredoc_start",
    "heredoc_end",
];

/// Container kinds whose children belong to the enclosing string.
const BODY_KINDS: &[&str] = &["heredoc_body", "nowdoc_body"];

impl Lowerer<'_> {
    /// Lowers a double-quoted string; without interpolation it is a plain
    /// [`NodeKind::Str`].
    pub(super) fn lower_encapsed(&self, node: TsNode<'_>) -> NodeKind {
        let parts = self.lower_delimited_parts(node);
        if parts
            .iter()
            .all(|part| matches!(part.kind, NodeKind::EncapsedPart { .. }))
        {
            return NodeKind::Str {
                value: super::expressions::unquote(self.text(node)).to_owned(),
            };
        }
        NodeKind::Encapsed { parts }
    }

    /// Splits the text between the opening and closing delimiter of `node`.
    pub(super) fn lower_delimited_parts(&self, node: TsNode<'_>) -> Vec<Node> {
        let text = self.text(node);
        let prefix = usize::from(text.starts_with(['b', 'B'])) + 1;
        let start = node.start_byte().saturating_add(prefix).min(node.end_byte());
        let end = node.end_byte().saturating_sub(1).max(start);
        self.interpolated_parts(node, start, end)
    }

    pub(super) fn lower_heredoc(&self, node: TsNode<'_>) -> NodeKind {
        let text = self.text(node);
        let header_len = text.find('\n').unwrap_or(text.len());
        let label = text
            .get(..header_len)
            .unwrap_or_default()
            .trim_start_matches("<<<")
            .trim()
            .to_owned();
        let body_start = node
            .start_byte()
            .saturating_add(header_len)
            .saturating_add(1)
            .min(node.end_byte());
        let body_end = text
            .rfind('\n')
            .filter(|&idx| idx > header_len)
            .map_or(body_start, |idx| node.start_byte().saturating_add(idx));
        NodeKind::Heredoc {
            label,
            parts: self.interpolated_parts(node, body_start, body_end),
        }
    }

    /// Alternates literal parts and lowered interpolations over
    /// `start..end`.
    fn interpolated_parts(&self, node: TsNode<'_>, start: usize, end: usize) -> Vec<Node> {
        let mut embedded = Vec::new();
        collect_interpolations(node, &mut embedded);

        let mut parts = Vec::new();
        let mut cursor = start;
        for expr in embedded {
            if expr.start_byte() < cursor || expr.end_byte() > end {
                continue;
            }
            self.push_literal(&mut parts, cursor, expr.start_byte());
            parts.push(self.lower(expr));
            cursor = expr.end_byte();
        }
        self.push_literal(&mut parts, cursor, end);
        parts
    }

    fn push_literal(&self, parts: &mut Vec<Node>, start: usize, end: usize) {
        if start >= end {
            return;
        }
        if let Some(text) = self.source.get(start..end) {
            parts.push(Node::new(
                NodeKind::EncapsedPart {
                    value: text.to_owned(),
                },
                Span::new(start, end),
            ));
        }
    }
}

fn collect_interpolations<'t>(node: TsNode<'t>, out: &mut Vec<TsNode<'t>>) {
    for child in named_children(node) {
        let kind = child.kind();
        if BODY_KINDS.contains(&kind) {
            collect_interpolations(child, out);
        } else if !LITERAL_KINDS.contains(&kind) {
            out.push(child);
        }
    }
}
