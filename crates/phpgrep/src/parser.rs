//! Tree-sitter parsing wrapper producing lowered syntax trees.
//!
//! This module drives the Tree-sitter PHP grammar, rejects sources with
//! syntax errors and lowers the concrete tree into the [`Node`] model used by
//! the matcher.

use tracing::debug;

use crate::error::PhpgrepError;
use crate::ir::{Node, NodeKind};
use crate::lower::Lowerer;
use crate::position::{LineIndex, point_to_one_based};

const PARSER_TARGET: &str = "phpgrep::parser";

/// Prefix that turns a code fragment into a parseable PHP file.
const SNIPPET_PREFIX: &str = "<?php ";

/// Longest error context quoted in messages, in characters.
const CONTEXT_LIMIT: usize = 50;

/// Parsed and lowered PHP source.
///
/// Owns the text it was parsed from so that node spans can be turned back
/// into source text and positions.
#[derive(Debug, Clone)]
pub struct SourceFile {
    source: String,
    root: Node,
    lines: LineIndex,
    prefix_len: usize,
}

impl SourceFile {
    /// Returns the root node.
    ///
    /// For a file this is [`NodeKind::Program`]; for a snippet it is the
    /// first statement, or its expression for an expression statement.
    #[must_use]
    pub const fn root(&self) -> &Node {
        &self.root
    }

    /// Consumes the file and returns its root node.
    #[must_use]
    pub fn into_root(self) -> Node {
        self.root
    }

    /// Returns the text that was handed to Tree-sitter.
    ///
    /// For snippets this includes the `<?php ` wrapper.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the source text covered by `node`.
    #[must_use]
    pub fn text(&self, node: &Node) -> Option<&str> {
        node.span.and_then(|span| self.source.get(span.range()))
    }

    /// Returns the one-based line and column where `node` starts.
    ///
    /// Columns count bytes. Snippet positions are relative to the snippet
    /// text, not the wrapper.
    #[must_use]
    pub fn position(&self, node: &Node) -> Option<(u32, u32)> {
        let span = node.span?;
        Some(self.offset_position(span.start()))
    }

    fn offset_position(&self, offset: usize) -> (u32, u32) {
        let (line, column) = self.lines.position(offset);
        (line, unwrapped_column(self.prefix_len, line, column))
    }
}

/// Removes the snippet wrapper from a first-line column.
fn unwrapped_column(prefix_len: usize, line: u32, column: u32) -> u32 {
    if line != 1 || prefix_len == 0 {
        return column;
    }
    let prefix = u32::try_from(prefix_len).unwrap_or(u32::MAX);
    column.saturating_sub(prefix).max(1)
}

/// Tree-sitter parser configured for PHP.
pub struct Parser {
    inner: tree_sitter::Parser,
}

impl Parser {
    /// Creates a new parser.
    ///
    /// # Errors
    ///
    /// Returns an error if the Tree-sitter parser cannot be initialised
    /// with the PHP grammar.
    pub fn new() -> Result<Self, PhpgrepError> {
        let mut inner = tree_sitter::Parser::new();
        inner
            .set_language(&tree_sitter_php::LANGUAGE_PHP.into())
            .map_err(|e| PhpgrepError::parser_init(e.to_string()))?;

        Ok(Self { inner })
    }

    /// Parses a complete PHP file.
    ///
    /// Text outside `<?php ... ?>` tags becomes inline HTML statements.
    ///
    /// # Errors
    ///
    /// Returns [`PhpgrepError::Syntax`] when the source contains syntax
    /// errors, or [`PhpgrepError::Parse`] if Tree-sitter produces no tree.
    pub fn parse(&mut self, source: &str) -> Result<SourceFile, PhpgrepError> {
        self.parse_wrapped(source.to_owned(), 0)
    }

    /// Parses a fragment of PHP code such as `f($x)` or `if ($a) {}`.
    ///
    /// The fragment is wrapped as `<?php {snippet};` and the root of the
    /// result is its first statement; an expression statement is unwrapped
    /// to its expression. Fragments that already start with `<?` are parsed
    /// as files and reduced the same way.
    ///
    /// # Errors
    ///
    /// Returns [`PhpgrepError::Syntax`] when the fragment contains syntax
    /// errors, or [`PhpgrepError::Parse`] if Tree-sitter produces no tree.
    pub fn parse_snippet(&mut self, snippet: &str) -> Result<SourceFile, PhpgrepError> {
        let mut file = if snippet.trim_start().starts_with("<?") {
            self.parse_wrapped(snippet.to_owned(), 0)?
        } else {
            let wrapped = format!("{SNIPPET_PREFIX}{snippet};");
            self.parse_wrapped(wrapped, SNIPPET_PREFIX.len())?
        };
        file.root = first_statement(file.root);
        Ok(file)
    }

    fn parse_wrapped(
        &mut self,
        source: String,
        prefix_len: usize,
    ) -> Result<SourceFile, PhpgrepError> {
        let tree = self
            .inner
            .parse(&source, None)
            .ok_or_else(|| PhpgrepError::parse("parsing failed"))?;

        if let Some(error) = first_error_node(tree.root_node()) {
            let (line, column) = point_to_one_based(error.start_position());
            let context = source
                .get(error.byte_range())
                .map(truncate_context)
                .unwrap_or_default();
            let message = if error.is_missing() {
                format!("missing {}", error.kind())
            } else {
                "syntax error".to_owned()
            };
            debug!(target: PARSER_TARGET, line, column, %message, "rejected source");
            return Err(PhpgrepError::Syntax {
                line,
                column: unwrapped_column(prefix_len, line, column),
                context,
                message,
            });
        }

        let root = Lowerer::new(&source).lower(tree.root_node());
        let lines = LineIndex::new(&source);
        Ok(SourceFile {
            source,
            root,
            lines,
            prefix_len,
        })
    }
}

/// Reduces a parsed snippet to its first statement, unwrapping expression
/// statements.
fn first_statement(root: Node) -> Node {
    let NodeKind::Program { stmts } = root.kind else {
        return root;
    };
    let Some(first) = stmts
        .into_iter()
        .find(|stmt| !matches!(stmt.kind, NodeKind::InlineHtml { .. }))
    else {
        return Node::synthetic(NodeKind::Nop);
    };
    match first.kind {
        NodeKind::ExpressionStmt { expr } => *expr,
        kind => Node::new(kind, first.span),
    }
}

/// Finds the first ERROR or MISSING node in document order, skipping
/// subtrees that contain no errors.
fn first_error_node(root: tree_sitter::Node<'_>) -> Option<tree_sitter::Node<'_>> {
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        if node.has_error() && cursor.goto_first_child() {
            continue;
        }
        while !cursor.goto_next_sibling() {
            if !cursor.goto_parent() {
                return None;
            }
        }
    }
}

fn truncate_context(text: &str) -> String {
    if text.chars().count() > CONTEXT_LIMIT {
        let truncated: String = text.chars().take(CONTEXT_LIMIT - 3).collect();
        format!("{truncated}...")
    } else {
        text.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn parser() -> Parser {
        Parser::new().expect("parser init")
    }

    #[rstest]
    fn parses_files_into_programs(mut parser: Parser) {
        let file = parser
            .parse("<?php\n$a = 1;\necho $a;\n")
            .expect("parse");

        let NodeKind::Program { stmts } = &file.root().kind else {
            panic!("expected program, got {:?}", file.root().kind);
        };
        assert_eq!(stmts.len(), 2);
    }

    #[rstest]
    fn snippets_unwrap_expression_statements(mut parser: Parser) {
        let file = parser.parse_snippet("$x + 1").expect("parse");

        assert!(matches!(file.root().kind, NodeKind::Binary { .. }));
        assert_eq!(file.text(file.root()), Some("$x + 1"));
        assert_eq!(file.position(file.root()), Some((1, 1)));
    }

    #[rstest]
    fn snippets_keep_statements(mut parser: Parser) {
        let file = parser.parse_snippet("if ($a) { f(); }").expect("parse");

        assert!(matches!(file.root().kind, NodeKind::If { .. }));
    }

    #[rstest]
    #[case("$x +")]
    #[case("f(")]
    #[case("if ($a {")]
    fn rejects_malformed_snippets(mut parser: Parser, #[case] snippet: &str) {
        let err = parser.parse_snippet(snippet).expect_err("should fail");

        assert!(err.is_syntax(), "unexpected error: {err}");
    }

    #[rstest]
    fn reports_error_position(mut parser: Parser) {
        let err = parser
            .parse("<?php\n$a = 1;\n$b = ;\n")
            .expect_err("should fail");

        let PhpgrepError::Syntax { line, column, .. } = err else {
            panic!("expected syntax error, got {err}");
        };
        assert_eq!(line, 3);
        assert!(column >= 1);
    }

    #[rstest]
    fn positions_are_one_based(mut parser: Parser) {
        let file = parser.parse("<?php\n\n  foo();\n").expect("parse");
        let NodeKind::Program { stmts } = &file.root().kind else {
            panic!("expected program");
        };
        let stmt = stmts.first().expect("one statement");

        assert_eq!(file.position(stmt), Some((3, 3)));
        assert_eq!(file.text(stmt), Some("foo();"));
    }

    #[rstest]
    fn inline_html_is_kept(mut parser: Parser) {
        let file = parser
            .parse("<html>\n<?php echo 1; ?>\n</html>\n")
            .expect("parse");

        let NodeKind::Program { stmts } = &file.root().kind else {
            panic!("expected program");
        };
        assert!(
            stmts
                .iter()
                .any(|stmt| matches!(stmt.kind, NodeKind::InlineHtml { .. }))
        );
    }

    #[test]
    fn long_contexts_are_truncated() {
        let text = "x".repeat(80);
        let context = truncate_context(&text);

        assert_eq!(context.chars().count(), CONTEXT_LIMIT);
        assert!(context.ends_with("..."));
    }
}
