//! Pattern compilation.
//!
//! A pattern is ordinary PHP code. Compiling parses it as a snippet and
//! rewrites the `${"..."}` placeholders into [`MetaNode`]s, producing a
//! [`Matcher`] that can be shared across threads.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::error::PhpgrepError;
use crate::ir::{Node, NodeKind};
use crate::matcher::Matcher;
use crate::meta::{MetaNode, is_anonymous};
use crate::parser::Parser;

const COMPILER_TARGET: &str = "phpgrep::compile";

/// Compiles pattern text into [`Matcher`]s.
///
/// # Example
///
/// ```
/// use phpgrep::Compiler;
///
/// let matcher = Compiler::new().compile(r#"in_array($_, ${"arr:var"})"#)?;
/// assert_eq!(matcher.source(), r#"in_array($_, ${"arr:var"})"#);
/// # Ok::<(), phpgrep::PhpgrepError>(())
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Compiler {
    /// Compare function, class and method names exactly.
    case_sensitive: bool,
}

impl Compiler {
    /// Creates a compiler with default options.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            case_sensitive: false,
        }
    }

    /// Sets whether function, class and method names compare exactly.
    ///
    /// PHP resolves these names case-insensitively, so the default is
    /// `false`.
    #[must_use]
    pub const fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Returns whether names compare exactly.
    #[must_use]
    pub const fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Compiles `pattern` into a matcher.
    ///
    /// Placeholders with an unknown class are left as dynamic variables and
    /// reported at `warn` level.
    ///
    /// # Errors
    ///
    /// Returns [`PhpgrepError::PatternCompile`] when the pattern is not
    /// valid PHP, or the parser error if the parser cannot be created.
    pub fn compile(&self, pattern: &str) -> Result<Matcher, PhpgrepError> {
        let mut parser = Parser::new()?;
        let parsed = parser.parse_snippet(pattern).map_err(|err| {
            if err.is_syntax() {
                PhpgrepError::pattern_compile(pattern, err.to_string())
            } else {
                err
            }
        })?;

        let mut root = parsed.into_root();
        let mut rewriter = PlaceholderRewriter::default();
        rewriter.rewrite(&mut root);

        debug!(
            target: COMPILER_TARGET,
            pattern,
            root = root.kind.name(),
            captures = rewriter.names.len(),
            "compiled pattern"
        );
        Ok(Matcher::new(
            root,
            pattern.to_owned(),
            self.case_sensitive,
            rewriter.names.len(),
        ))
    }
}

/// Rewrites placeholders in place and records the capture names seen.
#[derive(Default)]
struct PlaceholderRewriter {
    names: BTreeSet<String>,
}

impl PlaceholderRewriter {
    fn rewrite(&mut self, node: &mut Node) {
        if let NodeKind::SimpleVar { name } = &node.kind {
            self.record(name);
            return;
        }
        if let Some(meta) = self.placeholder(node) {
            node.kind = NodeKind::Meta(meta);
            return;
        }
        for child in node.children_mut() {
            self.rewrite(child);
        }
        collapse_sequence_wrapper(node);
    }

    /// Interprets `${"..."}`, returning `None` for anything that is not a
    /// recognised placeholder.
    fn placeholder(&mut self, node: &Node) -> Option<MetaNode> {
        let NodeKind::Var { expr } = &node.kind else {
            return None;
        };
        let NodeKind::Str { value } = &expr.kind else {
            return None;
        };
        let Some(meta) = MetaNode::from_placeholder(value) else {
            warn!(
                target: COMPILER_TARGET,
                placeholder = value.as_str(),
                "unknown placeholder class, treating it as a variable"
            );
            return None;
        };
        if let Some(name) = meta.name() {
            self.record(name);
        }
        Some(meta)
    }

    fn record(&mut self, name: &str) {
        if !is_anonymous(name) && !self.names.contains(name) {
            self.names.insert(name.to_owned());
        }
    }
}

/// Replaces a list element that only wraps `${"*"}` with the wildcard
/// itself, so list comparison only has to look for one variant.
fn collapse_sequence_wrapper(node: &mut Node) {
    let wraps_sequence = match &node.kind {
        NodeKind::ExpressionStmt { expr } => expr.is_sequence_wildcard(),
        NodeKind::Argument {
            expr,
            by_ref: false,
            variadic: false,
            name: None,
        } => expr.is_sequence_wildcard(),
        NodeKind::ArrayItem {
            key: None,
            value: Some(value),
            by_ref: false,
            unpack: false,
        } => value.is_sequence_wildcard(),
        _ => false,
    };
    if wraps_sequence {
        node.kind = NodeKind::Meta(MetaNode::Sequence);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::MetaClass;
    use rstest::rstest;

    fn compile(pattern: &str) -> Matcher {
        Compiler::new().compile(pattern).expect("pattern compiles")
    }

    #[test]
    fn unwraps_expression_statement() {
        let matcher = compile("$x + 1");
        assert!(matches!(matcher.pattern().kind, NodeKind::Binary { .. }));
    }

    #[rstest]
    #[case(r#"${"x:int"}"#, "x", MetaClass::Int)]
    #[case(r#"${"expr"}"#, "_", MetaClass::Expr)]
    #[case(r#"${"f:func"}"#, "f", MetaClass::Func)]
    fn rewrites_typed_placeholders(
        #[case] pattern: &str,
        #[case] name: &str,
        #[case] class: MetaClass,
    ) {
        let matcher = compile(pattern);
        assert_eq!(
            matcher.pattern().kind,
            NodeKind::Meta(MetaNode::Typed {
                name: name.to_owned(),
                class
            })
        );
    }

    #[test]
    fn unknown_class_stays_a_variable() {
        let matcher = compile(r#"${"x:bool"}"#);
        assert!(matches!(matcher.pattern().kind, NodeKind::Var { .. }));
    }

    #[rstest]
    #[case(r#"f(${"*"})"#)]
    #[case(r#"[${"*"}, 1]"#)]
    #[case(r#"{ ${"*"}; }"#)]
    fn collapses_sequence_wrappers(#[case] pattern: &str) {
        let matcher = compile(pattern);
        let mut found = false;
        let mut stack = vec![matcher.pattern()];
        while let Some(node) = stack.pop() {
            assert!(!matches!(
                &node.kind,
                NodeKind::Argument { expr, .. }
                | NodeKind::ExpressionStmt { expr }
                    if expr.is_sequence_wildcard()
            ));
            found |= node.is_sequence_wildcard();
            stack.extend(node.children());
        }
        assert!(found, "sequence wildcard missing from {pattern}");
    }

    #[rstest]
    #[case("$x + $y", 2)]
    #[case("$x + $x", 1)]
    #[case("$_ + $_", 0)]
    #[case(r#"${"a:var"} = $b"#, 2)]
    fn counts_distinct_capture_names(#[case] pattern: &str, #[case] expected: usize) {
        assert_eq!(compile(pattern).capture_hint(), expected);
    }

    #[test]
    fn rejects_invalid_php() {
        let err = Compiler::new().compile("$x +").expect_err("should fail");
        assert!(matches!(err, PhpgrepError::PatternCompile { .. }));
    }

    #[test]
    fn carries_options_into_matcher() {
        let matcher = Compiler::new()
            .with_case_sensitive(true)
            .compile("f()")
            .expect("pattern compiles");
        assert!(matcher.case_sensitive());
        assert_eq!(matcher.source(), "f()");
    }
}
