//! Structural matching of compiled patterns against syntax trees.
//!
//! A [`Matcher`] owns an immutable pattern tree behind an [`Arc`]. Every
//! match attempt allocates its own [`MatchState`], so one matcher can be
//! cloned freely and used from many threads at once.

mod capture;
mod equality;
mod sequence;
mod state;

use std::sync::Arc;

use tracing::trace;

pub use capture::CapturedNode;
use state::MatchState;

use crate::ir::{Node, Visitor};

pub(crate) const MATCHER_TARGET: &str = "phpgrep::matcher";

/// Pattern tree and the options it was compiled with.
#[derive(Debug)]
pub(crate) struct CompiledPattern {
    root: Node,
    source: String,
    case_sensitive: bool,
    capture_hint: usize,
}

/// A compiled pattern ready for matching.
///
/// Cloning is cheap and yields a handle sharing the same pattern tree.
#[derive(Debug, Clone)]
pub struct Matcher {
    inner: Arc<CompiledPattern>,
}

/// Result of one successful match: the matched node and its captures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchData<'a> {
    node: &'a Node,
    captures: Vec<CapturedNode<'a>>,
}

impl<'a> MatchData<'a> {
    /// The candidate node that matched the pattern root.
    #[must_use]
    pub const fn node(&self) -> &'a Node {
        self.node
    }

    /// Returns the node captured under `name`.
    ///
    /// Returns `None` both for unknown names and for names bound to an
    /// absent child; use [`MatchData::captures`] to tell them apart.
    #[must_use]
    pub fn capture(&self, name: &str) -> Option<&'a Node> {
        self.captures
            .iter()
            .find(|captured| captured.name() == name)
            .and_then(CapturedNode::node)
    }

    /// All captures, in the order they were bound.
    #[must_use]
    pub fn captures(&self) -> &[CapturedNode<'a>] {
        &self.captures
    }

    /// Number of captures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.captures.len()
    }

    /// Returns `true` when the match bound no names.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.captures.is_empty()
    }
}

impl Matcher {
    pub(crate) fn new(
        root: Node,
        source: String,
        case_sensitive: bool,
        capture_hint: usize,
    ) -> Self {
        Self {
            inner: Arc::new(CompiledPattern {
                root,
                source,
                case_sensitive,
                capture_hint,
            }),
        }
    }

    /// The pattern text this matcher was compiled from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.inner.source
    }

    /// The compiled pattern tree.
    #[must_use]
    pub fn pattern(&self) -> &Node {
        &self.inner.root
    }

    /// Whether names are compared exactly.
    #[must_use]
    pub fn case_sensitive(&self) -> bool {
        self.inner.case_sensitive
    }

    /// Number of distinct capture names in the pattern.
    #[must_use]
    pub fn capture_hint(&self) -> usize {
        self.inner.capture_hint
    }

    /// Attempts to match the pattern against `node` alone.
    ///
    /// Nodes without a source span never match.
    #[must_use]
    pub fn match_node<'a>(&'a self, node: &'a Node) -> Option<MatchData<'a>> {
        self.inner.match_node(node)
    }

    /// Visits `root` and its descendants in pre-order, calling `callback`
    /// for every match.
    ///
    /// The callback's return value only decides whether the matched node's
    /// own children are searched; siblings are always visited. To stop the
    /// whole search early, keep a flag in the callback and return `false`
    /// once it is set.
    pub fn find<'a, F>(&'a self, root: &'a Node, callback: F)
    where
        F: FnMut(MatchData<'a>) -> bool,
    {
        let mut visitor = FindVisitor {
            pattern: &self.inner,
            callback,
        };
        root.walk(&mut visitor);
    }

    /// Collects every match under `root`, nested matches included.
    #[must_use]
    pub fn find_all<'a>(&'a self, root: &'a Node) -> Vec<MatchData<'a>> {
        let mut matches = Vec::new();
        self.find(root, |data| {
            matches.push(data);
            true
        });
        matches
    }

    /// Returns the first match under `root` in pre-order.
    ///
    /// No match is attempted once a node has matched.
    #[must_use]
    pub fn find_first<'a>(&'a self, root: &'a Node) -> Option<MatchData<'a>> {
        let mut visitor = FirstVisitor {
            pattern: &self.inner,
            first: None,
            attempts: 0,
        };
        root.walk(&mut visitor);
        trace!(
            target: MATCHER_TARGET,
            attempts = visitor.attempts,
            found = visitor.first.is_some(),
            "first match search finished"
        );
        visitor.first
    }
}

impl CompiledPattern {
    fn match_node<'a>(&'a self, node: &'a Node) -> Option<MatchData<'a>> {
        if node.span.is_none() {
            trace!(target: MATCHER_TARGET, kind = node.kind.name(), "candidate has no span");
            return None;
        }
        let mut state = MatchState::new(self.capture_hint);
        if !self.eq_node(&mut state, &self.root, node) {
            return None;
        }
        Some(MatchData {
            node,
            captures: state.captures.into_vec(),
        })
    }
}

struct FindVisitor<'a, F> {
    pattern: &'a CompiledPattern,
    callback: F,
}

impl<'a, F> Visitor<'a> for FindVisitor<'a, F>
where
    F: FnMut(MatchData<'a>) -> bool,
{
    fn enter_node(&mut self, node: &'a Node) -> bool {
        match self.pattern.match_node(node) {
            Some(data) => (self.callback)(data),
            None => true,
        }
    }
}

/// Stops attempting matches after the first hit.
struct FirstVisitor<'a> {
    pattern: &'a CompiledPattern,
    first: Option<MatchData<'a>>,
    attempts: usize,
}

impl<'a> Visitor<'a> for FirstVisitor<'a> {
    fn enter_node(&mut self, node: &'a Node) -> bool {
        if self.first.is_some() {
            return false;
        }
        self.attempts += 1;
        self.first = self.pattern.match_node(node);
        self.first.is_none()
    }
}
