//! Capture storage for a single match attempt.

use crate::ir::Node;

/// A named capture produced by a successful match.
///
/// The node is `None` when the name was bound to an absent optional child,
/// such as the value of a bare `return;`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapturedNode<'a> {
    name: &'a str,
    node: Option<&'a Node>,
}

impl<'a> CapturedNode<'a> {
    /// Capture name as written in the pattern.
    #[must_use]
    pub const fn name(&self) -> &'a str {
        self.name
    }

    /// Captured candidate node, if one was present.
    #[must_use]
    pub const fn node(&self) -> Option<&'a Node> {
        self.node
    }
}

/// Bindings in the order they were made.
///
/// Patterns rarely bind more than a handful of names, so a vector with a
/// linear lookup is used instead of a map. Bindings can be rolled back to a
/// [`Captures::mark`] when a speculative comparison fails.
#[derive(Debug, Default)]
pub(crate) struct Captures<'a> {
    entries: Vec<CapturedNode<'a>>,
}

impl<'a> Captures<'a> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Returns the binding for `name`: `None` when unbound, `Some(None)` when
    /// bound to an absent child.
    pub(crate) fn get(&self, name: &str) -> Option<Option<&'a Node>> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.node)
    }

    pub(crate) fn bind(&mut self, name: &'a str, node: Option<&'a Node>) {
        self.entries.push(CapturedNode { name, node });
    }

    pub(crate) const fn mark(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn rollback(&mut self, mark: usize) {
        self.entries.truncate(mark);
    }

    pub(crate) fn into_vec(self) -> Vec<CapturedNode<'a>> {
        self.entries
    }
}
