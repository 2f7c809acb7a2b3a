//! Per-attempt match state.

use super::capture::Captures;

/// Mutable state threaded through one match attempt.
///
/// A fresh state is created for every candidate, which is what keeps a
/// shared [`super::Matcher`] safe to use from many threads at once.
#[derive(Debug)]
pub(crate) struct MatchState<'a> {
    pub(crate) captures: Captures<'a>,
    /// Set while a repeated capture is compared against its first binding;
    /// placeholders then compare as plain code.
    pub(crate) literal: bool,
    /// Recursion depth, reported in trace events.
    pub(crate) depth: usize,
}

impl MatchState<'_> {
    pub(crate) fn new(capture_hint: usize) -> Self {
        Self {
            captures: Captures::with_capacity(capture_hint),
            literal: false,
            depth: 0,
        }
    }
}
