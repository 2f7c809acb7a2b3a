//! Ordered-list comparison with `${"*"}` wildcards.
//!
//! The wildcard consumes candidate elements until the pattern element that
//! follows it lines up with the head of the remaining candidates. There is
//! a single element of lookahead and no backtracking, so comparison stays
//! linear; patterns with several wildcards whose boundaries are ambiguous
//! may be rejected even when a different split would match.

use tracing::trace;

use super::state::MatchState;
use super::{CompiledPattern, MATCHER_TARGET};
use crate::ir::Node;

impl CompiledPattern {
    pub(super) fn eq_slice<'a>(
        &'a self,
        state: &mut MatchState<'a>,
        xs: &'a [Node],
        candidates: &'a [Node],
    ) -> bool {
        self.eq_slice_by(state, xs, candidates, Self::eq_node)
    }

    /// Like [`Self::eq_slice`], comparing single elements with `eq`.
    pub(super) fn eq_slice_by<'a, F>(
        &'a self,
        state: &mut MatchState<'a>,
        xs: &'a [Node],
        candidates: &'a [Node],
        eq: F,
    ) -> bool
    where
        F: Fn(&'a Self, &mut MatchState<'a>, &'a Node, &'a Node) -> bool,
    {
        if xs.is_empty() {
            return candidates.is_empty();
        }

        let mut ys = candidates;
        let mut index = 0;
        let mut consuming = false;
        while let Some(x) = xs.get(index) {
            if !consuming && x.is_sequence_wildcard() {
                consuming = true;
                continue;
            }

            if consuming {
                let Some((head, rest)) = ys.split_first() else {
                    consuming = false;
                    index += 1;
                    continue;
                };
                if let Some(next) = xs.get(index + 1) {
                    let mark = state.captures.mark();
                    if eq(self, state, next, head) {
                        consuming = false;
                        index += 2;
                        ys = rest;
                        continue;
                    }
                    state.captures.rollback(mark);
                }
                trace!(
                    target: MATCHER_TARGET,
                    depth = state.depth,
                    consumed = head.kind.name(),
                    "sequence wildcard consumed element"
                );
                ys = rest;
                continue;
            }

            let Some((head, rest)) = ys.split_first() else {
                return false;
            };
            if !eq(self, state, x, head) {
                return false;
            }
            index += 1;
            ys = rest;
        }

        ys.is_empty()
    }
}
