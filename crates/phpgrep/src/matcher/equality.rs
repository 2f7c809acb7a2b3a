//! Node equality: the recursive comparison behind every match.
//!
//! `x` is always the pattern side and `y` the candidate, except while
//! `state.literal` is set: a repeated capture is then checked by comparing
//! its first binding (a candidate node) against the new candidate, and
//! placeholders and plain variables compare as ordinary code.

use std::ptr;

use tracing::trace;

use super::state::MatchState;
use super::{CompiledPattern, MATCHER_TARGET};
use crate::ir::{Node, NodeKind};
use crate::meta::{MetaNode, is_anonymous};

/// Constants PHP resolves without regard to case.
const CASELESS_CONSTANTS: &[&str] = &["true", "false", "null"];

impl CompiledPattern {
    pub(super) fn eq_node<'a>(
        &'a self,
        state: &mut MatchState<'a>,
        x: &'a Node,
        y: &'a Node,
    ) -> bool {
        if ptr::eq(x, y) {
            return true;
        }
        trace!(
            target: MATCHER_TARGET,
            depth = state.depth,
            pattern = x.kind.name(),
            candidate = y.kind.name(),
            literal = state.literal,
            "comparing nodes"
        );
        state.depth += 1;
        let matched = self.eq_kind(state, x, y);
        state.depth -= 1;
        matched
    }

    /// Compares optional children. A plain variable facing an absent child
    /// binds its name to "nothing".
    pub(super) fn eq_opt<'a>(
        &'a self,
        state: &mut MatchState<'a>,
        x: Option<&'a Node>,
        y: Option<&'a Node>,
    ) -> bool {
        match (x, y) {
            (None, None) => true,
            (Some(pattern), Some(candidate)) => self.eq_node(state, pattern, candidate),
            (Some(pattern), None) => match &pattern.kind {
                NodeKind::SimpleVar { name } if !state.literal => {
                    self.match_named(state, name, None)
                }
                _ => false,
            },
            (None, Some(_)) => false,
        }
    }

    /// Compares lists position by position, without sequence wildcards.
    pub(super) fn eq_exact<'a>(
        &'a self,
        state: &mut MatchState<'a>,
        xs: &'a [Node],
        ys: &'a [Node],
    ) -> bool {
        xs.len() == ys.len()
            && xs
                .iter()
                .zip(ys)
                .all(|(x, y)| self.eq_node(state, x, y))
    }

    /// Compares a name position, folding case unless the pattern was
    /// compiled case-sensitive.
    pub(super) fn eq_with_case<'a>(
        &'a self,
        state: &mut MatchState<'a>,
        x: &'a Node,
        y: &'a Node,
    ) -> bool {
        match (&x.kind, &y.kind) {
            (NodeKind::Name { value: a }, NodeKind::Name { value: b })
            | (NodeKind::Identifier { value: a }, NodeKind::Identifier { value: b }) => {
                self.names_equal(a, b)
            }
            _ => self.eq_node(state, x, y),
        }
    }

    fn names_equal(&self, a: &str, b: &str) -> bool {
        if self.case_sensitive {
            a == b
        } else {
            a.eq_ignore_ascii_case(b)
        }
    }

    /// Binds `name` on first sight and checks later occurrences against the
    /// first binding.
    pub(super) fn match_named<'a>(
        &'a self,
        state: &mut MatchState<'a>,
        name: &'a str,
        y: Option<&'a Node>,
    ) -> bool {
        if is_anonymous(name) {
            return true;
        }
        match (state.captures.get(name), y) {
            (None, _) => {
                state.captures.bind(name, y);
                true
            }
            (Some(None), candidate) => candidate.is_none(),
            (Some(Some(_)), None) => false,
            (Some(Some(bound)), Some(candidate)) => {
                let outer = std::mem::replace(&mut state.literal, true);
                let matched = self.eq_node(state, bound, candidate);
                state.literal = outer;
                matched
            }
        }
    }

    fn eq_simple_var<'a>(&'a self, state: &mut MatchState<'a>, name: &'a str, y: &'a Node) -> bool {
        if state.literal {
            return matches!(&y.kind, NodeKind::SimpleVar { name: other } if other == name);
        }
        self.match_named(state, name, Some(y))
    }

    fn eq_meta<'a>(&'a self, state: &mut MatchState<'a>, meta: &'a MetaNode, y: &'a Node) -> bool {
        match meta {
            MetaNode::Typed { name, class } => {
                class.accepts(y) && self.match_named(state, name, Some(y))
            }
            MetaNode::Sequence => false,
        }
    }

    /// Compares interpolated string parts; embedded variables compare by
    /// name instead of acting as captures.
    fn eq_parts<'a>(&'a self, state: &mut MatchState<'a>, xs: &'a [Node], ys: &'a [Node]) -> bool {
        xs.len() == ys.len()
            && xs.iter().zip(ys).all(|(x, y)| match (&x.kind, &y.kind) {
                (NodeKind::SimpleVar { name: a }, NodeKind::SimpleVar { name: b }) => a == b,
                (NodeKind::SimpleVar { .. }, _) => false,
                _ => self.eq_node(state, x, y),
            })
    }

    #[expect(
        clippy::too_many_lines,
        reason = "one exhaustive arm per node kind keeps the comparison auditable"
    )]
    fn eq_kind<'a>(&'a self, state: &mut MatchState<'a>, x: &'a Node, y: &'a Node) -> bool {
        match &x.kind {
            NodeKind::Program { .. }
            | NodeKind::Declaration { .. }
            | NodeKind::Unsupported { .. } => false,

            NodeKind::Meta(meta) => self.eq_meta(state, meta, y),

            NodeKind::Nop => matches!(y.kind, NodeKind::Nop),
            NodeKind::ExpressionStmt { expr } => {
                if !state.literal
                    && let NodeKind::SimpleVar { name } = &expr.kind
                {
                    return self.match_named(state, name, Some(y));
                }
                let NodeKind::ExpressionStmt { expr: other } = &y.kind else {
                    return false;
                };
                self.eq_node(state, expr, other)
            }
            NodeKind::StmtList { stmts } => {
                let NodeKind::StmtList { stmts: other } = &y.kind else {
                    return false;
                };
                self.eq_slice(state, stmts, other)
            }
            NodeKind::Echo { exprs } => {
                let NodeKind::Echo { exprs: other } = &y.kind else {
                    return false;
                };
                self.eq_slice(state, exprs, other)
            }
            NodeKind::Return { expr } => {
                let NodeKind::Return { expr: other } = &y.kind else {
                    return false;
                };
                self.eq_opt(state, expr.as_deref(), other.as_deref())
            }
            NodeKind::Break { expr } => {
                let NodeKind::Break { expr: other } = &y.kind else {
                    return false;
                };
                self.eq_opt(state, expr.as_deref(), other.as_deref())
            }
            NodeKind::Continue { expr } => {
                let NodeKind::Continue { expr: other } = &y.kind else {
                    return false;
                };
                self.eq_opt(state, expr.as_deref(), other.as_deref())
            }
            NodeKind::Global { vars } => {
                let NodeKind::Global { vars: other } = &y.kind else {
                    return false;
                };
                self.eq_slice(state, vars, other)
            }
            NodeKind::Static { vars } => {
                let NodeKind::Static { vars: other } = &y.kind else {
                    return false;
                };
                self.eq_slice(state, vars, other)
            }
            NodeKind::StaticVar { variable, expr } => {
                let NodeKind::StaticVar {
                    variable: other_variable,
                    expr: other_expr,
                } = &y.kind
                else {
                    return false;
                };
                self.eq_node(state, variable, other_variable)
                    && self.eq_opt(state, expr.as_deref(), other_expr.as_deref())
            }
            NodeKind::Unset { vars } => {
                let NodeKind::Unset { vars: other } = &y.kind else {
                    return false;
                };
                self.eq_slice(state, vars, other)
            }
            NodeKind::InlineHtml { value } => {
                matches!(&y.kind, NodeKind::InlineHtml { value: other } if other == value)
            }
            NodeKind::If {
                cond,
                body,
                else_ifs,
                else_branch,
                alt_syntax,
            } => {
                let NodeKind::If {
                    cond: y_cond,
                    body: y_body,
                    else_ifs: y_else_ifs,
                    else_branch: y_else,
                    alt_syntax: y_alt,
                } = &y.kind
                else {
                    return false;
                };
                alt_syntax == y_alt
                    && self.eq_node(state, cond, y_cond)
                    && self.eq_node(state, body, y_body)
                    && self.eq_exact(state, else_ifs, y_else_ifs)
                    && self.eq_opt(state, else_branch.as_deref(), y_else.as_deref())
            }
            NodeKind::ElseIf {
                cond,
                body,
                alt_syntax,
            } => {
                let NodeKind::ElseIf {
                    cond: y_cond,
                    body: y_body,
                    alt_syntax: y_alt,
                } = &y.kind
                else {
                    return false;
                };
                alt_syntax == y_alt
                    && self.eq_node(state, cond, y_cond)
                    && self.eq_node(state, body, y_body)
            }
            NodeKind::Else { body, alt_syntax } => {
                let NodeKind::Else {
                    body: y_body,
                    alt_syntax: y_alt,
                } = &y.kind
                else {
                    return false;
                };
                alt_syntax == y_alt && self.eq_node(state, body, y_body)
            }
            NodeKind::While {
                cond,
                body,
                alt_syntax,
            } => {
                let NodeKind::While {
                    cond: y_cond,
                    body: y_body,
                    alt_syntax: y_alt,
                } = &y.kind
                else {
                    return false;
                };
                alt_syntax == y_alt
                    && self.eq_node(state, cond, y_cond)
                    && self.eq_node(state, body, y_body)
            }
            NodeKind::Do { body, cond } => {
                let NodeKind::Do {
                    body: y_body,
                    cond: y_cond,
                } = &y.kind
                else {
                    return false;
                };
                self.eq_node(state, body, y_body) && self.eq_node(state, cond, y_cond)
            }
            NodeKind::For {
                init,
                cond,
                step,
                body,
                alt_syntax,
            } => {
                let NodeKind::For {
                    init: y_init,
                    cond: y_cond,
                    step: y_step,
                    body: y_body,
                    alt_syntax: y_alt,
                } = &y.kind
                else {
                    return false;
                };
                alt_syntax == y_alt
                    && self.eq_slice(state, init, y_init)
                    && self.eq_slice(state, cond, y_cond)
                    && self.eq_slice(state, step, y_step)
                    && self.eq_node(state, body, y_body)
            }
            NodeKind::Foreach {
                expr,
                key,
                value,
                body,
                alt_syntax,
            } => {
                let NodeKind::Foreach {
                    expr: y_expr,
                    key: y_key,
                    value: y_value,
                    body: y_body,
                    alt_syntax: y_alt,
                } = &y.kind
                else {
                    return false;
                };
                alt_syntax == y_alt
                    && self.eq_node(state, expr, y_expr)
                    && self.eq_opt(state, key.as_deref(), y_key.as_deref())
                    && self.eq_node(state, value, y_value)
                    && self.eq_node(state, body, y_body)
            }
            NodeKind::Switch {
                cond,
                cases,
                alt_syntax,
            } => {
                let NodeKind::Switch {
                    cond: y_cond,
                    cases: y_cases,
                    alt_syntax: y_alt,
                } = &y.kind
                else {
                    return false;
                };
                alt_syntax == y_alt
                    && self.eq_node(state, cond, y_cond)
                    && self.eq_slice(state, cases, y_cases)
            }
            NodeKind::Case { cond, stmts } => {
                let NodeKind::Case {
                    cond: y_cond,
                    stmts: y_stmts,
                } = &y.kind
                else {
                    return false;
                };
                self.eq_node(state, cond, y_cond) && self.eq_slice(state, stmts, y_stmts)
            }
            NodeKind::Default { stmts } => {
                let NodeKind::Default { stmts: other } = &y.kind else {
                    return false;
                };
                self.eq_slice(state, stmts, other)
            }
            NodeKind::Try {
                stmts,
                catches,
                finally,
            } => {
                let NodeKind::Try {
                    stmts: y_stmts,
                    catches: y_catches,
                    finally: y_finally,
                } = &y.kind
                else {
                    return false;
                };
                self.eq_slice(state, stmts, y_stmts)
                    && self.eq_slice(state, catches, y_catches)
                    && self.eq_opt(state, finally.as_deref(), y_finally.as_deref())
            }
            NodeKind::Catch {
                types,
                variable,
                stmts,
            } => {
                let NodeKind::Catch {
                    types: y_types,
                    variable: y_variable,
                    stmts: y_stmts,
                } = &y.kind
                else {
                    return false;
                };
                self.eq_slice_by(state, types, y_types, Self::eq_with_case)
                    && self.eq_opt(state, variable.as_deref(), y_variable.as_deref())
                    && self.eq_slice(state, stmts, y_stmts)
            }
            NodeKind::Finally { stmts } => {
                let NodeKind::Finally { stmts: other } = &y.kind else {
                    return false;
                };
                self.eq_slice(state, stmts, other)
            }
            NodeKind::Throw { expr } => {
                let NodeKind::Throw { expr: other } = &y.kind else {
                    return false;
                };
                self.eq_node(state, expr, other)
            }

            NodeKind::Assign { op, variable, expr } => {
                let NodeKind::Assign {
                    op: y_op,
                    variable: y_variable,
                    expr: y_expr,
                } = &y.kind
                else {
                    return false;
                };
                op == y_op
                    && self.eq_node(state, variable, y_variable)
                    && self.eq_node(state, expr, y_expr)
            }
            NodeKind::Binary { op, left, right } => {
                let NodeKind::Binary {
                    op: y_op,
                    left: y_left,
                    right: y_right,
                } = &y.kind
                else {
                    return false;
                };
                op == y_op && self.eq_node(state, left, y_left) && self.eq_node(state, right, y_right)
            }
            NodeKind::Unary { op, expr } => {
                let NodeKind::Unary {
                    op: y_op,
                    expr: y_expr,
                } = &y.kind
                else {
                    return false;
                };
                op == y_op && self.eq_node(state, expr, y_expr)
            }
            NodeKind::IncDec { op, variable } => {
                let NodeKind::IncDec {
                    op: y_op,
                    variable: y_variable,
                } = &y.kind
                else {
                    return false;
                };
                op == y_op && self.eq_node(state, variable, y_variable)
            }
            NodeKind::InstanceOf { expr, class } => {
                let NodeKind::InstanceOf {
                    expr: y_expr,
                    class: y_class,
                } = &y.kind
                else {
                    return false;
                };
                self.eq_node(state, expr, y_expr) && self.eq_with_case(state, class, y_class)
            }
            NodeKind::Cast { cast_type, expr } => {
                let NodeKind::Cast {
                    cast_type: y_type,
                    expr: y_expr,
                } = &y.kind
                else {
                    return false;
                };
                cast_type == y_type && self.eq_node(state, expr, y_expr)
            }
            NodeKind::Ternary {
                cond,
                if_true,
                if_false,
            } => {
                let NodeKind::Ternary {
                    cond: y_cond,
                    if_true: y_true,
                    if_false: y_false,
                } = &y.kind
                else {
                    return false;
                };
                // The short form `a ?: b` only matches itself.
                if if_true.is_none() != y_true.is_none() {
                    return false;
                }
                self.eq_node(state, cond, y_cond)
                    && self.eq_opt(state, if_true.as_deref(), y_true.as_deref())
                    && self.eq_node(state, if_false, y_false)
            }
            NodeKind::Paren { expr } => {
                let NodeKind::Paren { expr: other } = &y.kind else {
                    return false;
                };
                self.eq_node(state, expr, other)
            }
            NodeKind::FunctionCall { function, args } => {
                let NodeKind::FunctionCall {
                    function: y_function,
                    args: y_args,
                } = &y.kind
                else {
                    return false;
                };
                self.eq_with_case(state, function, y_function) && self.eq_slice(state, args, y_args)
            }
            NodeKind::MethodCall {
                variable,
                method,
                args,
                nullsafe,
            } => {
                let NodeKind::MethodCall {
                    variable: y_variable,
                    method: y_method,
                    args: y_args,
                    nullsafe: y_nullsafe,
                } = &y.kind
                else {
                    return false;
                };
                nullsafe == y_nullsafe
                    && self.eq_node(state, variable, y_variable)
                    && self.eq_with_case(state, method, y_method)
                    && self.eq_slice(state, args, y_args)
            }
            NodeKind::StaticCall { class, call, args } => {
                let NodeKind::StaticCall {
                    class: y_class,
                    call: y_call,
                    args: y_args,
                } = &y.kind
                else {
                    return false;
                };
                self.eq_with_case(state, class, y_class)
                    && self.eq_with_case(state, call, y_call)
                    && self.eq_slice(state, args, y_args)
            }
            NodeKind::Argument {
                expr,
                by_ref,
                variadic,
                name,
            } => {
                let NodeKind::Argument {
                    expr: y_expr,
                    by_ref: y_by_ref,
                    variadic: y_variadic,
                    name: y_name,
                } = &y.kind
                else {
                    return false;
                };
                by_ref == y_by_ref
                    && variadic == y_variadic
                    && name == y_name
                    && self.eq_node(state, expr, y_expr)
            }
            NodeKind::PropertyFetch {
                variable,
                property,
                nullsafe,
            } => {
                let NodeKind::PropertyFetch {
                    variable: y_variable,
                    property: y_property,
                    nullsafe: y_nullsafe,
                } = &y.kind
                else {
                    return false;
                };
                nullsafe == y_nullsafe
                    && self.eq_node(state, variable, y_variable)
                    && self.eq_node(state, property, y_property)
            }
            NodeKind::StaticPropertyFetch { class, property } => match &y.kind {
                NodeKind::StaticPropertyFetch {
                    class: y_class,
                    property: y_property,
                } => {
                    self.eq_with_case(state, class, y_class)
                        && self.eq_node(state, property, y_property)
                }
                // `C::$x` in a pattern also stands for any class constant.
                NodeKind::ClassConstFetch {
                    class: y_class,
                    constant,
                } => {
                    matches!(
                        property.kind,
                        NodeKind::SimpleVar { .. } | NodeKind::Var { .. } | NodeKind::Meta(_)
                    ) && self.eq_with_case(state, class, y_class)
                        && self.eq_node(state, property, constant)
                }
                _ => false,
            },
            NodeKind::ClassConstFetch { class, constant } => {
                let NodeKind::ClassConstFetch {
                    class: y_class,
                    constant: y_constant,
                } = &y.kind
                else {
                    return false;
                };
                self.eq_with_case(state, class, y_class) && self.eq_node(state, constant, y_constant)
            }
            NodeKind::ConstFetch { constant } => {
                let NodeKind::ConstFetch {
                    constant: y_constant,
                } = &y.kind
                else {
                    return false;
                };
                match (&constant.kind, &y_constant.kind) {
                    (NodeKind::Name { value: a }, NodeKind::Name { value: b })
                        if CASELESS_CONSTANTS
                            .iter()
                            .any(|keyword| a.eq_ignore_ascii_case(keyword)) =>
                    {
                        a.eq_ignore_ascii_case(b)
                    }
                    _ => self.eq_node(state, constant, y_constant),
                }
            }
            NodeKind::ArrayDimFetch {
                variable,
                dim,
                curly,
            } => {
                let NodeKind::ArrayDimFetch {
                    variable: y_variable,
                    dim: y_dim,
                    curly: y_curly,
                } = &y.kind
                else {
                    return false;
                };
                curly == y_curly
                    && self.eq_node(state, variable, y_variable)
                    && self.eq_opt(state, dim.as_deref(), y_dim.as_deref())
            }
            NodeKind::Array {
                items,
                short_syntax,
            } => {
                let NodeKind::Array {
                    items: y_items,
                    short_syntax: y_short,
                } = &y.kind
                else {
                    return false;
                };
                short_syntax == y_short && self.eq_slice(state, items, y_items)
            }
            NodeKind::List {
                items,
                short_syntax,
            } => {
                let NodeKind::List {
                    items: y_items,
                    short_syntax: y_short,
                } = &y.kind
                else {
                    return false;
                };
                short_syntax == y_short && self.eq_slice(state, items, y_items)
            }
            NodeKind::ArrayItem {
                key,
                value,
                by_ref,
                unpack,
            } => {
                let NodeKind::ArrayItem {
                    key: y_key,
                    value: y_value,
                    by_ref: y_by_ref,
                    unpack: y_unpack,
                } = &y.kind
                else {
                    return false;
                };
                // A keyed entry never matches a positional one.
                if key.is_none() != y_key.is_none() {
                    return false;
                }
                by_ref == y_by_ref
                    && unpack == y_unpack
                    && self.eq_opt(state, key.as_deref(), y_key.as_deref())
                    && self.eq_opt(state, value.as_deref(), y_value.as_deref())
            }
            NodeKind::New { class, args } => {
                let NodeKind::New {
                    class: y_class,
                    args: y_args,
                } = &y.kind
                else {
                    return false;
                };
                let args_match = match (args, y_args) {
                    (None, None) => true,
                    (Some(args), Some(y_args)) => self.eq_slice(state, args, y_args),
                    _ => false,
                };
                args_match && self.eq_with_case(state, class, y_class)
            }
            NodeKind::Clone { expr } => {
                let NodeKind::Clone { expr: other } = &y.kind else {
                    return false;
                };
                self.eq_node(state, expr, other)
            }
            NodeKind::Print { expr } => {
                let NodeKind::Print { expr: other } = &y.kind else {
                    return false;
                };
                self.eq_node(state, expr, other)
            }
            NodeKind::Exit { die, expr } => {
                let NodeKind::Exit {
                    die: y_die,
                    expr: y_expr,
                } = &y.kind
                else {
                    return false;
                };
                die == y_die && self.eq_opt(state, expr.as_deref(), y_expr.as_deref())
            }
            NodeKind::Import { kind, expr } => {
                let NodeKind::Import {
                    kind: y_kind,
                    expr: y_expr,
                } = &y.kind
                else {
                    return false;
                };
                kind == y_kind && self.eq_node(state, expr, y_expr)
            }
            NodeKind::Yield { key, value } => {
                let NodeKind::Yield {
                    key: y_key,
                    value: y_value,
                } = &y.kind
                else {
                    return false;
                };
                self.eq_opt(state, key.as_deref(), y_key.as_deref())
                    && self.eq_opt(state, value.as_deref(), y_value.as_deref())
            }
            NodeKind::YieldFrom { expr } => {
                let NodeKind::YieldFrom { expr: other } = &y.kind else {
                    return false;
                };
                self.eq_node(state, expr, other)
            }
            NodeKind::ShellExec { parts } => {
                let NodeKind::ShellExec { parts: other } = &y.kind else {
                    return false;
                };
                self.eq_parts(state, parts, other)
            }
            NodeKind::Encapsed { parts } => {
                let NodeKind::Encapsed { parts: other } = &y.kind else {
                    return false;
                };
                self.eq_parts(state, parts, other)
            }
            NodeKind::Heredoc { label, parts } => {
                let NodeKind::Heredoc {
                    label: y_label,
                    parts: y_parts,
                } = &y.kind
                else {
                    return false;
                };
                label == y_label && self.eq_parts(state, parts, y_parts)
            }
            NodeKind::EncapsedPart { value } => {
                matches!(&y.kind, NodeKind::EncapsedPart { value: other } if other == value)
            }
            NodeKind::Closure {
                params,
                uses,
                return_type,
                stmts,
                by_ref,
                is_static,
            } => {
                let NodeKind::Closure {
                    params: y_params,
                    uses: y_uses,
                    return_type: y_return,
                    stmts: y_stmts,
                    by_ref: y_by_ref,
                    is_static: y_static,
                } = &y.kind
                else {
                    return false;
                };
                by_ref == y_by_ref
                    && is_static == y_static
                    && self.eq_slice(state, params, y_params)
                    && self.eq_slice(state, uses, y_uses)
                    && self.eq_opt(state, return_type.as_deref(), y_return.as_deref())
                    && self.eq_slice(state, stmts, y_stmts)
            }
            NodeKind::ArrowFunction {
                params,
                return_type,
                expr,
                by_ref,
                is_static,
            } => {
                let NodeKind::ArrowFunction {
                    params: y_params,
                    return_type: y_return,
                    expr: y_expr,
                    by_ref: y_by_ref,
                    is_static: y_static,
                } = &y.kind
                else {
                    return false;
                };
                by_ref == y_by_ref
                    && is_static == y_static
                    && self.eq_slice(state, params, y_params)
                    && self.eq_opt(state, return_type.as_deref(), y_return.as_deref())
                    && self.eq_node(state, expr, y_expr)
            }
            NodeKind::Parameter {
                variable,
                type_hint,
                default,
                by_ref,
                variadic,
            } => {
                let NodeKind::Parameter {
                    variable: y_variable,
                    type_hint: y_type,
                    default: y_default,
                    by_ref: y_by_ref,
                    variadic: y_variadic,
                } = &y.kind
                else {
                    return false;
                };
                by_ref == y_by_ref
                    && variadic == y_variadic
                    && self.eq_opt(state, type_hint.as_deref(), y_type.as_deref())
                    && self.eq_node(state, variable, y_variable)
                    && self.eq_opt(state, default.as_deref(), y_default.as_deref())
            }
            NodeKind::Reference { variable } => {
                let NodeKind::Reference { variable: other } = &y.kind else {
                    return false;
                };
                self.eq_node(state, variable, other)
            }

            NodeKind::SimpleVar { name } => self.eq_simple_var(state, name, y),
            NodeKind::Var { expr } => {
                let NodeKind::Var { expr: other } = &y.kind else {
                    return false;
                };
                self.eq_node(state, expr, other)
            }
            NodeKind::Name { value } => {
                matches!(&y.kind, NodeKind::Name { value: other } if other == value)
            }
            NodeKind::Identifier { value } => {
                matches!(&y.kind, NodeKind::Identifier { value: other } if other == value)
            }
            NodeKind::Int { value } => {
                matches!(&y.kind, NodeKind::Int { value: other } if other == value)
            }
            NodeKind::Float { value } => {
                matches!(&y.kind, NodeKind::Float { value: other } if other == value)
            }
            NodeKind::Str { value } => {
                matches!(&y.kind, NodeKind::Str { value: other } if other == value)
            }
            NodeKind::MagicConstant { value } => {
                matches!(&y.kind, NodeKind::MagicConstant { value: other } if other == value)
            }
        }
    }
}
