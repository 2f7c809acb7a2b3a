//! Child enumeration and depth-first traversal.

use super::{Node, NodeKind};

/// Receives nodes during a depth-first, pre-order walk.
///
/// Returning `false` from [`Visitor::enter_node`] skips the node's children.
pub trait Visitor<'a> {
    /// Called before the children of `node` are visited.
    fn enter_node(&mut self, node: &'a Node) -> bool;

    /// Called after the children of `node` have been visited.
    fn leave_node(&mut self, _node: &'a Node) {}
}

// Expands to a single exhaustive match so that shared and mutable traversal
// cannot drift apart when a kind gains a child.
macro_rules! push_children {
    ($kind:expr, $out:ident $(, $m:tt)?) => {
        match $kind {
            NodeKind::Nop
            | NodeKind::InlineHtml { .. }
            | NodeKind::EncapsedPart { .. }
            | NodeKind::SimpleVar { .. }
            | NodeKind::Name { .. }
            | NodeKind::Identifier { .. }
            | NodeKind::Int { .. }
            | NodeKind::Float { .. }
            | NodeKind::Str { .. }
            | NodeKind::MagicConstant { .. }
            | NodeKind::Meta(_) => {}

            NodeKind::ExpressionStmt { expr }
            | NodeKind::Throw { expr }
            | NodeKind::Unary { expr, .. }
            | NodeKind::Cast { expr, .. }
            | NodeKind::Paren { expr }
            | NodeKind::Clone { expr }
            | NodeKind::Print { expr }
            | NodeKind::Import { expr, .. }
            | NodeKind::YieldFrom { expr }
            | NodeKind::Var { expr } => $out.push(&$($m)? **expr),

            NodeKind::IncDec { variable, .. } | NodeKind::Reference { variable } => {
                $out.push(&$($m)? **variable);
            }

            NodeKind::ConstFetch { constant } => $out.push(&$($m)? **constant),

            NodeKind::Return { expr }
            | NodeKind::Break { expr }
            | NodeKind::Continue { expr }
            | NodeKind::Exit { expr, .. } => {
                if let Some(expr) = expr {
                    $out.push(&$($m)? **expr);
                }
            }

            NodeKind::Program { stmts }
            | NodeKind::StmtList { stmts }
            | NodeKind::Default { stmts }
            | NodeKind::Finally { stmts } => $out.extend(stmts),
            NodeKind::Echo { exprs } => $out.extend(exprs),
            NodeKind::Global { vars } | NodeKind::Static { vars } | NodeKind::Unset { vars } => {
                $out.extend(vars);
            }
            NodeKind::ShellExec { parts }
            | NodeKind::Encapsed { parts }
            | NodeKind::Heredoc { parts, .. } => $out.extend(parts),
            NodeKind::Declaration { children, .. } | NodeKind::Unsupported { children, .. } => {
                $out.extend(children);
            }

            NodeKind::StaticVar { variable, expr } => {
                $out.push(&$($m)? **variable);
                if let Some(expr) = expr {
                    $out.push(&$($m)? **expr);
                }
            }
            NodeKind::If { cond, body, else_ifs, else_branch, .. } => {
                $out.push(&$($m)? **cond);
                $out.push(&$($m)? **body);
                $out.extend(else_ifs);
                if let Some(else_branch) = else_branch {
                    $out.push(&$($m)? **else_branch);
                }
            }
            NodeKind::ElseIf { cond, body, .. } | NodeKind::While { cond, body, .. } => {
                $out.push(&$($m)? **cond);
                $out.push(&$($m)? **body);
            }
            NodeKind::Else { body, .. } => $out.push(&$($m)? **body),
            NodeKind::Do { body, cond } => {
                $out.push(&$($m)? **body);
                $out.push(&$($m)? **cond);
            }
            NodeKind::For { init, cond, step, body, .. } => {
                $out.extend(init);
                $out.extend(cond);
                $out.extend(step);
                $out.push(&$($m)? **body);
            }
            NodeKind::Foreach { expr, key, value, body, .. } => {
                $out.push(&$($m)? **expr);
                if let Some(key) = key {
                    $out.push(&$($m)? **key);
                }
                $out.push(&$($m)? **value);
                $out.push(&$($m)? **body);
            }
            NodeKind::Switch { cond, cases, .. } => {
                $out.push(&$($m)? **cond);
                $out.extend(cases);
            }
            NodeKind::Case { cond, stmts } => {
                $out.push(&$($m)? **cond);
                $out.extend(stmts);
            }
            NodeKind::Try { stmts, catches, finally } => {
                $out.extend(stmts);
                $out.extend(catches);
                if let Some(finally) = finally {
                    $out.push(&$($m)? **finally);
                }
            }
            NodeKind::Catch { types, variable, stmts } => {
                $out.extend(types);
                if let Some(variable) = variable {
                    $out.push(&$($m)? **variable);
                }
                $out.extend(stmts);
            }

            NodeKind::Assign { variable, expr, .. } => {
                $out.push(&$($m)? **variable);
                $out.push(&$($m)? **expr);
            }
            NodeKind::Binary { left, right, .. } => {
                $out.push(&$($m)? **left);
                $out.push(&$($m)? **right);
            }
            NodeKind::InstanceOf { expr, class } => {
                $out.push(&$($m)? **expr);
                $out.push(&$($m)? **class);
            }
            NodeKind::Ternary { cond, if_true, if_false } => {
                $out.push(&$($m)? **cond);
                if let Some(if_true) = if_true {
                    $out.push(&$($m)? **if_true);
                }
                $out.push(&$($m)? **if_false);
            }
            NodeKind::FunctionCall { function, args } => {
                $out.push(&$($m)? **function);
                $out.extend(args);
            }
            NodeKind::MethodCall { variable, method, args, .. } => {
                $out.push(&$($m)? **variable);
                $out.push(&$($m)? **method);
                $out.extend(args);
            }
            NodeKind::StaticCall { class, call, args } => {
                $out.push(&$($m)? **class);
                $out.push(&$($m)? **call);
                $out.extend(args);
            }
            NodeKind::Argument { expr, .. } => $out.push(&$($m)? **expr),
            NodeKind::PropertyFetch { variable, property, .. } => {
                $out.push(&$($m)? **variable);
                $out.push(&$($m)? **property);
            }
            NodeKind::StaticPropertyFetch { class, property } => {
                $out.push(&$($m)? **class);
                $out.push(&$($m)? **property);
            }
            NodeKind::ClassConstFetch { class, constant } => {
                $out.push(&$($m)? **class);
                $out.push(&$($m)? **constant);
            }
            NodeKind::ArrayDimFetch { variable, dim, .. } => {
                $out.push(&$($m)? **variable);
                if let Some(dim) = dim {
                    $out.push(&$($m)? **dim);
                }
            }
            NodeKind::Array { items, .. } | NodeKind::List { items, .. } => $out.extend(items),
            NodeKind::ArrayItem { key, value, .. } | NodeKind::Yield { key, value } => {
                if let Some(key) = key {
                    $out.push(&$($m)? **key);
                }
                if let Some(value) = value {
                    $out.push(&$($m)? **value);
                }
            }
            NodeKind::New { class, args } => {
                $out.push(&$($m)? **class);
                if let Some(args) = args {
                    $out.extend(args);
                }
            }
            NodeKind::Closure { params, uses, return_type, stmts, .. } => {
                $out.extend(params);
                $out.extend(uses);
                if let Some(return_type) = return_type {
                    $out.push(&$($m)? **return_type);
                }
                $out.extend(stmts);
            }
            NodeKind::ArrowFunction { params, return_type, expr, .. } => {
                $out.extend(params);
                if let Some(return_type) = return_type {
                    $out.push(&$($m)? **return_type);
                }
                $out.push(&$($m)? **expr);
            }
            NodeKind::Parameter { variable, type_hint, default, .. } => {
                if let Some(type_hint) = type_hint {
                    $out.push(&$($m)? **type_hint);
                }
                $out.push(&$($m)? **variable);
                if let Some(default) = default {
                    $out.push(&$($m)? **default);
                }
            }
        }
    };
}

impl Node {
    /// Returns the direct children of this node in source order.
    #[must_use]
    pub fn children(&self) -> Vec<&Self> {
        let mut out: Vec<&Self> = Vec::new();
        push_children!(&self.kind, out);
        out
    }

    /// Returns mutable references to the direct children of this node.
    pub fn children_mut(&mut self) -> Vec<&mut Self> {
        let mut out: Vec<&mut Self> = Vec::new();
        push_children!(&mut self.kind, out, mut);
        out
    }

    /// Walks this node and its descendants depth-first, pre-order.
    pub fn walk<'a, V: Visitor<'a>>(&'a self, visitor: &mut V) {
        if visitor.enter_node(self) {
            for child in self.children() {
                child.walk(visitor);
            }
        }
        visitor.leave_node(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::BinaryOp;

    fn var(name: &str) -> Node {
        Node::synthetic(NodeKind::SimpleVar {
            name: name.to_owned(),
        })
    }

    fn plus(left: Node, right: Node) -> Node {
        Node::synthetic(NodeKind::Binary {
            op: BinaryOp::Plus,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    struct Recorder {
        entered: Vec<String>,
        left: usize,
        descend: bool,
    }

    impl<'a> Visitor<'a> for Recorder {
        fn enter_node(&mut self, node: &'a Node) -> bool {
            let label = match &node.kind {
                NodeKind::SimpleVar { name } => name.clone(),
                other => other.name().to_owned(),
            };
            self.entered.push(label);
            self.descend
        }

        fn leave_node(&mut self, _node: &'a Node) {
            self.left += 1;
        }
    }

    #[test]
    fn walk_visits_in_pre_order() {
        let tree = plus(plus(var("a"), var("b")), var("c"));
        let mut recorder = Recorder {
            entered: Vec::new(),
            left: 0,
            descend: true,
        };

        tree.walk(&mut recorder);

        assert_eq!(recorder.entered, ["Binary", "Binary", "a", "b", "c"]);
        assert_eq!(recorder.left, 5);
    }

    #[test]
    fn walk_skips_children_when_visitor_declines() {
        let tree = plus(var("a"), var("b"));
        let mut recorder = Recorder {
            entered: Vec::new(),
            left: 0,
            descend: false,
        };

        tree.walk(&mut recorder);

        assert_eq!(recorder.entered, ["Binary"]);
    }

    #[test]
    fn children_mut_allows_in_place_rewrites() {
        let mut tree = plus(var("a"), var("b"));
        for child in tree.children_mut() {
            child.kind = NodeKind::Int {
                value: "1".to_owned(),
            };
        }

        assert_eq!(tree.children().len(), 2);
        assert!(
            tree.children()
                .iter()
                .all(|child| matches!(&child.kind, NodeKind::Int { value } if value == "1"))
        );
    }
}
