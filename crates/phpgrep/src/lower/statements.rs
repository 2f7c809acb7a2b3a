//! Statement lowering.

use super::{Lowerer, TsNode, all_children, has_token, missing, named_children};
use crate::ir::{Node, NodeKind};

impl Lowerer<'_> {
    /// Lowers statement kinds, returning `None` for anything else.
    pub(super) fn lower_statement(&self, node: TsNode<'_>) -> Option<NodeKind> {
        let kind = match node.kind() {
            "empty_statement" => NodeKind::Nop,
            "expression_statement" => NodeKind::ExpressionStmt {
                expr: self.required(node, "expression"),
            },
            "echo_statement" => NodeKind::Echo {
                exprs: self.flatten_sequence(node),
            },
            "return_statement" => NodeKind::Return {
                expr: self.first(node),
            },
            "break_statement" => NodeKind::Break {
                expr: self.first(node),
            },
            "continue_statement" => NodeKind::Continue {
                expr: self.first(node),
            },
            "global_declaration" => NodeKind::Global {
                vars: self.lower_all(node),
            },
            "function_static_declaration" => NodeKind::Static {
                vars: self.lower_all(node),
            },
            "static_variable_declaration" => NodeKind::StaticVar {
                variable: self.required(node, "name"),
                expr: self.optional(node, "value"),
            },
            "unset_statement" => NodeKind::Unset {
                vars: self.lower_all(node),
            },
            "text" => NodeKind::InlineHtml {
                value: self.text(node).to_owned(),
            },
            "text_interpolation" => NodeKind::InlineHtml {
                value: named_children(node)
                    .into_iter()
                    .find(|child| child.kind() == "text")
                    .map(|text| self.text(text).to_owned())
                    .unwrap_or_default(),
            },
            "if_statement" => self.lower_if(node),
            "else_if_clause" => NodeKind::ElseIf {
                cond: self.condition(node),
                body: self.clause_body(node),
                alt_syntax: is_alt_body(node),
            },
            "else_clause" => NodeKind::Else {
                body: self.clause_body(node),
                alt_syntax: is_alt_body(node),
            },
            "while_statement" => NodeKind::While {
                cond: self.condition(node),
                body: self.clause_body(node),
                alt_syntax: is_alt_body(node),
            },
            "do_statement" => NodeKind::Do {
                body: self.clause_body(node),
                cond: self.condition(node),
            },
            "for_statement" => self.lower_for(node),
            "foreach_statement" => self.lower_foreach(node),
            "switch_statement" => self.lower_switch(node),
            "case_statement" => self.lower_case(node),
            "default_statement" => NodeKind::Default {
                stmts: self.lower_all(node),
            },
            "try_statement" => self.lower_try(node),
            "catch_clause" => self.lower_catch(node),
            "finally_clause" => NodeKind::Finally {
                stmts: self.body_statements(node),
            },
            "throw_expression" | "throw_statement" => NodeKind::Throw {
                expr: self.required(node, "expression"),
            },
            _ => return None,
        };
        Some(kind)
    }

    /// Lowers expression lists, splicing comma-separated sequences.
    pub(super) fn flatten_sequence(&self, node: TsNode<'_>) -> Vec<Node> {
        let mut out = Vec::new();
        let mut pending = named_children(node);
        pending.reverse();
        while let Some(child) = pending.pop() {
            if child.kind() == "sequence_expression" {
                pending.extend(named_children(child).into_iter().rev());
            } else {
                out.push(self.lower(child));
            }
        }
        out
    }

    fn clause_body(&self, node: TsNode<'_>) -> Box<Node> {
        if let Some(body) = node.child_by_field_name("body") {
            return self.boxed(body);
        }
        named_children(node)
            .into_iter()
            .find(|child| child.kind() != "parenthesized_expression")
            .map_or_else(|| Box::new(missing("body")), |body| self.boxed(body))
    }

    /// Statements of the `body` block of a clause.
    fn body_statements(&self, node: TsNode<'_>) -> Vec<Node> {
        let body = node.child_by_field_name("body").or_else(|| {
            named_children(node)
                .into_iter()
                .find(|child| child.kind() == "compound_statement")
        });
        body.map(|body| self.lower_all(body)).unwrap_or_default()
    }

    fn lower_if(&self, node: TsNode<'_>) -> NodeKind {
        let mut else_ifs = Vec::new();
        let mut else_branch = None;
        for child in named_children(node) {
            match child.kind() {
                "else_if_clause" => else_ifs.push(self.lower(child)),
                "else_clause" => else_branch = Some(self.boxed(child)),
                _ => {}
            }
        }
        NodeKind::If {
            cond: self.condition(node),
            body: self.clause_body(node),
            else_ifs,
            else_branch,
            alt_syntax: is_alt_body(node),
        }
    }

    fn lower_for(&self, node: TsNode<'_>) -> NodeKind {
        let header = LoopHeader::scan(node);
        let mut sections: [Vec<Node>; 3] = Default::default();
        for (index, child) in header.items {
            if let Some(section) = sections.get_mut(index) {
                if child.kind() == "sequence_expression" {
                    section.extend(self.flatten_sequence(child));
                } else {
                    section.push(self.lower(child));
                }
            }
        }
        let [init, cond, step] = sections;
        NodeKind::For {
            init,
            cond,
            step,
            body: self.loop_body(&header.body, header.alt_syntax),
            alt_syntax: header.alt_syntax,
        }
    }

    fn lower_foreach(&self, node: TsNode<'_>) -> NodeKind {
        let header = LoopHeader::scan(node);
        let mut expr = None;
        let mut key = None;
        let mut value = None;
        for (index, child) in header.items {
            if index == 0 && expr.is_none() {
                expr = Some(self.boxed(child));
            } else if child.kind() == "pair" {
                let mut parts = named_children(child).into_iter();
                key = parts.next().map(|part| self.boxed(part));
                value = parts.next().map(|part| self.boxed(part));
            } else if value.is_none() {
                value = Some(self.boxed(child));
            }
        }
        NodeKind::Foreach {
            expr: expr.unwrap_or_else(|| Box::new(missing("foreach subject"))),
            key,
            value: value.unwrap_or_else(|| Box::new(missing("foreach value"))),
            body: self.loop_body(&header.body, header.alt_syntax),
            alt_syntax: header.alt_syntax,
        }
    }

    fn loop_body(&self, body: &[TsNode<'_>], alt_syntax: bool) -> Box<Node> {
        match body {
            [single] if !alt_syntax => self.boxed(*single),
            [] if !alt_syntax => Box::new(Node::synthetic(NodeKind::Nop)),
            stmts => Box::new(Node::synthetic(NodeKind::StmtList {
                stmts: stmts.iter().map(|stmt| self.lower(*stmt)).collect(),
            })),
        }
    }

    fn lower_switch(&self, node: TsNode<'_>) -> NodeKind {
        let block = node.child_by_field_name("body").or_else(|| {
            named_children(node)
                .into_iter()
                .find(|child| child.kind() == "switch_block")
        });
        NodeKind::Switch {
            cond: self.condition(node),
            cases: block.map(|block| self.lower_all(block)).unwrap_or_default(),
            alt_syntax: block.is_some_and(|block| has_token(block, ":")),
        }
    }

    fn lower_case(&self, node: TsNode<'_>) -> NodeKind {
        let value = node
            .child_by_field_name("value")
            .or_else(|| named_children(node).into_iter().next());
        let value_id = value.map(|value| value.id());
        NodeKind::Case {
            cond: value.map_or_else(|| Box::new(missing("case value")), |value| self.boxed(value)),
            stmts: named_children(node)
                .into_iter()
                .filter(|child| Some(child.id()) != value_id)
                .map(|child| self.lower(child))
                .collect(),
        }
    }

    fn lower_try(&self, node: TsNode<'_>) -> NodeKind {
        let mut catches = Vec::new();
        let mut finally = None;
        for child in named_children(node) {
            match child.kind() {
                "catch_clause" => catches.push(self.lower(child)),
                "finally_clause" => finally = Some(self.boxed(child)),
                _ => {}
            }
        }
        NodeKind::Try {
            stmts: self.body_statements(node),
            catches,
            finally,
        }
    }

    fn lower_catch(&self, node: TsNode<'_>) -> NodeKind {
        let types = node
            .child_by_field_name("type")
            .map(|list| {
                if list.kind() == "type_list" {
                    named_children(list)
                        .into_iter()
                        .map(|ty| self.lower_name(ty))
                        .collect()
                } else {
                    vec![self.lower_name(list)]
                }
            })
            .unwrap_or_default();
        NodeKind::Catch {
            types,
            variable: self.optional(node, "name"),
            stmts: self.body_statements(node),
        }
    }
}

/// Returns `true` when a clause uses the `: ... endX;` form.
fn is_alt_body(node: TsNode<'_>) -> bool {
    node.child_by_field_name("body")
        .is_some_and(|body| body.kind() == "colon_block")
}

/// Children of a `for`/`foreach` statement split around its parentheses.
struct LoopHeader<'t> {
    /// Header expressions tagged with their `;`-separated section index.
    items: Vec<(usize, TsNode<'t>)>,
    /// Named children after the closing parenthesis.
    body: Vec<TsNode<'t>>,
    alt_syntax: bool,
}

impl<'t> LoopHeader<'t> {
    fn scan(node: TsNode<'t>) -> Self {
        let mut items = Vec::new();
        let mut body = Vec::new();
        let mut alt_syntax = false;
        let mut section = 0;
        let mut state = HeaderState::Before;
        for child in all_children(node) {
            match (state, child.kind(), child.is_named()) {
                (HeaderState::Before, "(", false) => state = HeaderState::Inside,
                (HeaderState::Inside, ")", false) => state = HeaderState::After,
                (HeaderState::Inside, ";" | "as", false) => section += 1,
                (HeaderState::Inside, _, true) => items.push((section, child)),
                (HeaderState::After, ":", false) => alt_syntax = true,
                (HeaderState::After, _, true) => body.push(child),
                _ => {}
            }
        }
        Self {
            items,
            body,
            alt_syntax,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeaderState {
    Before,
    Inside,
    After,
}
