//! Expression lowering.

use super::{Lowerer, TsNode, all_children, has_child_kind, has_token, missing, named_children};
use crate::ir::{
    AssignOp, BinaryOp, DeclarationKind, ImportKind, IncDecOp, Node, NodeKind, UnaryOp,
};

const MAGIC_CONSTANTS: &[&str] = &[
    "__LINE__",
    "__FILE__",
    "__DIR__",
    "__FUNCTION__",
    "__CLASS__",
    "__TRAIT__",
    "__METHOD__",
    "__NAMESPACE__",
    "__COMPILER_HALT_OFFSET__",
];

/// Kinds that name a class or type rather than evaluate to a value.
const NAME_KINDS: &[&str] = &[
    "name",
    "qualified_name",
    "namespace_name",
    "relative_scope",
    "named_type",
    "optional_type",
    "primitive_type",
    "union_type",
    "intersection_type",
    "disjunctive_normal_form_type",
    "bottom_type",
    "type_list",
];

impl Lowerer<'_> {
    /// Lowers expression kinds, returning `None` for anything else.
    pub(super) fn lower_expression(&self, node: TsNode<'_>) -> Option<NodeKind> {
        let kind = match node.kind() {
            "variable_name" => NodeKind::SimpleVar {
                name: self.text(node).trim_start_matches('$').to_owned(),
            },
            "dynamic_variable_name" => NodeKind::Var {
                expr: self.required(node, "name"),
            },
            "integer" => NodeKind::Int {
                value: self.text(node).to_owned(),
            },
            "float" => NodeKind::Float {
                value: self.text(node).to_owned(),
            },
            "string" => NodeKind::Str {
                value: unquote(self.text(node)).to_owned(),
            },
            "encapsed_string" => self.lower_encapsed(node),
            "heredoc" | "nowdoc" => self.lower_heredoc(node),
            "shell_command_expression" => NodeKind::ShellExec {
                parts: self.lower_delimited_parts(node),
            },
            "boolean" | "null" => NodeKind::ConstFetch {
                constant: Box::new(self.name_node(node)),
            },
            "name" | "qualified_name" => self.lower_bare_name(node),
            "parenthesized_expression" => NodeKind::Paren {
                expr: self.required(node, "expression"),
            },
            "assignment_expression" => NodeKind::Assign {
                op: if has_token(node, "&") {
                    AssignOp::Reference
                } else {
                    AssignOp::Assign
                },
                variable: self.required(node, "left"),
                expr: self.right_operand(node),
            },
            "reference_assignment_expression" => NodeKind::Assign {
                op: AssignOp::Reference,
                variable: self.required(node, "left"),
                expr: self.right_operand(node),
            },
            "augmented_assignment_expression" => NodeKind::Assign {
                op: self
                    .operator(node)
                    .and_then(AssignOp::from_token)
                    .unwrap_or(AssignOp::Assign),
                variable: self.required(node, "left"),
                expr: self.right_operand(node),
            },
            "binary_expression" => self.lower_binary(node)?,
            "unary_op_expression" => self.lower_unary(node)?,
            "error_suppression_expression" => NodeKind::Unary {
                op: UnaryOp::ErrorSuppress,
                expr: self.last_operand(node),
            },
            "update_expression" => self.lower_update(node)?,
            "cast_expression" => NodeKind::Cast {
                cast_type: node
                    .child_by_field_name("type")
                    .map(|ty| normalise_cast(self.text(ty)))
                    .unwrap_or_default(),
                expr: node
                    .child_by_field_name("value")
                    .map_or_else(|| self.last_operand(node), |value| self.boxed(value)),
            },
            "conditional_expression" => self.lower_ternary(node),
            "function_call_expression" => NodeKind::FunctionCall {
                function: self.name_or_expr(node.child_by_field_name("function"), node),
                args: self.lower_arguments(node),
            },
            "member_call_expression" | "nullsafe_member_call_expression" => {
                NodeKind::MethodCall {
                    variable: self.required(node, "object"),
                    method: self.member_name(node.child_by_field_name("name")),
                    args: self.lower_arguments(node),
                    nullsafe: node.kind().starts_with("nullsafe"),
                }
            }
            "scoped_call_expression" => NodeKind::StaticCall {
                class: self.name_or_expr(node.child_by_field_name("scope"), node),
                call: self.member_name(node.child_by_field_name("name")),
                args: self.lower_arguments(node),
            },
            "member_access_expression" | "nullsafe_member_access_expression" => {
                NodeKind::PropertyFetch {
                    variable: self.required(node, "object"),
                    property: self.member_name(node.child_by_field_name("name")),
                    nullsafe: node.kind().starts_with("nullsafe"),
                }
            }
            "scoped_property_access_expression" => NodeKind::StaticPropertyFetch {
                class: self.name_or_expr(node.child_by_field_name("scope"), node),
                property: self.required(node, "name"),
            },
            "class_constant_access_expression" => self.lower_class_constant(node),
            "subscript_expression" => self.lower_subscript(node),
            "array_creation_expression" => NodeKind::Array {
                items: named_children(node)
                    .into_iter()
                    .map(|item| self.array_item(item))
                    .collect(),
                short_syntax: has_token(node, "["),
            },
            "array_element_initializer" => return Some(self.array_item(node).kind),
            "list_literal" => self.lower_list(node),
            "object_creation_expression" => self.lower_new(node),
            "clone_expression" => NodeKind::Clone {
                expr: self.last_operand(node),
            },
            "print_intrinsic" => NodeKind::Print {
                expr: self.last_operand(node),
            },
            "exit_statement" => NodeKind::Exit {
                die: self.text(node).trim_start().to_ascii_lowercase().starts_with("die"),
                expr: self.first(node),
            },
            "include_expression" => self.import(node, ImportKind::Include),
            "include_once_expression" => self.import(node, ImportKind::IncludeOnce),
            "require_expression" => self.import(node, ImportKind::Require),
            "require_once_expression" => self.import(node, ImportKind::RequireOnce),
            "yield_expression" => self.lower_yield(node),
            "anonymous_function" | "anonymous_function_creation_expression" => {
                self.lower_closure(node)
            }
            "arrow_function" => NodeKind::ArrowFunction {
                params: self.lower_parameters(node),
                return_type: node
                    .child_by_field_name("return_type")
                    .map(|ty| Box::new(self.lower_name(ty))),
                expr: self.required(node, "body"),
                by_ref: is_by_ref(node),
                is_static: is_static(node),
            },
            "simple_parameter" | "variadic_parameter" | "property_promotion_parameter" => {
                NodeKind::Parameter {
                    variable: self.required(node, "name"),
                    type_hint: node
                        .child_by_field_name("type")
                        .map(|ty| Box::new(self.lower_name(ty))),
                    default: self.optional(node, "default_value"),
                    by_ref: is_by_ref(node),
                    variadic: node.kind() == "variadic_parameter",
                }
            }
            "by_ref" => NodeKind::Reference {
                variable: self.required(node, "variable"),
            },
            _ => return None,
        };
        Some(kind)
    }

    /// Lowers a class or function reference: names become [`NodeKind::Name`],
    /// anything else is lowered as an expression.
    pub(super) fn lower_name(&self, node: TsNode<'_>) -> Node {
        if NAME_KINDS.contains(&node.kind()) {
            return self.name_node(node);
        }
        self.lower(node)
    }

    fn name_node(&self, node: TsNode<'_>) -> Node {
        self.make(
            node,
            NodeKind::Name {
                value: self.text(node).trim().to_owned(),
            },
        )
    }

    fn name_or_expr(&self, node: Option<TsNode<'_>>, parent: TsNode<'_>) -> Box<Node> {
        let target = node.or_else(|| named_children(parent).into_iter().next());
        target.map_or_else(|| Box::new(missing("name")), |target| Box::new(self.lower_name(target)))
    }

    /// Lowers a member name after `->` or `::`.
    fn member_name(&self, node: Option<TsNode<'_>>) -> Box<Node> {
        let Some(node) = node else {
            return Box::new(missing("member name"));
        };
        if node.kind() == "name" {
            return Box::new(self.make(
                node,
                NodeKind::Identifier {
                    value: self.text(node).to_owned(),
                },
            ));
        }
        self.boxed(node)
    }

    /// Bare names in expression position are constants.
    fn lower_bare_name(&self, node: TsNode<'_>) -> NodeKind {
        let text = self.text(node).trim();
        let upper = text.to_ascii_uppercase();
        if MAGIC_CONSTANTS.contains(&upper.as_str()) {
            return NodeKind::MagicConstant { value: upper };
        }
        NodeKind::ConstFetch {
            constant: Box::new(self.name_node(node)),
        }
    }

    /// Text of the operator token of `node`.
    fn operator(&self, node: TsNode<'_>) -> Option<&str> {
        if let Some(op) = node.child_by_field_name("operator") {
            return Some(self.text(op));
        }
        all_children(node)
            .into_iter()
            .find(|child| !child.is_named() && !matches!(child.kind(), "(" | ")"))
            .map(|op| self.text(op))
    }

    fn right_operand(&self, node: TsNode<'_>) -> Box<Node> {
        node.child_by_field_name("right")
            .map_or_else(|| self.last_operand(node), |right| self.boxed(right))
    }

    fn last_operand(&self, node: TsNode<'_>) -> Box<Node> {
        named_children(node)
            .into_iter()
            .last()
            .map_or_else(|| Box::new(missing("operand")), |operand| self.boxed(operand))
    }

    fn lower_binary(&self, node: TsNode<'_>) -> Option<NodeKind> {
        let op = self.operator(node)?;
        if op.eq_ignore_ascii_case("instanceof") {
            let class = node
                .child_by_field_name("right")
                .or_else(|| named_children(node).into_iter().last());
            return Some(NodeKind::InstanceOf {
                expr: self.required(node, "left"),
                class: class.map_or_else(
                    || Box::new(missing("class")),
                    |class| Box::new(self.lower_name(class)),
                ),
            });
        }
        Some(NodeKind::Binary {
            op: BinaryOp::from_token(op)?,
            left: self.required(node, "left"),
            right: self.right_operand(node),
        })
    }

    fn lower_unary(&self, node: TsNode<'_>) -> Option<NodeKind> {
        let op = UnaryOp::from_token(self.operator(node)?)?;
        Some(NodeKind::Unary {
            op,
            expr: node
                .child_by_field_name("argument")
                .or_else(|| node.child_by_field_name("operand"))
                .map_or_else(|| self.last_operand(node), |operand| self.boxed(operand)),
        })
    }

    fn lower_update(&self, node: TsNode<'_>) -> Option<NodeKind> {
        let children = all_children(node);
        let prefix = children.first().is_some_and(|first| !first.is_named());
        let increment = children
            .iter()
            .find(|child| !child.is_named())
            .map(|token| token.kind() == "++")?;
        let op = match (prefix, increment) {
            (true, true) => IncDecOp::PreInc,
            (true, false) => IncDecOp::PreDec,
            (false, true) => IncDecOp::PostInc,
            (false, false) => IncDecOp::PostDec,
        };
        Some(NodeKind::IncDec {
            op,
            variable: self.required(node, "argument"),
        })
    }

    fn lower_ternary(&self, node: TsNode<'_>) -> NodeKind {
        let cond = node.child_by_field_name("condition");
        let alternative = node.child_by_field_name("alternative");
        if let (Some(cond), Some(alternative)) = (cond, alternative) {
            return NodeKind::Ternary {
                cond: self.boxed(cond),
                if_true: self.optional(node, "body"),
                if_false: self.boxed(alternative),
            };
        }
        let operands = named_children(node);
        let (cond, if_true, if_false) = match operands.as_slice() {
            [cond, if_true, if_false] => (Some(*cond), Some(*if_true), Some(*if_false)),
            [cond, if_false] => (Some(*cond), None, Some(*if_false)),
            _ => (None, None, None),
        };
        NodeKind::Ternary {
            cond: cond.map_or_else(|| Box::new(missing("condition")), |c| self.boxed(c)),
            if_true: if_true.map(|t| self.boxed(t)),
            if_false: if_false.map_or_else(|| Box::new(missing("alternative")), |f| self.boxed(f)),
        }
    }

    fn lower_arguments(&self, node: TsNode<'_>) -> Vec<Node> {
        let Some(arguments) = node.child_by_field_name("arguments").or_else(|| {
            named_children(node)
                .into_iter()
                .find(|child| child.kind() == "arguments")
        }) else {
            return Vec::new();
        };
        named_children(arguments)
            .into_iter()
            .map(|arg| self.argument(arg))
            .collect()
    }

    fn argument(&self, node: TsNode<'_>) -> Node {
        if node.kind() != "argument" {
            let expr = self.boxed(node);
            return self.make(
                node,
                NodeKind::Argument {
                    expr,
                    by_ref: false,
                    variadic: false,
                    name: None,
                },
            );
        }
        let label = node.child_by_field_name("name");
        let label_id = label.map(|label| label.id());
        let value = named_children(node).into_iter().rev().find(|child| {
            Some(child.id()) != label_id && child.kind() != "reference_modifier"
        });
        let variadic = value.is_some_and(|value| value.kind() == "variadic_unpacking")
            || has_token(node, "...");
        let expr = match value {
            Some(value) if value.kind() == "variadic_unpacking" => self.last_operand(value),
            Some(value) => self.boxed(value),
            None => Box::new(missing("argument")),
        };
        self.make(
            node,
            NodeKind::Argument {
                expr,
                by_ref: is_by_ref(node),
                variadic,
                name: label.map(|label| self.text(label).to_owned()),
            },
        )
    }

    fn lower_class_constant(&self, node: TsNode<'_>) -> NodeKind {
        let parts = named_children(node);
        let class = parts
            .first()
            .map_or_else(|| Box::new(missing("class")), |class| Box::new(self.lower_name(*class)));
        let constant = match parts.as_slice() {
            [_, .., last] => self.member_name(Some(*last)),
            _ => {
                let text = self.text(node);
                let name = text.rsplit_once("::").map_or(text, |(_, name)| name).trim();
                Box::new(Node::synthetic(NodeKind::Identifier {
                    value: name.to_owned(),
                }))
            }
        };
        NodeKind::ClassConstFetch { class, constant }
    }

    fn lower_subscript(&self, node: TsNode<'_>) -> NodeKind {
        let mut operands = named_children(node).into_iter();
        NodeKind::ArrayDimFetch {
            variable: operands
                .next()
                .map_or_else(|| Box::new(missing("subscripted value")), |v| self.boxed(v)),
            dim: operands.next().map(|dim| self.boxed(dim)),
            curly: has_token(node, "{"),
        }
    }

    /// Lowers an entry of an array literal into [`NodeKind::ArrayItem`].
    fn array_item(&self, node: TsNode<'_>) -> Node {
        if node.kind() != "array_element_initializer" {
            let kind = self.item_value(None, Some(node));
            return self.make(node, kind);
        }
        let parts = named_children(node);
        let kind = if has_token(node, "=>") {
            self.item_value(parts.first().copied(), parts.last().copied())
        } else {
            self.item_value(None, parts.first().copied())
        };
        self.make(node, kind)
    }

    fn item_value(&self, key: Option<TsNode<'_>>, value: Option<TsNode<'_>>) -> NodeKind {
        let mut by_ref = false;
        let mut unpack = false;
        let value = value.map(|value| match value.kind() {
            "by_ref" => {
                by_ref = true;
                self.last_operand(value)
            }
            "variadic_unpacking" => {
                unpack = true;
                self.last_operand(value)
            }
            _ => self.boxed(value),
        });
        NodeKind::ArrayItem {
            key: key.map(|key| self.boxed(key)),
            value,
            by_ref,
            unpack,
        }
    }

    /// Lowers `list(...)`/`[...]` destructuring, keeping skipped slots.
    fn lower_list(&self, node: TsNode<'_>) -> NodeKind {
        let mut items = Vec::new();
        let mut slot: Vec<TsNode<'_>> = Vec::new();
        let mut keyed = false;
        let mut commas = 0_usize;
        for child in all_children(node) {
            match (child.kind(), child.is_named()) {
                ("," | ")" | "]", false) => {
                    if child.kind() == "," {
                        commas += 1;
                    }
                    if child.kind() == "," || commas > 0 || !slot.is_empty() {
                        items.push(self.list_slot(&slot, keyed));
                    }
                    slot.clear();
                    keyed = false;
                }
                ("=>", false) => keyed = true,
                (_, true) => slot.push(child),
                _ => {}
            }
        }
        NodeKind::List {
            items,
            short_syntax: has_token(node, "["),
        }
    }

    fn list_slot(&self, slot: &[TsNode<'_>], keyed: bool) -> Node {
        let kind = match slot {
            [] => NodeKind::ArrayItem {
                key: None,
                value: None,
                by_ref: false,
                unpack: false,
            },
            [single] if single.kind() == "array_element_initializer" => {
                return self.array_item(*single);
            }
            [key, .., value] if keyed => self.item_value(Some(*key), Some(*value)),
            [.., value] => self.item_value(None, Some(*value)),
        };
        Node::synthetic(kind)
    }

    fn lower_new(&self, node: TsNode<'_>) -> NodeKind {
        let children = named_children(node);
        if children
            .iter()
            .any(|child| matches!(child.kind(), "declaration_list" | "anonymous_class"))
        {
            return NodeKind::Declaration {
                kind: DeclarationKind::AnonymousClass,
                name: None,
                children: self.lower_all(node),
            };
        }
        let class = children.iter().find(|child| child.kind() != "arguments");
        NodeKind::New {
            class: class.map_or_else(
                || Box::new(missing("class")),
                |class| Box::new(self.lower_name(*class)),
            ),
            args: has_child_kind(node, "arguments").then(|| self.lower_arguments(node)),
        }
    }

    fn import(&self, node: TsNode<'_>, kind: ImportKind) -> NodeKind {
        NodeKind::Import {
            kind,
            expr: self.last_operand(node),
        }
    }

    fn lower_yield(&self, node: TsNode<'_>) -> NodeKind {
        if has_token(node, "from") || self.text(node).to_ascii_lowercase().contains("yield from") {
            return NodeKind::YieldFrom {
                expr: self.last_operand(node),
            };
        }
        let Some(operand) = named_children(node).into_iter().next() else {
            return NodeKind::Yield {
                key: None,
                value: None,
            };
        };
        if operand.kind() == "array_element_initializer" && has_token(operand, "=>") {
            let parts = named_children(operand);
            return NodeKind::Yield {
                key: parts.first().map(|key| self.boxed(*key)),
                value: parts.last().map(|value| self.boxed(*value)),
            };
        }
        NodeKind::Yield {
            key: None,
            value: Some(self.boxed(operand)),
        }
    }

    fn lower_closure(&self, node: TsNode<'_>) -> NodeKind {
        let uses = named_children(node)
            .into_iter()
            .find(|child| child.kind() == "anonymous_function_use_clause")
            .map(|clause| self.lower_all(clause))
            .unwrap_or_default();
        NodeKind::Closure {
            params: self.lower_parameters(node),
            uses,
            return_type: node
                .child_by_field_name("return_type")
                .map(|ty| Box::new(self.lower_name(ty))),
            stmts: node
                .child_by_field_name("body")
                .map(|body| self.lower_all(body))
                .unwrap_or_default(),
            by_ref: is_by_ref(node),
            is_static: is_static(node),
        }
    }

    fn lower_parameters(&self, node: TsNode<'_>) -> Vec<Node> {
        node.child_by_field_name("parameters")
            .map(|params| self.lower_all(params))
            .unwrap_or_default()
    }
}

/// Returns `true` when `node` carries a `&` marker of its own.
fn is_by_ref(node: TsNode<'_>) -> bool {
    node.child_by_field_name("reference_modifier").is_some()
        || has_child_kind(node, "reference_modifier")
        || has_token(node, "&")
}

fn is_static(node: TsNode<'_>) -> bool {
    node.child_by_field_name("static_modifier").is_some()
        || has_child_kind(node, "static_modifier")
        || has_token(node, "static")
}

/// Strips the quotes (and a binary `b` prefix) from a string literal.
pub(super) fn unquote(text: &str) -> &str {
    let body = text
        .strip_prefix(['b', 'B'])
        .filter(|rest| rest.starts_with(['\'', '"']))
        .unwrap_or(text);
    body.strip_prefix(['\'', '"'])
        .and_then(|rest| rest.strip_suffix(['\'', '"']))
        .unwrap_or(body)
}

/// Maps cast spellings onto the canonical type name.
fn normalise_cast(text: &str) -> String {
    let ty = text
        .trim_matches(|c: char| c == '(' || c == ')' || c.is_whitespace())
        .to_ascii_lowercase();
    match ty.as_str() {
        "integer" => "int".to_owned(),
        "boolean" => "bool".to_owned(),
        "double" | "real" => "float".to_owned(),
        "binary" => "string".to_owned(),
        _ => ty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("'abc'", "abc")]
    #[case("\"abc\"", "abc")]
    #[case("b'abc'", "abc")]
    #[case("''", "")]
    #[case("bare", "bare")]
    fn unquote_strips_delimiters(#[case] text: &str, #[case] expected: &str) {
        assert_eq!(unquote(text), expected);
    }

    #[rstest]
    #[case("integer", "int")]
    #[case("(int)", "int")]
    #[case("BOOLEAN", "bool")]
    #[case("double", "float")]
    #[case("string", "string")]
    fn casts_are_normalised(#[case] text: &str, #[case] expected: &str) {
        assert_eq!(normalise_cast(text), expected);
    }
}
