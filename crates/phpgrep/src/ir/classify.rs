//! Kind names and the expression/variable predicates used by meta classes.

use super::{Node, NodeKind};

impl NodeKind {
    /// Short, stable name of the kind, used in diagnostics and logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Program { .. } => "Program",
            Self::Nop => "Nop",
            Self::ExpressionStmt { .. } => "ExpressionStmt",
            Self::StmtList { .. } => "StmtList",
            Self::Echo { .. } => "Echo",
            Self::Return { .. } => "Return",
            Self::Break { .. } => "Break",
            Self::Continue { .. } => "Continue",
            Self::Global { .. } => "Global",
            Self::Static { .. } => "Static",
            Self::StaticVar { .. } => "StaticVar",
            Self::Unset { .. } => "Unset",
            Self::InlineHtml { .. } => "InlineHtml",
            Self::If { .. } => "If",
            Self::ElseIf { .. } => "ElseIf",
            Self::Else { .. } => "Else",
            Self::While { .. } => "While",
            Self::Do { .. } => "Do",
            Self::For { .. } => "For",
            Self::Foreach { .. } => "Foreach",
            Self::Switch { .. } => "Switch",
            Self::Case { .. } => "Case",
            Self::Default { .. } => "Default",
            Self::Try { .. } => "Try",
            Self::Catch { .. } => "Catch",
            Self::Finally { .. } => "Finally",
            Self::Throw { .. } => "Throw",
            Self::Assign { .. } => "Assign",
            Self::Binary { .. } => "Binary",
            Self::Unary { .. } => "Unary",
            Self::IncDec { .. } => "IncDec",
            Self::InstanceOf { .. } => "InstanceOf",
            Self::Cast { .. } => "Cast",
            Self::Ternary { .. } => "Ternary",
            Self::Paren { .. } => "Paren",
            Self::FunctionCall { .. } => "FunctionCall",
            Self::MethodCall { .. } => "MethodCall",
            Self::StaticCall { .. } => "StaticCall",
            Self::Argument { .. } => "Argument",
            Self::PropertyFetch { .. } => "PropertyFetch",
            Self::StaticPropertyFetch { .. } => "StaticPropertyFetch",
            Self::ClassConstFetch { .. } => "ClassConstFetch",
            Self::ConstFetch { .. } => "ConstFetch",
            Self::ArrayDimFetch { .. } => "ArrayDimFetch",
            Self::Array { .. } => "Array",
            Self::List { .. } => "List",
            Self::ArrayItem { .. } => "ArrayItem",
            Self::New { .. } => "New",
            Self::Clone { .. } => "Clone",
            Self::Print { .. } => "Print",
            Self::Exit { .. } => "Exit",
            Self::Import { .. } => "Import",
            Self::Yield { .. } => "Yield",
            Self::YieldFrom { .. } => "YieldFrom",
            Self::ShellExec { .. } => "ShellExec",
            Self::Encapsed { .. } => "Encapsed",
            Self::Heredoc { .. } => "Heredoc",
            Self::EncapsedPart { .. } => "EncapsedPart",
            Self::Closure { .. } => "Closure",
            Self::ArrowFunction { .. } => "ArrowFunction",
            Self::Parameter { .. } => "Parameter",
            Self::Reference { .. } => "Reference",
            Self::SimpleVar { .. } => "SimpleVar",
            Self::Var { .. } => "Var",
            Self::Name { .. } => "Name",
            Self::Identifier { .. } => "Identifier",
            Self::Int { .. } => "Int",
            Self::Float { .. } => "Float",
            Self::Str { .. } => "Str",
            Self::MagicConstant { .. } => "MagicConstant",
            Self::Declaration { .. } => "Declaration",
            Self::Unsupported { .. } => "Unsupported",
            Self::Meta(_) => "Meta",
        }
    }
}

impl Node {
    /// Returns `true` when the node can appear where PHP expects a value.
    ///
    /// Statements, clauses, call arguments and array entries are not
    /// expressions, and neither are bare names or member identifiers.
    #[must_use]
    pub const fn is_expr(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Assign { .. }
                | NodeKind::Binary { .. }
                | NodeKind::Unary { .. }
                | NodeKind::IncDec { .. }
                | NodeKind::InstanceOf { .. }
                | NodeKind::Cast { .. }
                | NodeKind::Ternary { .. }
                | NodeKind::Paren { .. }
                | NodeKind::FunctionCall { .. }
                | NodeKind::MethodCall { .. }
                | NodeKind::StaticCall { .. }
                | NodeKind::PropertyFetch { .. }
                | NodeKind::StaticPropertyFetch { .. }
                | NodeKind::ClassConstFetch { .. }
                | NodeKind::ConstFetch { .. }
                | NodeKind::ArrayDimFetch { .. }
                | NodeKind::Array { .. }
                | NodeKind::List { .. }
                | NodeKind::New { .. }
                | NodeKind::Clone { .. }
                | NodeKind::Print { .. }
                | NodeKind::Exit { .. }
                | NodeKind::Import { .. }
                | NodeKind::Yield { .. }
                | NodeKind::YieldFrom { .. }
                | NodeKind::ShellExec { .. }
                | NodeKind::Encapsed { .. }
                | NodeKind::Heredoc { .. }
                | NodeKind::Closure { .. }
                | NodeKind::ArrowFunction { .. }
                | NodeKind::Throw { .. }
                | NodeKind::SimpleVar { .. }
                | NodeKind::Var { .. }
                | NodeKind::Int { .. }
                | NodeKind::Float { .. }
                | NodeKind::Str { .. }
                | NodeKind::MagicConstant { .. }
        )
    }

    /// Returns `true` for plain and dynamic variables.
    #[must_use]
    pub const fn is_var(&self) -> bool {
        matches!(self.kind, NodeKind::SimpleVar { .. } | NodeKind::Var { .. })
    }
}
