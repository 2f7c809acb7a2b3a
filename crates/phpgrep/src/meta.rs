//! Pattern placeholders.
//!
//! A placeholder is written as a dynamic variable whose name is a string
//! literal: `${"name:class"}`, `${"class"}` or `${"*"}`. The compiler turns
//! recognised placeholders into [`MetaNode`]s.

use std::fmt;

use crate::ir::{Node, NodeKind};

/// Name of the anonymous capture. It matches without binding anything.
pub const ANONYMOUS: &str = "_";

/// Restricts which candidate nodes a typed placeholder accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetaClass {
    /// `var`: plain or dynamic variables.
    Var,
    /// `int`: integer literals.
    Int,
    /// `float`: float literals.
    Float,
    /// `str`: string literals.
    Str,
    /// `char`: string literals holding exactly one character.
    Char,
    /// `num`: integer or float literals.
    Num,
    /// `expr`: any expression.
    Expr,
    /// `call`: function, method and static method calls.
    Call,
    /// `const`: constants and class constants.
    Const,
    /// `func`: closures and arrow functions.
    Func,
}

impl MetaClass {
    /// Looks up a class by its placeholder keyword.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let class = match keyword {
            "var" => Self::Var,
            "int" => Self::Int,
            "float" => Self::Float,
            "str" => Self::Str,
            "char" => Self::Char,
            "num" => Self::Num,
            "expr" => Self::Expr,
            "call" => Self::Call,
            "const" => Self::Const,
            "func" => Self::Func,
            _ => return None,
        };
        Some(class)
    }

    /// Returns the placeholder keyword for this class.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Var => "var",
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "str",
            Self::Char => "char",
            Self::Num => "num",
            Self::Expr => "expr",
            Self::Call => "call",
            Self::Const => "const",
            Self::Func => "func",
        }
    }

    /// Returns `true` when `node` belongs to this class.
    #[must_use]
    pub fn accepts(self, node: &Node) -> bool {
        match self {
            Self::Var => node.is_var(),
            Self::Int => matches!(node.kind, NodeKind::Int { .. }),
            Self::Float => matches!(node.kind, NodeKind::Float { .. }),
            Self::Str => matches!(node.kind, NodeKind::Str { .. }),
            Self::Char => {
                matches!(&node.kind, NodeKind::Str { value } if value.chars().count() == 1)
            }
            Self::Num => matches!(node.kind, NodeKind::Int { .. } | NodeKind::Float { .. }),
            Self::Expr => node.is_expr(),
            Self::Call => matches!(
                node.kind,
                NodeKind::FunctionCall { .. }
                    | NodeKind::MethodCall { .. }
                    | NodeKind::StaticCall { .. }
            ),
            Self::Const => matches!(
                node.kind,
                NodeKind::ConstFetch { .. } | NodeKind::ClassConstFetch { .. }
            ),
            Self::Func => matches!(
                node.kind,
                NodeKind::Closure { .. } | NodeKind::ArrowFunction { .. }
            ),
        }
    }
}

impl fmt::Display for MetaClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A placeholder in a compiled pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaNode {
    /// Matches one node of `class`, binding it to `name`.
    Typed {
        /// Capture name; [`ANONYMOUS`] never binds.
        name: String,
        /// Accepted node class.
        class: MetaClass,
    },
    /// `${"*"}`: matches zero or more consecutive sequence elements.
    Sequence,
}

impl MetaNode {
    /// Interprets the string inside `${"..."}`.
    ///
    /// Returns `None` when the class keyword is not recognised; such
    /// dynamic variables stay ordinary variables in the pattern.
    #[must_use]
    pub fn from_placeholder(text: &str) -> Option<Self> {
        if text == "*" {
            return Some(Self::Sequence);
        }
        let (name, keyword) = text.split_once(':').unwrap_or((ANONYMOUS, text));
        let class = MetaClass::from_keyword(keyword)?;
        let name = if name.is_empty() { ANONYMOUS } else { name };
        Some(Self::Typed {
            name: name.to_owned(),
            class,
        })
    }

    /// Capture name of a typed placeholder.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Typed { name, .. } => Some(name),
            Self::Sequence => None,
        }
    }
}

/// Returns `true` for names that match without binding.
#[must_use]
pub fn is_anonymous(name: &str) -> bool {
    name == ANONYMOUS
}
