//! Syntax tree model shared by candidate code and compiled patterns.
//!
//! Tree-sitter produces a concrete syntax tree. Matching works on a smaller,
//! typed tree instead: every node carries a [`NodeKind`] with its children in
//! named fields, so structural equality can be written per kind and the
//! compiler can rewrite placeholders in place.

mod classify;
mod walk;

pub use walk::Visitor;

use crate::meta::MetaNode;
use crate::position::Span;

/// A node of the syntax tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Location in the parsed text, when known.
    pub span: Option<Span>,
    /// What the node is, including its children.
    pub kind: NodeKind,
}

impl Node {
    /// Creates a node with the given kind and span.
    #[must_use]
    pub const fn new(kind: NodeKind, span: Option<Span>) -> Self {
        Self { span, kind }
    }

    /// Creates a node without location information.
    #[must_use]
    pub const fn synthetic(kind: NodeKind) -> Self {
        Self { span: None, kind }
    }

    /// Returns `true` for the `${"*"}` sequence wildcard.
    #[must_use]
    pub const fn is_sequence_wildcard(&self) -> bool {
        matches!(self.kind, NodeKind::Meta(MetaNode::Sequence))
    }
}

/// Assignment operators, including compound forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignOp {
    /// `=`
    Assign,
    /// `=&`
    Reference,
    /// `+=`
    Plus,
    /// `-=`
    Minus,
    /// `*=`
    Mul,
    /// `/=`
    Div,
    /// `%=`
    Mod,
    /// `**=`
    Pow,
    /// `.=`
    Concat,
    /// `&=`
    BitwiseAnd,
    /// `|=`
    BitwiseOr,
    /// `^=`
    BitwiseXor,
    /// `<<=`
    ShiftLeft,
    /// `>>=`
    ShiftRight,
    /// `??=`
    Coalesce,
}

impl AssignOp {
    /// Maps a compound assignment token to its operator.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        let op = match token {
            "=" => Self::Assign,
            "=&" => Self::Reference,
            "+=" => Self::Plus,
            "-=" => Self::Minus,
            "*=" => Self::Mul,
            "/=" => Self::Div,
            "%=" => Self::Mod,
            "**=" => Self::Pow,
            ".=" => Self::Concat,
            "&=" => Self::BitwiseAnd,
            "|=" => Self::BitwiseOr,
            "^=" => Self::BitwiseXor,
            "<<=" => Self::ShiftLeft,
            ">>=" => Self::ShiftRight,
            "??=" => Self::Coalesce,
            _ => return None,
        };
        Some(op)
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Mod,
    /// `**`
    Pow,
    /// `.`
    Concat,
    /// `&`
    BitwiseAnd,
    /// `|`
    BitwiseOr,
    /// `^`
    BitwiseXor,
    /// `<<`
    ShiftLeft,
    /// `>>`
    ShiftRight,
    /// `&&`
    BooleanAnd,
    /// `||`
    BooleanOr,
    /// `and`
    LogicalAnd,
    /// `or`
    LogicalOr,
    /// `xor`
    LogicalXor,
    /// `==`
    Equal,
    /// `!=` and `<>`
    NotEqual,
    /// `===`
    Identical,
    /// `!==`
    NotIdentical,
    /// `<`
    Smaller,
    /// `<=`
    SmallerOrEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterOrEqual,
    /// `<=>`
    Spaceship,
    /// `??`
    Coalesce,
}

impl BinaryOp {
    /// Maps an operator token to its operator. Word operators are matched
    /// case-insensitively.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        let op = match token.to_ascii_lowercase().as_str() {
            "+" => Self::Plus,
            "-" => Self::Minus,
            "*" => Self::Mul,
            "/" => Self::Div,
            "%" => Self::Mod,
            "**" => Self::Pow,
            "." => Self::Concat,
            "&" => Self::BitwiseAnd,
            "|" => Self::BitwiseOr,
            "^" => Self::BitwiseXor,
            "<<" => Self::ShiftLeft,
            ">>" => Self::ShiftRight,
            "&&" => Self::BooleanAnd,
            "||" => Self::BooleanOr,
            "and" => Self::LogicalAnd,
            "or" => Self::LogicalOr,
            "xor" => Self::LogicalXor,
            "==" => Self::Equal,
            "!=" | "<>" => Self::NotEqual,
            "===" => Self::Identical,
            "!==" => Self::NotIdentical,
            "<" => Self::Smaller,
            "<=" => Self::SmallerOrEqual,
            ">" => Self::Greater,
            ">=" => Self::GreaterOrEqual,
            "<=>" => Self::Spaceship,
            "??" => Self::Coalesce,
            _ => return None,
        };
        Some(op)
    }
}

/// Prefix unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `!`
    BooleanNot,
    /// `~`
    BitwiseNot,
    /// `@`
    ErrorSuppress,
}

impl UnaryOp {
    /// Maps an operator token to its operator.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        let op = match token {
            "+" => Self::Plus,
            "-" => Self::Minus,
            "!" => Self::BooleanNot,
            "~" => Self::BitwiseNot,
            "@" => Self::ErrorSuppress,
            _ => return None,
        };
        Some(op)
    }
}

/// Increment and decrement operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IncDecOp {
    /// `++$x`
    PreInc,
    /// `--$x`
    PreDec,
    /// `$x++`
    PostInc,
    /// `$x--`
    PostDec,
}

/// File inclusion forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportKind {
    /// `include`
    Include,
    /// `include_once`
    IncludeOnce,
    /// `require`
    Require,
    /// `require_once`
    RequireOnce,
}

/// Declarations that patterns never descend into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    /// Named function.
    Function,
    /// Class declaration.
    Class,
    /// `new class { ... }`.
    AnonymousClass,
    /// Interface declaration.
    Interface,
    /// Trait declaration.
    Trait,
    /// Enum declaration.
    Enum,
    /// Method inside a class-like body.
    Method,
    /// Namespace definition.
    Namespace,
    /// `use` import list.
    Use,
    /// Top-level `const` declaration.
    Const,
}

/// The kind of a [`Node`] together with its children.
///
/// Optional children are `Option<Box<Node>>` so that an absent child can be
/// told apart from a present one during matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Whole file.
    Program {
        /// Top-level statements.
        stmts: Vec<Node>,
    },

    /// Empty statement `;`.
    Nop,
    /// Expression used as a statement.
    ExpressionStmt {
        /// The expression.
        expr: Box<Node>,
    },
    /// Braced block or the body of an alternative-syntax construct.
    StmtList {
        /// Statements in order.
        stmts: Vec<Node>,
    },
    /// `echo a, b;`
    Echo {
        /// Echoed expressions.
        exprs: Vec<Node>,
    },
    /// `return;` or `return expr;`
    Return {
        /// Returned value.
        expr: Option<Box<Node>>,
    },
    /// `break;` or `break n;`
    Break {
        /// Loop depth.
        expr: Option<Box<Node>>,
    },
    /// `continue;` or `continue n;`
    Continue {
        /// Loop depth.
        expr: Option<Box<Node>>,
    },
    /// `global $a, $b;`
    Global {
        /// Imported variables.
        vars: Vec<Node>,
    },
    /// `static $a = 1, $b;`
    Static {
        /// [`NodeKind::StaticVar`] entries.
        vars: Vec<Node>,
    },
    /// One entry of a `static` statement.
    StaticVar {
        /// The declared variable.
        variable: Box<Node>,
        /// Initial value.
        expr: Option<Box<Node>>,
    },
    /// `unset($a, $b);`
    Unset {
        /// Unset variables.
        vars: Vec<Node>,
    },
    /// Text outside of PHP tags.
    InlineHtml {
        /// Raw text.
        value: String,
    },
    /// `if` statement.
    If {
        /// Condition without its parentheses.
        cond: Box<Node>,
        /// Body executed when the condition holds.
        body: Box<Node>,
        /// `elseif` clauses in order.
        else_ifs: Vec<Node>,
        /// `else` clause.
        else_branch: Option<Box<Node>>,
        /// Uses the `if: ... endif;` form.
        alt_syntax: bool,
    },
    /// `elseif` clause.
    ElseIf {
        /// Condition without its parentheses.
        cond: Box<Node>,
        /// Clause body.
        body: Box<Node>,
        /// Uses the colon form.
        alt_syntax: bool,
    },
    /// `else` clause.
    Else {
        /// Clause body.
        body: Box<Node>,
        /// Uses the colon form.
        alt_syntax: bool,
    },
    /// `while` loop.
    While {
        /// Condition without its parentheses.
        cond: Box<Node>,
        /// Loop body.
        body: Box<Node>,
        /// Uses the `while: ... endwhile;` form.
        alt_syntax: bool,
    },
    /// `do ... while` loop.
    Do {
        /// Loop body.
        body: Box<Node>,
        /// Condition without its parentheses.
        cond: Box<Node>,
    },
    /// `for` loop.
    For {
        /// Initialiser expressions.
        init: Vec<Node>,
        /// Condition expressions.
        cond: Vec<Node>,
        /// Step expressions.
        step: Vec<Node>,
        /// Loop body.
        body: Box<Node>,
        /// Uses the `for: ... endfor;` form.
        alt_syntax: bool,
    },
    /// `foreach` loop.
    Foreach {
        /// Iterated expression.
        expr: Box<Node>,
        /// Key variable in `$k => $v` form.
        key: Option<Box<Node>>,
        /// Value variable.
        value: Box<Node>,
        /// Loop body.
        body: Box<Node>,
        /// Uses the `foreach: ... endforeach;` form.
        alt_syntax: bool,
    },
    /// `switch` statement.
    Switch {
        /// Subject without its parentheses.
        cond: Box<Node>,
        /// [`NodeKind::Case`] and [`NodeKind::Default`] clauses.
        cases: Vec<Node>,
        /// Uses the `switch: ... endswitch;` form.
        alt_syntax: bool,
    },
    /// `case expr:` clause.
    Case {
        /// Compared value.
        cond: Box<Node>,
        /// Clause statements.
        stmts: Vec<Node>,
    },
    /// `default:` clause.
    Default {
        /// Clause statements.
        stmts: Vec<Node>,
    },
    /// `try` statement.
    Try {
        /// Guarded statements.
        stmts: Vec<Node>,
        /// [`NodeKind::Catch`] clauses.
        catches: Vec<Node>,
        /// `finally` clause.
        finally: Option<Box<Node>>,
    },
    /// `catch (A|B $e)` clause.
    Catch {
        /// Caught class names.
        types: Vec<Node>,
        /// Bound variable, optional since PHP 8.
        variable: Option<Box<Node>>,
        /// Clause statements.
        stmts: Vec<Node>,
    },
    /// `finally` clause.
    Finally {
        /// Clause statements.
        stmts: Vec<Node>,
    },
    /// `throw expr`
    Throw {
        /// Thrown value.
        expr: Box<Node>,
    },

    /// Plain and compound assignment.
    Assign {
        /// Operator.
        op: AssignOp,
        /// Assigned-to expression.
        variable: Box<Node>,
        /// Assigned value.
        expr: Box<Node>,
    },
    /// Binary operation.
    Binary {
        /// Operator.
        op: BinaryOp,
        /// Left operand.
        left: Box<Node>,
        /// Right operand.
        right: Box<Node>,
    },
    /// Prefix unary operation.
    Unary {
        /// Operator.
        op: UnaryOp,
        /// Operand.
        expr: Box<Node>,
    },
    /// `++`/`--` in prefix or postfix position.
    IncDec {
        /// Operator and position.
        op: IncDecOp,
        /// Updated expression.
        variable: Box<Node>,
    },
    /// `expr instanceof Class`
    InstanceOf {
        /// Tested value.
        expr: Box<Node>,
        /// Class reference.
        class: Box<Node>,
    },
    /// `(type) expr`
    Cast {
        /// Normalised target type, such as `int` or `string`.
        cast_type: String,
        /// Converted value.
        expr: Box<Node>,
    },
    /// `cond ? a : b` and the short form `cond ?: b`.
    Ternary {
        /// Condition.
        cond: Box<Node>,
        /// Middle operand, absent in the short form.
        if_true: Option<Box<Node>>,
        /// Right operand.
        if_false: Box<Node>,
    },
    /// Parenthesised expression.
    Paren {
        /// Inner expression.
        expr: Box<Node>,
    },
    /// `f(args)`
    FunctionCall {
        /// Called name or expression.
        function: Box<Node>,
        /// [`NodeKind::Argument`] list.
        args: Vec<Node>,
    },
    /// `$obj->m(args)` and `$obj?->m(args)`.
    MethodCall {
        /// Receiver.
        variable: Box<Node>,
        /// Method name.
        method: Box<Node>,
        /// [`NodeKind::Argument`] list.
        args: Vec<Node>,
        /// Uses `?->`.
        nullsafe: bool,
    },
    /// `C::m(args)`
    StaticCall {
        /// Class reference.
        class: Box<Node>,
        /// Method name.
        call: Box<Node>,
        /// [`NodeKind::Argument`] list.
        args: Vec<Node>,
    },
    /// One call argument.
    Argument {
        /// Passed value.
        expr: Box<Node>,
        /// Passed as `&$x`.
        by_ref: bool,
        /// Spread with `...`.
        variadic: bool,
        /// Named argument label.
        name: Option<String>,
    },
    /// `$obj->prop` and `$obj?->prop`.
    PropertyFetch {
        /// Object expression.
        variable: Box<Node>,
        /// Property name.
        property: Box<Node>,
        /// Uses `?->`.
        nullsafe: bool,
    },
    /// `C::$prop`
    StaticPropertyFetch {
        /// Class reference.
        class: Box<Node>,
        /// Property variable.
        property: Box<Node>,
    },
    /// `C::NAME`
    ClassConstFetch {
        /// Class reference.
        class: Box<Node>,
        /// Constant name.
        constant: Box<Node>,
    },
    /// Bare constant such as `PHP_EOL`, `true` or `null`.
    ConstFetch {
        /// Constant name.
        constant: Box<Node>,
    },
    /// `$a[dim]`, `$a[]` and the legacy `$a{dim}`.
    ArrayDimFetch {
        /// Indexed expression.
        variable: Box<Node>,
        /// Index, absent for `$a[]`.
        dim: Option<Box<Node>>,
        /// Uses curly braces.
        curly: bool,
    },
    /// `array(...)` or `[...]`.
    Array {
        /// [`NodeKind::ArrayItem`] entries.
        items: Vec<Node>,
        /// Uses the `[...]` form.
        short_syntax: bool,
    },
    /// `list(...)` or a `[...]` destructuring target.
    List {
        /// [`NodeKind::ArrayItem`] entries; skipped slots have no value.
        items: Vec<Node>,
        /// Uses the `[...]` form.
        short_syntax: bool,
    },
    /// One array or list entry.
    ArrayItem {
        /// Explicit key.
        key: Option<Box<Node>>,
        /// Value, absent for a skipped list slot.
        value: Option<Box<Node>>,
        /// Written as `&$x`.
        by_ref: bool,
        /// Written as `...$x`.
        unpack: bool,
    },
    /// `new C(args)`; `args` is absent for `new C`.
    New {
        /// Class reference.
        class: Box<Node>,
        /// Constructor arguments.
        args: Option<Vec<Node>>,
    },
    /// `clone expr`
    Clone {
        /// Cloned value.
        expr: Box<Node>,
    },
    /// `print expr`
    Print {
        /// Printed value.
        expr: Box<Node>,
    },
    /// `exit`, `exit(expr)` and the `die` spellings.
    Exit {
        /// Spelled `die`.
        die: bool,
        /// Exit status or message.
        expr: Option<Box<Node>>,
    },
    /// `include`/`require` family.
    Import {
        /// Which form is used.
        kind: ImportKind,
        /// Included path.
        expr: Box<Node>,
    },
    /// `yield`, `yield v` and `yield k => v`.
    Yield {
        /// Yielded key.
        key: Option<Box<Node>>,
        /// Yielded value.
        value: Option<Box<Node>>,
    },
    /// `yield from expr`
    YieldFrom {
        /// Delegated generator.
        expr: Box<Node>,
    },
    /// Backtick shell command.
    ShellExec {
        /// Literal parts and interpolated expressions.
        parts: Vec<Node>,
    },
    /// Double-quoted string with interpolation.
    Encapsed {
        /// Literal parts and interpolated expressions.
        parts: Vec<Node>,
    },
    /// Heredoc or nowdoc string.
    Heredoc {
        /// Opening label including quotes, if any.
        label: String,
        /// Literal parts and interpolated expressions.
        parts: Vec<Node>,
    },
    /// Literal text inside an interpolated string.
    EncapsedPart {
        /// Raw text, escapes left as written.
        value: String,
    },
    /// `function (...) use (...) { ... }`
    Closure {
        /// [`NodeKind::Parameter`] list.
        params: Vec<Node>,
        /// Captured variables.
        uses: Vec<Node>,
        /// Declared return type.
        return_type: Option<Box<Node>>,
        /// Body statements.
        stmts: Vec<Node>,
        /// Returns by reference.
        by_ref: bool,
        /// Declared `static`.
        is_static: bool,
    },
    /// `fn (...) => expr`
    ArrowFunction {
        /// [`NodeKind::Parameter`] list.
        params: Vec<Node>,
        /// Declared return type.
        return_type: Option<Box<Node>>,
        /// Body expression.
        expr: Box<Node>,
        /// Returns by reference.
        by_ref: bool,
        /// Declared `static`.
        is_static: bool,
    },
    /// Closure or arrow function parameter.
    Parameter {
        /// Parameter variable.
        variable: Box<Node>,
        /// Type declaration.
        type_hint: Option<Box<Node>>,
        /// Default value.
        default: Option<Box<Node>>,
        /// Declared `&$x`.
        by_ref: bool,
        /// Declared `...$x`.
        variadic: bool,
    },
    /// `&$x` in a closure `use` list.
    Reference {
        /// Referenced variable.
        variable: Box<Node>,
    },

    /// `$name`
    SimpleVar {
        /// Variable name without the `$`.
        name: String,
    },
    /// Dynamic variable `${expr}` or `$$x`.
    Var {
        /// Expression naming the variable.
        expr: Box<Node>,
    },
    /// Function, class or constant name, possibly qualified.
    Name {
        /// Name as written.
        value: String,
    },
    /// Member name after `->` or `::`.
    Identifier {
        /// Name as written.
        value: String,
    },
    /// Integer literal.
    Int {
        /// Literal text.
        value: String,
    },
    /// Float literal.
    Float {
        /// Literal text.
        value: String,
    },
    /// String literal without interpolation.
    Str {
        /// Contents without the surrounding quotes.
        value: String,
    },
    /// `__LINE__`, `__FILE__` and friends.
    MagicConstant {
        /// Upper-cased constant name.
        value: String,
    },

    /// Nested declaration; never matched.
    Declaration {
        /// What is declared.
        kind: DeclarationKind,
        /// Declared name, when it has one.
        name: Option<String>,
        /// Lowered children, kept so traversal reaches nested code.
        children: Vec<Node>,
    },
    /// Construct without a dedicated kind; never matched.
    Unsupported {
        /// Tree-sitter kind name.
        kind: String,
        /// Lowered children, kept so traversal reaches nested code.
        children: Vec<Node>,
    },

    /// Pattern placeholder produced by the compiler.
    Meta(MetaNode),
}
