//! Syntax-aware search for PHP source code.
//!
//! Patterns are written as ordinary PHP, so `in_array($x, $arr)` finds every
//! call to `in_array` with two arguments, whatever they are. Plain variables
//! in a pattern act as captures: the first occurrence binds whatever code is
//! at that position and later occurrences of the same name must match the
//! same code, so `$x = $x` finds self-assignments.
//!
//! # Placeholders
//!
//! A dynamic variable whose name is a string literal is a placeholder:
//!
//! - `${"name:class"}` matches one node of `class`, capturing it as `name`
//! - `${"class"}` matches one node of `class` without capturing
//! - `${"*"}` matches zero or more arguments, array items or statements
//!
//! The classes are `var`, `int`, `float`, `str`, `char`, `num`, `expr`,
//! `call`, `const` and `func`. The name `_` never captures.
//!
//! # Example
//!
//! ```
//! use phpgrep::{Compiler, Parser};
//!
//! let matcher = Compiler::new().compile(r#"in_array($_, ${"*"})"#)?;
//!
//! let mut parser = Parser::new()?;
//! let file = parser.parse("<?php\nif (in_array($needle, $haystack, true)) {}\n")?;
//!
//! let matches = matcher.find_all(file.root());
//! assert_eq!(matches.len(), 1);
//! assert_eq!(
//!     matches.first().and_then(|m| file.text(m.node())),
//!     Some("in_array($needle, $haystack, true)")
//! );
//! # Ok::<(), phpgrep::PhpgrepError>(())
//! ```
//!
//! # Concurrency
//!
//! A [`Matcher`] is immutable once compiled. Every match attempt works on
//! its own capture state, so one matcher can be shared by reference or
//! cloned across threads.

mod compile;
mod error;
pub mod ir;
mod lower;
mod matcher;
pub mod meta;
mod parser;
mod position;

#[cfg(test)]
mod tests;

pub use compile::Compiler;
pub use error::PhpgrepError;
pub use ir::{Node, NodeKind, Visitor};
pub use matcher::{CapturedNode, MatchData, Matcher};
pub use meta::{MetaClass, MetaNode};
pub use parser::{Parser, SourceFile};
pub use position::Span;
