//! Error types for parsing PHP and compiling patterns.

use thiserror::Error;

/// Errors reported by the parser and the pattern compiler.
///
/// Matching itself never fails: a candidate either matches or it does not.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PhpgrepError {
    /// The Tree-sitter parser could not be configured with the PHP grammar.
    #[error("failed to initialise PHP parser: {message}")]
    ParserInit {
        /// Description of the failure.
        message: String,
    },

    /// Tree-sitter did not produce a tree at all.
    #[error("failed to parse PHP source: {message}")]
    Parse {
        /// Description of the failure.
        message: String,
    },

    /// The source parsed, but contains syntax errors.
    #[error("syntax error at {line}:{column} near `{context}`: {message}")]
    Syntax {
        /// One-based line of the first error.
        line: u32,
        /// One-based column of the first error.
        column: u32,
        /// Source text around the error, truncated.
        context: String,
        /// Human-readable description of the error.
        message: String,
    },

    /// A pattern could not be compiled.
    #[error("invalid pattern `{pattern}`: {message}")]
    PatternCompile {
        /// The pattern text as supplied by the caller.
        pattern: String,
        /// Description of the compilation failure.
        message: String,
    },
}

impl PhpgrepError {
    /// Creates a parser initialisation error.
    #[must_use]
    pub fn parser_init(message: impl Into<String>) -> Self {
        Self::ParserInit {
            message: message.into(),
        }
    }

    /// Creates a parse error.
    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Creates a pattern compilation error.
    #[must_use]
    pub fn pattern_compile(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::PatternCompile {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Returns `true` when the error describes malformed PHP text.
    #[must_use]
    pub const fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_error_renders_position_and_context() {
        let err = PhpgrepError::Syntax {
            line: 1,
            column: 5,
            context: "+".to_owned(),
            message: "syntax error".to_owned(),
        };

        assert_eq!(err.to_string(), "syntax error at 1:5 near `+`: syntax error");
        assert!(err.is_syntax());
    }

    #[test]
    fn pattern_compile_error_names_pattern() {
        let err = PhpgrepError::pattern_compile("$x +", "unexpected end of input");

        assert!(err.to_string().contains("`$x +`"));
        assert!(!err.is_syntax());
    }
}
