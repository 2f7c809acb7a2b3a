//! Behavioural tests for compiling and matching patterns.

mod matching;

use crate::{Compiler, MatchData, Matcher, Parser, SourceFile};

/// Captures rendered as `(name, text)` pairs, with absent children as `None`.
type CaptureTexts = Vec<(String, Option<String>)>;

fn compile(pattern: &str) -> Matcher {
    Compiler::new()
        .compile(pattern)
        .unwrap_or_else(|err| panic!("pattern {pattern}: {err}"))
}

fn snippet(code: &str) -> SourceFile {
    Parser::new()
        .and_then(|mut parser| parser.parse_snippet(code))
        .unwrap_or_else(|err| panic!("snippet {code}: {err}"))
}

fn file(code: &str) -> SourceFile {
    Parser::new()
        .and_then(|mut parser| parser.parse(code))
        .unwrap_or_else(|err| panic!("file: {err}"))
}

fn capture_texts(file: &SourceFile, data: &MatchData<'_>) -> CaptureTexts {
    data.captures()
        .iter()
        .map(|captured| {
            (
                captured.name().to_owned(),
                captured
                    .node()
                    .and_then(|node| file.text(node))
                    .map(str::to_owned),
            )
        })
        .collect()
}
