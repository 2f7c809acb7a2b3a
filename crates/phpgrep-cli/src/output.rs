//! Rendering of matches for humans and machines.

use std::io::Write;

use clap::ValueEnum;
use phpgrep::{MatchData, SourceFile};
use serde::Serialize;

use crate::errors::AppError;

/// Output format for matches.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// One `path:line:column: text` line per match.
    #[default]
    Human,
    /// One JSON object per line.
    Json,
}

/// A match ready to be printed.
#[derive(Debug, Serialize)]
pub(crate) struct MatchRecord<'a> {
    path: &'a str,
    line: u32,
    column: u32,
    text: &'a str,
    captures: Vec<CaptureRecord<'a>>,
}

/// A capture ready to be printed. `text` is `None` for captures bound to
/// an absent child.
#[derive(Debug, Serialize)]
struct CaptureRecord<'a> {
    name: &'a str,
    text: Option<&'a str>,
}

impl<'a> MatchRecord<'a> {
    /// Builds a record for `data`, or `None` when the matched node has no
    /// source position.
    pub(crate) fn new(path: &'a str, file: &'a SourceFile, data: &MatchData<'a>) -> Option<Self> {
        let (line, column) = file.position(data.node())?;
        let text = file.text(data.node())?;
        let captures = data
            .captures()
            .iter()
            .map(|captured| CaptureRecord {
                name: captured.name(),
                text: captured.node().and_then(|node| file.text(node)),
            })
            .collect();
        Some(Self {
            path,
            line,
            column,
            text,
            captures,
        })
    }

    pub(crate) fn write<W: Write>(
        &self,
        out: &mut W,
        format: OutputFormat,
        with_captures: bool,
    ) -> Result<(), AppError> {
        match format {
            OutputFormat::Human => self.write_human(out, with_captures),
            OutputFormat::Json => {
                serde_json::to_writer(&mut *out, self).map_err(AppError::Serialise)?;
                writeln!(out).map_err(AppError::Write)
            }
        }
    }

    fn write_human<W: Write>(&self, out: &mut W, with_captures: bool) -> Result<(), AppError> {
        writeln!(
            out,
            "{}:{}:{}: {}",
            self.path,
            self.line,
            self.column,
            single_line(self.text)
        )
        .map_err(AppError::Write)?;
        if !with_captures {
            return Ok(());
        }
        for capture in &self.captures {
            let text = capture.text.map_or_else(|| "<none>".to_owned(), single_line);
            writeln!(out, "  ${} = {text}", capture.name).map_err(AppError::Write)?;
        }
        Ok(())
    }
}

/// Collapses runs of whitespace so multi-line matches print on one line.
fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use phpgrep::{Compiler, Parser};
    use rstest::rstest;

    fn render(pattern: &str, source: &str, format: OutputFormat, with_captures: bool) -> String {
        let matcher = Compiler::new().compile(pattern).expect("pattern compiles");
        let file = Parser::new()
            .expect("parser init")
            .parse(source)
            .expect("source parses");
        let mut out = Vec::new();
        for data in matcher.find_all(file.root()) {
            let record = MatchRecord::new("a.php", &file, &data).expect("record");
            record
                .write(&mut out, format, with_captures)
                .expect("write succeeds");
        }
        String::from_utf8(out).expect("utf-8 output")
    }

    #[test]
    fn human_output_lists_location_and_text() {
        let out = render("f($x)", "<?php\nf(1);\n", OutputFormat::Human, false);
        assert_eq!(out, "a.php:2:1: f(1)\n");
    }

    #[test]
    fn human_output_can_include_captures() {
        let out = render("return $x", "<?php\nreturn;\n", OutputFormat::Human, true);
        assert_eq!(out, "a.php:2:1: return;\n  $x = <none>\n");
    }

    #[test]
    fn json_output_is_one_object_per_line() {
        let out = render("f($x)", "<?php\nf(1); f(2);\n", OutputFormat::Json, false);
        let lines: Vec<serde_json::Value> = out
            .lines()
            .map(|line| serde_json::from_str(line).expect("valid json"))
            .collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines.first(),
            Some(&serde_json::json!({
                "path": "a.php",
                "line": 2,
                "column": 1,
                "text": "f(1)",
                "captures": [{ "name": "x", "text": "1" }],
            }))
        );
    }

    #[rstest]
    #[case("f(1)", "f(1)")]
    #[case("f(\n    1\n)", "f( 1 )")]
    fn multi_line_text_is_collapsed(#[case] text: &str, #[case] expected: &str) {
        assert_eq!(single_line(text), expected);
    }
}
