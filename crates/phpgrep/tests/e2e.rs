//! End-to-end tests for the public phpgrep API.
//!
//! These tests drive the crate the way a rule engine does: compile a set of
//! patterns once, parse files, search them and read the captures back out.

use rstest::{fixture, rstest};

use phpgrep::{Compiler, MatchData, Matcher, NodeKind, Parser, PhpgrepError, SourceFile};

const CONTROLLER: &str = r#"<?php
namespace App;

final class UserController
{
    public function show($id)
    {
        $user = $this->users->find($id);
        if ($user == null) {
            return null;
        }
        $user->name = $user->name;
        return sprintf("%s", $user->name);
    }

    public function list(array $filters)
    {
        $result = [];
        foreach ($filters as $key => $value) {
            if (in_array($key, ['id', 'name'])) {
                $result[$key] = $value;
            }
        }
        return array_values($result);
    }
}
"#;

#[fixture]
fn parser() -> Parser {
    Parser::new().unwrap_or_else(|err| panic!("parser: {err}"))
}

#[fixture]
fn controller(mut parser: Parser) -> SourceFile {
    parser
        .parse(CONTROLLER)
        .unwrap_or_else(|err| panic!("parse: {err}"))
}

fn compile(pattern: &str) -> Matcher {
    Compiler::new()
        .compile(pattern)
        .unwrap_or_else(|err| panic!("pattern {pattern}: {err}"))
}

fn located(file: &SourceFile, data: &MatchData<'_>) -> (u32, u32, String) {
    let (line, column) = file
        .position(data.node())
        .unwrap_or_else(|| panic!("match without position"));
    let text = file
        .text(data.node())
        .unwrap_or_else(|| panic!("match without text"));
    (line, column, text.to_owned())
}

// =============================================================================
// Happy Path
// =============================================================================

#[rstest]
fn finds_self_assignment(controller: SourceFile) {
    let matcher = compile("$x = $x");

    let found: Vec<_> = matcher
        .find_all(controller.root())
        .iter()
        .map(|data| located(&controller, data))
        .collect();

    assert_eq!(found, vec![(12, 9, "$user->name = $user->name".to_owned())]);
}

#[rstest]
fn finds_loose_null_comparison(controller: SourceFile) {
    let matcher = compile("$x == null");

    let first = matcher
        .find_first(controller.root())
        .unwrap_or_else(|| panic!("should find comparison"));
    let captured = first
        .capture("x")
        .and_then(|node| controller.text(node));

    assert_eq!(captured, Some("$user"));
}

#[rstest]
fn finds_calls_with_any_arguments(controller: SourceFile) {
    let matcher = compile(r#"in_array($needle, ${"arr:expr"})"#);

    let matches = matcher.find_all(controller.root());
    assert_eq!(matches.len(), 1);

    let data = matches
        .first()
        .unwrap_or_else(|| panic!("one match expected"));
    assert_eq!(
        data.capture("arr").and_then(|node| controller.text(node)),
        Some("['id', 'name']")
    );
    assert!(matches!(
        data.capture("arr").map(|node| &node.kind),
        Some(NodeKind::Array { .. })
    ));
}

#[rstest]
fn matches_whole_statements(controller: SourceFile) {
    let matcher = compile(r#"foreach ($xs as $k => $v) { ${"*"}; }"#);

    let found: Vec<_> = matcher
        .find_all(controller.root())
        .iter()
        .map(|data| located(&controller, data).0)
        .collect();

    assert_eq!(found, vec![19]);
}

#[rstest]
fn one_matcher_serves_many_files(mut parser: Parser) {
    let matcher = compile("array_values($x)");
    let sources = [
        "<?php array_values($a);",
        "<?php echo 1;",
        "<?php function f() { return ARRAY_VALUES(g()); }",
    ];

    let counts: Vec<_> = sources
        .iter()
        .map(|source| {
            let file = parser
                .parse(source)
                .unwrap_or_else(|err| panic!("parse: {err}"));
            matcher.find_all(file.root()).len()
        })
        .collect();

    assert_eq!(counts, vec![1, 0, 1]);
}

// =============================================================================
// Unhappy Path
// =============================================================================

#[rstest]
#[case("$x = ")]
#[case("f($a")]
#[case("if (")]
fn invalid_patterns_fail_to_compile(#[case] pattern: &str) {
    let err = Compiler::new()
        .compile(pattern)
        .expect_err("pattern should not compile");

    let PhpgrepError::PatternCompile {
        pattern: reported, ..
    } = &err
    else {
        panic!("unexpected error: {err}");
    };
    assert_eq!(reported, pattern);
}

#[rstest]
fn malformed_files_report_syntax_errors(mut parser: Parser) {
    let err = parser
        .parse("<?php\nfunction f( {\n")
        .expect_err("file should not parse");

    assert!(err.is_syntax(), "unexpected error: {err}");
}
