//! Pattern semantics exercised through the public API.

use rstest::rstest;

use super::{capture_texts, compile, file, snippet};
use crate::{Compiler, Node, NodeKind};

fn matches(pattern: &str, code: &str) -> bool {
    let candidate = snippet(code);
    compile(pattern).match_node(candidate.root()).is_some()
}

// =============================================================================
// Literal code
// =============================================================================

#[rstest]
#[case("1", "1")]
#[case("'abc'", "'abc'")]
#[case("f($a, 2)", "f($a, 2)")]
#[case("$a->b()", "$a->b()")]
#[case("$a?->b", "$a?->b")]
#[case("A::f()", "A::f()")]
#[case("[1, 2]", "[1, 2]")]
#[case("array(1, 2)", "array(1, 2)")]
#[case("(int) $a", "(integer) $a")]
#[case("$a instanceof Foo", "$a instanceof Foo")]
#[case("!$a", "!$a")]
#[case("$i++", "$i++")]
#[case("$a += 1", "$a += 1")]
#[case("fn($x) => $x", "fn($y) => $y")]
fn literal_code_matches_itself(#[case] pattern: &str, #[case] code: &str) {
    assert!(matches(pattern, code), "{pattern} should match {code}");
}

#[rstest]
#[case("1", "2")]
#[case("1", "'1'")]
#[case("f(1)", "g(1)")]
#[case("$a + 1", "$a - 1")]
#[case("$a->b", "$a?->b")]
#[case("[1, 2]", "array(1, 2)")]
#[case("$i++", "++$i")]
#[case("$a += 1", "$a -= 1")]
#[case("include $f", "require $f")]
fn different_code_does_not_match(#[case] pattern: &str, #[case] code: &str) {
    assert!(!matches(pattern, code), "{pattern} should not match {code}");
}

// =============================================================================
// Captures and backreferences
// =============================================================================

#[rstest]
#[case("$x->b = $x->b")]
#[case("$a = $a")]
#[case("$a[0] = $a[0]")]
fn repeated_capture_matches_identical_code(#[case] code: &str) {
    assert!(matches("$x = $x", code));
}

#[rstest]
#[case("$x = $y")]
#[case("$x->a[0] = $x->b[0]")]
#[case("$a = $A")]
fn repeated_capture_rejects_different_code(#[case] code: &str) {
    assert!(!matches("$x = $x", code));
}

#[test]
fn named_captures_are_extracted_deterministically() {
    let matcher = compile("$x = $x[$y]");
    let candidate = snippet("$a[0] = $a[0][1]");
    let expected = vec![
        ("x".to_owned(), Some("$a[0]".to_owned())),
        ("y".to_owned(), Some("1".to_owned())),
    ];

    for _ in 0..100 {
        let data = matcher
            .match_node(candidate.root())
            .unwrap_or_else(|| panic!("pattern should match"));
        assert_eq!(capture_texts(&candidate, &data), expected);
    }
}

#[test]
fn captures_bound_to_absent_children_are_reported() {
    let matcher = compile("return $x");
    let candidate = snippet("return");

    let data = matcher
        .match_node(candidate.root())
        .unwrap_or_else(|| panic!("bare return should match"));

    assert_eq!(data.len(), 1);
    assert_eq!(data.capture("x"), None);
    assert_eq!(
        capture_texts(&candidate, &data),
        vec![("x".to_owned(), None)]
    );
}

#[test]
fn absent_capture_does_not_match_present_code_later() {
    let matcher = compile("for ($x; $y; $z) { return $y; }");
    let candidate = snippet("for ($i = 0; $i < 3; $i++) { return; }");

    assert!(matcher.match_node(candidate.root()).is_none());
}

#[test]
fn statement_capture_matches_any_statement() {
    assert!(matches("{ $s; }", "{ if ($a) { f(); } }"));
    assert!(matches("{ $s; $s; }", "{ f(); f(); }"));
    assert!(!matches("{ $s; $s; }", "{ f(); g(); }"));
}

#[test]
fn interpolated_variables_compare_by_name() {
    assert!(matches(r#""a $x b""#, r#""a $x b""#));
    assert!(!matches(r#""a $x b""#, r#""a $y b""#));
}

// =============================================================================
// Placeholders
// =============================================================================

#[rstest]
#[case(r#"${"int"}"#, "13", true)]
#[case(r#"${"int"}"#, "3.4", false)]
#[case(r#"${"int"}"#, r#""13""#, false)]
#[case(r#"${"float"}"#, "3.4", true)]
#[case(r#"${"float"}"#, "13", false)]
#[case(r#"${"num"}"#, "13", true)]
#[case(r#"${"num"}"#, "3.4", true)]
#[case(r#"${"num"}"#, "$v", false)]
#[case(r#"${"str"}"#, "'abc'", true)]
#[case(r#"${"str"}"#, "13", false)]
#[case(r#"${"char"}"#, "'a'", true)]
#[case(r#"${"char"}"#, "'ab'", false)]
#[case(r#"${"var"}"#, "$v", true)]
#[case(r#"${"var"}"#, "f()", false)]
#[case(r#"${"expr"}"#, "$a + f(1)", true)]
#[case(r#"${"call"}"#, "f()", true)]
#[case(r#"${"call"}"#, "$o->m()", true)]
#[case(r#"${"call"}"#, "A::m()", true)]
#[case(r#"${"call"}"#, "$f", false)]
#[case(r#"${"const"}"#, "PHP_EOL", true)]
#[case(r#"${"const"}"#, "A::B", true)]
#[case(r#"${"const"}"#, "'PHP_EOL'", false)]
#[case(r#"${"func"}"#, "function () {}", true)]
#[case(r#"${"func"}"#, "fn() => 1", true)]
#[case(r#"${"func"}"#, "f()", false)]
fn typed_placeholders_discriminate(
    #[case] pattern: &str,
    #[case] code: &str,
    #[case] expected: bool,
) {
    assert_eq!(matches(pattern, code), expected, "{pattern} against {code}");
}

#[test]
fn typed_placeholder_captures_under_its_name() {
    let matcher = compile(r#"f(${"n:int"}, ${"n:int"})"#);

    let same = snippet("f(1, 1)");
    let data = matcher
        .match_node(same.root())
        .unwrap_or_else(|| panic!("pattern should match"));
    assert_eq!(
        capture_texts(&same, &data),
        vec![("n".to_owned(), Some("1".to_owned()))]
    );

    let different = snippet("f(1, 2)");
    assert!(matcher.match_node(different.root()).is_none());
}

#[rstest]
#[case("$_ = $_")]
#[case(r#"${"_:var"} = ${"_:var"}"#)]
#[case(r#"${"var"} = ${"var"}"#)]
fn anonymous_captures_never_bind(#[case] pattern: &str) {
    let matcher = compile(pattern);
    let candidate = snippet("$a = $b");

    let data = matcher
        .match_node(candidate.root())
        .unwrap_or_else(|| panic!("{pattern} should match"));
    assert!(data.is_empty());
    assert_eq!(data.capture("_"), None);
}

#[test]
fn unknown_placeholder_class_matches_literally() {
    assert!(matches(r#"${"x:bool"}"#, r#"${"x:bool"}"#));
    assert!(!matches(r#"${"x:bool"}"#, "true"));
}

#[rstest]
#[case(r#"f(${"*"})"#, "f()")]
#[case(r#"f(${"*"})"#, "f(1)")]
#[case(r#"f(${"*"})"#, "f(1, 2, 3)")]
#[case(r#"f(${"*"}, 3)"#, "f(1, 2, 3)")]
fn sequence_wildcard_spans_any_length(#[case] pattern: &str, #[case] code: &str) {
    assert!(matches(pattern, code));
}

#[rstest]
#[case(r#"f(${"*"}, 3)"#, "f(1, 2, 4)")]
#[case("{ 1; }", "{}")]
#[case("{ 1; }", "{ 1; 2; }")]
#[case("[$x, $x]", "[1, 2]")]
fn sequence_boundaries_are_enforced(#[case] pattern: &str, #[case] code: &str) {
    assert!(!matches(pattern, code));
}

// =============================================================================
// Comparison rules
// =============================================================================

#[rstest]
#[case("strlen($s)", "STRLEN($s)")]
#[case("$o->get()", "$o->GET()")]
#[case("new Foo()", "new foo()")]
#[case("Foo::bar()", "FOO::BAR()")]
fn names_fold_case_by_default(#[case] pattern: &str, #[case] code: &str) {
    assert!(matches(pattern, code));

    let strict = Compiler::new()
        .with_case_sensitive(true)
        .compile(pattern)
        .unwrap_or_else(|err| panic!("pattern: {err}"));
    let candidate = snippet(code);
    assert!(strict.match_node(candidate.root()).is_none());
}

#[rstest]
#[case("true", "TRUE")]
#[case("null", "Null")]
#[case("false", "FALSE")]
fn keyword_constants_ignore_case(#[case] pattern: &str, #[case] code: &str) {
    let strict = Compiler::new()
        .with_case_sensitive(true)
        .compile(pattern)
        .unwrap_or_else(|err| panic!("pattern: {err}"));
    let candidate = snippet(code);
    assert!(strict.match_node(candidate.root()).is_some());
}

#[rstest]
#[case("$a ? $b : $c", "$x ? $y : $z", true)]
#[case("$a ? $b : $c", "$x ?: $z", false)]
#[case("$a ?: $c", "$x ?: $z", true)]
#[case("$a ?: $c", "$x ? $y : $z", false)]
fn short_ternary_only_matches_short_form(
    #[case] pattern: &str,
    #[case] code: &str,
    #[case] expected: bool,
) {
    assert_eq!(matches(pattern, code), expected);
}

#[rstest]
#[case("new Foo", "new Foo", true)]
#[case("new Foo()", "new Foo()", true)]
#[case("new Foo", "new Foo()", false)]
#[case("new Foo()", "new Foo", false)]
#[case(r#"new Foo(${"*"})"#, "new Foo(1, 2)", true)]
fn constructor_argument_lists_must_agree(
    #[case] pattern: &str,
    #[case] code: &str,
    #[case] expected: bool,
) {
    assert_eq!(matches(pattern, code), expected);
}

#[test]
fn static_property_pattern_also_matches_class_constants() {
    let matcher = compile("Foo::$x");
    let constant = snippet("Foo::BAR");

    let data = matcher
        .match_node(constant.root())
        .unwrap_or_else(|| panic!("class constant should match"));
    assert_eq!(
        capture_texts(&constant, &data),
        vec![("x".to_owned(), Some("BAR".to_owned()))]
    );

    let property = snippet("Foo::$bar");
    assert!(matcher.match_node(property.root()).is_some());
}

#[rstest]
#[case("[$k => $v]", "[1]")]
#[case("[$v]", "['a' => 1]")]
fn keyed_array_items_never_match_positional_ones(#[case] pattern: &str, #[case] code: &str) {
    assert!(!matches(pattern, code));
}

#[test]
fn nested_declarations_are_never_matched() {
    assert!(!matches("function f() {}", "function f() {}"));
    assert!(!matches("class A {}", "class A {}"));
}

#[test]
fn synthetic_candidates_never_match() {
    let matcher = compile("$x");
    let node = Node::synthetic(NodeKind::Nop);

    assert!(matcher.match_node(&node).is_none());
}

// =============================================================================
// Searching
// =============================================================================

const SOURCE: &str = "<?php
function check($list) {
    if (in_array($needle, $list)) {
        return count(count($list));
    }
    return IN_ARRAY(1, [2], true);
}
";

#[test]
fn find_all_reports_every_match_in_order() {
    let source = file(SOURCE);
    let matcher = compile(r#"in_array($x, ${"*"})"#);

    let found: Vec<_> = matcher
        .find_all(source.root())
        .iter()
        .map(|data| source.text(data.node()).map(str::to_owned))
        .collect();

    assert_eq!(
        found,
        vec![
            Some("in_array($needle, $list)".to_owned()),
            Some("IN_ARRAY(1, [2], true)".to_owned()),
        ]
    );
}

#[test]
fn find_all_includes_nested_matches() {
    let source = file(SOURCE);
    let matcher = compile("count($x)");

    let matches = matcher.find_all(source.root());
    assert_eq!(matches.len(), 2);
    assert_eq!(
        matches.first().and_then(|data| source.position(data.node())),
        Some((4, 16))
    );
}

#[test]
fn declining_a_match_prunes_only_its_subtree() {
    let source = file(SOURCE);
    let matcher = compile("count($x)");

    let mut seen = Vec::new();
    matcher.find(source.root(), |data| {
        seen.push(source.text(data.node()).map(str::to_owned));
        false
    });

    assert_eq!(seen, vec![Some("count(count($list))".to_owned())]);
}

#[test]
fn find_first_returns_earliest_match() {
    let source = file(SOURCE);
    let matcher = compile("return $x");

    let first = matcher
        .find_first(source.root())
        .unwrap_or_else(|| panic!("should find a return"));
    assert_eq!(source.position(first.node()), Some((4, 9)));
    assert_eq!(
        capture_texts(&source, &first),
        vec![("x".to_owned(), Some("count(count($list))".to_owned()))]
    );
}

#[test]
fn find_searches_inside_declarations() {
    let source = file(SOURCE);
    let matcher = compile("in_array($a, $b)");

    let first = matcher
        .find_first(source.root())
        .unwrap_or_else(|| panic!("should find the call inside the function"));
    assert_eq!(source.text(first.node()), Some("in_array($needle, $list)"));
}

#[test]
fn find_without_matches_reports_nothing() {
    let source = file(SOURCE);
    let matcher = compile("array_map($f, $xs)");

    assert!(matcher.find_all(source.root()).is_empty());
    assert!(matcher.find_first(source.root()).is_none());
}
