mod common;

use common::pred;
use rake_syntax::ParseError;
use rake_syntax::ir::ast::{Node, Predicate};
use rake_syntax::parser::parse_predicate;

#[test]
fn and_binds_tighter_than_or() {
    assert_eq!(pred("x > 0 and y < 1"), "(and (> x 0) (< y 1))");
    assert_eq!(
        pred("a = 1 or b = 2 && c = 3"),
        "(or (= a 1) (and (= b 2) (= c 3)))"
    );
}

#[test]
fn not_applies_to_the_next_atom() {
    assert_eq!(pred("not #fast or x = 1"), "(or (not #fast) (= x 1))");
    assert_eq!(pred("!!#a"), "(not (not #a))");
}

#[test]
fn parenthesised_predicate_becomes_a_group() {
    assert_eq!(pred("!(a < b)"), "(not (group (< a b)))");
    assert_eq!(pred("(a < b) && (c < d)"), "(and (group (< a b)) (group (< c d)))");
    assert_eq!(pred("(#a or #b) and x != 0"), "(and (group (or #a #b)) (!= x 0))");
}

#[test]
fn parenthesised_operand_stays_an_expression() {
    assert_eq!(pred("(a + b) * 2 >= c"), "(>= (* (paren (+ a b)) 2) c)");
    assert_eq!(pred("((a + 1) > b)"), "(group (> (paren (+ a 1)) b))");
}

#[test]
fn is_and_is_not() {
    assert_eq!(pred("x is y"), "(is x y)");
    assert_eq!(pred("x is not y"), "(is-not x y)");
}

#[test]
fn scalar_literals_on_either_side() {
    assert_eq!(pred("<x> < y"), "(< <x> y)");
    assert_eq!(pred("x < <1.0>"), "(< x <1.0>)");
    assert_eq!(pred("p.mass >= <cfg.min_mass>"), "(>= (. p mass) <cfg.min_mass>)");
}

#[test]
fn operands_allow_unary_and_postfix() {
    assert_eq!(pred("a = -b"), "(= a (neg b))");
    assert_eq!(pred("v\\+/ > -1"), "(> (reduce-add v) -1)");
}

#[test]
fn tine_tests_and_constants() {
    assert_eq!(pred("#a and #b"), "(and #a #b)");
    assert_eq!(pred("(true)"), "(group true)");
    assert!(matches!(parse_predicate("false").unwrap(), Predicate::Const(false, _)));
}

#[test]
fn boolean_operator_cannot_appear_inside_an_operand() {
    assert!(parse_predicate("a && b < c").is_err());
    assert!(parse_predicate("a |> f > 1").is_err());
}

#[test]
fn lambdas_are_not_comparison_operands() {
    assert!(parse_predicate("fun x -> x > 1").is_err());
    assert!(parse_predicate("let a = 1 in a > 0").is_err());
}

#[test]
fn bare_operand_needs_an_operator() {
    match parse_predicate("x") {
        Err(ParseError::UnexpectedToken { expected, found, .. }) => {
            assert_eq!(expected, vec!["comparison operator".to_string()]);
            assert_eq!(found, "end of input");
        }
        other => panic!("expected unexpected token, got {other:?}"),
    }
}

#[test]
fn unclosed_group_is_an_error() {
    assert!(parse_predicate("(a < b").is_err());
    assert!(parse_predicate("(a < )").is_err());
}

#[test]
fn predicate_spans() {
    let parsed = parse_predicate("x > 0 and #b").unwrap();
    assert_eq!((parsed.span().start, parsed.span().end), (0, 12));
}

#[test]
fn left_arrow_in_comparison_position() {
    assert_eq!(pred("x<-1"), "(< x -1)");
    assert_eq!(pred("(v<-1)"), "(group (< v -1))");
    assert_eq!(pred("a<-b or #t"), "(or (< a (neg b)) #t)");
}
