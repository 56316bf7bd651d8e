use rake_syntax::ir::ast::Definition;
use rake_syntax::span::Span;
use rake_syntax::{
    Diagnostics, ErrorMode, ParseError, ParseOptions, parse, parse_file, parse_source,
};

const ONE_BROKEN: &str = "crunch ok1 x -> y: x + 1\ncrunch broken x -> : x\nstack P { a: float }";

fn names(definitions: &[Definition]) -> Vec<&str> {
    definitions.iter().map(Definition::name).collect()
}

#[test]
fn collect_all_keeps_the_good_definitions() {
    let parsed = parse_source("demo.rake", ONE_BROKEN, &ParseOptions::collect_all());
    assert_eq!(names(&parsed.file.definitions), ["ok1", "P"]);
    assert_eq!(parsed.diagnostics.len(), 1);
    assert!(!parsed.is_ok());

    let rendered = parsed.diagnostics.to_string();
    assert!(rendered.starts_with("demo.rake:2:20:"), "{rendered}");
    assert!(rendered.contains("found `:`"), "{rendered}");
}

#[test]
fn fail_fast_stops_at_the_first_error() {
    let parsed = parse_source("demo.rake", ONE_BROKEN, &ParseOptions::fail_fast());
    assert_eq!(names(&parsed.file.definitions), ["ok1"]);
    assert_eq!(parsed.diagnostics.len(), 1);
}

#[test]
fn default_mode_collects_everything() {
    assert_eq!(ParseOptions::default().mode, ErrorMode::CollectAll);
}

#[test]
fn every_broken_definition_is_reported() {
    let source = "crunch a -> : 1\n\
                  crunch b x -> y: x\n\
                  rake c -> r: sweep: | _ -> 1 -> r\n\
                  type T = string";
    let parsed = parse_source("many.rake", source, &ParseOptions::default());
    assert_eq!(names(&parsed.file.definitions), ["b"]);
    assert_eq!(parsed.diagnostics.len(), 3);
    assert!(matches!(
        parsed.diagnostics.errors[1],
        ParseError::Structural { construct: "tine declaration", .. }
    ));

    let rendered = parsed.diagnostics.to_string();
    assert_eq!(rendered.lines().count(), 3);
    assert!(rendered.lines().all(|line| line.starts_with("many.rake:")));
}

#[test]
fn lex_errors_are_collected_and_skipped() {
    let source = "crunch a x -> y: x $\nstack P { a: float }";

    let parsed = parse_source("lex.rake", source, &ParseOptions::collect_all());
    assert_eq!(names(&parsed.file.definitions), ["a", "P"]);
    assert_eq!(parsed.diagnostics.len(), 1);
    assert!(matches!(
        parsed.diagnostics.errors[0],
        ParseError::Lex { ch: '$', span } if span.line == 1 && span.column == 20
    ));

    let parsed = parse_source("lex.rake", source, &ParseOptions::fail_fast());
    assert!(parsed.file.definitions.is_empty());
    assert_eq!(parsed.diagnostics.len(), 1);
}

#[test]
fn parse_returns_the_first_error() {
    assert!(matches!(
        parse("crunch a x -> y: x $"),
        Err(ParseError::Lex { ch: '$', .. })
    ));
    assert!(matches!(
        parse("crunch a x -> y: )"),
        Err(ParseError::UnexpectedToken { .. })
    ));
}

#[test]
fn type_suffixes_do_not_resynchronise() {
    let source = "crunch bad x -> y: ) (p: Particle stack) Config single\nstack Q { a: float }";
    let parsed = parse_source("sync.rake", source, &ParseOptions::collect_all());
    assert_eq!(names(&parsed.file.definitions), ["Q"]);
    assert_eq!(parsed.diagnostics.len(), 1);
}

#[test]
fn stray_tokens_between_definitions() {
    let parsed = parse_source(
        "stray.rake",
        ") ) stack P { a: float }",
        &ParseOptions::collect_all(),
    );
    assert_eq!(names(&parsed.file.definitions), ["P"]);
    assert_eq!(parsed.diagnostics.len(), 1);
}

#[test]
fn into_result_splits_success_and_failure() {
    let ok = parse_source("ok.rake", "crunch f x -> y: x", &ParseOptions::default());
    assert!(ok.into_result().is_ok());

    let broken = parse_source("bad.rake", ONE_BROKEN, &ParseOptions::default());
    let diagnostics = broken.into_result().unwrap_err();
    assert_eq!(diagnostics.source_id, "bad.rake");
}

#[test]
fn empty_source_is_an_empty_file() {
    let parsed = parse_source("empty.rake", "  ~~ nothing here\n", &ParseOptions::fail_fast());
    assert!(parsed.is_ok());
    assert!(parsed.file.definitions.is_empty());
}

#[test]
fn parse_file_reads_from_disk() {
    let path = std::env::temp_dir().join(format!("rake-syntax-{}.rake", std::process::id()));
    std::fs::write(&path, "crunch f x -> y: x * <2.0>\n").unwrap();
    let parsed = parse_file(&path, &ParseOptions::default()).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert!(parsed.is_ok());
    assert_eq!(parsed.diagnostics.source_id, path.display().to_string());
}

#[test]
fn parse_file_reports_missing_files() {
    let result = parse_file("/definitely/not/here.rake", &ParseOptions::default());
    assert!(matches!(result, Err(ParseError::Io { .. })));
}

#[test]
fn concurrent_parses_agree() {
    let source = "rake f v -> r:\n| #a := (v > 0)\nthrough #a: v -> x\nsweep:\n| #a -> x\n-> r";
    let (first, second) = std::thread::scope(|scope| {
        let first = scope.spawn(|| parse_source("t1.rake", source, &ParseOptions::default()));
        let second = scope.spawn(|| parse_source("t2.rake", source, &ParseOptions::default()));
        (first.join().unwrap(), second.join().unwrap())
    });
    assert!(first.is_ok());
    assert_eq!(first.file, second.file);
}

#[test]
fn internal_errors_are_flagged() {
    let mut diagnostics = Diagnostics::new("internal.rake");
    diagnostics.push(ParseError::UnterminatedScalar {
        span: Span::new(0, 1, 1, 1),
    });
    assert!(!diagnostics.has_internal_errors());

    diagnostics.push(ParseError::PrecedenceAmbiguityExhausted {
        operator: "`?`".to_string(),
        span: Span::new(4, 5, 1, 5),
    });
    assert!(diagnostics.has_internal_errors());
    assert!(diagnostics.to_string().contains("internal.rake:1:5: internal parser error"));
}

#[test]
fn errors_carry_spans_except_io() {
    let error = parse("stack p { }").unwrap_err();
    let span = error.span().unwrap();
    assert_eq!((span.line, span.column), (1, 7));

    let io = ParseError::from(std::io::Error::other("boom"));
    assert!(io.span().is_none());
}
