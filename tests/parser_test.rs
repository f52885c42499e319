use pretty_assertions::assert_eq;
use retrace::analyzer::parsers::{int, whitespace};
use retrace::analyzer::prelude::*;
use retrace::grammar::GrammarKind;
use retrace::{
    alternatives, parse_complete, run_parse, run_with, Error, GrammarError, Location, ParseError,
    ParseOptions, RetraceResult,
};
use serde_json::json;

#[test]
fn it_runs_first_alternative_only() {
    let grammar = and(int(), many(whitespace()));
    assert_eq!(run_parse(&grammar, "123  x"), Ok((123, vec![' ', ' '])));
    assert_eq!(alternatives(&grammar, "123").count(), 3);
}

#[test]
fn it_reports_no_parse() {
    let result = run_parse(&int(), "x1");
    assert_eq!(
        result,
        Err(ParseError::NoParse {
            location: Location {
                offset: 0,
                line: 1,
                column: 1
            }
        })
    );
}

#[test]
fn it_requires_complete_input_on_request() {
    let grammar = GrammarKind::Ints.parser();
    assert_eq!(parse_complete(&grammar, "1,2,3"), Ok(json!([1, 2, 3])));

    let error = parse_complete(&grammar, "1,2;3").unwrap_err();
    assert_eq!(
        error,
        ParseError::Incomplete {
            location: Location {
                offset: 3,
                line: 1,
                column: 4
            },
            remaining: ";3".to_string(),
        }
    );

    let options = ParseOptions::partial();
    assert_eq!(run_with(&grammar, "1,2;3", &options), Ok(json!([1, 2])));
}

#[test]
fn it_loads_options_from_json() {
    let options = ParseOptions::from_json(r#"{"require_complete": false, "max_alternatives": 1}"#)
        .unwrap();
    let grammar = GrammarKind::Words.parser();
    assert_eq!(run_with(&grammar, "ab cd!", &options), Ok(json!(["ab", "cd"])));

    let strict = ParseOptions::default().with_max_alternatives(1);
    assert!(matches!(
        run_with(&grammar, "ab cd!", &strict),
        Err(ParseError::LimitReached { limit: 1, .. })
    ));
}

fn checked_pair(min: usize, max: usize) -> RetraceResult<Vec<char>> {
    let grammar = repeat(char('x'), min..=max)?;
    Ok(run_parse(&grammar, "xxxx")?)
}

#[test]
fn it_converts_into_crate_errors() {
    assert_eq!(checked_pair(1, 2).unwrap(), vec!['x', 'x']);

    match checked_pair(3, 1) {
        Err(Error::Grammar(GrammarError::InvalidRepetition { min: 3, end: 2 })) => {}
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn it_runs_every_builtin_grammar() {
    let cases = [
        (GrammarKind::Int, "-7", json!(-7)),
        (GrammarKind::Ints, "4, 5", json!([4, 5])),
        (GrammarKind::Float, "0.5", json!(0.5)),
        (GrammarKind::Words, "one two", json!(["one", "two"])),
        (GrammarKind::KeyValue, "x=1", json!({"x": 1})),
    ];
    for (kind, input, expected) in cases {
        assert_eq!(parse_complete(&kind.parser(), input), Ok(expected), "{:?}", kind);
    }
}
