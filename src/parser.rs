//! Driver: turns the alternatives of a parser into a single answer.

use std::fmt;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::analyzer::{Alternatives, Parser};
use crate::config::ParseOptions;

/// A point in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    /// Byte offset from the start of the input
    pub offset: usize,
    /// 1-based line number
    pub line: usize,
    /// 1-based column, counted in characters
    pub column: usize,
}

impl Location {
    /// Locates the byte `offset` inside `input`.
    ///
    /// Offsets past the end, or inside a multi-byte character, are moved back
    /// to the nearest character boundary.
    pub fn locate(input: &str, offset: usize) -> Self {
        let mut offset = offset.min(input.len());
        while !input.is_char_boundary(offset) {
            offset -= 1;
        }
        let before = &input[..offset];
        let line_start = before.rfind('\n').map_or(0, |newline| newline + 1);
        Self {
            offset,
            line: before.matches('\n').count() + 1,
            column: before[line_start..].chars().count() + 1,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The parser produced no alternative at all
    #[error("No parse at {location}")]
    NoParse { location: Location },
    /// Every examined alternative left input behind; `location` is the
    /// furthest any of them got
    #[error("Incomplete parse at {location}: unconsumed {remaining:?}")]
    Incomplete { location: Location, remaining: String },
    #[error("Gave up after {limit} alternatives at {location}")]
    LimitReached { limit: usize, location: Location },
}

/// The raw, lazy alternatives of `parser` on `input`.
pub fn alternatives<'i, O, P>(parser: &P, input: &'i str) -> Alternatives<'i, O>
where
    P: Parser<O> + ?Sized,
{
    parser.parse(input)
}

/// Value of the first alternative, whatever it leaves unconsumed.
///
/// Only the first alternative is ever computed.
pub fn run_parse<O, P>(parser: &P, input: &str) -> Result<O, ParseError>
where
    P: Parser<O> + ?Sized,
{
    run_with(parser, input, &ParseOptions::partial())
}

/// Value of the first alternative that consumes all of `input`.
pub fn parse_complete<O, P>(parser: &P, input: &str) -> Result<O, ParseError>
where
    P: Parser<O> + ?Sized,
{
    run_with(parser, input, &ParseOptions::default())
}

/// Walks the alternatives in order and returns the first one `options`
/// accepts.
#[instrument(level = "debug", skip_all, fields(input_len = input.len()))]
pub fn run_with<O, P>(parser: &P, input: &str, options: &ParseOptions) -> Result<O, ParseError>
where
    P: Parser<O> + ?Sized,
{
    // Shortest remainder seen so far.
    let mut furthest: Option<&str> = None;
    let offset_of = |rest: Option<&str>| rest.map_or(0, |rest| input.len() - rest.len());

    for (examined, alternative) in parser.parse(input).enumerate() {
        if let Some(limit) = options.max_alternatives.filter(|&limit| examined >= limit) {
            debug!(limit, "alternative limit reached");
            return Err(ParseError::LimitReached {
                limit,
                location: Location::locate(input, offset_of(furthest)),
            });
        }
        if !options.require_complete || alternative.rest.is_empty() {
            debug!(
                examined = examined + 1,
                consumed = alternative.consumed(input),
                "parse accepted"
            );
            return Ok(alternative.value);
        }
        if furthest.map_or(true, |rest| alternative.rest.len() < rest.len()) {
            furthest = Some(alternative.rest);
        }
    }

    match furthest {
        Some(rest) => {
            debug!(remaining = rest.len(), "no alternative consumed the whole input");
            Err(ParseError::Incomplete {
                location: Location::locate(input, offset_of(furthest)),
                remaining: rest.to_string(),
            })
        }
        None => {
            debug!("no alternatives");
            Err(ParseError::NoParse {
                location: Location::locate(input, 0),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::prelude::*;
    use crate::analyzer::BoxedParser;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_locate() {
        let input = "ab\ncdé\nf";
        assert_eq!(
            Location::locate(input, 0),
            Location { offset: 0, line: 1, column: 1 }
        );
        assert_eq!(
            Location::locate(input, 4),
            Location { offset: 4, line: 2, column: 2 }
        );
        // After the two-byte 'é'.
        assert_eq!(
            Location::locate(input, 7),
            Location { offset: 7, line: 2, column: 4 }
        );
        // Inside 'é' snaps back to its start.
        assert_eq!(Location::locate(input, 6).offset, 5);
        assert_eq!(Location::locate(input, 100).offset, input.len());
        assert_eq!(Location::locate(input, 100).line, 3);
    }

    #[test]
    fn test_run_parse_takes_first_alternative() {
        let parser = many(char('a'));
        assert_eq!(run_parse(&parser, "aab"), Ok(vec!['a', 'a']));
        assert_eq!(run_parse(&parser, ""), Ok(vec![]));
    }

    #[test]
    fn test_run_parse_no_parse() {
        let parser = char('a');
        assert_eq!(
            run_parse(&parser, "b"),
            Err(ParseError::NoParse {
                location: Location::locate("b", 0)
            })
        );
    }

    #[test]
    fn test_parse_complete_backtracks_to_full_consumption() {
        // The first alternative splits "aab" as a, a and leaves "b" behind.
        let parser = many(or(literal("a"), literal("ab")));
        assert_eq!(run_parse(&parser, "aab"), Ok(vec!["a", "a"]));
        assert_eq!(parse_complete(&parser, "aab"), Ok(vec!["a", "ab"]));
    }

    #[test]
    fn test_parse_complete_reports_furthest_point() {
        let parser = many(char('a'));
        assert_eq!(
            parse_complete(&parser, "aa\nb"),
            Err(ParseError::Incomplete {
                location: Location { offset: 2, line: 1, column: 3 },
                remaining: "\nb".to_string(),
            })
        );
    }

    #[test]
    fn test_run_with_limit() {
        let parser = many(char('a'));
        let options = ParseOptions::default().with_max_alternatives(2);

        // Three alternatives: "aa", "a", "". None is complete on "aab".
        assert_eq!(
            run_with(&parser, "aab", &options),
            Err(ParseError::LimitReached {
                limit: 2,
                location: Location::locate("aab", 2),
            })
        );
        // Exhausted within the limit.
        let options = ParseOptions::default().with_max_alternatives(3);
        assert!(matches!(
            run_with(&parser, "aab", &options),
            Err(ParseError::Incomplete { .. })
        ));
        // The first alternative is complete.
        assert_eq!(run_with(&parser, "aa", &options), Ok(vec!['a', 'a']));
    }

    #[test]
    fn test_trait_objects_are_accepted() {
        let parser: BoxedParser<char> = boxed(any_token());
        assert_eq!(run_parse(parser.as_ref(), "xy"), Ok('x'));
        assert_eq!(alternatives(&parser, "xy").count(), 1);
    }

    #[test]
    fn test_error_display() {
        let error = ParseError::Incomplete {
            location: Location::locate("ab\nc", 3),
            remaining: "c".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Incomplete parse at line 2, column 1: unconsumed \"c\""
        );
    }
}
