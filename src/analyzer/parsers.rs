//! Character classes and small value parsers built from the prelude.
//!
//! None of these add enumeration behaviour of their own; they are ordinary
//! compositions of the combinators and backtrack like any other grammar.

use super::combinators::Satisfy;
use super::core::{BoxedParser, Parser};
use super::prelude::*;

/// A single ASCII digit `0-9`.
pub fn digit() -> Satisfy<impl Fn(char) -> bool> {
    satisfy(|c| c.is_ascii_digit())
}

/// A single ASCII uppercase letter `A-Z`.
pub fn upper() -> Satisfy<impl Fn(char) -> bool> {
    satisfy(|c| c.is_ascii_uppercase())
}

/// A single ASCII lowercase letter `a-z`.
pub fn lower() -> Satisfy<impl Fn(char) -> bool> {
    satisfy(|c| c.is_ascii_lowercase())
}

pub fn alpha() -> impl Parser<char> {
    or(upper(), lower())
}

pub fn alphanumeric() -> impl Parser<char> {
    or(alpha(), digit())
}

/// Any whitespace character except the newline, which [`line`] owns.
pub fn whitespace() -> Satisfy<impl Fn(char) -> bool> {
    satisfy(|c| c.is_whitespace() && c != '\n')
}

/// Optionally signed decimal integer.
///
/// Every digit split is offered, longest first. Runs that overflow `i64`
/// are dropped rather than wrapped.
pub fn int() -> impl Parser<i64> {
    bind(
        and(optional(char('-')), many1(digit())),
        |(sign, digits): (Option<char>, Vec<char>)| -> BoxedParser<i64> {
            let text: String = sign.into_iter().chain(digits).collect();
            match text.parse::<i64>() {
                Ok(n) => boxed(succeed(n)),
                Err(error) => {
                    tracing::trace!(target: "parser::int", %text, %error, "dropping integer alternative");
                    boxed(fail())
                }
            }
        },
    )
}

/// One or more letters.
pub fn name() -> impl Parser<String> {
    map(many1(alpha()), |letters: Vec<char>| {
        letters.into_iter().collect::<String>()
    })
}

/// Everything up to and including the next `'\n'`.
///
/// Input without a trailing newline has no line.
pub fn line() -> impl Parser<String> {
    map(
        and(many(satisfy(|c| c != '\n')), char('\n')),
        |(text, newline): (Vec<char>, char)| text.into_iter().chain([newline]).collect::<String>(),
    )
}
