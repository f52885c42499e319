//! Ready-made grammars that produce JSON values, used by the `retrace` binary.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::analyzer::parsers::{digit, int, name, whitespace};
use crate::analyzer::prelude::*;
use crate::analyzer::{BoxedParser, Parser};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum GrammarKind {
    /// A signed integer, `-42`
    Int,
    /// Comma separated integers, `1, 2, 3`
    Ints,
    /// A signed decimal with a fractional part, `-1.25`
    Float,
    /// Whitespace separated words, `hello world`
    Words,
    /// Comma separated `key = value` pairs, value an integer or a word
    KeyValue,
}

impl GrammarKind {
    pub fn parser(self) -> BoxedParser<Value> {
        match self {
            GrammarKind::Int => boxed(map(int(), |n: i64| Value::from(n))),
            GrammarKind::Ints => boxed(map(
                separated_by(int(), comma()),
                |numbers: Vec<i64>| Value::from(numbers),
            )),
            GrammarKind::Float => float(),
            GrammarKind::Words => boxed(map(
                separated_by(name(), many1(whitespace())),
                |words: Vec<String>| Value::from(words),
            )),
            GrammarKind::KeyValue => key_value(),
        }
    }
}

/// `,` followed by optional whitespace.
fn comma() -> impl Parser<(char, Vec<char>)> {
    and(char(','), many(whitespace()))
}

/// `p` followed by optional whitespace.
fn padded<P, O>(parser: P) -> impl Parser<O>
where
    P: Parser<O> + 'static,
    O: Clone + 'static,
{
    map(and(parser, many(whitespace())), |(value, _): (O, Vec<char>)| value)
}

fn float() -> BoxedParser<Value> {
    let digits = || many1(digit());
    boxed(bind(
        and(optional(char('-')), and(digits(), and(char('.'), digits()))),
        |(sign, (whole, (point, fraction))): (Option<char>, (Vec<char>, (char, Vec<char>)))| {
            let text: String = sign
                .into_iter()
                .chain(whole)
                .chain([point])
                .chain(fraction)
                .collect();
            match text.parse::<f64>() {
                Ok(value) => boxed(succeed(Value::from(value))),
                Err(error) => {
                    tracing::trace!(target: "parser::float", %text, %error, "dropping float alternative");
                    boxed(fail())
                }
            }
        },
    ))
}

fn key_value() -> BoxedParser<Value> {
    let value = or(
        map(int(), |n: i64| Value::from(n)),
        map(name(), |word: String| Value::from(word)),
    );
    let pair = and(padded(name()), and(padded(char('=')), value));
    boxed(map(
        separated_by(pair, comma()),
        |pairs: Vec<(String, (char, Value))>| {
            Value::Object(
                pairs
                    .into_iter()
                    .map(|(key, (_, value))| (key, value))
                    .collect::<Map<String, Value>>(),
            )
        },
    ))
}
