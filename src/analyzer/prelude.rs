use super::combinators::*;
use super::core::{BoxedParser, GrammarError, Parser};
use std::ops::RangeBounds;
use std::rc::Rc;

pub fn any_token() -> AnyToken {
    AnyToken
}

pub fn satisfy<F>(predicate: F) -> Satisfy<F>
where
    F: Fn(char) -> bool,
{
    Satisfy::new(predicate)
}

/// Matches exactly `expected`.
pub fn char(expected: char) -> Satisfy<impl Fn(char) -> bool> {
    Satisfy::new(move |token| token == expected)
}

pub fn literal<T: AsRef<str>>(text: T) -> Literal<T> {
    Literal::new(text)
}

pub fn succeed<O: Clone>(value: O) -> Succeed<O> {
    Succeed::new(value)
}

pub fn fail<O>() -> Fail<O> {
    Fail::new()
}

pub fn end_of_input() -> EndOfInput {
    EndOfInput
}

pub fn bind<P, F, Q, A, B>(parser: P, f: F) -> Bind<P, F, A>
where
    P: Parser<A>,
    F: Fn(A) -> Q,
    Q: Parser<B>,
{
    Bind::new(parser, f)
}

pub fn and<P1, P2, O1, O2>(first: P1, second: P2) -> And<P1, P2, O1, O2>
where
    P1: Parser<O1>,
    P2: Parser<O2>,
{
    And::new(first, second)
}

pub fn or<P1, P2, O>(first: P1, second: P2) -> Or<P1, P2, O>
where
    P1: Parser<O>,
    P2: Parser<O>,
{
    Or::new(first, second)
}

pub fn choice<O>(parsers: Vec<BoxedParser<O>>) -> Choice<O> {
    Choice::new(parsers)
}

pub fn sequence<O: Clone>(parsers: Vec<BoxedParser<O>>) -> Sequence<O> {
    Sequence::new(parsers)
}

pub fn map<P, F, A, B>(parser: P, f: F) -> Map<P, F, A>
where
    P: Parser<A>,
    F: Fn(A) -> B,
{
    Map::new(parser, f)
}

/// Repeats `parser` any number of times inside `bounds`, longest run first.
///
/// # Errors
///
/// Fails with [`GrammarError::InvalidRepetition`] when `bounds` is empty.
pub fn repeat<P, O, R>(parser: P, bounds: R) -> Result<Repeat<P, O>, GrammarError>
where
    P: Parser<O>,
    R: RangeBounds<usize>,
{
    Repeat::new(parser, bounds)
}

/// Zero or more repetitions. Never fails: the empty run is always the last
/// alternative.
pub fn many<P, O>(parser: P) -> Repeat<P, O>
where
    P: Parser<O>,
{
    Repeat::at_least(parser, 0)
}

/// One or more repetitions.
pub fn many1<P, O>(parser: P) -> Repeat<P, O>
where
    P: Parser<O>,
{
    Repeat::at_least(parser, 1)
}

pub fn optional<P, O>(parser: P) -> Optional<P, O>
where
    P: Parser<O>,
{
    Optional::new(parser)
}

pub fn separated_by<P, S, O, OS>(item: P, separator: S) -> SeparatedBy<O>
where
    P: Parser<O> + 'static,
    S: Parser<OS> + 'static,
    O: Clone + 'static,
    OS: Clone + 'static,
{
    SeparatedBy::new(item, separator)
}

pub fn surrounded_by<P, L, R, O, OL, OR>(parser: P, before: L, after: R) -> SurroundedBy<O>
where
    P: Parser<O> + 'static,
    L: Parser<OL> + 'static,
    R: Parser<OR> + 'static,
    O: Clone + 'static,
    OL: Clone + 'static,
    OR: 'static,
{
    SurroundedBy::new(parser, before, after)
}

pub fn lazy<F, P, O>(f: F) -> Lazy<F>
where
    F: Fn() -> P,
    P: Parser<O>,
{
    Lazy::new(f)
}

/// Erases the parser's type so grammars can name, share and recurse on it.
pub fn boxed<P, O>(parser: P) -> BoxedParser<O>
where
    P: Parser<O> + 'static,
{
    Rc::new(parser)
}
