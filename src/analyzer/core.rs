//! # Core Parser Definitions
//!
//! This module defines the enumeration protocol every parser speaks and the
//! construction-time error type.
//!
//! A parser maps a suffix of the input to a lazy sequence of alternatives.
//! Each alternative pairs a value with the input that is still unconsumed.
//! The first alternative is the most preferred one. Failure is the empty
//! sequence, so it propagates through composition without any error value.

use std::rc::Rc;
use thiserror::Error;

/// One candidate parse: the value produced and the unconsumed remainder.
///
/// `rest` is always a suffix of the input the parser was invoked with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialParse<'i, O> {
    pub value: O,
    pub rest: &'i str,
}

impl<'i, O> PartialParse<'i, O> {
    pub fn new(value: O, rest: &'i str) -> Self {
        Self { value, rest }
    }

    /// Transforms the value, keeping the remainder untouched.
    pub fn map<B, F>(self, f: F) -> PartialParse<'i, B>
    where
        F: FnOnce(O) -> B,
    {
        PartialParse {
            value: f(self.value),
            rest: self.rest,
        }
    }

    /// Number of bytes consumed relative to `input`, which must be the
    /// string this alternative was produced from.
    pub fn consumed(&self, input: &str) -> usize {
        input.len() - self.rest.len()
    }
}

/// Lazy, ordered sequence of alternatives.
///
/// Pulling the next item performs only the work needed to produce it, so a
/// consumer that stops early never evaluates the remaining branches.
pub type Alternatives<'i, O> = Box<dyn Iterator<Item = PartialParse<'i, O>> + 'i>;

/// Parser trait defines the core parsing interface.
///
/// Implementations must be referentially transparent: parsing the same input
/// twice yields the same alternatives in the same order. The returned
/// sequence must not borrow the parser, which lets a combinator drop a
/// freshly built sub-parser while its alternatives are still being pulled.
pub trait Parser<O> {
    /// Enumerates the alternatives for `input`, most preferred first.
    fn parse<'i>(&self, input: &'i str) -> Alternatives<'i, O>;
}

impl<O, P> Parser<O> for Rc<P>
where
    P: Parser<O> + ?Sized,
{
    fn parse<'i>(&self, input: &'i str) -> Alternatives<'i, O> {
        (**self).parse(input)
    }
}

impl<O, P> Parser<O> for Box<P>
where
    P: Parser<O> + ?Sized,
{
    fn parse<'i>(&self, input: &'i str) -> Alternatives<'i, O> {
        (**self).parse(input)
    }
}

impl<O, P> Parser<O> for &P
where
    P: Parser<O> + ?Sized,
{
    fn parse<'i>(&self, input: &'i str) -> Alternatives<'i, O> {
        (**self).parse(input)
    }
}

/// Shared, type-erased parser. Cloning is cheap.
///
/// Used where a grammar needs one nameable type: recursive rules,
/// continuations of `bind` that pick between different parsers, and the
/// n-ary combinators.
pub type BoxedParser<O> = Rc<dyn Parser<O>>;

/// Sequence with no alternatives.
pub(crate) fn no_alternatives<'i, O: 'i>() -> Alternatives<'i, O> {
    Box::new(std::iter::empty())
}

/// Sequence with exactly one alternative.
pub(crate) fn single<'i, O: 'i>(value: O, rest: &'i str) -> Alternatives<'i, O> {
    Box::new(std::iter::once(PartialParse::new(value, rest)))
}

/// Sequence whose construction is postponed until the first pull.
pub(crate) fn deferred<'i, O, F>(f: F) -> impl Iterator<Item = PartialParse<'i, O>> + 'i
where
    O: 'i,
    F: FnOnce() -> Alternatives<'i, O> + 'i,
{
    std::iter::once_with(f).flatten()
}

/// Error type for grammar construction.
///
/// These are raised by combinator constructors before any input is seen,
/// so a malformed grammar fails fast instead of silently matching nothing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    /// Repetition bounds describe an empty range, `end` is exclusive
    #[error("Invalid repetition: range {min}..{end} admits no count")]
    InvalidRepetition { min: usize, end: usize },
}
