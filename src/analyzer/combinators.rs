//! # Parser Combinators
//!
//! This module implements the combinators that form the building blocks of the
//! backtracking engine. Every combinator is a plain struct implementing
//! [`Parser`]; the free functions in [`prelude`](super::prelude) construct them.
//!
//! ## Combinator Types
//!
//! * **Primitives**: `AnyToken`, `Satisfy`, `Literal`, `Succeed`, `Fail`, `EndOfInput`
//! * **Sequential Combinators**: `Bind`, `And`, `Sequence`
//! * **Alternative Combinators**: `Or`, `Choice`, `Optional`
//! * **Repetition Combinators**: `Repeat`, `SeparatedBy`
//! * **Transformation Combinators**: `Map`, `SurroundedBy`
//! * **Recursion**: `Lazy`
//!
//! ## Backtracking
//!
//! Sequencing runs the continuation once per alternative of the first parser,
//! in order, and concatenates the results. A later stage failing on the first
//! alternative therefore falls through to the next alternative of the earlier
//! stage without any retry logic. Sub-parsers that are still needed after
//! `parse` returns are shared through `Rc`, so each branch is only evaluated
//! when its alternatives are pulled.

use super::core::{
    deferred, no_alternatives, single, Alternatives, BoxedParser, GrammarError, PartialParse,
    Parser,
};
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Bound, RangeBounds};
use std::rc::Rc;

/// AnyToken: Consumes and returns the next character
///
/// One alternative on non-empty input, none at the end of input.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyToken;

impl Parser<char> for AnyToken {
    fn parse<'i>(&self, input: &'i str) -> Alternatives<'i, char> {
        let mut chars = input.chars();
        match chars.next() {
            Some(token) => single(token, chars.as_str()),
            None => no_alternatives(),
        }
    }
}

/// Satisfy: Matches one character accepted by a predicate
///
/// Built on [`AnyToken`]: the single token alternative is kept only when the
/// predicate holds for it.
pub struct Satisfy<F> {
    predicate: Rc<F>,
}

impl<F> Satisfy<F> {
    pub fn new(predicate: F) -> Self {
        Self {
            predicate: Rc::new(predicate),
        }
    }
}

impl<F> Clone for Satisfy<F> {
    fn clone(&self) -> Self {
        Self {
            predicate: Rc::clone(&self.predicate),
        }
    }
}

impl<F> Parser<char> for Satisfy<F>
where
    F: Fn(char) -> bool + 'static,
{
    fn parse<'i>(&self, input: &'i str) -> Alternatives<'i, char> {
        let predicate = Rc::clone(&self.predicate);
        Box::new(
            AnyToken
                .parse(input)
                .filter(move |alternative| predicate(alternative.value)),
        )
    }
}

/// Literal: Matches an exact, case-sensitive prefix
///
/// The value is the literal itself. An empty literal always succeeds without
/// consuming input.
#[derive(Debug, Clone)]
pub struct Literal<T> {
    text: T,
}

impl<T> Literal<T> {
    pub fn new(text: T) -> Self {
        Self { text }
    }
}

impl<T> Parser<T> for Literal<T>
where
    T: AsRef<str> + Clone + 'static,
{
    fn parse<'i>(&self, input: &'i str) -> Alternatives<'i, T> {
        match input.strip_prefix(self.text.as_ref()) {
            Some(rest) => single(self.text.clone(), rest),
            None => no_alternatives(),
        }
    }
}

/// Succeed: Always yields `value` without consuming input
#[derive(Debug, Clone)]
pub struct Succeed<O> {
    value: O,
}

impl<O> Succeed<O> {
    pub fn new(value: O) -> Self {
        Self { value }
    }
}

impl<O> Parser<O> for Succeed<O>
where
    O: Clone + 'static,
{
    fn parse<'i>(&self, input: &'i str) -> Alternatives<'i, O> {
        single(self.value.clone(), input)
    }
}

/// Fail: Never yields an alternative
pub struct Fail<O> {
    _phantom: PhantomData<O>,
}

impl<O> Fail<O> {
    pub fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<O> Default for Fail<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O> Clone for Fail<O> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<O> fmt::Debug for Fail<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Fail")
    }
}

impl<O> Parser<O> for Fail<O>
where
    O: 'static,
{
    fn parse<'i>(&self, _input: &'i str) -> Alternatives<'i, O> {
        no_alternatives()
    }
}

/// EndOfInput: Succeeds with `()` only when nothing is left to consume
#[derive(Debug, Clone, Copy, Default)]
pub struct EndOfInput;

impl Parser<()> for EndOfInput {
    fn parse<'i>(&self, input: &'i str) -> Alternatives<'i, ()> {
        if input.is_empty() {
            single((), input)
        } else {
            no_alternatives()
        }
    }
}

/// Bind: Feeds every alternative of a parser into a continuation
///
/// For each alternative of `parser`, in order, the continuation builds a
/// second parser from the value and runs it on that alternative's remainder.
/// The result is the concatenation of all those runs. The continuation is
/// only called when the consumer pulls far enough to need its branch.
pub struct Bind<P, F, A> {
    /// The parser whose alternatives drive the continuation
    parser: P,
    /// Builds the follow-up parser from each value
    f: Rc<F>,
    _phantom: PhantomData<A>,
}

impl<P, F, A> Bind<P, F, A> {
    pub fn new(parser: P, f: F) -> Self {
        Self {
            parser,
            f: Rc::new(f),
            _phantom: PhantomData,
        }
    }
}

impl<P: Clone, F, A> Clone for Bind<P, F, A> {
    fn clone(&self) -> Self {
        Self {
            parser: self.parser.clone(),
            f: Rc::clone(&self.f),
            _phantom: PhantomData,
        }
    }
}

impl<P, F, Q, A, B> Parser<B> for Bind<P, F, A>
where
    P: Parser<A>,
    F: Fn(A) -> Q + 'static,
    Q: Parser<B>,
    A: 'static,
    B: 'static,
{
    fn parse<'i>(&self, input: &'i str) -> Alternatives<'i, B> {
        let f = Rc::clone(&self.f);
        Box::new(
            self.parser
                .parse(input)
                .flat_map(move |PartialParse { value, rest }| f(value).parse(rest)),
        )
    }
}

/// And: Runs two parsers in sequence and pairs their values
///
/// Equivalent to binding `first` to a continuation that runs `second` and
/// pairs the values, so every alternative of `second` is tried after each
/// alternative of `first`.
pub struct And<P1, P2, O1, O2> {
    first: P1,
    second: Rc<P2>,
    _phantom: PhantomData<(O1, O2)>,
}

impl<P1, P2, O1, O2> And<P1, P2, O1, O2> {
    pub fn new(first: P1, second: P2) -> Self {
        Self {
            first,
            second: Rc::new(second),
            _phantom: PhantomData,
        }
    }
}

impl<P1: Clone, P2, O1, O2> Clone for And<P1, P2, O1, O2> {
    fn clone(&self) -> Self {
        Self {
            first: self.first.clone(),
            second: Rc::clone(&self.second),
            _phantom: PhantomData,
        }
    }
}

impl<P1, P2, O1, O2> Parser<(O1, O2)> for And<P1, P2, O1, O2>
where
    P1: Parser<O1>,
    P2: Parser<O2> + 'static,
    O1: Clone + 'static,
    O2: 'static,
{
    fn parse<'i>(&self, input: &'i str) -> Alternatives<'i, (O1, O2)> {
        let second = Rc::clone(&self.second);
        Box::new(
            self.first
                .parse(input)
                .flat_map(move |PartialParse { value: first, rest }| {
                    second
                        .parse(rest)
                        .map(move |alternative| alternative.map(|value| (first.clone(), value)))
                }),
        )
    }
}

/// Or: Ordered choice between two parsers
///
/// Yields every alternative of `first`, then every alternative of `second`,
/// both run against the same input. `second` is not invoked until `first`
/// is exhausted.
pub struct Or<P1, P2, O> {
    first: P1,
    second: Rc<P2>,
    _phantom: PhantomData<O>,
}

impl<P1, P2, O> Or<P1, P2, O> {
    pub fn new(first: P1, second: P2) -> Self {
        Self {
            first,
            second: Rc::new(second),
            _phantom: PhantomData,
        }
    }
}

impl<P1: Clone, P2, O> Clone for Or<P1, P2, O> {
    fn clone(&self) -> Self {
        Self {
            first: self.first.clone(),
            second: Rc::clone(&self.second),
            _phantom: PhantomData,
        }
    }
}

impl<P1, P2, O> Parser<O> for Or<P1, P2, O>
where
    P1: Parser<O>,
    P2: Parser<O> + 'static,
    O: 'static,
{
    fn parse<'i>(&self, input: &'i str) -> Alternatives<'i, O> {
        let second = Rc::clone(&self.second);
        Box::new(
            self.first
                .parse(input)
                .chain(deferred(move || second.parse(input))),
        )
    }
}

/// Choice: Ordered choice over any number of parsers
///
/// The n-ary form of [`Or`]. An empty choice has no alternatives.
#[derive(Clone)]
pub struct Choice<O> {
    /// The parsers to try, in order of preference
    parsers: Rc<[BoxedParser<O>]>,
}

impl<O> Choice<O> {
    pub fn new(parsers: Vec<BoxedParser<O>>) -> Self {
        Self {
            parsers: parsers.into(),
        }
    }
}

impl<O> Parser<O> for Choice<O>
where
    O: 'static,
{
    fn parse<'i>(&self, input: &'i str) -> Alternatives<'i, O> {
        let parsers = Rc::clone(&self.parsers);
        let count = parsers.len();
        Box::new((0..count).flat_map(move |index| parsers[index].parse(input)))
    }
}

/// Sequence: Applies multiple parsers in sequence
///
/// Collects one value per parser into a vector, backtracking through the
/// alternatives of every stage. An empty sequence yields an empty vector.
#[derive(Clone)]
pub struct Sequence<O> {
    /// The parsers to apply, left to right
    parsers: Rc<[BoxedParser<O>]>,
}

impl<O> Sequence<O> {
    pub fn new(parsers: Vec<BoxedParser<O>>) -> Self {
        Self {
            parsers: parsers.into(),
        }
    }
}

// Values are pushed on the way out of the recursion, so they come back
// reversed.
fn sequence_from<'i, O>(
    parsers: Rc<[BoxedParser<O>]>,
    index: usize,
    input: &'i str,
) -> Alternatives<'i, Vec<O>>
where
    O: Clone + 'static,
{
    if index == parsers.len() {
        return single(Vec::new(), input);
    }
    let alternatives = parsers[index].parse(input);
    Box::new(
        alternatives.flat_map(move |PartialParse { value, rest }| {
            sequence_from(Rc::clone(&parsers), index + 1, rest).map(move |mut tail| {
                tail.value.push(value.clone());
                tail
            })
        }),
    )
}

impl<O> Parser<Vec<O>> for Sequence<O>
where
    O: Clone + 'static,
{
    fn parse<'i>(&self, input: &'i str) -> Alternatives<'i, Vec<O>> {
        Box::new(
            sequence_from(Rc::clone(&self.parsers), 0, input).map(|alternative| {
                alternative.map(|mut values| {
                    values.reverse();
                    values
                })
            }),
        )
    }
}

/// Map: Transforms the output of a parser using a function
///
/// The number, order and remainders of the alternatives are unchanged.
pub struct Map<P, F, A> {
    /// The parser whose output will be transformed
    parser: P,
    /// The transformation function
    f: Rc<F>,
    _phantom: PhantomData<A>,
}

impl<P, F, A> Map<P, F, A> {
    /// Creates a new Map parser
    ///
    /// # Arguments
    ///
    /// * `parser` - The parser whose output will be transformed
    /// * `f` - The transformation function to apply to every value
    pub fn new(parser: P, f: F) -> Self {
        Self {
            parser,
            f: Rc::new(f),
            _phantom: PhantomData,
        }
    }
}

impl<P: Clone, F, A> Clone for Map<P, F, A> {
    fn clone(&self) -> Self {
        Self {
            parser: self.parser.clone(),
            f: Rc::clone(&self.f),
            _phantom: PhantomData,
        }
    }
}

impl<P, F, A, B> Parser<B> for Map<P, F, A>
where
    P: Parser<A>,
    F: Fn(A) -> B + 'static,
    A: 'static,
    B: 'static,
{
    fn parse<'i>(&self, input: &'i str) -> Alternatives<'i, B> {
        let f = Rc::clone(&self.f);
        Box::new(
            self.parser
                .parse(input)
                .map(move |alternative| alternative.map(|value| f(value))),
        )
    }
}

/// Repeat: Applies a parser a bounded number of times
///
/// Greedy first: the longest run is the first alternative and every shorter
/// run down to `min` follows as a later alternative, so an enclosing sequence
/// can backtrack into fewer repetitions. Runs shorter than `min` are never
/// produced and runs longer than `max` are never attempted.
///
/// An iteration that consumes no input ends the repetition: it is kept as the
/// last element and no further iteration is attempted after it. Without this
/// a parser that matches the empty string would recurse forever.
pub struct Repeat<P, O> {
    parser: Rc<P>,
    min: usize,
    /// Inclusive upper bound, `None` when unbounded
    max: Option<usize>,
    _phantom: PhantomData<O>,
}

impl<P, O> Repeat<P, O> {
    /// Creates a Repeat parser accepting any count inside `bounds`
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError::InvalidRepetition`] when `bounds` is an empty
    /// range such as `4..=2` or `..0`.
    pub fn new<R>(parser: P, bounds: R) -> Result<Self, GrammarError>
    where
        R: RangeBounds<usize>,
    {
        let min = match bounds.start_bound() {
            Bound::Included(&start) => start,
            Bound::Excluded(&start) => start.saturating_add(1),
            Bound::Unbounded => 0,
        };
        // Exclusive end; an inclusive usize::MAX is as good as unbounded.
        let end = match bounds.end_bound() {
            Bound::Included(&last) => last.checked_add(1),
            Bound::Excluded(&end) => Some(end),
            Bound::Unbounded => None,
        };
        if let Some(end) = end.filter(|&end| min >= end) {
            tracing::warn!(
                target: "parser::repeat",
                min,
                end,
                "rejected empty repetition range"
            );
            return Err(GrammarError::InvalidRepetition { min, end });
        }
        Ok(Self {
            parser: Rc::new(parser),
            min,
            max: end.map(|end| end - 1),
            _phantom: PhantomData,
        })
    }

    /// Creates a Repeat parser with no upper bound, which is always valid.
    pub fn at_least(parser: P, min: usize) -> Self {
        Self {
            parser: Rc::new(parser),
            min,
            max: None,
            _phantom: PhantomData,
        }
    }

    pub fn min(&self) -> usize {
        self.min
    }

    pub fn max(&self) -> Option<usize> {
        self.max
    }
}

impl<P, O> Clone for Repeat<P, O> {
    fn clone(&self) -> Self {
        Self {
            parser: Rc::clone(&self.parser),
            min: self.min,
            max: self.max,
            _phantom: PhantomData,
        }
    }
}

// `count` iterations have matched before `input`. Values come back reversed,
// see `sequence_from`.
fn repeat_from<'i, P, O>(
    parser: Rc<P>,
    min: usize,
    max: Option<usize>,
    count: usize,
    input: &'i str,
) -> Alternatives<'i, Vec<O>>
where
    P: Parser<O> + 'static,
    O: Clone + 'static,
{
    let stop = (count >= min).then(|| PartialParse::new(Vec::new(), input));
    if max.is_some_and(|max| count >= max) {
        return Box::new(stop.into_iter());
    }

    let alternatives = parser.parse(input);
    let longer = alternatives.flat_map(
        move |PartialParse { value, rest }| -> Alternatives<'i, Vec<O>> {
            if rest.len() == input.len() {
                tracing::trace!(
                    target: "parser::repeat",
                    iteration = count + 1,
                    "zero-width iteration ends repetition"
                );
                return if count + 1 >= min {
                    single(vec![value], rest)
                } else {
                    no_alternatives()
                };
            }
            Box::new(
                repeat_from(Rc::clone(&parser), min, max, count + 1, rest).map(
                    move |mut tail| {
                        tail.value.push(value.clone());
                        tail
                    },
                ),
            )
        },
    );
    Box::new(longer.chain(stop))
}

impl<P, O> Parser<Vec<O>> for Repeat<P, O>
where
    P: Parser<O> + 'static,
    O: Clone + 'static,
{
    fn parse<'i>(&self, input: &'i str) -> Alternatives<'i, Vec<O>> {
        Box::new(
            repeat_from(Rc::clone(&self.parser), self.min, self.max, 0, input).map(
                |alternative| {
                    alternative.map(|mut values| {
                        values.reverse();
                        values
                    })
                },
            ),
        )
    }
}

/// Optional: Wraps the alternatives of a parser in `Some`, then offers `None`
///
/// The `None` alternative consumes nothing and always comes last.
pub struct Optional<P, O> {
    parser: P,
    _phantom: PhantomData<O>,
}

impl<P, O> Optional<P, O> {
    pub fn new(parser: P) -> Self {
        Self {
            parser,
            _phantom: PhantomData,
        }
    }
}

impl<P: Clone, O> Clone for Optional<P, O> {
    fn clone(&self) -> Self {
        Self::new(self.parser.clone())
    }
}

impl<P, O> Parser<Option<O>> for Optional<P, O>
where
    P: Parser<O>,
    O: 'static,
{
    fn parse<'i>(&self, input: &'i str) -> Alternatives<'i, Option<O>> {
        Box::new(
            self.parser
                .parse(input)
                .map(|alternative| alternative.map(Some))
                .chain(std::iter::once(PartialParse::new(None, input))),
        )
    }
}

/// SeparatedBy: One or more items with separators in between
///
/// Parses `many(and(item, separator))` followed by a final `item`, keeping
/// only the item values. A trailing separator is left unconsumed.
#[derive(Clone)]
pub struct SeparatedBy<O> {
    inner: BoxedParser<Vec<O>>,
}

impl<O> SeparatedBy<O>
where
    O: Clone + 'static,
{
    pub fn new<P, S, OS>(item: P, separator: S) -> Self
    where
        P: Parser<O> + 'static,
        S: Parser<OS> + 'static,
        OS: Clone + 'static,
    {
        let item = Rc::new(item);
        let pairs =
            Repeat::<_, (O, OS)>::at_least(And::<_, _, O, OS>::new(Rc::clone(&item), separator), 0);
        let inner = Map::<_, _, (Vec<(O, OS)>, O)>::new(
            And::<_, _, Vec<(O, OS)>, O>::new(pairs, item),
            |(pairs, last): (Vec<(O, OS)>, O)| {
                pairs
                    .into_iter()
                    .map(|(value, _)| value)
                    .chain(std::iter::once(last))
                    .collect::<Vec<O>>()
            },
        );
        Self {
            inner: Rc::new(inner),
        }
    }
}

impl<O> Parser<Vec<O>> for SeparatedBy<O>
where
    O: 'static,
{
    fn parse<'i>(&self, input: &'i str) -> Alternatives<'i, Vec<O>> {
        self.inner.parse(input)
    }
}

/// SurroundedBy: Parses content between `before` and `after`
///
/// Handles bracketed or quoted forms, returning only the content's value.
#[derive(Clone)]
pub struct SurroundedBy<O> {
    inner: BoxedParser<O>,
}

impl<O> SurroundedBy<O>
where
    O: Clone + 'static,
{
    pub fn new<P, L, R, OL, OR>(parser: P, before: L, after: R) -> Self
    where
        P: Parser<O> + 'static,
        L: Parser<OL> + 'static,
        R: Parser<OR> + 'static,
        OL: Clone + 'static,
        OR: 'static,
    {
        let content = And::<_, _, O, OR>::new(parser, after);
        let inner = Map::<_, _, (OL, (O, OR))>::new(
            And::<_, _, OL, (O, OR)>::new(before, content),
            |(_, (value, _)): (OL, (O, OR))| value,
        );
        Self {
            inner: Rc::new(inner),
        }
    }
}

impl<O> Parser<O> for SurroundedBy<O>
where
    O: 'static,
{
    fn parse<'i>(&self, input: &'i str) -> Alternatives<'i, O> {
        self.inner.parse(input)
    }
}

/// Lazy: Builds the wrapped parser only when parsing
///
/// Lets a grammar rule refer to itself without constructing an infinite
/// parser up front.
#[derive(Clone)]
pub struct Lazy<F> {
    f: F,
}

impl<F> Lazy<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<O, F, P> Parser<O> for Lazy<F>
where
    F: Fn() -> P,
    P: Parser<O>,
{
    fn parse<'i>(&self, input: &'i str) -> Alternatives<'i, O> {
        (self.f)().parse(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    fn is(expected: char) -> Satisfy<impl Fn(char) -> bool> {
        Satisfy::new(move |token| token == expected)
    }

    fn all<'i, O, P: Parser<O>>(parser: &P, input: &'i str) -> Vec<(O, &'i str)> {
        parser
            .parse(input)
            .map(|PartialParse { value, rest }| (value, rest))
            .collect()
    }

    fn boxed<O, P: Parser<O> + 'static>(parser: P) -> BoxedParser<O> {
        Rc::new(parser)
    }

    /// Counts how many times it has been invoked.
    struct Probe {
        calls: Rc<Cell<usize>>,
    }

    impl Parser<char> for Probe {
        fn parse<'i>(&self, input: &'i str) -> Alternatives<'i, char> {
            self.calls.set(self.calls.get() + 1);
            AnyToken.parse(input)
        }
    }

    #[test]
    fn test_any_token() {
        let parser = AnyToken;

        // 成功するケース
        assert_eq!(all(&parser, "abc"), vec![('a', "bc")]);
        // 複数バイト文字
        assert_eq!(all(&parser, "éa"), vec![('é', "a")]);

        // 失敗するケース (空入力)
        assert_eq!(all(&parser, ""), vec![]);
    }

    #[test]
    fn test_satisfy() {
        let parser = Satisfy::new(|token: char| token.is_ascii_digit());

        assert_eq!(all(&parser, "1a"), vec![('1', "a")]);
        assert_eq!(all(&parser, "a1"), vec![]);
        assert_eq!(all(&parser, ""), vec![]);
    }

    #[test]
    fn test_literal() {
        let parser = Literal::new("let");

        assert_eq!(all(&parser, "let x"), vec![("let", " x")]);
        assert_eq!(all(&parser, "Let x"), vec![]);
        assert_eq!(all(&parser, "le"), vec![]);

        // 空文字列は常に成功し、何も消費しない
        let empty = Literal::new(String::new());
        assert_eq!(all(&empty, "abc"), vec![(String::new(), "abc")]);
        assert_eq!(all(&empty, ""), vec![(String::new(), "")]);
    }

    #[test]
    fn test_succeed_and_fail() {
        assert_eq!(all(&Succeed::new(42), "abc"), vec![(42, "abc")]);
        assert_eq!(all(&Succeed::new(42), ""), vec![(42, "")]);
        assert_eq!(all(&Fail::<i32>::new(), "abc"), vec![]);
    }

    #[test]
    fn test_end_of_input() {
        assert_eq!(all(&EndOfInput, ""), vec![((), "")]);
        assert_eq!(all(&EndOfInput, "x"), vec![]);
    }

    #[test]
    fn test_bind_concatenates_branches() {
        // Each digit decides how many 'x' must follow it.
        let count = Satisfy::new(|token: char| token.is_ascii_digit());
        let parser = Bind::new(count, |digit: char| {
            let n = digit.to_digit(10).unwrap_or(0) as usize;
            Literal::new("x".repeat(n))
        });

        assert_eq!(all(&parser, "2xxy"), vec![("xx".to_string(), "y")]);
        assert_eq!(all(&parser, "2xy"), vec![]);
    }

    #[test]
    fn test_bind_backtracks_into_earlier_alternatives() {
        let first = Or::new(Literal::new("ab"), Literal::new("a"));
        let parser = Bind::new(first, |_| Literal::new("bc"));

        // "ab" leaves "c", so only the shorter first alternative succeeds.
        assert_eq!(all(&parser, "abc"), vec![("bc", "")]);
    }

    #[test]
    fn test_and() {
        let parser = And::new(is('a'), is('b'));

        assert_eq!(all(&parser, "abc"), vec![(('a', 'b'), "c")]);
        assert_eq!(all(&parser, "acb"), vec![]);
        assert_eq!(all(&parser, "a"), vec![]);
    }

    #[test]
    fn test_or_is_ordered() {
        let parser = Or::new(Literal::new("a"), Literal::new("ab"));
        assert_eq!(all(&parser, "abc"), vec![("a", "bc"), ("ab", "c")]);

        let parser = Or::new(Literal::new("ab"), Literal::new("a"));
        assert_eq!(all(&parser, "abc"), vec![("ab", "c"), ("a", "bc")]);
    }

    #[test]
    fn test_or_defers_second_branch() {
        let calls = Rc::new(Cell::new(0));
        let parser = Or::new(
            is('a'),
            Probe {
                calls: Rc::clone(&calls),
            },
        );

        let mut alternatives = parser.parse("ab");
        assert_eq!(alternatives.next().map(|a| a.value), Some('a'));
        assert_eq!(calls.get(), 0);

        assert_eq!(alternatives.next().map(|a| a.value), Some('a'));
        assert_eq!(calls.get(), 1);
        assert_eq!(alternatives.next(), None);
    }

    #[test]
    fn test_choice() {
        let parser = Choice::new(vec![
            boxed(Literal::new("abc")),
            boxed(Fail::new()),
            boxed(Literal::new("a")),
        ]);
        assert_eq!(all(&parser, "abcd"), vec![("abc", "d"), ("a", "bcd")]);

        let empty: Choice<&str> = Choice::new(vec![]);
        assert_eq!(all(&empty, "abc"), vec![]);
    }

    #[test]
    fn test_sequence() {
        let parser = Sequence::new(vec![boxed(is('a')), boxed(is('b')), boxed(is('c'))]);
        assert_eq!(all(&parser, "abcd"), vec![(vec!['a', 'b', 'c'], "d")]);
        assert_eq!(all(&parser, "abd"), vec![]);

        let empty: Sequence<char> = Sequence::new(vec![]);
        assert_eq!(all(&empty, "abc"), vec![(vec![], "abc")]);
    }

    #[test]
    fn test_sequence_backtracks() {
        let flexible: BoxedParser<&str> = boxed(Or::new(Literal::new("aa"), Literal::new("a")));
        let parser = Sequence::new(vec![flexible, boxed(Literal::new("ab"))]);
        assert_eq!(all(&parser, "aab"), vec![(vec!["a", "ab"], "")]);
    }

    #[test]
    fn test_map() {
        let parser = Map::new(Or::new(Literal::new("ab"), Literal::new("a")), |s: &str| {
            s.len()
        });
        assert_eq!(all(&parser, "abc"), vec![(2, "c"), (1, "bc")]);
        assert_eq!(all(&parser, "xyz"), vec![]);
    }

    #[test]
    fn test_repeat_bounds() {
        let parser = Repeat::new(is('a'), 2..=4).unwrap();
        let counts: Vec<usize> = parser
            .parse("aaaaaa")
            .map(|alternative| alternative.value.len())
            .collect();
        assert_eq!(counts, vec![4, 3, 2]);
        assert_eq!(all(&parser, "a"), vec![]);
    }

    #[test]
    fn test_repeat_greedy_first() {
        let parser = Repeat::at_least(is('a'), 0);
        assert_eq!(
            all(&parser, "aab"),
            vec![(vec!['a', 'a'], "b"), (vec!['a'], "ab"), (vec![], "aab")]
        );
    }

    #[test]
    fn test_repeat_preserves_order_of_values() {
        let digit = Satisfy::new(|token: char| token.is_ascii_digit());
        let parser = Repeat::at_least(digit, 1);
        let first = parser.parse("123x").next().unwrap();
        assert_eq!(first.value, vec!['1', '2', '3']);
        assert_eq!(first.rest, "x");
    }

    #[test]
    fn test_repeat_exact_count() {
        let parser = Repeat::new(is('a'), 2..3).unwrap();
        assert_eq!(all(&parser, "aaaa"), vec![(vec!['a', 'a'], "aa")]);
        assert_eq!(parser.min(), 2);
        assert_eq!(parser.max(), Some(2));
    }

    #[test]
    fn test_repeat_rejects_empty_range() {
        assert_eq!(
            Repeat::<_, char>::new(is('a'), 4..=2).err(),
            Some(GrammarError::InvalidRepetition { min: 4, end: 3 })
        );
        assert_eq!(
            Repeat::<_, char>::new(is('a'), ..0).err(),
            Some(GrammarError::InvalidRepetition { min: 0, end: 0 })
        );
        assert!(Repeat::<_, char>::new(is('a'), 0..=0).is_ok());
    }

    #[test]
    fn test_repeat_zero_width_terminates() {
        let parser = Repeat::at_least(Succeed::new('z'), 0);
        assert_eq!(all(&parser, "abc"), vec![(vec!['z'], "abc"), (vec![], "abc")]);

        let parser = Repeat::new(Succeed::new('z'), 2..).unwrap();
        assert_eq!(all(&parser, "abc"), vec![]);
    }

    #[test]
    fn test_optional() {
        let parser = Optional::new(is('a'));
        assert_eq!(all(&parser, "ab"), vec![(Some('a'), "b"), (None, "ab")]);
        assert_eq!(all(&parser, "b"), vec![(None, "b")]);
    }

    #[test]
    fn test_separated_by() {
        let item = Satisfy::new(|token: char| token.is_ascii_alphabetic());
        let parser = SeparatedBy::new(item, is(','));

        let first = parser.parse("a,b,c").next().unwrap();
        assert_eq!(first.value, vec!['a', 'b', 'c']);
        assert_eq!(first.rest, "");

        // 末尾の区切り文字は消費しない
        let first = parser.parse("a,b,").next().unwrap();
        assert_eq!(first.value, vec!['a', 'b']);
        assert_eq!(first.rest, ",");

        assert_eq!(all(&parser, ",a"), vec![]);
    }

    #[test]
    fn test_surrounded_by() {
        let digit = Satisfy::new(|token: char| token.is_ascii_digit());
        let parser = SurroundedBy::new(digit, is('('), is(')'));

        assert_eq!(all(&parser, "(1)(2)"), vec![('1', "(2)")]);
        assert_eq!(all(&parser, "(1"), vec![]);
        assert_eq!(all(&parser, "1)"), vec![]);
    }

    #[test]
    fn test_lazy_builds_on_parse() {
        let built = Rc::new(Cell::new(0));
        let counter = Rc::clone(&built);
        let parser = Lazy::new(move || {
            counter.set(counter.get() + 1);
            is('a')
        });
        assert_eq!(built.get(), 0);
        assert_eq!(all(&parser, "a"), vec![('a', "")]);
        assert_eq!(all(&parser, "a"), vec![('a', "")]);
        assert_eq!(built.get(), 2);
    }
}
