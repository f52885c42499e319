//! Lazy backtracking parser combinators.
//!
//! A parser turns input text into an ordered, lazily produced sequence of
//! alternatives, each pairing a value with the unconsumed rest. Sequencing
//! feeds every alternative of one parser into the next, so a later failure
//! falls back to an earlier, less preferred alternative. Repetition is greedy
//! first, and nothing is computed beyond what the consumer pulls.
//!
//! ```
//! use retrace::analyzer::prelude::*;
//! use retrace::run_parse;
//!
//! let ones = || many1(char('1'));
//! let float = and(ones(), and(char('.'), ones()));
//! let (whole, (_, fraction)) = run_parse(&float, "11.11").unwrap();
//! assert_eq!((whole.len(), fraction.len()), (2, 2));
//! ```

pub mod analyzer;
pub mod config;
pub mod error;
pub mod grammar;
pub mod parser;

// Re-exports
pub use analyzer::{BoxedParser, GrammarError, PartialParse, Parser};
pub use config::ParseOptions;
pub use error::*;
pub use parser::*;
