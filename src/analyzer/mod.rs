pub mod combinators;
pub mod core;
pub mod parsers;
pub mod prelude;

pub use self::core::Alternatives;
pub use self::core::BoxedParser;
pub use self::core::GrammarError;
pub use self::core::PartialParse;
pub use self::core::Parser;
