//! Composite combinators building structured results from leaf parsers,
//! aggregating every validation failure instead of stopping at the first.

mod alternatives;
mod array;
mod object;
mod one_of;
mod wrap;

pub use alternatives::{AlternativesParser, alternatives};
pub use array::{ArrayParser, array};
pub use object::{ObjectParser, object};
pub use one_of::{OneOfParser, one_of};
pub use wrap::{DefaultValue, Map, Nullable, Optional};
