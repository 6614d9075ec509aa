mod assembler;
mod filter;
mod order_by;

pub use assembler::{assemble, base_query, lookup, order_clause, select_all, Statement};
pub use filter::{compose, FilterSpec, Predicate};
pub use order_by::ParseError;
