mod query;

pub use query::{ListRequest, OrderBySpec, OrderDirection, OrderTerm};
