use rusqlite::types::Value;

use super::filter::{compose, Predicate};
use crate::catalog::Catalog;
use crate::types::OrderBySpec;

/// An executable statement and its positional arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
  pub sql: String,
  pub args: Vec<Value>,
}

/// `SELECT <columns> FROM <table>` for a catalog.
pub fn base_query<C: Catalog>() -> String {
  format!("SELECT {} FROM {}", C::COLUMNS.join(", "), C::TABLE)
}

/// Build the list query for a catalog.
///
/// The sort falls back to the catalog's start time column when `order_by` is
/// absent or fails to parse; a bad sort term never fails the request.
pub fn assemble<C: Catalog>(filter: Option<&C::Filter>, order_by: Option<&str>) -> Statement {
  let (mut sql, args) = compose(&base_query::<C>(), filter);
  sql.push_str(&order_clause(order_by, C::START_COLUMN));
  tracing::debug!(table = C::TABLE, %sql, args = args.len(), "assembled list query");
  Statement { sql, args }
}

/// Single row lookup: the list query restricted to one identifier.
pub fn lookup<C: Catalog>(id: i64) -> Statement {
  let filter = [Predicate::In {
    column: C::ID_COLUMN,
    values: vec![id],
  }];
  let (mut sql, args) = compose(&base_query::<C>(), Some(&filter[..]));
  sql.push_str(&order_clause(None, C::START_COLUMN));
  Statement { sql, args }
}

/// Unfiltered listing in storage order.
pub fn select_all<C: Catalog>() -> Statement {
  Statement {
    sql: base_query::<C>(),
    args: Vec::new(),
  }
}

/// Render ` ORDER BY ...` from a client supplied string, or the default
/// ascending order on `default_column`.
pub fn order_clause(order_by: Option<&str>, default_column: &str) -> String {
  match order_by.map(OrderBySpec::parse) {
    Some(Ok(spec)) => format!(" ORDER BY {}", spec),
    Some(Err(e)) => {
      tracing::debug!(error = %e, "ignoring invalid order_by, using default order");
      format!(" ORDER BY {}", default_column)
    }
    None => format!(" ORDER BY {}", default_column),
  }
}
