use rusqlite::types::Value;

/// A single filter condition against a trusted column name.
///
/// Column names come from catalog definitions, never from requests; values
/// are always emitted as bound parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
  /// `column = ?`
  Equals { column: &'static str, value: bool },
  /// `column IN (?, ...)`, skipped when `values` is empty
  In {
    column: &'static str,
    values: Vec<i64>,
  },
  /// `LOWER(column) LIKE ?` against the lower-cased value
  LowerLike {
    column: &'static str,
    value: String,
  },
}

/// Anything that can be reduced to a conjunction of predicates.
pub trait FilterSpec {
  fn predicates(&self) -> Vec<Predicate>;
}

impl FilterSpec for [Predicate] {
  fn predicates(&self) -> Vec<Predicate> {
    self.to_vec()
  }
}

impl FilterSpec for Vec<Predicate> {
  fn predicates(&self) -> Vec<Predicate> {
    self.clone()
  }
}

/// Append a `WHERE` clause for `filter` to `query`.
///
/// Returns the extended query and its positional arguments, in placeholder
/// order. An absent filter, or one whose predicates are all unset, leaves the
/// query untouched.
pub fn compose<F>(query: &str, filter: Option<&F>) -> (String, Vec<Value>)
where
  F: FilterSpec + ?Sized,
{
  let mut sql = query.to_string();
  let mut args = Vec::new();

  let Some(filter) = filter else {
    return (sql, args);
  };

  let mut clauses = Vec::new();
  for predicate in filter.predicates() {
    match predicate {
      Predicate::Equals { column, value } => {
        clauses.push(format!("{} = ?", column));
        args.push(Value::from(value));
      }
      Predicate::In { column, values } => {
        if values.is_empty() {
          continue;
        }
        let placeholders = vec!["?"; values.len()].join(",");
        clauses.push(format!("{} IN ({})", column, placeholders));
        args.extend(values.into_iter().map(Value::Integer));
      }
      Predicate::LowerLike { column, value } => {
        clauses.push(format!("LOWER({}) LIKE ?", column));
        args.push(Value::Text(value.to_lowercase()));
      }
    }
  }

  if !clauses.is_empty() {
    sql.push_str(" WHERE ");
    sql.push_str(&clauses.join(" AND "));
  }

  (sql, args)
}
