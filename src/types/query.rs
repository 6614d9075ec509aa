use std::fmt;

use serde::{Deserialize, Serialize};

/// A list request for one catalog: an optional filter and an optional
/// free-form `order_by` string ("number asc, name desc").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListRequest<F> {
  #[serde(default)]
  pub filter: Option<F>,
  #[serde(default)]
  pub order_by: Option<String>,
}

impl<F> ListRequest<F> {
  pub fn new() -> Self {
    Self {
      filter: None,
      order_by: None,
    }
  }

  pub fn with_filter(mut self, filter: F) -> Self {
    self.filter = Some(filter);
    self
  }

  pub fn with_order_by(mut self, order_by: impl Into<String>) -> Self {
    self.order_by = Some(order_by.into());
    self
  }
}

impl<F> Default for ListRequest<F> {
  fn default() -> Self {
    Self::new()
  }
}

/// Validated, ordered sort terms. The first term is the most significant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBySpec {
  pub terms: Vec<OrderTerm>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderTerm {
  pub field: String,
  pub direction: OrderDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
  #[default]
  Asc,
  Desc,
}

impl OrderDirection {
  pub fn as_sql(&self) -> &'static str {
    match self {
      Self::Asc => "ASC",
      Self::Desc => "DESC",
    }
  }
}

impl fmt::Display for OrderTerm {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} {}", self.field, self.direction.as_sql())
  }
}

/// Renders the terms as the body of an SQL `ORDER BY` clause.
impl fmt::Display for OrderBySpec {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, term) in self.terms.iter().enumerate() {
      if i > 0 {
        f.write_str(", ")?;
      }
      write!(f, "{}", term)?;
    }
    Ok(())
  }
}
