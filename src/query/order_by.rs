//! Parser for Google API style `order_by` strings.
//!
//! Column identifiers cannot be bound as statement parameters, so the sort
//! clause is rebuilt from validated terms instead of the raw client input.
//! See <https://cloud.google.com/apis/design/design_patterns#sorting_order>.

use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::types::{OrderBySpec, OrderDirection, OrderTerm};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
  #[error("order by term must contain 1 or 2 words, got {0}")]
  TermCount(usize),
  #[error("invalid column name '{0}'")]
  InvalidField(String),
  #[error("invalid order by direction '{0}', must be asc or desc")]
  InvalidDirection(String),
}

impl OrderBySpec {
  /// Parse a comma separated list of `field [asc|desc]` terms.
  ///
  /// Field names may only contain letters and underscores. Digits and any
  /// quoting or escaping are rejected outright.
  pub fn parse(input: &str) -> Result<Self, ParseError> {
    let terms = input
      .split(',')
      .map(parse_term)
      .collect::<Result<Vec<_>, _>>()?;
    Ok(Self { terms })
  }
}

impl FromStr for OrderBySpec {
  type Err = ParseError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::parse(s)
  }
}

fn parse_term(term: &str) -> Result<OrderTerm, ParseError> {
  let words: Vec<&str> = term.split_whitespace().collect();
  let (field, direction) = match words.as_slice() {
    [field] => (*field, None),
    [field, direction] => (*field, Some(*direction)),
    _ => return Err(ParseError::TermCount(words.len())),
  };

  if !is_safe_column(field) {
    return Err(ParseError::InvalidField(field.to_string()));
  }

  let direction = match direction {
    None => OrderDirection::Asc,
    Some(dir) if dir.eq_ignore_ascii_case("asc") => OrderDirection::Asc,
    Some(dir) if dir.eq_ignore_ascii_case("desc") => OrderDirection::Desc,
    Some(dir) => return Err(ParseError::InvalidDirection(dir.to_string())),
  };

  Ok(OrderTerm {
    field: field.to_string(),
    direction,
  })
}

/// Unicode letters (general category `L`) and underscores only. Letter-like
/// numbers, marks and symbols are rejected.
fn is_safe_column(field: &str) -> bool {
  static COLUMN: OnceLock<Option<Regex>> = OnceLock::new();
  COLUMN
    .get_or_init(|| Regex::new(r"^[\p{L}_]+$").ok())
    .as_ref()
    .is_some_and(|re| re.is_match(field))
}
