use chrono::{DateTime, Utc};
use rand::Rng;
use rusqlite::types::Value;
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::{decode_timestamp, encode_timestamp, fixture_name, fixture_start_time, Catalog, Status};
use crate::query::{FilterSpec, Predicate};

/// Categories used when seeding sporting events.
pub const CATEGORIES: &[&str] = &["AFL", "Rugby League", "Soccer", "Basketball"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
  pub id: i64,
  pub name: String,
  pub category: String,
  pub advertised_start_time: DateTime<Utc>,
  pub status: Status,
}

impl Event {
  pub fn new(
    id: i64,
    name: impl Into<String>,
    category: impl Into<String>,
    advertised_start_time: DateTime<Utc>,
  ) -> Self {
    Self {
      id,
      name: name.into(),
      category: category.into(),
      advertised_start_time,
      status: Status::at(advertised_start_time, Utc::now()),
    }
  }
}

/// Filter for event listings. `category` matches case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventFilter {
  #[serde(default)]
  pub category: Option<String>,
  #[serde(default)]
  pub ids: Vec<i64>,
}

impl FilterSpec for EventFilter {
  fn predicates(&self) -> Vec<Predicate> {
    let mut predicates = Vec::new();
    if let Some(category) = &self.category {
      predicates.push(Predicate::LowerLike {
        column: "category",
        value: category.clone(),
      });
    }
    if !self.ids.is_empty() {
      predicates.push(Predicate::In {
        column: "id",
        values: self.ids.clone(),
      });
    }
    predicates
  }
}

impl Catalog for Event {
  type Filter = EventFilter;

  const KIND: &'static str = "event";
  const TABLE: &'static str = "events";
  const COLUMNS: &'static [&'static str] = &["id", "name", "category", "advertised_start_time"];
  const SCHEMA: &'static str = r#"
CREATE TABLE IF NOT EXISTS events (
    id INTEGER PRIMARY KEY,
    name TEXT,
    category TEXT,
    advertised_start_time DATETIME
);
"#;

  fn id(&self) -> i64 {
    self.id
  }

  fn advertised_start_time(&self) -> DateTime<Utc> {
    self.advertised_start_time
  }

  fn from_row(row: &Row<'_>, now: DateTime<Utc>) -> rusqlite::Result<Self> {
    let advertised_start_time = decode_timestamp(row, 3)?;
    Ok(Self {
      id: row.get(0)?,
      name: row.get(1)?,
      category: row.get(2)?,
      advertised_start_time,
      status: Status::at(advertised_start_time, now),
    })
  }

  fn to_params(&self) -> Vec<Value> {
    vec![
      Value::Integer(self.id),
      Value::Text(self.name.clone()),
      Value::Text(self.category.clone()),
      encode_timestamp(self.advertised_start_time),
    ]
  }

  fn fixture<R: Rng + ?Sized>(id: i64, now: DateTime<Utc>, rng: &mut R) -> Self {
    let advertised_start_time = fixture_start_time(now, rng);
    Self {
      id,
      name: fixture_name(rng),
      category: CATEGORIES[rng.gen_range(0..CATEGORIES.len())].to_string(),
      advertised_start_time,
      status: Status::at(advertised_start_time, now),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_filter_category_then_ids() {
    let filter = EventFilter {
      category: Some("Soccer".into()),
      ids: vec![7],
    };
    assert_eq!(
      filter.predicates(),
      vec![
        Predicate::LowerLike {
          column: "category",
          value: "Soccer".into()
        },
        Predicate::In {
          column: "id",
          values: vec![7]
        },
      ]
    );
  }

  #[test]
  fn test_fixture_category_is_known() {
    let mut rng = rand::thread_rng();
    let event = Event::fixture(1, Utc::now(), &mut rng);
    assert!(CATEGORIES.contains(&event.category.as_str()));
  }
}
