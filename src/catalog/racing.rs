use chrono::{DateTime, Utc};
use rand::Rng;
use rusqlite::types::Value;
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::{decode_timestamp, encode_timestamp, fixture_name, fixture_start_time, Catalog, Status};
use crate::query::{FilterSpec, Predicate};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Race {
  pub id: i64,
  pub meeting_id: i64,
  pub name: String,
  pub number: i64,
  pub visible: bool,
  pub advertised_start_time: DateTime<Utc>,
  pub status: Status,
}

impl Race {
  pub fn new(
    id: i64,
    meeting_id: i64,
    name: impl Into<String>,
    number: i64,
    visible: bool,
    advertised_start_time: DateTime<Utc>,
  ) -> Self {
    Self {
      id,
      meeting_id,
      name: name.into(),
      number,
      visible,
      advertised_start_time,
      status: Status::at(advertised_start_time, Utc::now()),
    }
  }
}

/// Filter for race listings. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RaceFilter {
  #[serde(default)]
  pub visible: Option<bool>,
  #[serde(default)]
  pub meeting_ids: Vec<i64>,
}

impl FilterSpec for RaceFilter {
  fn predicates(&self) -> Vec<Predicate> {
    let mut predicates = Vec::new();
    if let Some(visible) = self.visible {
      predicates.push(Predicate::Equals {
        column: "visible",
        value: visible,
      });
    }
    if !self.meeting_ids.is_empty() {
      predicates.push(Predicate::In {
        column: "meeting_id",
        values: self.meeting_ids.clone(),
      });
    }
    predicates
  }
}

impl Catalog for Race {
  type Filter = RaceFilter;

  const KIND: &'static str = "race";
  const TABLE: &'static str = "races";
  const COLUMNS: &'static [&'static str] = &[
    "id",
    "meeting_id",
    "name",
    "number",
    "visible",
    "advertised_start_time",
  ];
  const SCHEMA: &'static str = r#"
CREATE TABLE IF NOT EXISTS races (
    id INTEGER PRIMARY KEY,
    meeting_id INTEGER,
    name TEXT,
    number INTEGER,
    visible INTEGER,
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
    let advertised_start_time = decode_timestamp(row, 5)?;
    Ok(Self {
      id: row.get(0)?,
      meeting_id: row.get(1)?,
      name: row.get(2)?,
      number: row.get(3)?,
      visible: row.get(4)?,
      advertised_start_time,
      status: Status::at(advertised_start_time, now),
    })
  }

  fn to_params(&self) -> Vec<Value> {
    vec![
      Value::Integer(self.id),
      Value::Integer(self.meeting_id),
      Value::Text(self.name.clone()),
      Value::Integer(self.number),
      Value::from(self.visible),
      encode_timestamp(self.advertised_start_time),
    ]
  }

  fn fixture<R: Rng + ?Sized>(id: i64, now: DateTime<Utc>, rng: &mut R) -> Self {
    let advertised_start_time = fixture_start_time(now, rng);
    Self {
      id,
      meeting_id: rng.gen_range(1..=10),
      name: fixture_name(rng),
      number: rng.gen_range(1..=12),
      visible: rng.gen_bool(0.5),
      advertised_start_time,
      status: Status::at(advertised_start_time, now),
    }
  }
}
