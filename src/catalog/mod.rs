//! Catalog definitions plugged into the generic list/get pipeline.
//!
//! A catalog supplies only its table layout, its filter shape, and how a row
//! maps onto its entity. Query assembly, ordering and status derivation are
//! shared.

mod racing;
mod sports;
mod status;

use chrono::{DateTime, Utc};
use rand::Rng;
use rusqlite::types::Value;
use rusqlite::Row;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::query::FilterSpec;

pub use racing::{Race, RaceFilter};
pub use sports::{Event, EventFilter, CATEGORIES};
pub use status::{decode_timestamp, encode_timestamp, Status};

pub trait Catalog: Sized + Send + Serialize + DeserializeOwned + 'static {
  type Filter: FilterSpec + Send + Serialize + DeserializeOwned + 'static;

  /// Human readable entity name used in errors and logs
  const KIND: &'static str;
  const TABLE: &'static str;
  /// Selected columns, in the order `from_row` and `to_params` use
  const COLUMNS: &'static [&'static str];
  const SCHEMA: &'static str;
  const ID_COLUMN: &'static str = "id";
  const START_COLUMN: &'static str = "advertised_start_time";

  fn id(&self) -> i64;

  fn advertised_start_time(&self) -> DateTime<Utc>;

  /// Decode one result row, deriving status against `now`.
  fn from_row(row: &Row<'_>, now: DateTime<Utc>) -> rusqlite::Result<Self>;

  /// Values to bind for an insert, in `COLUMNS` order.
  fn to_params(&self) -> Vec<Value>;

  /// Generate a random fixture row starting within a few days of `now`.
  fn fixture<R: Rng + ?Sized>(id: i64, now: DateTime<Utc>, rng: &mut R) -> Self;
}

/// Random start time between one day before and two days after `now`.
pub(crate) fn fixture_start_time<R: Rng + ?Sized>(now: DateTime<Utc>, rng: &mut R) -> DateTime<Utc> {
  let offset = rng.gen_range(-86_400..=172_800);
  now + chrono::Duration::seconds(offset)
}

/// Random two-word name in the style of a team.
pub(crate) fn fixture_name<R: Rng + ?Sized>(rng: &mut R) -> String {
  const PLACES: &[&str] = &[
    "Ballarat", "Bendigo", "Caulfield", "Flemington", "Geelong", "Moonee Valley", "Randwick",
    "Rosehill", "Sandown", "Warrnambool", "Eagle Farm", "Morphettville",
  ];
  const NAMES: &[&str] = &[
    "Cyclones", "Falcons", "Hawks", "Kestrels", "Lions", "Magpies", "Rockets", "Sharks",
    "Stallions", "Storm", "Thunder", "Wolves",
  ];
  let place = PLACES[rng.gen_range(0..PLACES.len())];
  let name = NAMES[rng.gen_range(0..NAMES.len())];
  format!("{} {}", place, name)
}
