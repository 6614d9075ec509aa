use std::marker::PhantomData;
use std::path::Path;

use chrono::Utc;
use parking_lot::Mutex;
use rusqlite::{params_from_iter, Connection};

use super::error::{Error, Result};
use super::init::InitOnce;
use super::sqlite::{open_connection, MEMORY_PATH};
use crate::catalog::Catalog;
use crate::query::{assemble, lookup, select_all, Statement};
use crate::types::ListRequest;

/// Number of fixture rows written when seeding.
pub const FIXTURE_COUNT: i64 = 100;

/// Repository for one catalog table.
///
/// Every call builds its own statement; the mutex only serializes access to
/// the underlying SQLite handle.
pub struct Repository<C> {
  conn: Mutex<Connection>,
  init: InitOnce,
  _catalog: PhantomData<fn() -> C>,
}

impl<C: Catalog> Repository<C> {
  pub fn open(path: impl AsRef<Path>) -> Result<Self> {
    Ok(Self::from_connection(open_connection(path)?))
  }

  pub fn in_memory() -> Result<Self> {
    Self::open(MEMORY_PATH)
  }

  pub fn from_connection(conn: Connection) -> Self {
    Self {
      conn: Mutex::new(conn),
      init: InitOnce::new(),
      _catalog: PhantomData,
    }
  }

  /// Create the table and optionally seed fixtures. Runs at most once per
  /// repository; later and concurrent calls observe the first outcome.
  pub fn init(&self, seed: bool) -> Result<()> {
    self.init.call_once(|| {
      let mut conn = self.conn.lock();
      conn.execute_batch(C::SCHEMA)?;
      tracing::info!(table = C::TABLE, "schema initialized");
      if seed {
        seed_fixtures::<C>(&mut conn)?;
      }
      Ok(())
    })
  }

  pub fn is_initialized(&self) -> bool {
    self.init.is_done()
  }

  /// List entities matching the request, ordered per `order_by` or by
  /// advertised start time.
  pub fn list(&self, request: &ListRequest<C::Filter>) -> Result<Vec<C>> {
    let statement = assemble::<C>(request.filter.as_ref(), request.order_by.as_deref());
    self.query(&statement)
  }

  /// Every row, unfiltered and in storage order.
  pub fn list_all(&self) -> Result<Vec<C>> {
    self.query(&select_all::<C>())
  }

  pub fn get(&self, id: i64) -> Result<C> {
    self
      .query(&lookup::<C>(id))?
      .into_iter()
      .next()
      .ok_or(Error::NotFound { kind: C::KIND, id })
  }

  pub fn insert(&self, entity: &C) -> Result<()> {
    let conn = self.conn.lock();
    let sql = insert_sql::<C>("INSERT");
    conn.execute(&sql, params_from_iter(entity.to_params()))?;
    tracing::debug!(table = C::TABLE, id = entity.id(), "inserted row");
    Ok(())
  }

  /// Delete every row in the table.
  pub fn clear(&self) -> Result<usize> {
    let conn = self.conn.lock();
    let deleted = conn.execute(&format!("DELETE FROM {}", C::TABLE), [])?;
    tracing::debug!(table = C::TABLE, deleted, "cleared table");
    Ok(deleted)
  }

  fn query(&self, statement: &Statement) -> Result<Vec<C>> {
    let conn = self.conn.lock();
    let mut stmt = conn.prepare(&statement.sql)?;
    let now = Utc::now();
    let rows = stmt.query_map(params_from_iter(statement.args.iter()), |row| {
      C::from_row(row, now)
    })?;
    let entities = rows.collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(entities)
  }
}

fn insert_sql<C: Catalog>(verb: &str) -> String {
  let placeholders = vec!["?"; C::COLUMNS.len()].join(",");
  format!(
    "{} INTO {} ({}) VALUES ({})",
    verb,
    C::TABLE,
    C::COLUMNS.join(", "),
    placeholders
  )
}

fn seed_fixtures<C: Catalog>(conn: &mut Connection) -> Result<()> {
  let now = Utc::now();
  let mut rng = rand::thread_rng();
  let tx = conn.transaction()?;
  {
    let mut stmt = tx.prepare(&insert_sql::<C>("INSERT OR IGNORE"))?;
    for id in 1..=FIXTURE_COUNT {
      let entity = C::fixture(id, now, &mut rng);
      stmt.execute(params_from_iter(entity.to_params()))?;
    }
  }
  tx.commit()?;
  tracing::info!(table = C::TABLE, count = FIXTURE_COUNT, "seeded fixtures");
  Ok(())
}
