use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Connection, prepare, execute or row decoding failure
  #[error("database error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("failed to prepare database location: {0}")]
  Io(#[from] std::io::Error),

  /// A previous initialization attempt failed; it is not retried
  #[error("repository initialization failed: {0}")]
  Init(String),

  #[error("{kind} {id} not found")]
  NotFound { kind: &'static str, id: i64 },
}

impl Error {
  pub fn is_not_found(&self) -> bool {
    matches!(self, Self::NotFound { .. })
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
