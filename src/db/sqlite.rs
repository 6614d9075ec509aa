use std::path::Path;

use rusqlite::Connection;

use super::error::Result;

pub const MEMORY_PATH: &str = ":memory:";

const PRAGMAS: &str = r#"
PRAGMA journal_mode = WAL;
PRAGMA synchronous = NORMAL;
PRAGMA cache_size = -16000;
PRAGMA temp_store = MEMORY;
"#;

/// Open a SQLite database, creating parent directories for file paths.
///
/// `:memory:` opens a private in-memory database.
pub fn open_connection(path: impl AsRef<Path>) -> Result<Connection> {
  let path = path.as_ref();
  let conn = if path == Path::new(MEMORY_PATH) {
    Connection::open_in_memory()?
  } else {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
      std::fs::create_dir_all(parent)?;
    }
    Connection::open(path)?
  };

  conn.execute_batch(PRAGMAS)?;
  tracing::debug!(path = %path.display(), "opened sqlite database");
  Ok(conn)
}
