mod error;
mod init;
mod repository;
mod sqlite;

pub use error::{Error, Result};
pub use init::InitOnce;
pub use repository::{Repository, FIXTURE_COUNT};
pub use sqlite::{open_connection, MEMORY_PATH};
