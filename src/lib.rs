pub mod catalog;
pub mod db;
pub mod query;
pub mod types;

// HTTP gateway and daemon (only compiled with server feature)
#[cfg(feature = "server")]
pub mod server;
