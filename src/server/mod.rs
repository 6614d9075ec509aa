mod config;
mod daemon;
mod routes;

pub use config::{DatabaseSection, LoggingSection, ServerConfig, ServerSection};
pub use daemon::Daemon;
pub use routes::{build_router, AppState, ListEventsResponse, ListRacesResponse};
