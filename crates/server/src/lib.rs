#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod config;
pub mod http;
pub mod store;

pub use config::{ConfigError, ServerConfig};
pub use http::router;
pub use store::{MemoryStore, PgStore, StoreError, WorkoutStore};
