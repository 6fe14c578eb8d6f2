mod handlers;
mod router;
mod types;

pub use router::router;
pub use types::{ApiError, AppState};
