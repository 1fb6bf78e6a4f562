//! HTTP front end of the SmartRoute road router.

pub mod api;
pub mod config;
pub mod error;
pub mod state;

pub use api::{DEFAULT_PLACE, build_router};
pub use config::{Cli, ServerConfig};
pub use error::ApiError;
pub use state::AppState;
