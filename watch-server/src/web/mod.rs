//! Web layer for the train watch.
//!
//! Serves the card dashboard and the JSON endpoints backing it.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::{AppState, CardRegistry, StationDirectory};
pub use templates::*;
