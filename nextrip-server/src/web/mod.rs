//! Web layer for the departure estimator.
//!
//! Provides HTTP endpoints for selecting a journey and reading its
//! estimates.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
