pub mod api;
pub mod auth;
pub mod config;
pub mod error;
mod state;

pub use state::{build_state, init_tracing, AppState};
