// src/lib.rs

pub mod config;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod kiosk;
pub mod models;
pub mod reconcile;
pub mod resolver;
pub mod routes;
pub mod scanner;
pub mod session;
pub mod state;
pub mod utils;

// Re-exports
pub use error::AppError;
pub use state::AppState;
