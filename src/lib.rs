// Test generation, wrapping, tracking and history. The terminal front end
// lives in main.rs.

pub mod config;
pub mod engine;
pub mod error;
pub mod generator;
pub mod logging;
pub mod session;
pub mod store;
