pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod errors;

// Re-exports
pub use api::routes::{create_router, AppState};
pub use config::Settings;
pub use errors::{BridgeError, BridgeResult};
