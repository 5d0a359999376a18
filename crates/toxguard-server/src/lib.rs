//! ToxGuard Server
//!
//! HTTP front end for toxicity analysis. Exposes the analyze, batch-analyze
//! and health endpoints plus a Prometheus scrape endpoint.

pub mod config;
pub mod routes;
pub mod state;

pub use config::{ConfigOverrides, ServerConfig};
pub use routes::create_router;
pub use state::AppState;
