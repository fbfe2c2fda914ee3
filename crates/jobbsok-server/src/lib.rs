//! REST API server for the jobbsok job post API.
//!
//! Exposes paginated job post search, fetch by id, and secret-key-gated
//! bulk creation over the [`jobbsok_core`] service and the
//! [`jobbsok_db`] PostgreSQL repository.

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod openapi;
pub mod router;
pub mod state;

pub use config::ServerConfig;
pub use router::create_router;
pub use state::AppState;
