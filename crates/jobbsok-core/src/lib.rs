//! Jobbsok Core - Domain types, query logic, and services.
//!
//! This crate provides the core functionality for the job post API:
//!
//! - **Domain models**: [`JobPost`], [`JobTag`], [`JobDefinition`], etc.
//! - **Query logic**: [`Predicate`] trees built from sparse filters,
//!   deadline buckets, and order resolution
//! - **Geography**: [`GeoTable`] municipality-to-city expansion
//! - **Services**: [`JobPostService`] for paged search, id lookup, and
//!   de-duplicating bulk creation
//! - **Traits**: [`JobPostStore`] for dependency injection
//!
//! Business logic is decoupled from I/O through the store trait; the
//! `jobbsok-db` crate provides the PostgreSQL implementation and
//! `jobbsok-server` the HTTP surface.

pub mod error;
pub mod filter;
pub mod geo;
pub mod models;
pub mod service;
pub mod traits;

// Error handling
pub use error::AppError;

// Query construction
pub use filter::{DeadlineBucket, JobPostOrder, Predicate, build_predicate, resolve_order};

// Geography
pub use geo::GeoTable;

// Domain models
pub use models::{
    DefinitionInput, DefinitionRef, JobDefinition, JobPost, JobPostFilter, JobPostPage, JobTag,
    KEY_LOCATION, KEY_POSITION, KEY_SECTOR, NewJobPost, ResolvedJobPost, TagRef,
};

// Services and traits
pub use service::JobPostService;
pub use traits::JobPostStore;
