//! Jobbsok DB - PostgreSQL repository layer for the job post API.
//!
//! Provides [`JobPostRepository`], the `JobPostStore` implementation
//! that renders predicate trees to SQL and persists creation batches.

mod repository;

pub use repository::JobPostRepository;
