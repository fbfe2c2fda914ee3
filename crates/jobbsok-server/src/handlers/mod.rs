//! HTTP request handlers.

pub mod health;
pub mod job_posts;
