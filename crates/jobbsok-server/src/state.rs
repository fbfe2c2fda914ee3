//! Shared application state.

use sqlx::PgPool;

use jobbsok_core::{GeoTable, JobPostService};
use jobbsok_db::JobPostRepository;

/// State shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub job_posts: JobPostService<JobPostRepository>,
}

impl AppState {
    /// Creates the application state from a database pool and the
    /// secret key gating job post creation.
    pub fn new(pool: PgPool, secret_key: String) -> Self {
        let repository = JobPostRepository::new(pool);
        let job_posts = JobPostService::new(repository, GeoTable::norwegian(), secret_key);
        Self { job_posts }
    }
}
