//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::dto::{
    CreateJobPostsRequest, HealthResponse, JobDefinitionDto, JobPostCreateDto, JobPostDto,
    JobPostPageDto, JobTagDto,
};
use crate::handlers::{health, job_posts};

/// OpenAPI documentation for the jobbsok API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Jobbsok API",
        version = "1.0.0",
        description = "Query API over scraped Norwegian job posts.

Job posts carry free-form tags and key/value definitions (position,
sector, location, ...). Search combines optional filters with AND and
pages through the results.

## Quick Start

1. Check server health: `GET /api/v1/health`
2. Search for posts: `GET /api/v1/jobposts?query=utvikler&municipality=oslo`
3. Fetch one post: `GET /api/v1/jobposts/42`
"
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        health::health_check,
        job_posts::list_job_posts,
        job_posts::get_job_post,
        job_posts::create_job_posts,
    ),
    components(
        schemas(
            // Request types
            CreateJobPostsRequest,
            JobPostCreateDto,
            // Response types
            HealthResponse,
            JobPostDto,
            JobPostPageDto,
            JobTagDto,
            JobDefinitionDto,
        )
    ),
    tags(
        (name = "system", description = "System health"),
        (name = "jobposts", description = "Job post search, retrieval, and creation"),
    )
)]
pub struct ApiDoc;
