//! Data transfer objects for the HTTP API.

mod request;
mod response;

pub use request::{
    CreateJobPostsRequest, DEFAULT_PAGE_SIZE, JobPostCreateDto, JobPostListQuery, MAX_PAGE_SIZE,
    SecretKeyQuery,
};
pub use response::{
    ApiEnvelope, HealthResponse, JobDefinitionDto, JobPostDto, JobPostPageDto, JobTagDto,
    ResponseError, ResponseStatus,
};
